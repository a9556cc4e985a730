//! User rows: the one entity that is transformed rather than copied.
//!
//! The read shape selects only what the transform consumes; every other
//! destination column is a constant of the reset policy, so credential and
//! blob columns never leave the source server.

use super::{row_opt_str, row_str, Entity, Field, SinkEntity, SourceEntity};
use crate::error::Result;
use crate::pseudonym::Pseudonym;
use chrono::{DateTime, FixedOffset};

/// The columns read from `AspNetUsers`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUser {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub class: Option<String>,
    pub company: Option<String>,
}

impl Entity for SourceUser {
    const TABLE: &'static str = "AspNetUsers";
}

impl SourceEntity for SourceUser {
    const SELECT: &'static [&'static str] = &["Id", "FirstName", "LastName", "Class", "Company"];
    const ORDER_BY: &'static [&'static str] = &["Id"];

    fn from_row(row: &tiberius::Row) -> Result<Self> {
        Ok(Self {
            id: row_str(row, 0, Self::TABLE, "Id")?,
            first_name: row_opt_str(row, 1, Self::TABLE, "FirstName")?,
            last_name: row_opt_str(row, 2, Self::TABLE, "LastName")?,
            class: row_opt_str(row, 3, Self::TABLE, "Class")?,
            company: row_opt_str(row, 4, Self::TABLE, "Company")?,
        })
    }
}

/// The full `AspNetUsers` row written to the destination.
///
/// Constructed only through [`UserRecord::anonymized`], which guarantees the
/// de-identification invariant: no account written by this tool is usable
/// for authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub class: Option<String>,
    pub company: Option<String>,
    pub profile_picture: Option<Vec<u8>>,
    pub resume: Option<Vec<u8>>,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: String,
    pub normalized_email: String,
    pub email_confirmed: bool,
    pub password_hash: Option<String>,
    pub security_stamp: Option<String>,
    pub concurrency_stamp: Option<String>,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub two_factor_enabled: bool,
    pub lockout_end: Option<DateTime<FixedOffset>>,
    pub lockout_enabled: bool,
    pub access_failed_count: i32,
}

impl UserRecord {
    /// Build the destination row for a source user: primary key preserved,
    /// name fields replaced by the pseudonym, application fields copied,
    /// blobs cleared and every credential/session field reset.
    pub fn anonymized(source: &SourceUser, pseudonym: &Pseudonym, domain: &str) -> Self {
        let email = pseudonym.email(domain);
        let normalized = email.to_uppercase();

        Self {
            id: source.id.clone(),
            first_name: pseudonym.first_name.to_string(),
            last_name: pseudonym.last_name.to_string(),
            class: source.class.clone(),
            company: source.company.clone(),
            profile_picture: None,
            resume: None,
            user_name: email.clone(),
            normalized_user_name: normalized.clone(),
            email,
            normalized_email: normalized,
            email_confirmed: false,
            password_hash: None,
            security_stamp: None,
            concurrency_stamp: None,
            phone_number: None,
            phone_number_confirmed: false,
            two_factor_enabled: false,
            lockout_end: None,
            lockout_enabled: false,
            access_failed_count: 0,
        }
    }
}

impl Entity for UserRecord {
    const TABLE: &'static str = "AspNetUsers";
}

impl SinkEntity for UserRecord {
    const INSERT: &'static [&'static str] = &[
        "Id",
        "FirstName",
        "LastName",
        "Class",
        "Company",
        "ProfilePicture",
        "Resume",
        "UserName",
        "NormalizedUserName",
        "Email",
        "NormalizedEmail",
        "EmailConfirmed",
        "PasswordHash",
        "SecurityStamp",
        "ConcurrencyStamp",
        "PhoneNumber",
        "PhoneNumberConfirmed",
        "TwoFactorEnabled",
        "LockoutEnd",
        "LockoutEnabled",
        "AccessFailedCount",
    ];

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.id),
            Field::Text(&self.first_name),
            Field::Text(&self.last_name),
            Field::NullableText(self.class.as_deref()),
            Field::NullableText(self.company.as_deref()),
            Field::NullableBytes(self.profile_picture.as_deref()),
            Field::NullableBytes(self.resume.as_deref()),
            Field::Text(&self.user_name),
            Field::Text(&self.normalized_user_name),
            Field::Text(&self.email),
            Field::Text(&self.normalized_email),
            Field::Bool(self.email_confirmed),
            Field::NullableText(self.password_hash.as_deref()),
            Field::NullableText(self.security_stamp.as_deref()),
            Field::NullableText(self.concurrency_stamp.as_deref()),
            Field::NullableText(self.phone_number.as_deref()),
            Field::Bool(self.phone_number_confirmed),
            Field::Bool(self.two_factor_enabled),
            Field::NullableTimestamp(self.lockout_end.as_ref()),
            Field::Bool(self.lockout_enabled),
            Field::I32(self.access_failed_count),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pseudonym::pseudonymize;

    fn jane() -> SourceUser {
        SourceUser {
            id: "u1".into(),
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            class: Some("SP2023".into()),
            company: Some("Acme".into()),
        }
    }

    #[test]
    fn test_anonymized_preserves_key_and_app_fields() {
        let source = jane();
        let pseudonym = pseudonymize(&source.id, source.first_name.as_deref(), source.last_name.as_deref());
        let record = UserRecord::anonymized(&source, &pseudonym, "example.invalid");

        assert_eq!(record.id, "u1");
        assert_eq!(record.class.as_deref(), Some("SP2023"));
        assert_eq!(record.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_anonymized_resets_credentials() {
        let source = jane();
        let pseudonym = pseudonymize(&source.id, source.first_name.as_deref(), source.last_name.as_deref());
        let record = UserRecord::anonymized(&source, &pseudonym, "example.invalid");

        assert!(record.password_hash.is_none());
        assert!(record.security_stamp.is_none());
        assert!(record.concurrency_stamp.is_none());
        assert!(record.phone_number.is_none());
        assert!(record.lockout_end.is_none());
        assert!(!record.email_confirmed);
        assert!(!record.phone_number_confirmed);
        assert!(!record.two_factor_enabled);
        assert!(!record.lockout_enabled);
        assert_eq!(record.access_failed_count, 0);
    }

    #[test]
    fn test_anonymized_clears_blobs() {
        let source = jane();
        let pseudonym = pseudonymize(&source.id, source.first_name.as_deref(), source.last_name.as_deref());
        let record = UserRecord::anonymized(&source, &pseudonym, "example.invalid");

        assert!(record.profile_picture.is_none());
        assert!(record.resume.is_none());
    }

    #[test]
    fn test_anonymized_email_and_username_match() {
        let source = jane();
        let pseudonym = pseudonymize(&source.id, source.first_name.as_deref(), source.last_name.as_deref());
        let record = UserRecord::anonymized(&source, &pseudonym, "example.invalid");

        assert_eq!(record.user_name, record.email);
        assert_eq!(record.email, record.email.to_lowercase());
        assert_eq!(record.normalized_email, record.email.to_uppercase());
        assert_eq!(record.normalized_user_name, record.normalized_email);
        assert!(record.email.ends_with("@example.invalid"));
    }
}
