//! Child rows hanging off users: claims, external logins, role links and
//! tokens. All four are copied verbatim after their parents.

use super::{row_i32, row_opt_str, row_str, Entity, Field, SinkEntity, SourceEntity};
use crate::error::Result;

/// One `AspNetUserClaims` row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserClaim {
    pub id: i32,
    pub user_id: String,
    pub claim_type: Option<String>,
    pub claim_value: Option<String>,
}

impl Entity for UserClaim {
    const TABLE: &'static str = "AspNetUserClaims";
}

impl SourceEntity for UserClaim {
    const SELECT: &'static [&'static str] = &["Id", "UserId", "ClaimType", "ClaimValue"];
    const ORDER_BY: &'static [&'static str] = &["Id"];

    fn from_row(row: &tiberius::Row) -> Result<Self> {
        Ok(Self {
            id: row_i32(row, 0, Self::TABLE, "Id")?,
            user_id: row_str(row, 1, Self::TABLE, "UserId")?,
            claim_type: row_opt_str(row, 2, Self::TABLE, "ClaimType")?,
            claim_value: row_opt_str(row, 3, Self::TABLE, "ClaimValue")?,
        })
    }
}

impl SinkEntity for UserClaim {
    const INSERT: &'static [&'static str] = &["Id", "UserId", "ClaimType", "ClaimValue"];

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::I32(self.id),
            Field::Text(&self.user_id),
            Field::NullableText(self.claim_type.as_deref()),
            Field::NullableText(self.claim_value.as_deref()),
        ]
    }
}

/// One `AspNetUserLogins` row (composite key: LoginProvider, ProviderKey).
#[derive(Debug, Clone, PartialEq)]
pub struct UserLogin {
    pub login_provider: String,
    pub provider_key: String,
    pub provider_display_name: Option<String>,
    pub user_id: String,
}

impl Entity for UserLogin {
    const TABLE: &'static str = "AspNetUserLogins";
}

impl SourceEntity for UserLogin {
    const SELECT: &'static [&'static str] = &[
        "LoginProvider",
        "ProviderKey",
        "ProviderDisplayName",
        "UserId",
    ];
    const ORDER_BY: &'static [&'static str] = &["LoginProvider", "ProviderKey"];

    fn from_row(row: &tiberius::Row) -> Result<Self> {
        Ok(Self {
            login_provider: row_str(row, 0, Self::TABLE, "LoginProvider")?,
            provider_key: row_str(row, 1, Self::TABLE, "ProviderKey")?,
            provider_display_name: row_opt_str(row, 2, Self::TABLE, "ProviderDisplayName")?,
            user_id: row_str(row, 3, Self::TABLE, "UserId")?,
        })
    }
}

impl SinkEntity for UserLogin {
    const INSERT: &'static [&'static str] = &[
        "LoginProvider",
        "ProviderKey",
        "ProviderDisplayName",
        "UserId",
    ];

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.login_provider),
            Field::Text(&self.provider_key),
            Field::NullableText(self.provider_display_name.as_deref()),
            Field::Text(&self.user_id),
        ]
    }
}

/// One `AspNetUserRoles` row (composite key: UserId, RoleId).
#[derive(Debug, Clone, PartialEq)]
pub struct UserRole {
    pub user_id: String,
    pub role_id: String,
}

impl Entity for UserRole {
    const TABLE: &'static str = "AspNetUserRoles";
}

impl SourceEntity for UserRole {
    const SELECT: &'static [&'static str] = &["UserId", "RoleId"];
    const ORDER_BY: &'static [&'static str] = &["UserId", "RoleId"];

    fn from_row(row: &tiberius::Row) -> Result<Self> {
        Ok(Self {
            user_id: row_str(row, 0, Self::TABLE, "UserId")?,
            role_id: row_str(row, 1, Self::TABLE, "RoleId")?,
        })
    }
}

impl SinkEntity for UserRole {
    const INSERT: &'static [&'static str] = &["UserId", "RoleId"];

    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::Text(&self.user_id), Field::Text(&self.role_id)]
    }
}

/// One `AspNetUserTokens` row (composite key: UserId, LoginProvider, Name).
#[derive(Debug, Clone, PartialEq)]
pub struct UserToken {
    pub user_id: String,
    pub login_provider: String,
    pub name: String,
    pub value: Option<String>,
}

impl Entity for UserToken {
    const TABLE: &'static str = "AspNetUserTokens";
}

impl SourceEntity for UserToken {
    const SELECT: &'static [&'static str] = &["UserId", "LoginProvider", "Name", "Value"];
    const ORDER_BY: &'static [&'static str] = &["UserId", "LoginProvider", "Name"];

    fn from_row(row: &tiberius::Row) -> Result<Self> {
        Ok(Self {
            user_id: row_str(row, 0, Self::TABLE, "UserId")?,
            login_provider: row_str(row, 1, Self::TABLE, "LoginProvider")?,
            name: row_str(row, 2, Self::TABLE, "Name")?,
            value: row_opt_str(row, 3, Self::TABLE, "Value")?,
        })
    }
}

impl SinkEntity for UserToken {
    const INSERT: &'static [&'static str] = &["UserId", "LoginProvider", "Name", "Value"];

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.user_id),
            Field::Text(&self.login_provider),
            Field::Text(&self.name),
            Field::NullableText(self.value.as_deref()),
        ]
    }
}
