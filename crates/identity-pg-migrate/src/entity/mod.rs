//! The fixed set of identity entities moved by this tool.
//!
//! Seven row shapes are migrated, mirroring the ASP.NET Identity schema:
//! roles, users, role claims, user claims, user logins, user roles and user
//! tokens. Each shape implements [`SourceEntity`] (how to page and decode it
//! out of SQL Server) and/or [`SinkEntity`] (how to stage it into
//! PostgreSQL). The user table is the one asymmetric case: the read shape
//! ([`SourceUser`]) carries only the columns the pseudonymizing transform
//! consumes, while the write shape ([`UserRecord`]) carries the full
//! destination row with credentials reset and blobs cleared.

mod membership;
mod role;
mod user;

pub use membership::{UserClaim, UserLogin, UserRole, UserToken};
pub use role::{Role, RoleClaim};
pub use user::{SourceUser, UserRecord};

use crate::error::{MigrateError, Result};
use chrono::{DateTime, FixedOffset};

/// A migrated row shape, tied to one table.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Unqualified table name.
    const TABLE: &'static str;
}

/// A row shape read from the source store.
pub trait SourceEntity: Entity + Sized {
    /// Columns selected from the source, in [`from_row`](Self::from_row) order.
    const SELECT: &'static [&'static str];

    /// Key columns defining the stable page order (the primary key, or the
    /// full key tuple for composite-key tables).
    const ORDER_BY: &'static [&'static str];

    /// Decode one source row.
    fn from_row(row: &tiberius::Row) -> Result<Self>;
}

/// A row shape written to the destination store.
pub trait SinkEntity: Entity {
    /// Columns written to the destination, in [`fields`](Self::fields) order.
    const INSERT: &'static [&'static str];

    /// The row's column values, in [`INSERT`](Self::INSERT) order.
    fn fields(&self) -> Vec<Field<'_>>;
}

/// One column value of a destination row.
///
/// Only the shapes the fixed schema actually needs; the target encodes these
/// into COPY text format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Text(&'a str),
    NullableText(Option<&'a str>),
    Bool(bool),
    I32(i32),
    NullableBytes(Option<&'a [u8]>),
    NullableTimestamp(Option<&'a DateTime<FixedOffset>>),
}

/// Read a non-null string column.
pub(crate) fn row_str(
    row: &tiberius::Row,
    idx: usize,
    table: &'static str,
    col: &'static str,
) -> Result<String> {
    row_opt_str(row, idx, table, col)?.ok_or_else(|| {
        MigrateError::malformed_row(table, format!("unexpected NULL in non-null column {}", col))
    })
}

/// Read a nullable string column.
pub(crate) fn row_opt_str(
    row: &tiberius::Row,
    idx: usize,
    table: &'static str,
    col: &'static str,
) -> Result<Option<String>> {
    let value: Option<&str> = row
        .try_get(idx)
        .map_err(|e| MigrateError::malformed_row(table, format!("column {}: {}", col, e)))?;
    Ok(value.map(str::to_string))
}

/// Read a non-null i32 column.
pub(crate) fn row_i32(
    row: &tiberius::Row,
    idx: usize,
    table: &'static str,
    col: &'static str,
) -> Result<i32> {
    let value: Option<i32> = row
        .try_get(idx)
        .map_err(|e| MigrateError::malformed_row(table, format!("column {}: {}", col, e)))?;
    value.ok_or_else(|| {
        MigrateError::malformed_row(table, format!("unexpected NULL in non-null column {}", col))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_is_prefix_of_select_keys() {
        // Every order key must be a selected column so pages decode their
        // own sort key.
        fn check(select: &[&str], order_by: &[&str]) {
            for key in order_by {
                assert!(select.contains(key), "{} missing from SELECT", key);
            }
        }
        check(Role::SELECT, Role::ORDER_BY);
        check(SourceUser::SELECT, SourceUser::ORDER_BY);
        check(RoleClaim::SELECT, RoleClaim::ORDER_BY);
        check(UserClaim::SELECT, UserClaim::ORDER_BY);
        check(UserLogin::SELECT, UserLogin::ORDER_BY);
        check(UserRole::SELECT, UserRole::ORDER_BY);
        check(UserToken::SELECT, UserToken::ORDER_BY);
    }

    #[test]
    fn test_composite_keys_use_full_tuple() {
        assert_eq!(UserLogin::ORDER_BY, ["LoginProvider", "ProviderKey"]);
        assert_eq!(UserRole::ORDER_BY, ["UserId", "RoleId"]);
        assert_eq!(UserToken::ORDER_BY, ["UserId", "LoginProvider", "Name"]);
    }

    #[test]
    fn test_insert_matches_field_count() {
        let role = Role {
            id: "r1".into(),
            name: Some("Admin".into()),
            normalized_name: Some("ADMIN".into()),
            concurrency_stamp: None,
        };
        assert_eq!(role.fields().len(), Role::INSERT.len());

        let link = UserRole {
            user_id: "u1".into(),
            role_id: "r1".into(),
        };
        assert_eq!(link.fields().len(), UserRole::INSERT.len());
    }
}
