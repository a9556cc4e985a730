//! Role and role-claim rows. Copied verbatim; roles are the first parents in
//! the dependency order.

use super::{row_i32, row_opt_str, row_str, Entity, Field, SinkEntity, SourceEntity};
use crate::error::Result;

/// One `AspNetRoles` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: String,
    pub name: Option<String>,
    pub normalized_name: Option<String>,
    pub concurrency_stamp: Option<String>,
}

impl Entity for Role {
    const TABLE: &'static str = "AspNetRoles";
}

impl SourceEntity for Role {
    const SELECT: &'static [&'static str] = &["Id", "Name", "NormalizedName", "ConcurrencyStamp"];
    const ORDER_BY: &'static [&'static str] = &["Id"];

    fn from_row(row: &tiberius::Row) -> Result<Self> {
        Ok(Self {
            id: row_str(row, 0, Self::TABLE, "Id")?,
            name: row_opt_str(row, 1, Self::TABLE, "Name")?,
            normalized_name: row_opt_str(row, 2, Self::TABLE, "NormalizedName")?,
            concurrency_stamp: row_opt_str(row, 3, Self::TABLE, "ConcurrencyStamp")?,
        })
    }
}

impl SinkEntity for Role {
    const INSERT: &'static [&'static str] = &["Id", "Name", "NormalizedName", "ConcurrencyStamp"];

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::Text(&self.id),
            Field::NullableText(self.name.as_deref()),
            Field::NullableText(self.normalized_name.as_deref()),
            Field::NullableText(self.concurrency_stamp.as_deref()),
        ]
    }
}

/// One `AspNetRoleClaims` row.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleClaim {
    pub id: i32,
    pub role_id: String,
    pub claim_type: Option<String>,
    pub claim_value: Option<String>,
}

impl Entity for RoleClaim {
    const TABLE: &'static str = "AspNetRoleClaims";
}

impl SourceEntity for RoleClaim {
    const SELECT: &'static [&'static str] = &["Id", "RoleId", "ClaimType", "ClaimValue"];
    const ORDER_BY: &'static [&'static str] = &["Id"];

    fn from_row(row: &tiberius::Row) -> Result<Self> {
        Ok(Self {
            id: row_i32(row, 0, Self::TABLE, "Id")?,
            role_id: row_str(row, 1, Self::TABLE, "RoleId")?,
            claim_type: row_opt_str(row, 2, Self::TABLE, "ClaimType")?,
            claim_value: row_opt_str(row, 3, Self::TABLE, "ClaimValue")?,
        })
    }
}

impl SinkEntity for RoleClaim {
    const INSERT: &'static [&'static str] = &["Id", "RoleId", "ClaimType", "ClaimValue"];

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::I32(self.id),
            Field::Text(&self.role_id),
            Field::NullableText(self.claim_type.as_deref()),
            Field::NullableText(self.claim_value.as_deref()),
        ]
    }
}
