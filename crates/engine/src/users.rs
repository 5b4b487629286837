//! Users table (minimal entity).
//!
//! Identity is deliberately thin: the store scopes every row by `user_id`,
//! which is the username. Users are created with the admin CLI.

use sea_orm::entity::prelude::*;
use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Canonical form of a username: trimmed and NFKC-normalized, so visually
/// identical names hit the same row.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().nfkc().collect()
}
