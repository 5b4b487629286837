use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod accounts;
mod balances;
mod incomes;
mod read;
mod wipe;

pub use read::SeriesPoint;
pub use wipe::WipeSummary;

/// The store-facing half of the crate: owner-scoped CRUD over accounts,
/// balances and incomes, plus the read operations that feed the calculator.
///
/// Every operation takes the owning `user_id`; updates and deletes filter by
/// both row id and owner, so a mismatched owner matches zero rows instead of
/// touching someone else's data.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
