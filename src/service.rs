use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::{
    db::Db,
    model::{
        date_range::DateRange,
        edit_window::is_editable,
        error::ApiError,
        summary::{Summary, SummaryPeriod},
        transaction::{Transaction, TransactionId, TransactionInput},
    },
};

/// Domain rules on top of the store: validation, the edit window and the
/// income/expense summary.
///
/// Operations that depend on the time take `now` from the caller so that the
/// rules are plain functions of their inputs.
#[derive(Clone)]
pub struct TransactionService {
    db: Arc<Db>,
}

impl TransactionService {
    pub fn new(db: Arc<Db>) -> TransactionService {
        TransactionService { db }
    }

    pub fn create(&self, input: TransactionInput) -> Result<Transaction, ApiError> {
        let new_transaction = input.validate()?;

        let transaction = self.db.insert(new_transaction)?;
        info!("created transaction {}", transaction.id);

        Ok(transaction)
    }

    pub fn update(
        &self,
        id: TransactionId,
        patch: TransactionInput,
        now: DateTime<Utc>,
    ) -> Result<Transaction, ApiError> {
        // The window check and the write happen under the same store lock.
        let transaction = self.db.update_with(id, |existing| {
            if !is_editable(existing.datetime, now) {
                return Err(ApiError::EditWindowExpired(id));
            }

            patch.merged_onto(existing).validate()
        })?;
        info!("updated transaction {}", transaction.id);

        Ok(transaction)
    }

    // Deleting is not bound by the edit window, only updating is.
    pub fn delete(&self, id: TransactionId) -> Result<(), ApiError> {
        self.db.delete_by_id(id)?;
        info!("deleted transaction {}", id);

        Ok(())
    }

    pub fn list_all(&self) -> Result<Vec<Transaction>, ApiError> {
        self.db.find_all()
    }

    pub fn list_by_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let range = DateRange::parse(start, end)?;

        self.db.find_by_range(&range)
    }

    pub fn summarize(
        &self,
        period: SummaryPeriod,
        now: DateTime<Utc>,
    ) -> Result<(DateRange, Summary), ApiError> {
        let window = period.window(now).ok_or_else(|| {
            ApiError::InternalError(format!("no {:?} window for {}", period, now))
        })?;

        let transactions = self.db.find_by_range(&window)?;

        Ok((window, Summary::of(&transactions)))
    }
}
