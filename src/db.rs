use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, TimeZone, Utc};
use log::info;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};

use crate::model::{
    amount::Amount,
    date_range::DateRange,
    error::ApiError,
    timestamp::truncate_to_millis,
    transaction::{Division, NewTransaction, Transaction, TransactionId, TransactionType},
};

const SELECT_TRANSACTION: &str = "SELECT id, type, amount, description, category, division, datetime, created_at, updated_at FROM transactions";

/// The transaction store.
///
/// One SQLite connection behind a mutex, so every read and write is
/// serialized. An in-memory database and a file on disk go through exactly the
/// same code; only the connection differs.
pub struct Db {
    connection: Mutex<Connection>,
}

impl Db {
    /// An ephemeral store that lives as long as the process.
    pub fn new() -> Result<Db, ApiError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// A durable store backed by the SQLite file at `path`, created if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db, ApiError> {
        info!("opening database {}", path.as_ref().display());
        Self::with_connection(Connection::open(path)?)
    }

    fn with_connection(connection: Connection) -> Result<Db, ApiError> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                division TEXT NOT NULL CHECK (division IN ('personal', 'office')),
                datetime INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS transactions_datetime ON transactions (datetime DESC);
            CREATE INDEX IF NOT EXISTS transactions_type ON transactions (type);
            CREATE INDEX IF NOT EXISTS transactions_category ON transactions (category);
            CREATE INDEX IF NOT EXISTS transactions_division ON transactions (division);",
        )?;

        Ok(Db {
            connection: Mutex::new(connection),
        })
    }

    pub fn insert(&self, transaction: NewTransaction) -> Result<Transaction, ApiError> {
        let conn = self.connection.lock()?;
        let now = Self::now()?;

        conn.execute(
            "INSERT INTO transactions (type, amount, description, category, division, datetime, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                transaction.transaction_type.as_str(),
                transaction.amount.serialize_for_db(),
                transaction.description,
                transaction.category,
                transaction.division.as_str(),
                transaction.datetime.timestamp_millis(),
                now.timestamp_millis(),
                now.timestamp_millis(),
            ],
        )?;

        Ok(Transaction {
            id: conn.last_insert_rowid(),
            transaction_type: transaction.transaction_type,
            amount: transaction.amount,
            description: transaction.description,
            category: transaction.category,
            division: transaction.division,
            datetime: transaction.datetime,
            created_at: now,
            updated_at: now,
        })
    }

    /// Every transaction, newest `datetime` first.
    pub fn find_all(&self) -> Result<Vec<Transaction>, ApiError> {
        let conn = self.connection.lock()?;

        let mut stmt =
            conn.prepare(&format!("{SELECT_TRANSACTION} ORDER BY datetime DESC, id DESC"))?;
        let transactions = stmt
            .query_map([], transaction_from_row)?
            .collect::<Result<Vec<Transaction>, rusqlite::Error>>()?;

        Ok(transactions)
    }

    pub fn find_by_id(&self, id: TransactionId) -> Result<Transaction, ApiError> {
        let conn = self.connection.lock()?;
        Self::find_by_id_internal(&conn, id)
    }

    /// Transactions whose `datetime` lies within `range`, bounds included,
    /// newest first. An inverted range matches nothing.
    pub fn find_by_range(&self, range: &DateRange) -> Result<Vec<Transaction>, ApiError> {
        let conn = self.connection.lock()?;

        let mut stmt = conn.prepare(&format!(
            "{SELECT_TRANSACTION} WHERE datetime >= ?1 AND datetime <= ?2 ORDER BY datetime DESC, id DESC"
        ))?;
        let transactions = stmt
            .query_map(
                params![range.start.timestamp_millis(), range.end.timestamp_millis()],
                transaction_from_row,
            )?
            .collect::<Result<Vec<Transaction>, rusqlite::Error>>()?;

        Ok(transactions)
    }

    /// Replaces the user supplied fields of transaction `id` and refreshes
    /// `updated_at`. The record is written whole, so concurrent updates to
    /// the same id are last-write-wins.
    pub fn update_by_id(
        &self,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let conn = self.connection.lock()?;
        Self::update_by_id_internal(&conn, id, transaction)
    }

    /// Loads transaction `id`, lets `update` derive the replacement from it
    /// and writes the result, all under one lock. Nothing is written when
    /// `update` fails.
    pub fn update_with<F>(&self, id: TransactionId, update: F) -> Result<Transaction, ApiError>
    where
        F: FnOnce(&Transaction) -> Result<NewTransaction, ApiError>,
    {
        let conn = self.connection.lock()?;

        let existing = Self::find_by_id_internal(&conn, id)?;
        let transaction = update(&existing)?;

        Self::update_by_id_internal(&conn, id, transaction)
    }

    pub fn delete_by_id(&self, id: TransactionId) -> Result<(), ApiError> {
        let conn = self.connection.lock()?;

        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;

        if deleted == 0 {
            return Err(ApiError::NotFound(id));
        }

        Ok(())
    }

    fn update_by_id_internal(
        conn: &MutexGuard<'_, Connection>,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let now = Self::now()?;

        let changed = conn.execute(
            "UPDATE transactions
             SET type = ?1, amount = ?2, description = ?3, category = ?4, division = ?5, datetime = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                transaction.transaction_type.as_str(),
                transaction.amount.serialize_for_db(),
                transaction.description,
                transaction.category,
                transaction.division.as_str(),
                transaction.datetime.timestamp_millis(),
                now.timestamp_millis(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(ApiError::NotFound(id));
        }

        Self::find_by_id_internal(conn, id)
    }

    fn find_by_id_internal(
        conn: &MutexGuard<'_, Connection>,
        id: TransactionId,
    ) -> Result<Transaction, ApiError> {
        conn.query_row(
            &format!("{SELECT_TRANSACTION} WHERE id = ?1"),
            params![id],
            transaction_from_row,
        )
        .optional()?
        .ok_or(ApiError::NotFound(id))
    }

    fn now() -> Result<DateTime<Utc>, ApiError> {
        truncate_to_millis(Utc::now())
            .ok_or_else(|| ApiError::InternalError(String::from("clock out of range")))
    }
}

fn transaction_from_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let transaction_type = row.get::<usize, String>(1)?;
    let amount = row.get::<usize, String>(2)?;
    let division = row.get::<usize, String>(5)?;

    Ok(Transaction {
        id: row.get::<usize, i64>(0)?,
        transaction_type: TransactionType::parse(&transaction_type).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(1, String::from("type"), Type::Text)
        })?,
        amount: Amount::deserialize_from_db(&amount).map_err(|_| {
            rusqlite::Error::InvalidColumnType(2, String::from("amount"), Type::Text)
        })?,
        description: row.get::<usize, String>(3)?,
        category: row.get::<usize, String>(4)?,
        division: Division::parse(&division).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(5, String::from("division"), Type::Text)
        })?,
        datetime: timestamp_from_row(row, 6, "datetime")?,
        created_at: timestamp_from_row(row, 7, "created_at")?,
        updated_at: timestamp_from_row(row, 8, "updated_at")?,
    })
}

fn timestamp_from_row(row: &Row, index: usize, name: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    Utc.timestamp_millis_opt(row.get::<usize, i64>(index)?)
        .single()
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(index, name.to_string(), Type::Integer))
}
