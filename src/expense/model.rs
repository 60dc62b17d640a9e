//! The expense record and its database schema.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{Error, category::Category, user::UserID};

/// Alias for the integer type used for expense IDs.
pub type ExpenseID = i64;

/// A single recorded expense.
///
/// Every expense belongs to exactly one user, set at creation. `date` is when
/// the money was spent, which is distinct from `created_at`, when the record
/// was entered into the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseID,
    /// The user that owns this expense.
    pub user_id: UserID,
    /// A short description of what was bought.
    pub title: String,
    /// How much was spent. Never negative.
    pub amount: f64,
    /// The kind of spending.
    pub category: Category,
    /// When the expense occurred.
    pub date: Date,
    /// Optional free-form notes.
    pub notes: String,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Expense {
    /// Start building a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(title: &str, amount: f64, date: Date) -> ExpenseBuilder {
        ExpenseBuilder {
            title: title.to_owned(),
            amount,
            date,
            category: Category::default(),
            notes: String::new(),
        }
    }
}

/// The fields the user supplies when creating an expense.
///
/// `category` and `notes` are optional and default to [Category::Other] and
/// an empty string. Validation happens at insert time, not construction
/// time, so the builder can be assembled field by field from request data.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// A short description of what was bought. Must not be empty.
    pub title: String,
    /// How much was spent. Must not be negative.
    pub amount: f64,
    /// When the expense occurred.
    pub date: Date,
    /// The kind of spending.
    pub category: Category,
    /// Optional free-form notes.
    pub notes: String,
}

impl ExpenseBuilder {
    /// Set the category for the expense.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the notes for the expense.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }

    /// Check the invariants that must hold before the expense is stored.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the title is empty or the amount is
    /// negative.
    pub fn validate(&self) -> Result<(), Error> {
        validate_fields(&self.title, self.amount)
    }
}

/// A partial update to an expense.
///
/// Only the supplied fields are replaced. The owner and ID of an expense can
/// never be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    /// Replace the title.
    pub title: Option<String>,
    /// Replace the amount.
    pub amount: Option<f64>,
    /// Replace the date the expense occurred.
    pub date: Option<Date>,
    /// Replace the category.
    pub category: Option<Category>,
    /// Replace the notes.
    pub notes: Option<String>,
}

pub(crate) fn validate_fields(title: &str, amount: f64) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title must not be empty".to_owned()));
    }

    if amount < 0.0 {
        return Err(Error::Validation(
            "amount must not be negative".to_owned(),
        ));
    }

    Ok(())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL DEFAULT 'Other',
                date TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Composite index covering the owner scope and the date ordering used by
    // every list and aggregation query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
///
/// The column order must match [EXPENSE_COLUMNS].
pub(crate) fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// The expense columns in the order expected by [map_expense_row].
pub(crate) const EXPENSE_COLUMNS: &str =
    "id, user_id, title, amount, category, date, notes, created_at, updated_at";
