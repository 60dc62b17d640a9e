//! Owner-scoped database access for expenses.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{Error, expense::model::validate_fields, user::UserID};

use super::{
    model::{EXPENSE_COLUMNS, Expense, ExpenseBuilder, ExpenseID, ExpenseUpdate, map_expense_row},
    query::ExpenseQuery,
};

/// A handle to one user's expenses.
///
/// The owner is fixed at construction and every statement the store issues
/// filters on it, so forgetting the scope in an individual query is not
/// possible. Cross-user reads and writes surface as [Error::NotFound], the
/// same as a row that does not exist.
#[derive(Debug)]
pub struct ExpenseStore<'conn> {
    user_id: UserID,
    connection: &'conn Connection,
}

impl<'conn> ExpenseStore<'conn> {
    /// Create a store handle scoped to `user_id`.
    pub fn for_user(user_id: UserID, connection: &'conn Connection) -> Self {
        Self {
            user_id,
            connection,
        }
    }

    /// Insert a new expense owned by this store's user.
    ///
    /// Assigns the ID and both timestamps.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the title is empty or the amount is
    /// negative, or [Error::SqlError] if there is some other SQL error.
    pub fn create(&self, builder: ExpenseBuilder) -> Result<Expense, Error> {
        builder.validate()?;

        let now = OffsetDateTime::now_utc();

        let expense = self
            .connection
            .prepare(&format!(
                "INSERT INTO expense (user_id, title, amount, category, date, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                (
                    self.user_id.as_i64(),
                    builder.title.trim(),
                    builder.amount,
                    builder.category,
                    builder.date,
                    builder.notes,
                    now,
                    now,
                ),
                map_expense_row,
            )?;

        Ok(expense)
    }

    /// Retrieve an expense by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no expense with `id` is owned by this
    /// store's user, or [Error::SqlError] if there is some other SQL error.
    pub fn get(&self, id: ExpenseID) -> Result<Expense, Error> {
        let expense = self
            .connection
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id AND user_id = :user_id"
            ))?
            .query_row(
                &[(":id", &id), (":user_id", &self.user_id.as_i64())],
                map_expense_row,
            )?;

        Ok(expense)
    }

    /// Replace the supplied fields of an expense and bump `updated_at`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no expense with `id` is owned by this
    /// store's user, [Error::Validation] if the updated fields break an
    /// invariant, or [Error::SqlError] if there is some other SQL error.
    pub fn update(&self, id: ExpenseID, update: ExpenseUpdate) -> Result<Expense, Error> {
        let existing = self.get(id)?;

        let title = update.title.unwrap_or(existing.title);
        let amount = update.amount.unwrap_or(existing.amount);
        let date = update.date.unwrap_or(existing.date);
        let category = update.category.unwrap_or(existing.category);
        let notes = update.notes.unwrap_or(existing.notes);

        validate_fields(&title, amount)?;

        let expense = self
            .connection
            .prepare(&format!(
                "UPDATE expense
                 SET title = ?1, amount = ?2, category = ?3, date = ?4, notes = ?5, updated_at = ?6
                 WHERE id = ?7 AND user_id = ?8
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                (
                    title.trim(),
                    amount,
                    category,
                    date,
                    notes,
                    OffsetDateTime::now_utc(),
                    id,
                    self.user_id.as_i64(),
                ),
                map_expense_row,
            )?;

        Ok(expense)
    }

    /// Delete an expense by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no expense with `id` is owned by this
    /// store's user, or [Error::SqlError] if there is some other SQL error.
    pub fn delete(&self, id: ExpenseID) -> Result<(), Error> {
        let rows_deleted = self.connection.execute(
            "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
            (id, self.user_id.as_i64()),
        )?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Retrieve expenses matching `query`, newest first.
    ///
    /// Results are sorted by date descending; equal dates keep insertion
    /// order via the ID as a secondary key. An empty result is a valid
    /// outcome at this layer, the zero-results policy belongs to the
    /// endpoints.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query fails.
    pub fn query(&self, query: ExpenseQuery) -> Result<Vec<Expense>, Error> {
        let mut sql = format!("SELECT {EXPENSE_COLUMNS} FROM expense WHERE user_id = ?");
        let mut params: Vec<Value> = vec![Value::from(self.user_id.as_i64())];

        if let Some(window) = query.date_window {
            sql.push_str(" AND date BETWEEN ? AND ?");
            params.push(Value::from(window.start.to_string()));
            params.push(Value::from(window.end.to_string()));
        }

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            params.push(Value::from(category.as_str().to_owned()));
        }

        // Sort by date, and then ID to keep expense order stable after
        // updates.
        sql.push_str(" ORDER BY date DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::from(limit as i64));
        }

        self.connection
            .prepare(&sql)?
            .query_map(params_from_iter(params), map_expense_row)?
            .map(|expense_result| expense_result.map_err(Error::SqlError))
            .collect()
    }
}
