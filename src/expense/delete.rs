//! The endpoint for deleting an expense.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{Error, user::UserID};

use super::{ExpenseState, model::ExpenseID, store::ExpenseStore};

/// Handler for deleting one of the authenticated user's expenses.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or belongs to a
/// different user.
pub async fn delete_expense(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseID>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().unwrap();
    ExpenseStore::for_user(user_id, &connection).delete(expense_id)?;

    Ok(StatusCode::NO_CONTENT)
}
