//! The endpoint for fetching a single expense by ID.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{Error, user::UserID};

use super::{ExpenseState, model::{Expense, ExpenseID}, store::ExpenseStore};

/// Handler for retrieving one of the authenticated user's expenses.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or belongs to a
/// different user.
pub async fn get_expense(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseID>,
) -> Result<Json<Expense>, Error> {
    let connection = state.db_connection.lock().unwrap();
    let expense = ExpenseStore::for_user(user_id, &connection).get(expense_id)?;

    Ok(Json(expense))
}
