//! The endpoints for listing expenses.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use time::OffsetDateTime;

use crate::{Error, user::UserID};

use super::{
    ExpenseState,
    model::Expense,
    query::{ExpenseQuery, ListParams},
    store::ExpenseStore,
};

/// How many expenses the recent-expenses endpoint returns.
const RECENT_EXPENSE_COUNT: u64 = 5;

/// Handler for listing the authenticated user's expenses, newest first.
///
/// Accepts a named window token (`filter`), an explicit date range
/// (`startDate` and `endDate`, which overrides the named token), and a
/// `category` filter.
///
/// # Errors
/// Returns [Error::Validation] for unknown filter or category tokens, and
/// [Error::NotFound] when the query matches nothing and the zero-results
/// policy says so.
pub async fn list_expenses(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Expense>>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let query = params.into_query(today)?;

    let expenses = {
        let connection = state.db_connection.lock().unwrap();
        ExpenseStore::for_user(user_id, &connection).query(query)?
    };

    state.empty_result_policy.require_non_empty(expenses.len())?;

    Ok(Json(expenses))
}

/// Handler for the five most recent expenses, newest first.
///
/// # Errors
/// Returns [Error::NotFound] when the user has no expenses and the
/// zero-results policy says so.
pub async fn recent_expenses(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Expense>>, Error> {
    let query = ExpenseQuery {
        limit: Some(RECENT_EXPENSE_COUNT),
        ..Default::default()
    };

    let expenses = {
        let connection = state.db_connection.lock().unwrap();
        ExpenseStore::for_user(user_id, &connection).query(query)?
    };

    state.empty_result_policy.require_non_empty(expenses.len())?;

    Ok(Json(expenses))
}
