//! The category analytics endpoints.
//!
//! All four group the authenticated user's expenses by category; they differ
//! only in the trailing window they look at and whether they return every
//! group or just the winner.

use axum::{Extension, Json, extract::State};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, category::Category, user::UserID};

use super::{
    ExpenseState,
    aggregation::{CategorySummary, highest_spent_category, most_used_category, summarize_by_category},
    model::Expense,
    query::ExpenseQuery,
    store::ExpenseStore,
    window::TimeWindow,
};

fn scan_window(
    state: &ExpenseState,
    user_id: UserID,
    window: Option<TimeWindow>,
) -> Result<Vec<Expense>, Error> {
    let query = ExpenseQuery {
        date_window: window.map(|window| window.resolve(OffsetDateTime::now_utc().date())),
        ..Default::default()
    };

    let expenses = {
        let connection = state.db_connection.lock().unwrap();
        ExpenseStore::for_user(user_id, &connection).query(query)?
    };

    state.empty_result_policy.require_non_empty(expenses.len())?;

    Ok(expenses)
}

/// The response for the most-used category endpoint.
#[derive(Debug, Serialize)]
pub struct MostUsedCategoryResponse {
    /// The category with the most expenses in the window.
    pub category: Category,
    /// How many expenses it has.
    pub count: u32,
}

/// Handler for the category used most often in the trailing three months.
///
/// Count ties are broken by category name ascending.
///
/// # Errors
/// Returns [Error::NotFound] when the window holds no expenses.
pub async fn get_most_used_category(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<MostUsedCategoryResponse>, Error> {
    let expenses = scan_window(&state, user_id, Some(TimeWindow::ThreeMonths))?;

    let (category, count) = most_used_category(&expenses).ok_or(Error::NotFound)?;

    Ok(Json(MostUsedCategoryResponse { category, count }))
}

/// Handler for the all-time per-category totals, largest first.
///
/// # Errors
/// Returns [Error::NotFound] when the user has no expenses.
pub async fn get_category_summary(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<CategorySummary>>, Error> {
    let expenses = scan_window(&state, user_id, None)?;

    Ok(Json(summarize_by_category(&expenses)))
}

/// The response for the highest-spent category endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighestSpentCategoryResponse {
    /// The category with the largest total in the window.
    pub category: Category,
    /// The total spent on it.
    pub total_amount: f64,
}

/// Handler for the category with the highest spend in the trailing three
/// months.
///
/// Total ties are broken by category name ascending.
///
/// # Errors
/// Returns [Error::NotFound] when the window holds no expenses.
pub async fn get_highest_spent_category(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<HighestSpentCategoryResponse>, Error> {
    let expenses = scan_window(&state, user_id, Some(TimeWindow::ThreeMonths))?;

    let (category, total_amount) = highest_spent_category(&expenses).ok_or(Error::NotFound)?;

    Ok(Json(HighestSpentCategoryResponse {
        category,
        total_amount,
    }))
}

/// Handler for the per-category totals over the trailing month, largest
/// first.
///
/// # Errors
/// Returns [Error::NotFound] when the window holds no expenses.
pub async fn get_last_month_summary(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<CategorySummary>>, Error> {
    let expenses = scan_window(&state, user_id, Some(TimeWindow::Month))?;

    Ok(Json(summarize_by_category(&expenses)))
}
