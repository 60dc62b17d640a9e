//! The endpoint for recording a new expense.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use time::Date;

use crate::{Error, user::UserID};

use super::{ExpenseState, model::Expense, store::ExpenseStore};

/// The fields accepted when creating an expense.
///
/// The required fields arrive as options so their absence can be reported
/// with the API's own validation message instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct NewExpenseRequest {
    /// A short description of what was bought.
    pub title: Option<String>,
    /// How much was spent.
    pub amount: Option<f64>,
    /// When the expense occurred.
    pub date: Option<Date>,
    /// The kind of spending. Unknown or missing values become `Other`.
    pub category: Option<String>,
    /// Optional free-form notes.
    pub notes: Option<String>,
}

/// Handler for creating a new expense owned by the authenticated user.
///
/// # Errors
/// Returns [Error::Validation] if `title`, `amount` or `date` is missing,
/// the title is blank, or the amount is negative.
pub async fn create_expense(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<NewExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let (Some(title), Some(amount), Some(date)) = (request.title, request.amount, request.date)
    else {
        return Err(Error::Validation(
            "title, amount, and date are required".to_owned(),
        ));
    };

    // An unknown category name degrades to `Other` instead of failing, the
    // same defaulting the schema applies to unspecified categories.
    let category = request
        .category
        .as_deref()
        .map(|raw| raw.parse().unwrap_or_default())
        .unwrap_or_default();

    let builder = Expense::build(&title, amount, date)
        .category(category)
        .notes(request.notes.as_deref().unwrap_or(""));

    let connection = state.db_connection.lock().unwrap();
    let expense = ExpenseStore::for_user(user_id, &connection).create(builder)?;

    Ok((StatusCode::CREATED, Json(expense)))
}
