//! The endpoint for partially updating an expense.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use time::Date;

use crate::{Error, user::UserID};

use super::{
    ExpenseState,
    model::{Expense, ExpenseID, ExpenseUpdate},
    store::ExpenseStore,
};

/// The fields accepted when updating an expense.
///
/// Every field is optional; only the supplied ones are replaced.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    /// Replace the title.
    pub title: Option<String>,
    /// Replace the amount.
    pub amount: Option<f64>,
    /// Replace the date the expense occurred.
    pub date: Option<Date>,
    /// Replace the category. Unknown values become `Other`.
    pub category: Option<String>,
    /// Replace the notes.
    pub notes: Option<String>,
}

/// Handler for updating one of the authenticated user's expenses.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or belongs to a
/// different user, and [Error::Validation] if the update would break a field
/// constraint.
pub async fn update_expense(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseID>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<Expense>, Error> {
    let update = ExpenseUpdate {
        title: request.title,
        amount: request.amount,
        date: request.date,
        category: request
            .category
            .as_deref()
            .map(|raw| raw.parse().unwrap_or_default()),
        notes: request.notes,
    };

    let connection = state.db_connection.lock().unwrap();
    let expense = ExpenseStore::for_user(user_id, &connection).update(expense_id, update)?;

    Ok(Json(expense))
}

#[cfg(test)]
mod update_expense_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{EXPENSE, EXPENSES, format_endpoint},
        test_utils::TestContext,
    };

    async fn post_expense(context: &TestContext) -> i64 {
        let response = context
            .server
            .post(EXPENSES)
            .authorization_bearer(&context.token)
            .json(&json!({
                "title": "Vegetables and fruits",
                "amount": 60,
                "date": "2025-06-30",
                "category": "Groceries",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        response.json::<serde_json::Value>()["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn update_replaces_only_supplied_fields() {
        let context = TestContext::new();
        let expense_id = post_expense(&context).await;

        let response = context
            .server
            .patch(&format_endpoint(EXPENSE, expense_id))
            .authorization_bearer(&context.token)
            .json(&json!({ "amount": 101 }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["amount"], 101.0);
        assert_eq!(body["title"], "Vegetables and fruits");
        assert_eq!(body["category"], "Groceries");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let context = TestContext::new();

        let response = context
            .server
            .patch(&format_endpoint(EXPENSE, 42))
            .authorization_bearer(&context.token)
            .json(&json!({ "amount": 101 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_another_users_expense_is_not_found() {
        let context = TestContext::new();
        let expense_id = post_expense(&context).await;
        let other_token = context.token_for_other_user();

        let response = context
            .server
            .patch(&format_endpoint(EXPENSE, expense_id))
            .authorization_bearer(&other_token)
            .json(&json!({ "amount": 1 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_rejects_negative_amount() {
        let context = TestContext::new();
        let expense_id = post_expense(&context).await;

        let response = context
            .server
            .patch(&format_endpoint(EXPENSE, expense_id))
            .authorization_bearer(&context.token)
            .json(&json!({ "amount": -5 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
