//! The router that maps URIs to the API's handlers.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{
        auth_guard,
        log_in::log_in,
        register::register,
        reset::{reset_password, send_reset_code, verify_reset_code},
    },
    endpoints,
    expense::{
        create::create_expense,
        delete::delete_expense,
        detail::get_expense,
        list::{list_expenses, recent_expenses},
        summaries::{
            get_category_summary, get_highest_spent_category, get_last_month_summary,
            get_most_used_category,
        },
        update::update_expense,
    },
};

/// Return a router with all the app's routes.
///
/// The expense routes sit behind the bearer token auth middleware; the
/// account routes do not.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::USERS, post(register))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::SEND_RESET_CODE, post(send_reset_code))
        .route(endpoints::VERIFY_RESET_CODE, post(verify_reset_code))
        .route(endpoints::RESET_PASSWORD, post(reset_password));

    let protected_routes = Router::new()
        .route(
            endpoints::EXPENSES,
            post(create_expense).get(list_expenses),
        )
        .route(endpoints::RECENT_EXPENSES, get(recent_expenses))
        .route(endpoints::MOST_USED_CATEGORY, get(get_most_used_category))
        .route(endpoints::CATEGORY_SUMMARY, get(get_category_summary))
        .route(
            endpoints::HIGHEST_SPENT_CATEGORY,
            get(get_highest_spent_category),
        )
        .route(endpoints::LAST_MONTH_SUMMARY, get(get_last_month_summary))
        .route(
            endpoints::EXPENSE,
            get(get_expense)
                .patch(update_expense)
                .delete(delete_expense),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "the requested resource could not be found" })),
    )
        .into_response()
}
