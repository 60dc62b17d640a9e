//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}',
//! use [format_endpoint].

/// The route for registering a new user.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for requesting a password reset code.
pub const SEND_RESET_CODE: &str = "/api/password_reset/send_code";
/// The route for verifying a password reset code.
pub const VERIFY_RESET_CODE: &str = "/api/password_reset/verify_code";
/// The route for setting a new password after verification.
pub const RESET_PASSWORD: &str = "/api/password_reset";

/// The route to create and list expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to access a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for the five most recent expenses.
pub const RECENT_EXPENSES: &str = "/api/expenses/recent";
/// The route for the most used category over the trailing three months.
pub const MOST_USED_CATEGORY: &str = "/api/expenses/most-used-category";
/// The route for the all-time per-category totals.
pub const CATEGORY_SUMMARY: &str = "/api/expenses/category-summary";
/// The route for the highest spend category over the trailing three months.
pub const HIGHEST_SPENT_CATEGORY: &str = "/api/expenses/highest-spent-category";
/// The route for the per-category totals over the trailing month.
pub const LAST_MONTH_SUMMARY: &str = "/api/expenses/last-month-summary";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}',
/// '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII
/// characters and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
