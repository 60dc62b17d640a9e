//! Everything for recording and analysing expenses: the data model, the
//! owner-scoped store, date windows, aggregation and the HTTP endpoints.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, app_state::EmptyResultPolicy};

pub mod aggregation;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod model;
pub mod query;
pub mod store;
pub mod summaries;
pub mod update;
pub mod window;

pub use model::{Expense, ExpenseBuilder, ExpenseID, ExpenseUpdate, create_expense_table};
pub use store::ExpenseStore;

/// The state needed by the expense endpoints.
#[derive(Clone)]
pub struct ExpenseState {
    /// How read endpoints treat zero-result queries.
    pub empty_result_policy: EmptyResultPolicy,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            empty_result_policy: state.empty_result_policy,
            db_connection: state.db_connection.clone(),
        }
    }
}
