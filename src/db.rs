//! Database initialization.

use rusqlite::Connection;

use crate::{expense::create_expense_table, user::create_user_table};

/// Create the tables for the application's domain models.
///
/// Also enables foreign key enforcement, which SQLite leaves off by default.
/// Deleting a user cascades to their expenses.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL
/// error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    create_user_table(connection)?;
    create_expense_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        expense::{Expense, ExpenseStore},
        password::PasswordHash,
        user::{NewUser, create_user},
    };

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
    }

    #[test]
    fn deleting_a_user_cascades_to_their_expenses() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user(
            NewUser {
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                email: "ada@example.com".to_owned(),
                password_hash: PasswordHash::new_unchecked("hunter2"),
            },
            &conn,
        )
        .unwrap();
        ExpenseStore::for_user(user.id, &conn)
            .create(Expense::build("Groceries", 60.0, date!(2025 - 06 - 30)))
            .unwrap();

        conn.execute("DELETE FROM user WHERE id = ?1", (user.id.as_i64(),))
            .unwrap();

        let expense_count: i64 = conn
            .query_row("SELECT COUNT(id) FROM expense", [], |row| row.get(0))
            .unwrap();
        assert_eq!(expense_count, 0);
    }
}
