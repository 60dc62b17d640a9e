//! Building scoped expense queries from request parameters.

use serde::Deserialize;
use time::Date;

use crate::{Error, category::Category};

use super::window::{DateWindow, TimeWindow};

/// Defines which of a user's expenses should be fetched from the store.
///
/// The owner scope is not part of this struct on purpose: it is fixed when
/// the store handle is created, so a query can never be built without one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseQuery {
    /// Include expenses whose date falls within the window (inclusive).
    pub date_window: Option<DateWindow>,
    /// Include only expenses with this category.
    pub category: Option<Category>,
    /// Selects up to the first N (`limit`) expenses.
    pub limit: Option<u64>,
}

/// The raw query parameters accepted by the expense list endpoint.
///
/// `filter` and `category` arrive as plain strings so that unknown tokens
/// can be rejected with the application's own validation error instead of a
/// generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// A named trailing window token: `week`, `month`, `3months` or `year`.
    pub filter: Option<String>,
    /// Start of an explicit date range.
    #[serde(rename = "startDate")]
    pub start_date: Option<Date>,
    /// End of an explicit date range.
    #[serde(rename = "endDate")]
    pub end_date: Option<Date>,
    /// A category name to filter by.
    pub category: Option<String>,
}

impl ListParams {
    /// Turn the raw parameters into a concrete query, resolving any named
    /// window against `today`.
    ///
    /// An explicit `startDate`+`endDate` pair overrides a named filter
    /// entirely. Supplying only one of the pair leaves the named filter (or
    /// no constraint) in effect, matching the behaviour the API has always
    /// had.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `filter` or `category` is not one of
    /// the known tokens.
    pub fn into_query(self, today: Date) -> Result<ExpenseQuery, Error> {
        let named_window = self
            .filter
            .as_deref()
            .map(|token| token.parse::<TimeWindow>())
            .transpose()
            .map_err(|error| Error::Validation(error.to_string()))?
            .map(|window| window.resolve(today));

        let date_window = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateWindow { start, end }),
            _ => named_window,
        };

        let category = self
            .category
            .as_deref()
            .map(|token| token.parse::<Category>())
            .transpose()
            .map_err(|error| Error::Validation(error.to_string()))?;

        Ok(ExpenseQuery {
            date_window,
            category,
            limit: None,
        })
    }
}

#[cfg(test)]
mod list_params_tests {
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        expense::window::DateWindow,
    };

    use super::ListParams;

    #[test]
    fn no_params_applies_no_constraints() {
        let query = ListParams::default()
            .into_query(date!(2025 - 06 - 30))
            .unwrap();

        assert_eq!(query.date_window, None);
        assert_eq!(query.category, None);
    }

    #[test]
    fn named_filter_resolves_against_today() {
        let params = ListParams {
            filter: Some("month".to_owned()),
            ..Default::default()
        };

        let query = params.into_query(date!(2025 - 06 - 30)).unwrap();

        assert_eq!(
            query.date_window,
            Some(DateWindow {
                start: date!(2025 - 05 - 30),
                end: date!(2025 - 06 - 30),
            })
        );
    }

    #[test]
    fn explicit_range_overrides_named_filter() {
        let params = ListParams {
            filter: Some("week".to_owned()),
            start_date: Some(date!(2025 - 01 - 01)),
            end_date: Some(date!(2025 - 01 - 31)),
            ..Default::default()
        };

        let query = params.into_query(date!(2025 - 06 - 30)).unwrap();

        assert_eq!(
            query.date_window,
            Some(DateWindow {
                start: date!(2025 - 01 - 01),
                end: date!(2025 - 01 - 31),
            })
        );
    }

    #[test]
    fn lone_start_date_does_not_override_named_filter() {
        let params = ListParams {
            filter: Some("week".to_owned()),
            start_date: Some(date!(2025 - 01 - 01)),
            ..Default::default()
        };

        let query = params.into_query(date!(2025 - 06 - 30)).unwrap();

        assert_eq!(
            query.date_window,
            Some(DateWindow {
                start: date!(2025 - 06 - 23),
                end: date!(2025 - 06 - 30),
            })
        );
    }

    #[test]
    fn category_token_is_validated() {
        let params = ListParams {
            category: Some("Groceries".to_owned()),
            ..Default::default()
        };

        let query = params.into_query(date!(2025 - 06 - 30)).unwrap();

        assert_eq!(query.category, Some(Category::Groceries));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let params = ListParams {
            category: Some("Rent".to_owned()),
            ..Default::default()
        };

        let result = params.into_query(date!(2025 - 06 - 30));

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn unknown_filter_token_is_rejected() {
        let params = ListParams {
            filter: Some("fortnight".to_owned()),
            ..Default::default()
        };

        let result = params.into_query(date!(2025 - 06 - 30));

        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
