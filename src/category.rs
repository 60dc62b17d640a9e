//! The closed set of expense categories.
//!
//! The same type is used for request validation, the database schema and
//! aggregation grouping so the three layers cannot drift apart.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

/// What kind of spending an expense records.
///
/// The set is fixed. Adding a new category is a schema change, not a runtime
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// Food and household shopping.
    Groceries,
    /// Entertainment, eating out, hobbies.
    Leisure,
    /// Gadgets and appliances.
    Electronics,
    /// Power, water, internet and other recurring services.
    Utilities,
    /// Clothes and footwear.
    Clothing,
    /// Medical costs, pharmacy, insurance.
    Health,
    /// Everything else. Used when no category is given.
    #[default]
    Other,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Groceries,
        Category::Leisure,
        Category::Electronics,
        Category::Utilities,
        Category::Clothing,
        Category::Health,
        Category::Other,
    ];

    /// The category name as stored in the database and used in the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Leisure => "Leisure",
            Category::Electronics => "Electronics",
            Category::Utilities => "Utilities",
            Category::Clothing => "Clothing",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Groceries" => Ok(Category::Groceries),
            "Leisure" => Ok(Category::Leisure),
            "Electronics" => Ok(Category::Electronics),
            "Utilities" => Ok(Category::Utilities),
            "Clothing" => Ok(Category::Clothing),
            "Health" => Ok(Category::Health),
            "Other" => Ok(Category::Other),
            _ => Err(UnknownCategory(s.to_owned())),
        }
    }
}

/// The string did not name a category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid category")]
pub struct UnknownCategory(pub String);

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        // Stored values that no longer name a category read back as `Other`.
        value.as_str().map(|raw| raw.parse().unwrap_or_default())
    }
}

#[cfg(test)]
mod category_tests {
    use super::Category;

    #[test]
    fn parses_every_category_name() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn rejects_unknown_name() {
        assert!("Rent".parse::<Category>().is_err());
    }

    #[test]
    fn rejects_lowercase_name() {
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn defaults_to_other() {
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Category::Groceries).unwrap();

        assert_eq!(json, "\"Groceries\"");
    }
}
