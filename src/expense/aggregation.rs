//! Category aggregation over a set of expenses.
//!
//! Provides functions to group a user's expenses by category, sum and count
//! each group, and extract the most-used and highest-spend categories. The
//! input is always an already owner-scoped expense list, so nothing here can
//! aggregate across users.

use std::collections::HashMap;

use serde::Serialize;

use crate::category::Category;

use super::model::Expense;

/// The totals for one category group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The category the group belongs to.
    pub category: Category,
    /// The sum of all amounts in the group.
    pub total_amount: f64,
    /// The number of expenses in the group.
    pub count: u32,
}

/// Group `expenses` by category and total each group.
///
/// Groups are sorted by total amount descending. Equal totals are broken by
/// category name ascending so the output is deterministic regardless of
/// input order.
pub fn summarize_by_category(expenses: &[Expense]) -> Vec<CategorySummary> {
    let mut totals: HashMap<Category, (f64, u32)> = HashMap::new();

    for expense in expenses {
        let entry = totals.entry(expense.category).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut summaries: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category, (total_amount, count))| CategorySummary {
            category,
            total_amount,
            count,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    summaries
}

/// The category with the most expenses, and how many it has.
///
/// Ties are broken by category name ascending. Returns `None` for an empty
/// input.
pub fn most_used_category(expenses: &[Expense]) -> Option<(Category, u32)> {
    let mut counts: HashMap<Category, u32> = HashMap::new();

    for expense in expenses {
        *counts.entry(expense.category).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .min_by(|(category_a, count_a), (category_b, count_b)| {
            count_b
                .cmp(count_a)
                .then_with(|| category_a.as_str().cmp(category_b.as_str()))
        })
}

/// The category with the highest total spend, and that total.
///
/// Ties are broken by category name ascending. Returns `None` for an empty
/// input.
pub fn highest_spent_category(expenses: &[Expense]) -> Option<(Category, f64)> {
    summarize_by_category(expenses)
        .into_iter()
        .next()
        .map(|summary| (summary.category, summary.total_amount))
}

#[cfg(test)]
mod aggregation_tests {
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{category::Category, expense::model::Expense, user::UserID};

    use super::{highest_spent_category, most_used_category, summarize_by_category};

    fn create_test_expense(amount: f64, date: Date, category: Category) -> Expense {
        let now = OffsetDateTime::now_utc();

        Expense {
            id: 0,
            user_id: UserID::new(1),
            title: "test expense".to_owned(),
            amount,
            category,
            date,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summarize_sums_and_counts_per_category() {
        let expenses = vec![
            create_test_expense(60.0, date!(2025 - 06 - 30), Category::Groceries),
            create_test_expense(40.0, date!(2025 - 06 - 29), Category::Groceries),
            create_test_expense(770.0, date!(2025 - 06 - 15), Category::Health),
        ];

        let summaries = summarize_by_category(&expenses);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].category, Category::Health);
        assert_eq!(summaries[0].total_amount, 770.0);
        assert_eq!(summaries[0].count, 1);
        assert_eq!(summaries[1].category, Category::Groceries);
        assert_eq!(summaries[1].total_amount, 100.0);
        assert_eq!(summaries[1].count, 2);
    }

    #[test]
    fn summarize_handles_empty_input() {
        let summaries = summarize_by_category(&[]);

        assert!(summaries.is_empty());
    }

    #[test]
    fn summarize_breaks_total_ties_by_category_name() {
        let expenses = vec![
            create_test_expense(50.0, date!(2025 - 06 - 30), Category::Leisure),
            create_test_expense(50.0, date!(2025 - 06 - 30), Category::Clothing),
            create_test_expense(50.0, date!(2025 - 06 - 30), Category::Groceries),
        ];

        let summaries = summarize_by_category(&expenses);

        let categories: Vec<_> = summaries
            .iter()
            .map(|summary| summary.category)
            .collect();
        assert_eq!(
            categories,
            vec![Category::Clothing, Category::Groceries, Category::Leisure]
        );
    }

    #[test]
    fn summarize_is_idempotent() {
        let expenses = vec![
            create_test_expense(60.0, date!(2025 - 06 - 30), Category::Groceries),
            create_test_expense(770.0, date!(2025 - 06 - 15), Category::Health),
            create_test_expense(25.0, date!(2025 - 06 - 10), Category::Other),
        ];

        let first = summarize_by_category(&expenses);
        let second = summarize_by_category(&expenses);

        assert_eq!(first, second);
    }

    #[test]
    fn most_used_returns_category_with_highest_count() {
        let expenses = vec![
            create_test_expense(10.0, date!(2025 - 06 - 30), Category::Utilities),
            create_test_expense(10.0, date!(2025 - 06 - 29), Category::Utilities),
            create_test_expense(10.0, date!(2025 - 06 - 28), Category::Utilities),
            create_test_expense(900.0, date!(2025 - 06 - 27), Category::Electronics),
        ];

        let most_used = most_used_category(&expenses);

        assert_eq!(most_used, Some((Category::Utilities, 3)));
    }

    #[test]
    fn most_used_breaks_count_ties_by_category_name() {
        let expenses = vec![
            create_test_expense(10.0, date!(2025 - 06 - 30), Category::Leisure),
            create_test_expense(10.0, date!(2025 - 06 - 29), Category::Clothing),
        ];

        let most_used = most_used_category(&expenses);

        assert_eq!(most_used, Some((Category::Clothing, 1)));
    }

    #[test]
    fn most_used_returns_none_for_empty_input() {
        assert_eq!(most_used_category(&[]), None);
    }

    #[test]
    fn highest_spent_returns_category_with_largest_total() {
        // The worked example: Health holds 770 across three records, beating
        // 100 of groceries spread over two.
        let expenses = vec![
            create_test_expense(60.0, date!(2025 - 06 - 30), Category::Groceries),
            create_test_expense(40.0, date!(2025 - 06 - 29), Category::Groceries),
            create_test_expense(300.0, date!(2025 - 06 - 15), Category::Health),
            create_test_expense(270.0, date!(2025 - 05 - 20), Category::Health),
            create_test_expense(200.0, date!(2025 - 04 - 10), Category::Health),
        ];

        let highest = highest_spent_category(&expenses);

        assert_eq!(highest, Some((Category::Health, 770.0)));
    }

    #[test]
    fn highest_spent_returns_none_for_empty_input() {
        assert_eq!(highest_spent_category(&[]), None);
    }
}
