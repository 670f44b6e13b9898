use serde::Serialize;

use super::types::{BudgetCategory, BudgetItem};
use crate::format::{finite_or_zero, percent_of};

/// Aggregated figures for one budget category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub allocated: f64,
    pub estimated: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Spent as a percentage of allocated, clamped to `[0, 100]`.
    pub percent_spent: f64,
    pub item_count: usize,
    pub over_budget: bool,
}

/// Totals across the whole project budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: f64,
    pub total_estimated: f64,
    pub total_spent: f64,
    pub total_paid: f64,
    pub remaining: f64,
    pub percent_spent: f64,
    pub categories: Vec<CategorySummary>,
    /// Items whose category matches no defined category, even ignoring case.
    pub uncategorized: usize,
}

/// Returns the items filed under `category`.
///
/// Stored categories were written with inconsistent casing, so when the
/// exact, case-sensitive filter finds nothing the lookup falls back to a
/// case-insensitive comparison. The fallback only engages on zero results.
pub fn items_for_category<'a>(items: &'a [BudgetItem], category: &str) -> Vec<&'a BudgetItem> {
    let exact: Vec<&BudgetItem> = items.iter().filter(|i| i.category == category).collect();
    if !exact.is_empty() {
        return exact;
    }
    let wanted = category.to_lowercase();
    items
        .iter()
        .filter(|i| i.category.to_lowercase() == wanted)
        .collect()
}

/// Builds a summary for one category from the items filed under it.
pub fn summarize_category(category: &BudgetCategory, items: &[BudgetItem]) -> CategorySummary {
    let matched = items_for_category(items, &category.name);
    let allocated = finite_or_zero(Some(category.allocated_amount));
    let estimated: f64 = matched
        .iter()
        .map(|i| finite_or_zero(Some(i.estimated_cost)))
        .sum();
    let spent: f64 = matched.iter().map(|i| i.spent()).sum();

    CategorySummary {
        name: category.name.clone(),
        allocated,
        estimated,
        spent,
        remaining: allocated - spent,
        percent_spent: percent_of(spent, allocated),
        item_count: matched.len(),
        over_budget: allocated > 0.0 && spent > allocated,
    }
}

/// Summarizes every category, preserving the order the categories came in.
pub fn summarize_categories(
    categories: &[BudgetCategory],
    items: &[BudgetItem],
) -> Vec<CategorySummary> {
    categories
        .iter()
        .map(|c| summarize_category(c, items))
        .collect()
}

/// Returns items that no category claims, ignoring case.
pub fn uncategorized_items<'a>(
    categories: &[BudgetCategory],
    items: &'a [BudgetItem],
) -> Vec<&'a BudgetItem> {
    let names: Vec<String> = categories.iter().map(|c| c.name.to_lowercase()).collect();
    items
        .iter()
        .filter(|i| !names.contains(&i.category.to_lowercase()))
        .collect()
}

/// Builds the project-wide budget summary.
///
/// `total_budget` is the project's overall budget when one was set; without
/// it the sum of category allocations stands in.
pub fn summarize_budget(
    total_budget: Option<f64>,
    categories: &[BudgetCategory],
    items: &[BudgetItem],
) -> BudgetSummary {
    let summaries = summarize_categories(categories, items);
    let total_budget = match total_budget.filter(|b| b.is_finite() && *b > 0.0) {
        Some(b) => b,
        None => summaries.iter().map(|s| s.allocated).sum(),
    };
    let total_estimated: f64 = items
        .iter()
        .map(|i| finite_or_zero(Some(i.estimated_cost)))
        .sum();
    let total_spent: f64 = items.iter().map(BudgetItem::spent).sum();
    let total_paid: f64 = items.iter().filter(|i| i.is_paid).map(BudgetItem::spent).sum();

    BudgetSummary {
        total_budget,
        total_estimated,
        total_spent,
        total_paid,
        remaining: total_budget - total_spent,
        percent_spent: percent_of(total_spent, total_budget),
        uncategorized: uncategorized_items(categories, items).len(),
        categories: summaries,
    }
}
