mod error;
mod operations;
mod summary;
mod types;

pub use error::BudgetError;
pub use operations::{validate_budget_patch, validate_new_budget_item, validate_new_category};
pub use summary::{
    items_for_category, summarize_budget, summarize_categories, summarize_category,
    uncategorized_items, BudgetSummary, CategorySummary,
};
pub use types::{BudgetCategory, BudgetItem, BudgetItemPatch, NewBudgetCategory, NewBudgetItem};
