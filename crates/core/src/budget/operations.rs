use super::error::BudgetError;
use super::types::{BudgetItemPatch, NewBudgetCategory, NewBudgetItem};
use crate::validation::{check_amount, is_blank, too_long, AmountProblem, MAX_NOTES_LEN, MAX_TEXT_LEN};

fn amount(field: &'static str, value: f64) -> Result<(), BudgetError> {
    check_amount(value).map_err(|p| match p {
        AmountProblem::NotANumber => BudgetError::InvalidAmount { field },
        AmountProblem::Negative => BudgetError::NegativeAmount { field },
    })
}

/// Validates a budget item before creation.
pub fn validate_new_budget_item(item: &NewBudgetItem) -> Result<(), BudgetError> {
    if is_blank(&item.category) {
        return Err(BudgetError::EmptyCategory);
    }
    if is_blank(&item.description) {
        return Err(BudgetError::EmptyDescription);
    }
    if too_long(&item.description, MAX_TEXT_LEN) {
        return Err(BudgetError::DescriptionTooLong);
    }
    amount("estimatedCost", item.estimated_cost)?;
    if let Some(actual) = item.actual_cost {
        amount("actualCost", actual)?;
    }
    if item.notes.as_deref().is_some_and(|n| too_long(n, MAX_NOTES_LEN)) {
        return Err(BudgetError::NotesTooLong);
    }
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_budget_patch(patch: &BudgetItemPatch) -> Result<(), BudgetError> {
    if patch.category.as_deref().is_some_and(is_blank) {
        return Err(BudgetError::EmptyCategory);
    }
    if let Some(description) = &patch.description {
        if is_blank(description) {
            return Err(BudgetError::EmptyDescription);
        }
        if too_long(description, MAX_TEXT_LEN) {
            return Err(BudgetError::DescriptionTooLong);
        }
    }
    if let Some(estimated) = patch.estimated_cost {
        amount("estimatedCost", estimated)?;
    }
    if let Some(actual) = patch.actual_cost {
        amount("actualCost", actual)?;
    }
    if patch.notes.as_deref().is_some_and(|n| too_long(n, MAX_NOTES_LEN)) {
        return Err(BudgetError::NotesTooLong);
    }
    Ok(())
}

/// Validates a budget category before creation.
pub fn validate_new_category(category: &NewBudgetCategory) -> Result<(), BudgetError> {
    if is_blank(&category.name) {
        return Err(BudgetError::EmptyCategoryName);
    }
    amount("allocatedAmount", category.allocated_amount)
}
