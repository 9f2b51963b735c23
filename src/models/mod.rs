mod category;
mod expense;

pub use category::Category;
pub use expense::{ExpenseDraft, ExpenseRecord, ValidationError, MAX_AMOUNT};
