pub mod json;
pub mod memory;

use crate::core::expense::Expense;
use anyhow::Result;

/// Persistence for the full expense list.
pub trait ExpenseStore {
    /// Reads every stored expense. Never fails: unreadable data yields an
    /// empty list.
    fn load(&self) -> Vec<Expense>;

    /// Replaces the stored list with `expenses`.
    fn save(&self, expenses: &[Expense]) -> Result<()>;
}

pub use json::JsonExpenseStore;
pub use memory::MemoryExpenseStore;
