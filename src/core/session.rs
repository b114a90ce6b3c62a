//! Application state for one interactive run.

use crate::core::expense::{CategoryRegistry, Expense};
use crate::store::ExpenseStore;
use anyhow::Result;
use tracing::{debug, info};

/// Owns the in-memory expense list for the lifetime of the process. The list
/// is loaded once, only grows through [`Session::append`], and is flushed
/// wholesale by [`Session::save`].
pub struct Session {
    expenses: Vec<Expense>,
    categories: CategoryRegistry,
    store: Box<dyn ExpenseStore>,
}

impl Session {
    pub fn open<S: AsRef<str>>(store: Box<dyn ExpenseStore>, default_categories: &[S]) -> Self {
        let expenses = store.load();
        let mut categories = CategoryRegistry::new(default_categories);
        for expense in &expenses {
            // Labels were validated when the record was read
            let _ = categories.register(expense.category());
        }
        info!(
            expenses = expenses.len(),
            categories = categories.len(),
            "Session opened"
        );
        Self {
            expenses,
            categories,
            store,
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryRegistry {
        &mut self.categories
    }

    pub fn append(&mut self, expense: Expense) {
        debug!(?expense, "Appending expense");
        self.expenses.push(expense);
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(&self.expenses)
    }
}
