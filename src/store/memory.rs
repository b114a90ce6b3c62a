use super::ExpenseStore;
use crate::core::expense::Expense;
use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory expense store. Clones share the same backing list, which lets
/// tests inspect what a session saved.
#[derive(Clone, Default)]
pub struct MemoryExpenseStore {
    inner: Arc<Mutex<Vec<Expense>>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(expenses)),
        }
    }

    pub fn snapshot(&self) -> Vec<Expense> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl ExpenseStore for MemoryExpenseStore {
    fn load(&self) -> Vec<Expense> {
        self.snapshot()
    }

    fn save(&self, expenses: &[Expense]) -> Result<()> {
        let mut stored = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        *stored = expenses.to_vec();
        debug!("Saved {} expenses in memory", expenses.len());
        Ok(())
    }
}
