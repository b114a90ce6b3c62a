use super::ExpenseStore;
use crate::core::expense::Expense;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores expenses as a JSON array in a single file.
pub struct JsonExpenseStore {
    path: PathBuf,
}

impl JsonExpenseStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "expenses.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn parse_records(content: &str) -> Result<Vec<Expense>> {
    let value: Value = serde_json::from_str(content).context("Invalid JSON")?;
    let Value::Array(records) = value else {
        anyhow::bail!("Expected a JSON array of expenses");
    };

    let total = records.len();
    let expenses: Vec<Expense> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(expense) => Some(expense),
            Err(e) => {
                warn!(index, error = %e, "Skipping invalid expense record");
                None
            }
        })
        .collect();

    debug!("Parsed {}/{} expense records", expenses.len(), total);
    Ok(expenses)
}

impl ExpenseStore for JsonExpenseStore {
    fn load(&self) -> Vec<Expense> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No expenses file at {}", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read expenses file");
                return Vec::new();
            }
        };

        match parse_records(&content) {
            Ok(expenses) => expenses,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable expenses file");
                Vec::new()
            }
        }
    }

    fn save(&self, expenses: &[Expense]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        expenses
            .serialize(&mut serializer)
            .context("Failed to serialize expenses")?;

        // Replace the file in one step so a crash never leaves it half written
        let temp_path = self.temp_path();
        let replace = || -> Result<()> {
            let mut file = fs::File::create(&temp_path)
                .with_context(|| format!("Failed to create {}", temp_path.display()))?;
            file.write_all(&buf)
                .and_then(|_| file.sync_all())
                .with_context(|| format!("Failed to write {}", temp_path.display()))?;
            drop(file);
            fs::rename(&temp_path, &self.path)
                .with_context(|| format!("Failed to replace {}", self.path.display()))
        };
        if let Err(e) = replace() {
            fs::remove_file(&temp_path).ok();
            return Err(e);
        }

        debug!(
            "Saved {} expenses to {}",
            expenses.len(),
            self.path.display()
        );
        Ok(())
    }
}
