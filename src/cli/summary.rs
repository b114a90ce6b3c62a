use super::ui;
use crate::core::expense::{Expense, Frequency, Period};
use crate::core::summary::{self, BucketSummary, FrequencySummary};
use comfy_table::Cell;

const NO_EXPENSES: &str = "No expenses logged.";

impl BucketSummary {
    /// Renders one bucket: a block per currency with its total and a table of
    /// category subtotals.
    pub fn display_as_table(&self) -> String {
        let mut output = String::new();

        for totals in &self.currencies {
            let symbol = totals.currency.symbol();
            let code = totals.currency.code().to_uppercase();

            output.push_str(&format!("\nDay: {}\n", self.date.format("%Y-%m-%d")));
            output.push_str(&format!(
                "(Total spent {}): {}\n",
                code,
                ui::style_text(
                    &ui::format_amount(symbol, totals.total),
                    ui::StyleType::TotalValue
                )
            ));

            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Category"),
                ui::header_cell(&format!("Spent ({code})")),
            ]);
            for (category, amount) in &totals.categories {
                table.add_row(vec![
                    Cell::new(category),
                    ui::amount_cell(ui::format_amount(symbol, *amount)),
                ]);
            }
            output.push_str(&table.to_string());
            output.push('\n');
        }

        output
    }
}

impl FrequencySummary {
    pub fn render(&self) -> String {
        let mut output = format!(
            "\n{}\n",
            ui::style_text(
                &format!("--- {} Summary ---", self.frequency.title()),
                ui::StyleType::Title
            )
        );

        if self.is_empty() {
            output.push_str(NO_EXPENSES);
            output.push('\n');
            return output;
        }

        let label = match self.frequency.period() {
            Period::Day => None,
            Period::Week => Some("Week"),
            Period::Month => Some("Month"),
        };
        for (key, bucket) in &self.buckets {
            if let Some(label) = label {
                output.push_str(&format!(
                    "\n{}\n",
                    ui::style_text(&format!("{label} {key}"), ui::StyleType::TotalLabel)
                ));
            }
            output.push_str(&bucket.display_as_table());
        }

        output
    }
}

/// Builds and renders the summary view for `frequency`.
pub fn render(expenses: &[Expense], frequency: Frequency) -> String {
    summary::summary_for(expenses, frequency).render()
}
