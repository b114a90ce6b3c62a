use super::prompt::Prompter;
use super::ui;
use crate::core::currency::{CurrencyRateProvider, convert};
use crate::core::expense::{Currency, Expense, Frequency};
use crate::core::session::Session;
use anyhow::Result;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::{info, warn};

const ADD_CATEGORY: &str = "Add new category";

/// Collects one expense from the user, appends it to the session and saves.
///
/// Returns `None` when the entry was abandoned because the currency
/// conversion failed; nothing is appended in that case.
pub async fn log_expense<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
    rates: &(dyn CurrencyRateProvider + Send + Sync),
    today: NaiveDate,
) -> Result<Option<Expense>> {
    prompter.say(format!(
        "\n{}",
        ui::style_text("--- Log New Expense ---", ui::StyleType::Title)
    ))?;
    prompter.say(format!("Date of Expense: {}", today.format("%Y-%m-%d")))?;

    let mut currency = choose_currency(prompter)?;
    let mut amount =
        prompter.positive_amount(&format!("Enter the expense amount ({currency}): "))?;

    if prompter.yes_no("Do you want to convert this amount to another currency? (yes/no): ")? {
        let target = choose_target_currency(prompter)?;

        let spinner = ui::new_spinner(&format!("Fetching {currency} to {target} rate..."));
        let converted = convert(rates, amount, &currency, &target).await;
        spinner.finish_and_clear();

        match converted {
            Ok(value) => {
                amount = value;
                currency = target;
                prompter.say(format!("Converted amount: {amount:.2} {currency}"))?;
            }
            Err(e) => {
                warn!(error = %e, "Currency conversion failed, discarding entry");
                prompter.say(ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                return Ok(None);
            }
        }
    }

    let category = choose_category(session, prompter)?;
    let frequency = choose_frequency(prompter)?;

    let expense = Expense::new(today, amount, currency, category, frequency)?;
    session.append(expense.clone());
    prompter.say(ui::style_text(
        "Expense added successfully!",
        ui::StyleType::Success,
    ))?;
    info!(?expense, "Logged expense");

    // The expense stays in memory and is written again on the next save
    if let Err(e) = session.save() {
        warn!(error = %e, "Failed to save expenses");
        prompter.say(ui::style_text(
            &format!("Could not save expenses: {e:#}"),
            ui::StyleType::Error,
        ))?;
    }

    Ok(Some(expense))
}

fn choose_currency<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Currency> {
    let index = prompter.choose("Choose a currency:", &Currency::SUPPORTED)?;
    Ok(Currency::SUPPORTED[index].clone())
}

fn choose_target_currency<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Currency> {
    let supported = Currency::SUPPORTED
        .iter()
        .map(Currency::code)
        .collect::<Vec<_>>()
        .join(", ");
    loop {
        let answer = prompter.line("Enter the currency to convert to (USD, EUR, etc.): ")?;
        match answer.parse::<Currency>() {
            Ok(currency) if currency.is_supported() => return Ok(currency),
            _ => prompter.say(format!(
                "Invalid currency. Please enter one of the supported currencies ({supported})."
            ))?,
        }
    }
}

fn choose_category<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
) -> Result<String> {
    let mut options = session.categories().labels().to_vec();
    options.push(ADD_CATEGORY.to_string());

    let index = prompter.choose("Choose a category:", &options)?;
    if index < session.categories().len() {
        return Ok(options.swap_remove(index));
    }

    loop {
        let name = prompter.line("Enter the name of the new category: ")?;
        match session.categories_mut().register(&name) {
            Ok(label) => {
                prompter.say(format!("New category '{label}' added."))?;
                return Ok(label);
            }
            Err(e) => prompter.say(e)?,
        }
    }
}

fn choose_frequency<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Frequency> {
    let titles: Vec<&str> = Frequency::ALL.iter().map(Frequency::title).collect();
    let index = prompter.choose("Choose the frequency of the expense:", &titles)?;
    Ok(Frequency::ALL[index])
}
