use super::entry;
use super::prompt::Prompter;
use super::summary;
use super::ui;
use crate::core::currency::CurrencyRateProvider;
use crate::core::expense::Frequency;
use crate::core::session::Session;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::debug;

/// Runs the interactive main menu until the user exits, then saves.
pub async fn run_menu<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
    rates: &(dyn CurrencyRateProvider + Send + Sync),
    today: NaiveDate,
) -> Result<()> {
    loop {
        prompter.say(format!(
            "\n{}",
            ui::style_text("--- Main Menu ---", ui::StyleType::Title)
        ))?;
        prompter.say("1. Log an Expense")?;
        prompter.say("2. View Expense Summary")?;
        prompter.say("3. Exit")?;

        let choice = prompter.line("Enter your choice: ")?;
        debug!(?choice, "Main menu choice");
        match choice.trim() {
            "1" => {
                entry::log_expense(session, prompter, rates, today).await?;
            }
            "2" => show_summary(session, prompter)?,
            "3" => {
                prompter.say("Thank you for using the Expense Tracker. Goodbye!")?;
                session.save().context("Failed to save expenses on exit")?;
                return Ok(());
            }
            _ => prompter.say("Invalid option, please choose again.")?,
        }
    }
}

fn show_summary<R: BufRead, W: Write>(
    session: &Session,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    prompter.say(format!(
        "\n{}",
        ui::style_text("--- Overall Spending Summary ---", ui::StyleType::Title)
    ))?;
    prompter.say("Choose the frequency for the summary:")?;
    for (i, frequency) in Frequency::ALL.iter().enumerate() {
        prompter.say(format!("{}. {}", i + 1, frequency.title()))?;
    }

    // Anything unrecognised falls back to the daily view
    let frequency = match prompter.line("Enter your choice: ")?.trim() {
        "2" => Frequency::Weekly,
        "3" => Frequency::Monthly,
        _ => Frequency::Daily,
    };

    prompter.say(summary::render(session.expenses(), frequency))?;
    prompter.say(ui::style_text(
        "\nReturn to Main Menu...",
        ui::StyleType::Subtle,
    ))
}
