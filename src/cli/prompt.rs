//! Line-oriented prompts with local re-prompting on invalid input.

use anyhow::{Context, Result, bail};
use std::fmt::Display;
use std::io::{BufRead, Write};
use tracing::debug;

/// Reads answers from `input` and writes prompts to `output`.
///
/// Invalid answers are reported and asked again; they never surface as
/// errors. The only error besides I/O failure is running out of input.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes one line of text.
    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}").context("Failed to write to terminal")
    }

    /// Shows `prompt` and returns the answer without its line ending.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")
            .and_then(|_| self.output.flush())
            .context("Failed to write to terminal")?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .context("Failed to read input")?;
        if read == 0 {
            bail!("Input closed");
        }
        let answer = answer.trim_end_matches(['\r', '\n']).to_string();
        debug!(?answer, "Read answer");
        Ok(answer)
    }

    /// Shows a numbered list and returns the zero-based index of the chosen
    /// option.
    pub fn choose<T: Display>(&mut self, title: &str, options: &[T]) -> Result<usize> {
        self.say(title)?;
        for (i, option) in options.iter().enumerate() {
            self.say(format!("{}. {}", i + 1, option))?;
        }
        loop {
            let answer = self.line("Enter your choice: ")?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(format!(
                    "Invalid option, please choose a valid number between 1 and {}",
                    options.len()
                ))?,
            }
        }
    }

    /// Asks until the answer is a positive number.
    pub fn positive_amount(&mut self, prompt: &str) -> Result<f64> {
        loop {
            let answer = self.line(prompt)?;
            match answer.trim().parse::<f64>() {
                Ok(amount) if amount.is_finite() && amount > 0.0 => return Ok(amount),
                Ok(_) => self.say("Amount must be positive. Please enter a positive number.")?,
                Err(_) => self.say("Invalid amount. Please enter a valid number.")?,
            }
        }
    }

    /// Asks until the answer is yes or no.
    pub fn yes_no(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.line(prompt)?;
            match answer.trim().to_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => self.say("Invalid response. Please type 'yes' or 'no'.")?,
            }
        }
    }
}
