//! Interactive terminal front end.

pub mod entry;
pub mod menu;
pub mod prompt;
pub mod setup;
pub mod summary;
pub mod ui;

pub use prompt::Prompter;
