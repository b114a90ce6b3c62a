//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod expense;
pub mod log;
pub mod session;
pub mod summary;

// Re-export main types for cleaner imports
pub use currency::CurrencyRateProvider;
pub use expense::{CategoryRegistry, Currency, Expense, Frequency, Period};
pub use session::Session;
