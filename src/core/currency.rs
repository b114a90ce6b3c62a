//! Currency conversion abstractions

use crate::core::expense::Currency;
use anyhow::{Result, bail};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Converts `amount` from one currency to another using the provider's rate.
pub async fn convert(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    amount: f64,
    from: &Currency,
    to: &Currency,
) -> Result<f64> {
    if from == to {
        return Ok(amount);
    }

    let rate = provider.get_rate(from.code(), to.code()).await?;
    if !rate.is_finite() || rate <= 0.0 {
        bail!("Invalid conversion rate {} from {} to {}", rate, from, to);
    }
    debug!("Converting {} {} to {} at rate {}", amount, from, to, rate);
    let converted = amount * rate;
    if !converted.is_finite() || converted <= 0.0 {
        bail!(
            "Converted amount {} {} is out of range ({} {} at rate {})",
            converted,
            to,
            amount,
            from,
            rate
        );
    }
    Ok(converted)
}
