use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount as the commerce platform reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Decimal,
    /// ISO 4217 code, e.g. `"CHF"`.
    pub currency_code: String,
}

impl Money {
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// `"CHF 12"` for `12.00`, `"CHF 12.5"` for `12.50`.
    #[must_use]
    pub fn without_trailing_zeros(&self) -> String {
        format!("{} {}", self.currency_code, self.amount.normalize())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.2}", self.currency_code, self.amount.round_dp(2))
    }
}
