//! Money value object: integer minor units plus a currency code.

use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, ValueObject};

/// An exact monetary amount.
///
/// Amounts are stored in the currency's smallest unit (e.g. cents) so all
/// arithmetic is integer arithmetic. Operations never mutate; they return a new
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    amount_minor_units: i64,
    currency: String,
}

#[derive(Deserialize)]
struct RawMoney {
    amount_minor_units: i64,
    currency: String,
}

impl TryFrom<RawMoney> for Money {
    type Error = DomainError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.amount_minor_units, raw.currency)
    }
}

impl ValueObject for Money {}

impl Money {
    /// Validating factory.
    pub fn new(amount_minor_units: i64, currency: impl Into<String>) -> DomainResult<Self> {
        let currency = currency.into();
        if currency.trim().is_empty() {
            return Err(DomainError::invalid_argument("currency is required"));
        }
        if amount_minor_units < 0 {
            return Err(DomainError::invalid_argument("amount cannot be negative"));
        }
        Ok(Self {
            amount_minor_units,
            currency,
        })
    }

    /// Zero in the given currency.
    pub fn zero(currency: impl Into<String>) -> DomainResult<Self> {
        Self::new(0, currency)
    }

    /// Rebuild a value from event data that was validated when first recorded
    /// (by the command, or by `Order::from_history` on replay).
    pub(crate) fn from_recorded(amount_minor_units: i64, currency: &str) -> Self {
        debug_assert!(amount_minor_units >= 0 && !currency.trim().is_empty());
        Self {
            amount_minor_units,
            currency: currency.to_string(),
        }
    }

    pub fn amount_minor_units(&self) -> i64 {
        self.amount_minor_units
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor_units == 0
    }

    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount_minor_units
            .checked_add(other.amount_minor_units)
            .ok_or_else(|| DomainError::invalid_argument("amount overflow"))?;
        Ok(self.with_amount(amount))
    }

    /// Difference of two amounts in the same currency. The result may be negative.
    pub fn subtract(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount_minor_units
            .checked_sub(other.amount_minor_units)
            .ok_or_else(|| DomainError::invalid_argument("amount overflow"))?;
        Ok(self.with_amount(amount))
    }

    /// Multiply by a non-negative quantity (e.g. unit price × line quantity).
    pub fn times(&self, quantity: i64) -> DomainResult<Money> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument("quantity cannot be negative"));
        }
        let amount = self
            .amount_minor_units
            .checked_mul(quantity)
            .ok_or_else(|| DomainError::invalid_argument("amount overflow"))?;
        Ok(self.with_amount(amount))
    }

    fn ensure_same_currency(&self, other: &Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::currency_mismatch(&self.currency, &other.currency));
        }
        Ok(())
    }

    fn with_amount(&self, amount_minor_units: i64) -> Money {
        Money {
            amount_minor_units,
            currency: self.currency.clone(),
        }
    }
}

/// Display only: `"BRL 17.00"`. Never parse this back for arithmetic.
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.amount_minor_units < 0 { "-" } else { "" };
        let abs = self.amount_minor_units.unsigned_abs();
        write!(f, "{} {}{}.{:02}", self.currency, sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brl(amount: i64) -> Money {
        Money::new(amount, "BRL").unwrap()
    }

    #[test]
    fn new_rejects_empty_currency_and_negative_amount() {
        assert!(matches!(
            Money::new(100, ""),
            Err(DomainError::InvalidArgument(msg)) if msg.contains("currency")
        ));
        assert!(matches!(Money::new(100, "  "), Err(DomainError::InvalidArgument(_))));
        assert!(matches!(
            Money::new(-1, "BRL"),
            Err(DomainError::InvalidArgument(msg)) if msg.contains("negative")
        ));
        assert!(Money::new(0, "BRL").unwrap().is_zero());
    }

    #[test]
    fn add_and_subtract_same_currency() {
        assert_eq!(brl(500).add(&brl(200)).unwrap(), brl(700));
        assert_eq!(brl(500).subtract(&brl(200)).unwrap(), brl(300));

        let negative = brl(200).subtract(&brl(500)).unwrap();
        assert_eq!(negative.amount_minor_units(), -300);
        assert_eq!(negative.currency(), "BRL");
    }

    #[test]
    fn arithmetic_across_currencies_fails() {
        let usd = Money::new(100, "USD").unwrap();
        assert_eq!(
            brl(100).add(&usd),
            Err(DomainError::currency_mismatch("BRL", "USD"))
        );
        assert_eq!(
            usd.subtract(&brl(100)),
            Err(DomainError::currency_mismatch("USD", "BRL"))
        );
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let max = brl(i64::MAX);
        assert!(matches!(max.add(&brl(1)), Err(DomainError::InvalidArgument(_))));
        assert!(matches!(max.times(2), Err(DomainError::InvalidArgument(_))));
        assert!(matches!(brl(1).times(-1), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn times_multiplies_exactly() {
        assert_eq!(brl(500).times(3).unwrap(), brl(1500));
        assert_eq!(brl(500).times(0).unwrap(), brl(0));
    }

    #[test]
    fn display_renders_major_units_with_two_digits() {
        assert_eq!(brl(1700).to_string(), "BRL 17.00");
        assert_eq!(brl(5).to_string(), "BRL 0.05");
        assert_eq!(Money::new(123456, "USD").unwrap().to_string(), "USD 1234.56");
        assert_eq!(brl(0).subtract(&brl(50)).unwrap().to_string(), "BRL -0.50");
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(brl(100), brl(100));
        assert_ne!(brl(100), brl(101));
        assert_ne!(brl(100), Money::new(100, "USD").unwrap());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Money =
            serde_json::from_str(r#"{"amount_minor_units":250,"currency":"EUR"}"#).unwrap();
        assert_eq!(ok, Money::new(250, "EUR").unwrap());

        assert!(serde_json::from_str::<Money>(r#"{"amount_minor_units":-1,"currency":"EUR"}"#).is_err());
        assert!(serde_json::from_str::<Money>(r#"{"amount_minor_units":1,"currency":""}"#).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: same-currency arithmetic is exact integer arithmetic.
        #[test]
        fn same_currency_arithmetic_is_exact(
            a in 0i64..1_000_000_000_000i64,
            b in 0i64..1_000_000_000_000i64,
        ) {
            let sum = brl(a).add(&brl(b)).unwrap();
            prop_assert_eq!(sum.amount_minor_units(), a + b);

            let diff = brl(a).subtract(&brl(b)).unwrap();
            prop_assert_eq!(diff.amount_minor_units(), a - b);

            prop_assert_eq!(sum.subtract(&brl(b)).unwrap(), brl(a));
        }

        /// Property: differing currencies never produce a result.
        #[test]
        fn mixed_currency_arithmetic_always_fails(
            a in 0i64..1_000_000i64,
            b in 0i64..1_000_000i64,
            left in "[A-Z]{3}",
            right in "[A-Z]{3}",
        ) {
            prop_assume!(left != right);
            let x = Money::new(a, left.clone()).unwrap();
            let y = Money::new(b, right.clone()).unwrap();

            prop_assert_eq!(x.add(&y), Err(DomainError::currency_mismatch(&left, &right)));
            prop_assert_eq!(x.subtract(&y), Err(DomainError::currency_mismatch(&left, &right)));
        }
    }
}
