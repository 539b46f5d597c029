//! Money types with precise decimal arithmetic
//!
//! The portal bills and assesses in Pakistani Rupees, but every amount
//! carries an explicit currency so foreign-income entries cannot be mixed
//! in silently. rust_decimal keeps the arithmetic exact.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// ISO 4217 currency codes the portal accepts on income entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    PKR,
    USD,
    EUR,
    GBP,
    AED,
    SAR,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    ///
    /// Rupee amounts are filed in whole rupees; paisas do not appear on
    /// returns or bills.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::PKR => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::PKR => "Rs.",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::AED => "د.إ",
            Currency::SAR => "﷼",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::PKR => "PKR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// A monetary amount with its currency
///
/// Amounts keep 4 decimal places internally so intermediate rate math
/// does not lose precision before the final rounding to the currency's
/// display precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Rupee amount, the portal's default currency
    pub fn rupees(amount: Decimal) -> Self {
        Self::new(amount, Currency::PKR)
    }

    /// Amount given in the currency's minor unit (paisas, cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        let divisor = Decimal::new(10_i64.pow(currency.decimal_places()), 0);
        Self::new(Decimal::new(minor_units, 0) / divisor, currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Clamps a negative amount to zero, leaving positive amounts untouched
    ///
    /// Net tax after credits must never go below zero.
    pub fn clamp_non_negative(&self) -> Self {
        if self.is_negative() {
            Self::zero(self.currency)
        } else {
            *self
        }
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }

    /// Addition that fails on currency mismatch instead of mixing units
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.same_currency_as(other)?;
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Subtraction that fails on currency mismatch. The result may be
    /// negative; callers that must stay non-negative clamp afterwards.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.same_currency_as(other)?;
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Scales by a plain factor, for rate math
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.amount * factor, self.currency)
    }

    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self::new(self.amount / divisor, self.currency))
    }

    fn same_currency_as(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Currency mismatch in Money::sub")
    }
}

/// A percentage rate, such as the manually entered assessment tax rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Stored as a fraction: 0.05 means 5%
    value: Decimal,
}

impl Rate {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Builds a rate from its percentage form (5.0 means 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// The portion of `money` this rate takes
    pub fn apply(&self, money: &Money) -> Money {
        money.multiply(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4))
    }
}
