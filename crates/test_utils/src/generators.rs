//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use domain_filing::{supported_tax_years, IncomeCategory, IncomeEntry};

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::PKR),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::AED),
        Just(Currency::SAR),
    ]
}

/// Strategy for generating income categories
pub fn income_category_strategy() -> impl Strategy<Value = IncomeCategory> {
    prop_oneof![
        Just(IncomeCategory::Salary),
        Just(IncomeCategory::Business),
        Just(IncomeCategory::Rental),
        Just(IncomeCategory::CapitalGains),
        Just(IncomeCategory::Agricultural),
        Just(IncomeCategory::Foreign),
        Just(IncomeCategory::Other),
    ]
}

/// Strategy for generating non-negative rupee amounts
pub fn rupee_amount_strategy() -> impl Strategy<Value = Money> {
    (0i64..100_000_000i64).prop_map(|n| Money::rupees(Decimal::new(n, 0)))
}

/// Strategy for generating strictly positive rupee amounts
pub fn positive_rupee_strategy() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(|n| Money::rupees(Decimal::new(n, 0)))
}

/// Strategy for generating one declared income line
pub fn income_entry_strategy() -> impl Strategy<Value = IncomeEntry> {
    (income_category_strategy(), rupee_amount_strategy())
        .prop_map(|(category, amount)| IncomeEntry::new(category, amount))
}

/// Strategy for generating a set of declared income lines
pub fn income_entries_strategy() -> impl Strategy<Value = Vec<IncomeEntry>> {
    proptest::collection::vec(income_entry_strategy(), 0..6)
}

/// Strategy for generating tax rates as percentages (0% to 40%)
pub fn tax_rate_percent_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..4000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for generating tax years the filing domain accepts
pub fn tax_year_strategy() -> impl Strategy<Value = u16> {
    supported_tax_years()
}
