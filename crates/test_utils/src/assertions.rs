//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_filing::TaxReturn;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more
/// than the tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {}",
        money
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that money values sum to a total
pub fn assert_money_sums_to(parts: &[Money], total: &Money) {
    let mut sum = Money::zero(total.currency());
    for part in parts {
        sum = sum
            .checked_add(part)
            .expect("parts must share the total's currency");
    }
    assert_eq!(
        sum, *total,
        "Parts sum to {} but expected {}",
        sum, total
    );
}

/// Asserts that a return sits in the FBR decision queue
pub fn assert_decision_eligible(tax_return: &TaxReturn) {
    assert!(
        tax_return.is_decision_eligible(),
        "Expected a decision-eligible return, got employee status {} and fbr status {:?}",
        tax_return.employee_status,
        tax_return.fbr_status
    );
}

/// Asserts that the officer axis has reached a terminal ruling
pub fn assert_finalized(tax_return: &TaxReturn) {
    assert!(
        matches!(tax_return.fbr_status, Some(status) if status.is_terminal()),
        "Expected a finalized return, got fbr status {:?}",
        tax_return.fbr_status
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::TestReturnBuilder;
    use crate::fixtures::MoneyFixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_approx_eq_within_tolerance() {
        let a = Money::rupees(dec!(100.0001));
        let b = Money::rupees(dec!(100.0002));
        assert_money_approx_eq(&a, &b, dec!(0.001));
    }

    #[test]
    #[should_panic(expected = "differ by more than tolerance")]
    fn test_approx_eq_outside_tolerance_panics() {
        let a = Money::rupees(dec!(100));
        let b = Money::rupees(dec!(101));
        assert_money_approx_eq(&a, &b, dec!(0.5));
    }

    #[test]
    fn test_sums_to() {
        let parts = [
            Money::rupees(dec!(25_000)),
            Money::rupees(dec!(5_000)),
            Money::rupees(dec!(5_000)),
        ];
        assert_money_sums_to(&parts, &MoneyFixtures::filing_fee());
    }

    #[test]
    fn test_decision_eligibility_assertion() {
        let tax_return = TestReturnBuilder::new().build_forwarded();
        assert_decision_eligible(&tax_return);
    }
}
