//! Tax assessment computation
//!
//! The assessment is a pure computation over figures an employee enters
//! manually; no tax-law schedule is applied here. Same inputs always
//! produce the same breakdown.

use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};
use crate::error::FilingError;

/// The computed assessment recorded on a return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    /// Declared income the employee assessed against
    pub total_income: Money,
    /// Exempt income subtracted before the rate applies
    pub exemptions: Money,
    /// `total_income - exemptions`, floored at zero
    pub taxable_income: Money,
    /// Manually entered flat rate
    pub tax_rate: Rate,
    /// `taxable_income * tax_rate`
    pub gross_tax: Money,
    /// Credits subtracted from gross tax
    pub tax_credits: Money,
    /// `gross_tax - tax_credits`, floored at zero
    pub net_tax: Money,
}

impl TaxAssessment {
    /// Computes an assessment from the employee's inputs
    ///
    /// taxable = income - exemptions; gross = taxable * rate / 100;
    /// net = gross - credits. Taxable income and net tax are floored at
    /// zero: exemptions beyond income do not produce a negative base, and
    /// credits beyond gross tax do not produce a refund.
    ///
    /// # Errors
    ///
    /// Returns a validation error if income, exemptions, credits, or the
    /// rate are negative, or if the amounts mix currencies.
    pub fn compute(
        total_income: Money,
        exemptions: Money,
        tax_rate: Rate,
        tax_credits: Money,
    ) -> Result<Self, FilingError> {
        if total_income.is_negative() {
            return Err(FilingError::validation("total income must not be negative"));
        }
        if exemptions.is_negative() {
            return Err(FilingError::validation("exemptions must not be negative"));
        }
        if tax_credits.is_negative() {
            return Err(FilingError::validation("tax credits must not be negative"));
        }
        if tax_rate.as_decimal().is_sign_negative() {
            return Err(FilingError::validation("tax rate must not be negative"));
        }

        let taxable_income = total_income
            .checked_sub(&exemptions)?
            .clamp_non_negative();
        let gross_tax = tax_rate.apply(&taxable_income).round_to_currency();
        let net_tax = gross_tax
            .checked_sub(&tax_credits)?
            .clamp_non_negative();

        Ok(Self {
            total_income,
            exemptions,
            taxable_income,
            tax_rate,
            gross_tax,
            tax_credits,
            net_tax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basic_computation() {
        let assessment = TaxAssessment::compute(
            Money::rupees(dec!(2500000)),
            Money::rupees(dec!(0)),
            Rate::from_percentage(dec!(5)),
            Money::rupees(dec!(0)),
        )
        .unwrap();

        assert_eq!(assessment.taxable_income.amount(), dec!(2500000));
        assert_eq!(assessment.gross_tax.amount(), dec!(125000));
        assert_eq!(assessment.net_tax.amount(), dec!(125000));
    }

    #[test]
    fn test_credits_reduce_net_tax() {
        let assessment = TaxAssessment::compute(
            Money::rupees(dec!(1000000)),
            Money::rupees(dec!(200000)),
            Rate::from_percentage(dec!(10)),
            Money::rupees(dec!(30000)),
        )
        .unwrap();

        assert_eq!(assessment.taxable_income.amount(), dec!(800000));
        assert_eq!(assessment.gross_tax.amount(), dec!(80000));
        assert_eq!(assessment.net_tax.amount(), dec!(50000));
    }

    #[test]
    fn test_net_tax_floored_at_zero() {
        let assessment = TaxAssessment::compute(
            Money::rupees(dec!(100000)),
            Money::rupees(dec!(0)),
            Rate::from_percentage(dec!(5)),
            Money::rupees(dec!(999999)),
        )
        .unwrap();

        assert!(assessment.net_tax.is_zero());
    }

    #[test]
    fn test_exemptions_beyond_income_floor_taxable_at_zero() {
        let assessment = TaxAssessment::compute(
            Money::rupees(dec!(100000)),
            Money::rupees(dec!(150000)),
            Rate::from_percentage(dec!(5)),
            Money::rupees(dec!(0)),
        )
        .unwrap();

        assert!(assessment.taxable_income.is_zero());
        assert!(assessment.gross_tax.is_zero());
        assert!(assessment.net_tax.is_zero());
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let result = TaxAssessment::compute(
            Money::rupees(dec!(-1)),
            Money::rupees(dec!(0)),
            Rate::from_percentage(dec!(5)),
            Money::rupees(dec!(0)),
        );
        assert!(result.is_err());
    }
}
