//! Tests for domain_billing

use chrono::{Days, Utc};
use rust_decimal_macros::dec;

use core_kernel::{ClientId, Money, UserId};
use domain_billing::{Bill, BillStatus, BillingError, LineItem};
use test_utils::{assert_money_sums_to, TestBillBuilder};

fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

fn pending_bill() -> Bill {
    TestBillBuilder::itemised().build()
}

mod generation {
    use super::*;

    #[test]
    fn test_generate_creates_pending_bill() {
        let bill = pending_bill();
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.amount.amount(), dec!(35000));
        assert_eq!(bill.items.len(), 3);

        let item_amounts: Vec<_> = bill.items.iter().map(|item| item.amount).collect();
        assert_money_sums_to(&item_amounts, &bill.amount);
    }

    #[test]
    fn test_generate_rejects_non_positive_amount() {
        let result = Bill::generate(
            ClientId::new(),
            "Zero",
            Money::rupees(dec!(0)),
            today(),
            vec![],
            UserId::new(),
            today(),
        );
        assert!(matches!(result, Err(BillingError::Validation(_))));
    }

    #[test]
    fn test_generate_rejects_past_due_date() {
        let result = Bill::generate(
            ClientId::new(),
            "Late",
            Money::rupees(dec!(1000)),
            today() - Days::new(1),
            vec![],
            UserId::new(),
            today(),
        );
        assert!(matches!(result, Err(BillingError::Validation(_))));
    }

    #[test]
    fn test_generate_accepts_due_today() {
        let result = Bill::generate(
            ClientId::new(),
            "Due today",
            Money::rupees(dec!(1000)),
            today(),
            vec![],
            UserId::new(),
            today(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_generate_rejects_mismatched_items() {
        let result = Bill::generate(
            ClientId::new(),
            "Mismatch",
            Money::rupees(dec!(35000)),
            today() + Days::new(7),
            vec![LineItem::new("Preparation", Money::rupees(dec!(25000)))],
            UserId::new(),
            today(),
        );
        assert!(matches!(result, Err(BillingError::Validation(_))));
    }

    #[test]
    fn test_generate_without_items_skips_sum_check() {
        let result = Bill::generate(
            ClientId::new(),
            "No breakdown",
            Money::rupees(dec!(35000)),
            today() + Days::new(7),
            vec![],
            UserId::new(),
            today(),
        );
        assert!(result.is_ok());
    }
}

mod settlement {
    use super::*;

    #[test]
    fn test_pay_pending_bill() {
        let mut bill = pending_bill();
        bill.pay().unwrap();
        assert_eq!(bill.status, BillStatus::Paid);
    }

    #[test]
    fn test_pay_twice_fails() {
        let mut bill = pending_bill();
        bill.pay().unwrap();
        assert!(matches!(bill.pay(), Err(BillingError::AlreadySettled(_))));
        assert_eq!(bill.status, BillStatus::Paid);
    }

    #[test]
    fn test_pay_cancelled_bill_fails() {
        let mut bill = pending_bill();
        bill.cancel().unwrap();
        assert!(matches!(bill.pay(), Err(BillingError::AlreadySettled(_))));
        assert_eq!(bill.status, BillStatus::Cancelled);
    }

    #[test]
    fn test_cancel_paid_bill_fails() {
        let mut bill = pending_bill();
        bill.pay().unwrap();
        assert!(matches!(bill.cancel(), Err(BillingError::AlreadySettled(_))));
    }
}

mod overdue {
    use super::*;

    #[test]
    fn test_pending_past_due_reads_as_overdue() {
        let mut bill = pending_bill();
        bill.due_date = today() - Days::new(1);

        // Stored status stays pending, effective status is overdue.
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.effective_status(today()), BillStatus::Overdue);
        assert!(bill.is_overdue(today()));
    }

    #[test]
    fn test_pending_before_due_is_not_overdue() {
        let bill = pending_bill();
        assert_eq!(bill.effective_status(today()), BillStatus::Pending);
    }

    #[test]
    fn test_overdue_bill_is_still_payable() {
        let mut bill = pending_bill();
        bill.due_date = today() - Days::new(30);
        bill.pay().unwrap();
        assert_eq!(bill.effective_status(today()), BillStatus::Paid);
    }

    #[test]
    fn test_paid_and_cancelled_never_read_overdue() {
        let mut paid = pending_bill();
        paid.due_date = today() - Days::new(1);
        paid.pay().unwrap();
        assert_eq!(paid.effective_status(today()), BillStatus::Paid);

        let mut cancelled = pending_bill();
        cancelled.due_date = today() - Days::new(1);
        cancelled.cancel().unwrap();
        assert_eq!(cancelled.effective_status(today()), BillStatus::Cancelled);
    }
}
