//! Bill aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use core_kernel::{BillId, ClientId, Money, UserId};
use crate::error::BillingError;

/// Stored bill status
///
/// `Overdue` never appears in storage; it is derived on read from the due
/// date of a pending bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl BillStatus {
    /// True once the bill accepts no further transitions
    pub fn is_settled(&self) -> bool {
        matches!(self, BillStatus::Paid | BillStatus::Cancelled)
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BillStatus::Pending => "pending",
            BillStatus::Paid => "paid",
            BillStatus::Overdue => "overdue",
            BillStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// A named charge on a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub name: String,
    pub amount: Money,
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
        }
    }
}

/// A service-fee bill raised against a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub client_id: ClientId,
    pub description: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub status: BillStatus,
    pub items: Vec<LineItem>,
    /// Employee who generated the bill
    pub generated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Bill {
    /// Creates a pending bill
    ///
    /// # Errors
    ///
    /// Returns a validation error if the amount is not positive, the due
    /// date is in the past, or line items are given that do not sum to the
    /// bill amount.
    pub fn generate(
        client_id: ClientId,
        description: impl Into<String>,
        amount: Money,
        due_date: NaiveDate,
        items: Vec<LineItem>,
        generated_by: UserId,
        today: NaiveDate,
    ) -> Result<Self, BillingError> {
        if !amount.is_positive() {
            return Err(BillingError::validation("bill amount must be positive"));
        }
        if due_date < today {
            return Err(BillingError::validation(
                "due date must be today or in the future",
            ));
        }
        if !items.is_empty() {
            let mut sum = Money::zero(amount.currency());
            for item in &items {
                sum = sum.checked_add(&item.amount)?;
            }
            if sum != amount {
                return Err(BillingError::validation(format!(
                    "line items sum to {sum} but the bill amount is {amount}"
                )));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: BillId::new_v7(),
            client_id,
            description: description.into(),
            amount,
            due_date,
            status: BillStatus::Pending,
            items,
            generated_by,
            created_at: now,
            last_updated: now,
        })
    }

    /// Marks the bill paid
    ///
    /// Allowed while pending (including past-due pending); fails on paid
    /// or cancelled bills.
    pub fn pay(&mut self) -> Result<(), BillingError> {
        if self.status.is_settled() {
            return Err(BillingError::AlreadySettled(self.status.to_string()));
        }
        self.status = BillStatus::Paid;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Cancels a pending bill
    pub fn cancel(&mut self) -> Result<(), BillingError> {
        if self.status.is_settled() {
            return Err(BillingError::AlreadySettled(self.status.to_string()));
        }
        self.status = BillStatus::Cancelled;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// The status as surfaced to readers: pending bills past their due
    /// date read as overdue.
    pub fn effective_status(&self, today: NaiveDate) -> BillStatus {
        if self.status == BillStatus::Pending && self.due_date < today {
            BillStatus::Overdue
        } else {
            self.status
        }
    }

    /// True when the bill reads as overdue today
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.effective_status(today) == BillStatus::Overdue
    }
}
