//! Billing application service

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::warn;

use core_kernel::{Actor, BillId, ClientId, Money, NoticeKind, NotificationSink, Role};
use crate::bill::{Bill, LineItem};
use crate::error::BillingError;
use crate::ports::{BillFilter, BillRepository};

/// Input for generating a bill
#[derive(Debug, Clone)]
pub struct NewBill {
    pub client_id: ClientId,
    pub description: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub items: Vec<LineItem>,
}

/// Service for bill generation and settlement
pub struct BillingService {
    bills: Arc<dyn BillRepository>,
    notices: Arc<dyn NotificationSink>,
}

impl BillingService {
    pub fn new(bills: Arc<dyn BillRepository>, notices: Arc<dyn NotificationSink>) -> Self {
        Self { bills, notices }
    }

    /// Generates a pending bill; employee only
    pub async fn generate_bill(&self, actor: &Actor, new_bill: NewBill) -> Result<Bill, BillingError> {
        if actor.role != Role::Employee {
            return Err(BillingError::not_permitted("only employees may generate bills"));
        }

        let bill = Bill::generate(
            new_bill.client_id,
            new_bill.description,
            new_bill.amount,
            new_bill.due_date,
            new_bill.items,
            actor.user_id,
            Utc::now().date_naive(),
        )?;
        self.bills.insert(&bill).await?;

        if let Err(err) = self
            .notices
            .push(
                bill.client_id.into(),
                "Payment Due",
                &format!(
                    "Your service fee payment of {} is due on {}.",
                    bill.amount, bill.due_date
                ),
                NoticeKind::Info,
            )
            .await
        {
            warn!(bill_id = %bill.id, error = %err, "failed to emit bill notice");
        }

        Ok(bill)
    }

    /// Pays a bill; the paying client must own it
    pub async fn pay_bill(&self, actor: &Actor, id: BillId) -> Result<Bill, BillingError> {
        if actor.role != Role::Client {
            return Err(BillingError::not_permitted("only clients may pay bills"));
        }
        let bill = self.bills.fetch(id).await?;
        if bill.client_id != ClientId::from(actor.user_id) {
            return Err(BillingError::BillNotFound(id.to_string()));
        }
        Ok(self.bills.pay(id).await?)
    }

    /// Cancels a pending bill; employee only
    pub async fn cancel_bill(&self, actor: &Actor, id: BillId) -> Result<Bill, BillingError> {
        if actor.role != Role::Employee {
            return Err(BillingError::not_permitted("only employees may cancel bills"));
        }
        Ok(self.bills.cancel(id).await?)
    }

    /// Fetches one bill, restricted to the caller's visibility
    pub async fn get_bill(&self, actor: &Actor, id: BillId) -> Result<Bill, BillingError> {
        let bill = self.bills.fetch(id).await?;
        if actor.role == Role::Client && bill.client_id != ClientId::from(actor.user_id) {
            return Err(BillingError::BillNotFound(id.to_string()));
        }
        Ok(bill)
    }

    /// Lists bills visible to the caller
    pub async fn list_bills(
        &self,
        actor: &Actor,
        client_id: Option<ClientId>,
    ) -> Result<Vec<Bill>, BillingError> {
        let filter = match actor.role {
            Role::Client => BillFilter {
                client_id: Some(actor.user_id.into()),
            },
            _ => BillFilter { client_id },
        };
        Ok(self.bills.list(&filter).await?)
    }
}
