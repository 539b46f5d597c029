//! In-memory adapters
//!
//! Backing store for tests and single-process deployments. Each adapter
//! holds its aggregates in a `RwLock`ed map and applies every transition
//! through the aggregate's own method while holding the write lock, so
//! the check and the write are one atomic step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use core_kernel::{BillId, NotificationId, PortError, RequestId, ReturnId};
use domain_billing::{Bill, BillFilter, BillRepository, BillingError};
use domain_filing::{
    DecisionRuling, DocumentRef, FilingError, IncomeEntry, ReturnFilter, ReturnRepository,
    TaxAssessment, TaxReturn, VerificationOutcome,
};
use domain_notify::{Notification, NotificationFilter, NotificationRepository};
use domain_requests::{InfoRequest, RequestError, RequestFilter, RequestRepository, ThreadMessage};

use crate::error::{billing_err, filing_err, request_err};

/// In-memory tax return store
#[derive(Default)]
pub struct MemoryReturnStore {
    returns: RwLock<HashMap<ReturnId, TaxReturn>>,
}

impl MemoryReturnStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate<F>(&self, id: ReturnId, f: F) -> Result<TaxReturn, PortError>
    where
        F: FnOnce(&mut TaxReturn) -> Result<(), FilingError>,
    {
        let mut returns = self.returns.write().await;
        let tax_return = returns
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("TaxReturn", id))?;
        f(tax_return).map_err(filing_err)?;
        Ok(tax_return.clone())
    }
}

#[async_trait]
impl ReturnRepository for MemoryReturnStore {
    async fn insert(&self, tax_return: &TaxReturn) -> Result<(), PortError> {
        let mut returns = self.returns.write().await;
        if returns.contains_key(&tax_return.id) {
            return Err(PortError::conflict(format!(
                "return {} already exists",
                tax_return.id
            )));
        }
        returns.insert(tax_return.id, tax_return.clone());
        Ok(())
    }

    async fn fetch(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.returns
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("TaxReturn", id))
    }

    async fn list(&self, filter: &ReturnFilter) -> Result<Vec<TaxReturn>, PortError> {
        let returns = self.returns.read().await;
        let mut out: Vec<TaxReturn> = returns
            .values()
            .filter(|r| filter.client_id.map_or(true, |c| r.client_id == c))
            .filter(|r| !filter.decision_eligible || r.is_decision_eligible())
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn attach_document(
        &self,
        id: ReturnId,
        document: DocumentRef,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.attach_document(document)).await
    }

    async fn update_income(
        &self,
        id: ReturnId,
        income_entries: Vec<IncomeEntry>,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.update_income(income_entries)).await
    }

    async fn acknowledge_declaration(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.acknowledge_declaration()).await
    }

    async fn submit(&self, id: ReturnId, now: DateTime<Utc>) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.submit(now)).await
    }

    async fn begin_review(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.begin_review()).await
    }

    async fn verify(
        &self,
        id: ReturnId,
        outcome: VerificationOutcome,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.verify(outcome)).await
    }

    async fn save_assessment(
        &self,
        id: ReturnId,
        assessment: &TaxAssessment,
    ) -> Result<TaxReturn, PortError> {
        let assessment = assessment.clone();
        self.mutate(id, |r| r.record_assessment(assessment)).await
    }

    async fn take_up(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.take_up_review()).await
    }

    async fn decide(&self, id: ReturnId, ruling: DecisionRuling) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.apply_decision(ruling)).await
    }
}

/// In-memory info request store
#[derive(Default)]
pub struct MemoryRequestStore {
    requests: RwLock<HashMap<RequestId, InfoRequest>>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate<F>(&self, id: RequestId, f: F) -> Result<InfoRequest, PortError>
    where
        F: FnOnce(&mut InfoRequest) -> Result<(), RequestError>,
    {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("InfoRequest", id))?;
        f(request).map_err(request_err)?;
        Ok(request.clone())
    }
}

#[async_trait]
impl RequestRepository for MemoryRequestStore {
    async fn insert(&self, request: &InfoRequest) -> Result<(), PortError> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id) {
            return Err(PortError::conflict(format!(
                "request {} already exists",
                request.id
            )));
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn fetch(&self, id: RequestId) -> Result<InfoRequest, PortError> {
        self.requests
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("InfoRequest", id))
    }

    async fn list(&self, filter: &RequestFilter) -> Result<Vec<InfoRequest>, PortError> {
        let requests = self.requests.read().await;
        let mut out: Vec<InfoRequest> = requests
            .values()
            .filter(|r| filter.return_id.map_or(true, |rid| r.return_id == rid))
            .filter(|r| filter.client_id.map_or(true, |c| r.client_id == c))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(out)
    }

    async fn append_reply(
        &self,
        id: RequestId,
        message: ThreadMessage,
    ) -> Result<InfoRequest, PortError> {
        self.mutate(id, |r| r.reply(message)).await
    }

    async fn resolve(&self, id: RequestId) -> Result<InfoRequest, PortError> {
        self.mutate(id, |r| r.resolve()).await
    }

    async fn close(&self, id: RequestId) -> Result<InfoRequest, PortError> {
        self.mutate(id, |r| r.close()).await
    }
}

/// In-memory bill store
#[derive(Default)]
pub struct MemoryBillStore {
    bills: RwLock<HashMap<BillId, Bill>>,
}

impl MemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate<F>(&self, id: BillId, f: F) -> Result<Bill, PortError>
    where
        F: FnOnce(&mut Bill) -> Result<(), BillingError>,
    {
        let mut bills = self.bills.write().await;
        let bill = bills
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Bill", id))?;
        f(bill).map_err(billing_err)?;
        Ok(bill.clone())
    }
}

#[async_trait]
impl BillRepository for MemoryBillStore {
    async fn insert(&self, bill: &Bill) -> Result<(), PortError> {
        let mut bills = self.bills.write().await;
        if bills.contains_key(&bill.id) {
            return Err(PortError::conflict(format!("bill {} already exists", bill.id)));
        }
        bills.insert(bill.id, bill.clone());
        Ok(())
    }

    async fn fetch(&self, id: BillId) -> Result<Bill, PortError> {
        self.bills
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Bill", id))
    }

    async fn list(&self, filter: &BillFilter) -> Result<Vec<Bill>, PortError> {
        let bills = self.bills.read().await;
        let mut out: Vec<Bill> = bills
            .values()
            .filter(|b| filter.client_id.map_or(true, |c| b.client_id == c))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn pay(&self, id: BillId) -> Result<Bill, PortError> {
        self.mutate(id, |b| b.pay()).await
    }

    async fn cancel(&self, id: BillId) -> Result<Bill, PortError> {
        self.mutate(id, |b| b.cancel()).await
    }
}

/// In-memory notification store
#[derive(Default)]
pub struct MemoryNotificationStore {
    notifications: RwLock<HashMap<NotificationId, Notification>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationStore {
    async fn insert(&self, notification: &Notification) -> Result<(), PortError> {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn fetch(&self, id: NotificationId) -> Result<Notification, PortError> {
        self.notifications
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Notification", id))
    }

    async fn list(&self, filter: &NotificationFilter) -> Result<Vec<Notification>, PortError> {
        let notifications = self.notifications.read().await;
        let mut out: Vec<Notification> = notifications
            .values()
            .filter(|n| filter.recipient_id.map_or(true, |r| n.recipient_id == r))
            .filter(|n| !filter.unread_only || !n.read)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<Notification, PortError> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Notification", id))?;
        notification.mark_read();
        Ok(notification.clone())
    }
}
