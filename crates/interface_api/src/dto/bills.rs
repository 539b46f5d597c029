//! Billing DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Currency, Money};
use domain_billing::{Bill, LineItem};

#[derive(Debug, Deserialize)]
pub struct LineItemDto {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateBillRequest {
    pub client_id: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItemDto>,
}

impl GenerateBillRequest {
    pub fn currency(&self) -> Currency {
        self.currency.unwrap_or(Currency::PKR)
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        let currency = self.currency();
        self.items
            .iter()
            .map(|item| LineItem::new(item.name.clone(), Money::new(item.amount, currency)))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            amount: item.amount.amount(),
        }
    }
}

/// Bill as surfaced to readers
///
/// The status field is the effective status: pending bills past their due
/// date read as overdue.
#[derive(Debug, Serialize)]
pub struct BillResponse {
    pub id: String,
    pub client_id: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub items: Vec<LineItemResponse>,
    pub generated_by: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: bill.id.to_string(),
            client_id: bill.client_id.to_string(),
            description: bill.description.clone(),
            amount: bill.amount.amount(),
            currency: bill.amount.currency().code().to_string(),
            due_date: bill.due_date,
            status: bill.effective_status(today).to_string(),
            items: bill.items.iter().map(Into::into).collect(),
            generated_by: bill.generated_by.to_string(),
            created_at: bill.created_at,
            last_updated: bill.last_updated,
        }
    }
}
