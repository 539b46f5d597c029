//! Billing handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use core_kernel::{Actor, BillId, ClientId, Money};
use domain_billing::NewBill;

use crate::dto::bills::*;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::AppState;

/// Generates a pending bill against a client
pub async fn generate_bill(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<GenerateBillRequest>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    request.validate()?;
    let new_bill = NewBill {
        client_id: parse_id::<ClientId>(&request.client_id, "client")?,
        description: request.description.clone(),
        amount: Money::new(request.amount, request.currency()),
        due_date: request.due_date,
        items: request.line_items(),
    };
    let bill = state.services.billing.generate_bill(&actor, new_bill).await?;
    Ok((StatusCode::CREATED, Json(bill.into())))
}

/// Lists bills visible to the caller
pub async fn list_bills(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListBillsQuery>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let client_id = query
        .client_id
        .as_deref()
        .map(|raw| parse_id::<ClientId>(raw, "client"))
        .transpose()?;
    let bills = state.services.billing.list_bills(&actor, client_id).await?;
    Ok(Json(bills.into_iter().map(Into::into).collect()))
}

/// Gets one bill
pub async fn get_bill(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let id: BillId = parse_id(&id, "bill")?;
    let bill = state.services.billing.get_bill(&actor, id).await?;
    Ok(Json(bill.into()))
}

/// Pays a bill
pub async fn pay_bill(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let id: BillId = parse_id(&id, "bill")?;
    let bill = state.services.billing.pay_bill(&actor, id).await?;
    Ok(Json(bill.into()))
}

/// Cancels a pending bill
pub async fn cancel_bill(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let id: BillId = parse_id(&id, "bill")?;
    let bill = state.services.billing.cancel_bill(&actor, id).await?;
    Ok(Json(bill.into()))
}
