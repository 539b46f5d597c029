//! Tax return handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use core_kernel::{Actor, ClientId, Money, ReturnId};
use domain_filing::NewDraft;

use crate::dto::returns::*;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::AppState;

/// Creates a draft return for the calling client
pub async fn create_draft(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateDraftRequest>,
) -> Result<(StatusCode, Json<ReturnResponse>), ApiError> {
    let draft = NewDraft {
        tax_year: request.tax_year,
        income_entries: request
            .income_entries
            .into_iter()
            .map(IncomeEntryDto::into_entry)
            .collect(),
    };
    let tax_return = state.services.filing.create_draft(&actor, draft).await?;
    Ok((StatusCode::CREATED, Json(tax_return.into())))
}

/// Lists returns visible to the caller
pub async fn list_returns(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListReturnsQuery>,
) -> Result<Json<Vec<ReturnResponse>>, ApiError> {
    let client_id = query
        .client_id
        .as_deref()
        .map(|raw| parse_id::<ClientId>(raw, "client"))
        .transpose()?;
    let returns = state.services.filing.list_returns(&actor, client_id).await?;
    Ok(Json(returns.into_iter().map(Into::into).collect()))
}

/// Gets one return
pub async fn get_return(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state.services.filing.get_return(&actor, id).await?;
    Ok(Json(tax_return.into()))
}

/// Attaches an uploaded document to a draft
pub async fn attach_document(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<AttachDocumentRequest>,
) -> Result<Json<ReturnResponse>, ApiError> {
    request.validate()?;
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state
        .services
        .filing
        .attach_document(&actor, id, request.file_name)
        .await?;
    Ok(Json(tax_return.into()))
}

/// Replaces the income lines of a draft
pub async fn update_income(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<UpdateIncomeRequest>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let entries = request
        .income_entries
        .into_iter()
        .map(IncomeEntryDto::into_entry)
        .collect();
    let tax_return = state
        .services
        .filing
        .update_income(&actor, id, entries)
        .await?;
    Ok(Json(tax_return.into()))
}

/// Records the client's filing declaration
pub async fn acknowledge_declaration(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state
        .services
        .filing
        .acknowledge_declaration(&actor, id)
        .await?;
    Ok(Json(tax_return.into()))
}

/// Files the draft return
pub async fn submit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state.services.filing.submit(&actor, id).await?;
    Ok(Json(tax_return.into()))
}

/// Employee takes up verification of a submitted return
pub async fn begin_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state.services.filing.begin_review(&actor, id).await?;
    Ok(Json(tax_return.into()))
}

/// Records the employee's verification outcome
pub async fn verify(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state
        .services
        .filing
        .verify(&actor, id, request.outcome)
        .await?;
    Ok(Json(tax_return.into()))
}

/// Computes and persists an assessment from the employee's figures
pub async fn record_assessment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(request): Json<RecordAssessmentRequest>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let id: ReturnId = parse_id(&id, "return")?;
    let tax_return = state
        .services
        .filing
        .record_assessment(
            &actor,
            id,
            Money::rupees(request.total_income),
            Money::rupees(request.exemptions),
            request.tax_rate_percent,
            Money::rupees(request.tax_credits),
        )
        .await?;
    Ok(Json(tax_return.into()))
}
