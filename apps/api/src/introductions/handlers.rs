use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthenticatedActor;
use crate::errors::AppError;
use crate::introductions::lifecycle::{
    create_introduction, mark_viewed, respond_to_introduction, Decision,
};
use crate::introductions::models::{
    AcceptResponse, CreateIntroductionRequest, IntroductionDetail, IntroductionSummary,
    ReceivedIntroduction, RespondRequest, SentIntroduction,
};
use crate::introductions::queries::{list_received, list_sent, StatusFilter};
use crate::pagination::{Paginated, PageParams};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListingQuery {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// POST /api/v1/introductions/request
pub async fn handle_create(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Json(req): Json<CreateIntroductionRequest>,
) -> Result<(StatusCode, Json<IntroductionSummary>), AppError> {
    let summary = create_introduction(&state.db, state.notifier.as_ref(), &actor, &req).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// POST /api/v1/introductions/:id/accept
pub async fn handle_accept(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<AcceptResponse>, AppError> {
    let request = respond_to_introduction(
        &state.db,
        state.notifier.as_ref(),
        &actor,
        id,
        Decision::Accept,
        req.message,
    )
    .await?;
    Ok(Json(AcceptResponse {
        request,
        contact_details_unlocked: true,
    }))
}

/// POST /api/v1/introductions/:id/decline
pub async fn handle_decline(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<IntroductionDetail>, AppError> {
    let request = respond_to_introduction(
        &state.db,
        state.notifier.as_ref(),
        &actor,
        id,
        Decision::Decline,
        req.message,
    )
    .await?;
    Ok(Json(request))
}

/// POST /api/v1/introductions/:id/view
pub async fn handle_mark_viewed(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    mark_viewed(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/introductions/received
pub async fn handle_received(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Paginated<ReceivedIntroduction>>, AppError> {
    let filter = StatusFilter::parse(query.status.as_deref())?;
    let page = list_received(&state.db, actor.id, filter, &query.page_params()).await?;
    Ok(Json(page))
}

/// GET /api/v1/introductions/sent
pub async fn handle_sent(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Paginated<SentIntroduction>>, AppError> {
    let filter = StatusFilter::parse(query.status.as_deref())?;
    let page = list_sent(&state.db, actor.id, filter, &query.page_params()).await?;
    Ok(Json(page))
}
