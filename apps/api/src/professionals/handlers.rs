use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{ActorRole, AuthenticatedActor};
use crate::errors::AppError;
use crate::models::professional::{ProfessionalRow, RelationCounts};
use crate::professionals::completeness::{
    compute_completeness, recommendations, CompletenessReport, ProfileSnapshot,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub professional: ProfessionalRow,
    pub completeness: CompletenessReport,
    pub recommendations: Vec<String>,
}

/// Partial profile update: absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_headline: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub current_industry: Option<String>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub years_of_experience: Option<i32>,
    pub profile_summary: Option<String>,
    pub resume_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub open_to_opportunities: Option<bool>,
    pub blocked_company_ids: Option<Vec<Uuid>>,
}

async fn load_professional(db: &PgPool, id: Uuid) -> Result<ProfessionalRow, AppError> {
    let row: Option<ProfessionalRow> = sqlx::query_as("SELECT * FROM professionals WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    row.ok_or_else(|| AppError::NotFound("Professional profile not found".to_string()))
}

async fn relation_counts(db: &PgPool, id: Uuid) -> Result<RelationCounts, AppError> {
    let counts: RelationCounts = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM professional_skills WHERE professional_id = $1) AS skills,
            (SELECT COUNT(*) FROM work_history WHERE professional_id = $1) AS work_history,
            (SELECT COUNT(*) FROM education WHERE professional_id = $1) AS education,
            (SELECT COUNT(*) FROM certifications WHERE professional_id = $1) AS certifications
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(counts)
}

fn profile_response(row: ProfessionalRow, counts: RelationCounts) -> ProfileResponse {
    let snapshot = ProfileSnapshot::new(&row, &counts);
    ProfileResponse {
        completeness: compute_completeness(&snapshot),
        recommendations: recommendations(&snapshot),
        professional: row,
    }
}

/// GET /api/v1/professionals/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
) -> Result<Json<ProfileResponse>, AppError> {
    actor.require_role(ActorRole::Professional)?;
    let row = load_professional(&state.db, actor.id).await?;
    let counts = relation_counts(&state.db, actor.id).await?;
    Ok(Json(profile_response(row, counts)))
}

/// PUT /api/v1/professionals/me
///
/// Recomputes the completeness score from the updated aggregate and persists
/// it to the cached column before responding.
pub async fn handle_update_me(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    actor.require_role(ActorRole::Professional)?;

    if let Some(years) = req.years_of_experience {
        if years < 0 {
            return Err(AppError::Validation(
                "yearsOfExperience must be non-negative".to_string(),
            ));
        }
    }

    let updated: Option<ProfessionalRow> = sqlx::query_as(
        r#"
        UPDATE professionals
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            profile_headline = COALESCE($4, profile_headline),
            location_city = COALESCE($5, location_city),
            location_state = COALESCE($6, location_state),
            current_industry = COALESCE($7, current_industry),
            current_title = COALESCE($8, current_title),
            current_company = COALESCE($9, current_company),
            years_of_experience = COALESCE($10, years_of_experience),
            profile_summary = COALESCE($11, profile_summary),
            resume_url = COALESCE($12, resume_url),
            profile_photo_url = COALESCE($13, profile_photo_url),
            linkedin_url = COALESCE($14, linkedin_url),
            portfolio_url = COALESCE($15, portfolio_url),
            open_to_opportunities = COALESCE($16, open_to_opportunities),
            blocked_company_ids = COALESCE($17, blocked_company_ids),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(actor.id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.profile_headline)
    .bind(&req.location_city)
    .bind(&req.location_state)
    .bind(&req.current_industry)
    .bind(&req.current_title)
    .bind(&req.current_company)
    .bind(req.years_of_experience)
    .bind(&req.profile_summary)
    .bind(&req.resume_url)
    .bind(&req.profile_photo_url)
    .bind(&req.linkedin_url)
    .bind(&req.portfolio_url)
    .bind(req.open_to_opportunities)
    .bind(&req.blocked_company_ids)
    .fetch_optional(&state.db)
    .await?;
    let mut row =
        updated.ok_or_else(|| AppError::NotFound("Professional profile not found".to_string()))?;

    let counts = relation_counts(&state.db, actor.id).await?;
    let snapshot = ProfileSnapshot::new(&row, &counts);
    let report = compute_completeness(&snapshot);

    sqlx::query("UPDATE professionals SET profile_completeness = $2 WHERE id = $1")
        .bind(actor.id)
        .bind(report.overall)
        .execute(&state.db)
        .await?;
    row.profile_completeness = report.overall;

    Ok(Json(ProfileResponse {
        recommendations: recommendations(&snapshot),
        completeness: report,
        professional: row,
    }))
}
