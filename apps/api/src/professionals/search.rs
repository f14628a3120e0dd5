use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::{ActorRole, AuthenticatedActor};
use crate::errors::AppError;
use crate::models::professional::VerificationStatus;
use crate::pagination::{Paginated, PageParams, Pagination};
use crate::state::AppState;

/// Closed, explicitly-typed search filters: one optional field per dimension,
/// never an open map.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentSearchFilters {
    /// Free-text match against name and headline.
    pub query: Option<String>,
    /// Matches city or state.
    pub location: Option<String>,
    pub industry: Option<String>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    /// Comma-separated skill names; a profile must carry at least one.
    pub skills: Option<String>,
    pub verification_status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TalentSearchFilters {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TalentSearchResult {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_headline: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub current_title: Option<String>,
    pub current_industry: Option<String>,
    pub years_of_experience: i32,
    pub verification_status: String,
    pub profile_completeness: i32,
}

/// Splits the comma-separated skills parameter into lowercase names.
pub fn parse_skills(raw: &Option<String>) -> Option<Vec<String>> {
    let skills: Vec<String> = raw
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        None
    } else {
        Some(skills)
    }
}

pub fn validate_filters(filters: &TalentSearchFilters) -> Result<Option<String>, AppError> {
    if let (Some(min), Some(max)) = (filters.min_experience, filters.max_experience) {
        if min > max {
            return Err(AppError::Validation(
                "minExperience must not exceed maxExperience".to_string(),
            ));
        }
    }
    let verification = match filters.verification_status.as_deref() {
        None => None,
        Some(v) => Some(
            VerificationStatus::parse(v)
                .ok_or_else(|| {
                    AppError::Validation(format!("Unknown verification status '{v}'"))
                })?
                .as_str()
                .to_string(),
        ),
    };
    Ok(verification)
}

fn like_pattern(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| format!("%{v}%"))
}

/// GET /api/v1/professionals/search
///
/// HR partner only. Professionals who are closed to opportunities, or who
/// have firewalled off the caller's company, never appear in results.
pub async fn handle_search(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    Query(filters): Query<TalentSearchFilters>,
) -> Result<Json<Paginated<TalentSearchResult>>, AppError> {
    actor.require_role(ActorRole::HrPartner)?;
    let company_id: Option<Uuid> =
        sqlx::query_scalar("SELECT company_id FROM hr_partners WHERE id = $1")
            .bind(actor.id)
            .fetch_optional(&state.db)
            .await?;
    let company_id = company_id.ok_or_else(|| {
        AppError::Forbidden("No HR partner profile found for this account".to_string())
    })?;

    let verification = validate_filters(&filters)?;
    let skills = parse_skills(&filters.skills);
    let query_like = like_pattern(&filters.query);
    let location_like = like_pattern(&filters.location);
    let industry_like = like_pattern(&filters.industry);
    let params = filters.page_params();

    const FILTER_SQL: &str = r#"
        p.open_to_opportunities = TRUE
        AND $1 <> ALL(p.blocked_company_ids)
        AND ($2::text IS NULL OR p.first_name ILIKE $2
             OR p.last_name ILIKE $2 OR p.profile_headline ILIKE $2)
        AND ($3::text IS NULL OR p.location_city ILIKE $3 OR p.location_state ILIKE $3)
        AND ($4::text IS NULL OR p.current_industry ILIKE $4)
        AND ($5::int IS NULL OR p.years_of_experience >= $5)
        AND ($6::int IS NULL OR p.years_of_experience <= $6)
        AND ($7::text IS NULL OR p.verification_status = $7)
        AND ($8::text[] IS NULL OR EXISTS (
            SELECT 1 FROM professional_skills s
            WHERE s.professional_id = p.id AND LOWER(s.name) = ANY($8)
        ))
    "#;

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM professionals p WHERE {FILTER_SQL}"
    ))
    .bind(company_id)
    .bind(&query_like)
    .bind(&location_like)
    .bind(&industry_like)
    .bind(filters.min_experience)
    .bind(filters.max_experience)
    .bind(&verification)
    .bind(&skills)
    .fetch_one(&state.db)
    .await?;

    let data: Vec<TalentSearchResult> = sqlx::query_as(&format!(
        r#"
        SELECT p.id, p.first_name, p.last_name, p.profile_headline,
               p.location_city, p.location_state, p.current_title,
               p.current_industry, p.years_of_experience,
               p.verification_status, p.profile_completeness
        FROM professionals p
        WHERE {FILTER_SQL}
        ORDER BY p.profile_completeness DESC, p.updated_at DESC
        LIMIT $9 OFFSET $10
        "#
    ))
    .bind(company_id)
    .bind(&query_like)
    .bind(&location_like)
    .bind(&industry_like)
    .bind(filters.min_experience)
    .bind(filters.max_experience)
    .bind(&verification)
    .bind(&skills)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Paginated {
        data,
        pagination: Pagination::new(&params, total),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skills() {
        assert_eq!(
            parse_skills(&Some("Rust, SQL ,, distributed systems".to_string())),
            Some(vec![
                "rust".to_string(),
                "sql".to_string(),
                "distributed systems".to_string()
            ])
        );
        assert_eq!(parse_skills(&Some("  , ".to_string())), None);
        assert_eq!(parse_skills(&None), None);
    }

    #[test]
    fn test_experience_range_validated() {
        let filters = TalentSearchFilters {
            min_experience: Some(10),
            max_experience: Some(5),
            ..TalentSearchFilters::default()
        };
        assert!(matches!(
            validate_filters(&filters),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_verification_status_normalized() {
        let filters = TalentSearchFilters {
            verification_status: Some("premium".to_string()),
            ..TalentSearchFilters::default()
        };
        assert_eq!(validate_filters(&filters).unwrap().as_deref(), Some("PREMIUM"));

        let bad = TalentSearchFilters {
            verification_status: Some("gold".to_string()),
            ..TalentSearchFilters::default()
        };
        assert!(validate_filters(&bad).is_err());
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(
            like_pattern(&Some(" Ada ".to_string())),
            Some("%Ada%".to_string())
        );
        assert_eq!(like_pattern(&Some("   ".to_string())), None);
    }
}
