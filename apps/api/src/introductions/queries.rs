use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::introductions::models::{
    CompanyCard, JobRoleCard, ProfessionalCard, ReceivedIntroduction, ReceivedListingRow,
    SentIntroduction, SentListingRow,
};
use crate::models::introduction::IntroductionStatus;
use crate::pagination::{Paginated, PageParams, Pagination};

pub const CONFIDENTIAL_COMPANY_NAME: &str = "Confidential Company";
pub const CONFIDENTIAL_LOCATION: &str = "Confidential";

/// Listing status filter. `all` (or absence) means no filter; names are
/// matched case-insensitively against the read-time effective status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(IntroductionStatus),
}

impl StatusFilter {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None => Ok(StatusFilter::All),
            Some(v) if v.eq_ignore_ascii_case("all") => Ok(StatusFilter::All),
            Some(v) => IntroductionStatus::parse(v)
                .map(StatusFilter::Only)
                .ok_or_else(|| AppError::Validation(format!("Unknown status filter '{v}'"))),
        }
    }

    /// The status name bound into the SQL filter, or NULL for no filter.
    fn as_bound(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status.as_str()),
        }
    }
}

/// Replaces the company identity with fixed placeholders for confidential
/// roles. Industry and size intentionally pass through, they are part of the
/// anonymized pitch.
pub fn redact_if_confidential(card: CompanyCard, is_confidential: bool) -> CompanyCard {
    if !is_confidential {
        return card;
    }
    CompanyCard {
        company_name: CONFIDENTIAL_COMPANY_NAME.to_string(),
        headquarters_location: Some(CONFIDENTIAL_LOCATION.to_string()),
        ..card
    }
}

// Effective-status filter shared by both listings. EXPIRED selects PENDING
// rows past their window; PENDING selects only still-actionable ones.
const STATUS_FILTER_SQL: &str = r#"
    (
        $2::text IS NULL
        OR ($2 = 'PENDING' AND r.status = 'PENDING' AND r.expires_at >= $3)
        OR ($2 = 'EXPIRED' AND r.status = 'PENDING' AND r.expires_at < $3)
        OR ($2 IN ('ACCEPTED', 'DECLINED') AND r.status = $2)
    )
"#;

/// The professional's inbox: introductions addressed to them, newest first.
pub async fn list_received(
    db: &PgPool,
    professional_id: Uuid,
    filter: StatusFilter,
    params: &PageParams,
) -> Result<Paginated<ReceivedIntroduction>, AppError> {
    let now = Utc::now();
    let bound = filter.as_bound();

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM introduction_requests r \
         WHERE r.professional_id = $1 AND {STATUS_FILTER_SQL}"
    ))
    .bind(professional_id)
    .bind(bound)
    .bind(now)
    .fetch_one(db)
    .await?;

    let rows: Vec<ReceivedListingRow> = sqlx::query_as(&format!(
        r#"
        SELECT r.id, r.status, r.personalized_message, r.professional_response,
               r.sent_at, r.response_date, r.expires_at, r.viewed_by_professional,
               jr.id AS job_role_id, jr.title AS job_role_title,
               jr.location AS job_role_location, jr.is_confidential,
               c.company_name, c.industry, c.company_size, c.headquarters_location
        FROM introduction_requests r
        JOIN job_roles jr ON jr.id = r.job_role_id
        JOIN companies c ON c.id = r.company_id
        WHERE r.professional_id = $1 AND {STATUS_FILTER_SQL}
        ORDER BY r.sent_at DESC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(professional_id)
    .bind(bound)
    .bind(now)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(db)
    .await?;

    let data = rows
        .into_iter()
        .map(|row| received_item(row, now))
        .collect();
    Ok(Paginated {
        data,
        pagination: Pagination::new(params, total),
    })
}

/// The HR partner's outbox: introductions they sent, newest first.
pub async fn list_sent(
    db: &PgPool,
    sender_id: Uuid,
    filter: StatusFilter,
    params: &PageParams,
) -> Result<Paginated<SentIntroduction>, AppError> {
    let now = Utc::now();
    let bound = filter.as_bound();

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM introduction_requests r \
         WHERE r.sender_id = $1 AND {STATUS_FILTER_SQL}"
    ))
    .bind(sender_id)
    .bind(bound)
    .bind(now)
    .fetch_one(db)
    .await?;

    let rows: Vec<SentListingRow> = sqlx::query_as(&format!(
        r#"
        SELECT r.id, r.status, r.personalized_message, r.professional_response,
               r.sent_at, r.response_date, r.expires_at, r.viewed_by_professional,
               jr.id AS job_role_id, jr.title AS job_role_title,
               jr.location AS job_role_location, jr.is_confidential,
               p.id AS professional_id, p.first_name, p.last_name, p.profile_headline
        FROM introduction_requests r
        JOIN job_roles jr ON jr.id = r.job_role_id
        JOIN professionals p ON p.id = r.professional_id
        WHERE r.sender_id = $1 AND {STATUS_FILTER_SQL}
        ORDER BY r.sent_at DESC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(sender_id)
    .bind(bound)
    .bind(now)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(db)
    .await?;

    let data = rows.into_iter().map(|row| sent_item(row, now)).collect();
    Ok(Paginated {
        data,
        pagination: Pagination::new(params, total),
    })
}

fn effective_status(stored: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> IntroductionStatus {
    match IntroductionStatus::parse(stored) {
        Some(IntroductionStatus::Pending) if now > expires_at => IntroductionStatus::Expired,
        Some(status) => status,
        None => IntroductionStatus::Expired,
    }
}

fn received_item(row: ReceivedListingRow, now: DateTime<Utc>) -> ReceivedIntroduction {
    let company = redact_if_confidential(
        CompanyCard {
            company_name: row.company_name,
            industry: row.industry,
            company_size: row.company_size,
            headquarters_location: row.headquarters_location,
        },
        row.is_confidential,
    );
    ReceivedIntroduction {
        id: row.id,
        status: effective_status(&row.status, row.expires_at, now),
        personalized_message: row.personalized_message,
        professional_response: row.professional_response,
        sent_at: row.sent_at,
        response_date: row.response_date,
        expires_at: row.expires_at,
        viewed_by_professional: row.viewed_by_professional,
        job_role: JobRoleCard {
            id: row.job_role_id,
            title: row.job_role_title,
            location: row.job_role_location,
            is_confidential: row.is_confidential,
        },
        company,
    }
}

fn sent_item(row: SentListingRow, now: DateTime<Utc>) -> SentIntroduction {
    SentIntroduction {
        id: row.id,
        status: effective_status(&row.status, row.expires_at, now),
        personalized_message: row.personalized_message,
        professional_response: row.professional_response,
        sent_at: row.sent_at,
        response_date: row.response_date,
        expires_at: row.expires_at,
        viewed_by_professional: row.viewed_by_professional,
        job_role: JobRoleCard {
            id: row.job_role_id,
            title: row.job_role_title,
            location: row.job_role_location,
            is_confidential: row.is_confidential,
        },
        professional: ProfessionalCard {
            id: row.professional_id,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_headline: row.profile_headline,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn card() -> CompanyCard {
        CompanyCard {
            company_name: "Acme Corp".to_string(),
            industry: Some("Fintech".to_string()),
            company_size: Some("51-200".to_string()),
            headquarters_location: Some("Lagos, Nigeria".to_string()),
        }
    }

    #[test]
    fn test_filter_parse_case_insensitive() {
        assert_eq!(StatusFilter::parse(None).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("ALL")).unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(Some("pending")).unwrap(),
            StatusFilter::Only(IntroductionStatus::Pending)
        );
        assert_eq!(
            StatusFilter::parse(Some("Declined")).unwrap(),
            StatusFilter::Only(IntroductionStatus::Declined)
        );
        assert!(StatusFilter::parse(Some("archived")).is_err());
    }

    #[test]
    fn test_confidential_redaction() {
        let redacted = redact_if_confidential(card(), true);
        assert_eq!(redacted.company_name, CONFIDENTIAL_COMPANY_NAME);
        assert_eq!(
            redacted.headquarters_location.as_deref(),
            Some(CONFIDENTIAL_LOCATION)
        );
        // Industry and size pass through unredacted
        assert_eq!(redacted.industry.as_deref(), Some("Fintech"));
        assert_eq!(redacted.company_size.as_deref(), Some("51-200"));
    }

    #[test]
    fn test_non_confidential_untouched() {
        let original = card();
        let untouched = redact_if_confidential(card(), false);
        assert_eq!(untouched, original);
    }

    #[test]
    fn test_effective_status_expiry() {
        let now = Utc::now();
        assert_eq!(
            effective_status("PENDING", now - Duration::hours(1), now),
            IntroductionStatus::Expired
        );
        assert_eq!(
            effective_status("PENDING", now + Duration::hours(1), now),
            IntroductionStatus::Pending
        );
        assert_eq!(
            effective_status("ACCEPTED", now - Duration::hours(1), now),
            IntroductionStatus::Accepted
        );
    }
}
