use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::{ActorRole, AuthenticatedActor, PERM_SEND_INTRODUCTIONS};
use crate::errors::{unique_violation, AppError};
use crate::introductions::models::{
    CreateIntroductionRequest, IntroductionDetail, IntroductionSummary,
};
use crate::models::company::{HrPartnerRow, JobRoleRow};
use crate::models::introduction::{IntroductionRequestRow, IntroductionStatus};
use crate::models::professional::ProfessionalRow;
use crate::notify::{self, NewNotification, Notifier};

/// Fixed response window for an introduction request.
pub const EXPIRY_WINDOW_DAYS: i64 = 7;

pub const MAX_MESSAGE_CHARS: usize = 2000;

const DUPLICATE_PENDING_MSG: &str =
    "An introduction request for this role is already pending with this professional";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

impl Decision {
    pub fn target_status(&self) -> IntroductionStatus {
        match self {
            Decision::Accept => IntroductionStatus::Accepted,
            Decision::Decline => IntroductionStatus::Declined,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Decision::Accept => "accepted",
            Decision::Decline => "declined",
        }
    }
}

/// The personalized message is required and length-bounded.
pub fn validate_message(message: &str) -> Result<(), AppError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "personalizedMessage is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "personalizedMessage must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(())
}

/// Recipient-side preconditions: the professional must be open to
/// opportunities and must not have firewalled off the sender's company.
pub fn check_recipient(
    professional: &ProfessionalRow,
    sender_company_id: Uuid,
) -> Result<(), AppError> {
    if !professional.open_to_opportunities {
        return Err(AppError::Forbidden(
            "This professional is not open to opportunities".to_string(),
        ));
    }
    if professional.has_blocked(sender_company_id) {
        return Err(AppError::Forbidden(
            "This professional is not reachable by your company".to_string(),
        ));
    }
    Ok(())
}

/// Role-side preconditions: the role must belong to the sender's company and
/// be actively hiring.
pub fn check_job_role(job_role: &JobRoleRow, sender_company_id: Uuid) -> Result<(), AppError> {
    if job_role.company_id != sender_company_id {
        return Err(AppError::Forbidden(
            "This job role belongs to a different company".to_string(),
        ));
    }
    if !job_role.is_active() {
        return Err(AppError::UnprocessableEntity(
            "This job role is not active".to_string(),
        ));
    }
    Ok(())
}

/// A request past its expiry window can no longer be acted on. The error is
/// deliberately distinct from NotFound; the status stays PENDING at rest.
pub fn ensure_actionable(
    request: &IntroductionRequestRow,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if now > request.expires_at {
        return Err(AppError::Expired(format!(
            "This introduction request expired on {}",
            request.expires_at.format("%Y-%m-%d")
        )));
    }
    Ok(())
}

/// Resolves the acting HR partner and enforces the send capability.
async fn load_sender(
    db: &PgPool,
    actor: &AuthenticatedActor,
) -> Result<HrPartnerRow, AppError> {
    actor.require_role(ActorRole::HrPartner)?;
    let partner: Option<HrPartnerRow> = sqlx::query_as("SELECT * FROM hr_partners WHERE id = $1")
        .bind(actor.id)
        .fetch_optional(db)
        .await?;
    let partner = partner.ok_or_else(|| {
        AppError::Forbidden("No HR partner profile found for this account".to_string())
    })?;
    if !actor.has_permission(PERM_SEND_INTRODUCTIONS) || !partner.can_send_introductions {
        return Err(AppError::Forbidden(
            "You do not have permission to send introduction requests".to_string(),
        ));
    }
    Ok(partner)
}

/// Creates an introduction request on behalf of an HR partner.
///
/// All preconditions are checked before any mutation. The credit decrement
/// and the PENDING insert commit in one transaction; the partial unique index
/// on pending (job_role_id, professional_id) closes the double-submit race
/// the read-then-check alone would leave open. Notification and audit writes
/// happen after commit and never fail the request.
pub async fn create_introduction(
    db: &PgPool,
    notifier: &dyn Notifier,
    actor: &AuthenticatedActor,
    req: &CreateIntroductionRequest,
) -> Result<IntroductionSummary, AppError> {
    validate_message(&req.personalized_message)?;

    let partner = load_sender(db, actor).await?;

    let professional: Option<ProfessionalRow> =
        sqlx::query_as("SELECT * FROM professionals WHERE id = $1")
            .bind(req.professional_id)
            .fetch_optional(db)
            .await?;
    let professional =
        professional.ok_or_else(|| AppError::NotFound("Professional not found".to_string()))?;
    check_recipient(&professional, partner.company_id)?;

    let job_role: Option<JobRoleRow> = sqlx::query_as("SELECT * FROM job_roles WHERE id = $1")
        .bind(req.job_role_id)
        .fetch_optional(db)
        .await?;
    let job_role = job_role.ok_or_else(|| AppError::NotFound("Job role not found".to_string()))?;
    check_job_role(&job_role, partner.company_id)?;

    let pending_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM introduction_requests
            WHERE job_role_id = $1 AND professional_id = $2 AND status = 'PENDING'
        )
        "#,
    )
    .bind(req.job_role_id)
    .bind(req.professional_id)
    .fetch_one(db)
    .await?;
    if pending_exists {
        return Err(AppError::Conflict(DUPLICATE_PENDING_MSG.to_string()));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let expires_at = now + Duration::days(EXPIRY_WINDOW_DAYS);

    // Atomic: credit decrement + PENDING insert commit or abort together.
    let mut tx = db.begin().await?;

    let debited = sqlx::query(
        "UPDATE companies SET introduction_credits = introduction_credits - 1 \
         WHERE id = $1 AND introduction_credits > 0",
    )
    .bind(partner.company_id)
    .execute(&mut *tx)
    .await?;
    if debited.rows_affected() == 0 {
        return Err(AppError::QuotaExceeded(
            "Your company has no introduction credits remaining".to_string(),
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO introduction_requests
            (id, job_role_id, company_id, sender_id, professional_id, status,
             personalized_message, sent_at, expires_at)
        VALUES ($1, $2, $3, $4, $5, 'PENDING', $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(req.job_role_id)
    .bind(partner.company_id)
    .bind(actor.id)
    .bind(req.professional_id)
    .bind(req.personalized_message.trim())
    .bind(now)
    .bind(expires_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| unique_violation(e, DUPLICATE_PENDING_MSG))?;

    tx.commit().await?;

    info!(
        "Created introduction request {id} for professional {} (role: {})",
        req.professional_id, job_role.title
    );

    notify::dispatch(
        notifier,
        NewNotification {
            recipient_id: req.professional_id,
            kind: "introduction_received",
            title: "New introduction request".to_string(),
            message: format!(
                "You have a new introduction request for the {} role",
                job_role.title
            ),
        },
    )
    .await;
    notify::record_activity(
        db,
        actor.id,
        "introduction.requested",
        "introduction_request",
        id,
        json!({
            "jobRoleId": req.job_role_id,
            "professionalId": req.professional_id,
        }),
    )
    .await;

    Ok(IntroductionSummary {
        id,
        status: IntroductionStatus::Pending,
        sent_at: now,
        expires_at,
    })
}

/// Accepts or declines a pending introduction request on behalf of its
/// recipient.
///
/// The lookup filters on status = PENDING, so a request that was already
/// resolved (or belongs to someone else) reads as NotFound — terminal states
/// are never overwritten. An expired request is rejected without mutation.
pub async fn respond_to_introduction(
    db: &PgPool,
    notifier: &dyn Notifier,
    actor: &AuthenticatedActor,
    request_id: Uuid,
    decision: Decision,
    message: Option<String>,
) -> Result<IntroductionDetail, AppError> {
    actor.require_role(ActorRole::Professional)?;

    let request: Option<IntroductionRequestRow> = sqlx::query_as(
        "SELECT * FROM introduction_requests \
         WHERE id = $1 AND professional_id = $2 AND status = 'PENDING'",
    )
    .bind(request_id)
    .bind(actor.id)
    .fetch_optional(db)
    .await?;
    let mut request = request.ok_or_else(|| {
        AppError::NotFound("Introduction request not found or already resolved".to_string())
    })?;

    let now = Utc::now();
    ensure_actionable(&request, now)?;

    let response = message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let status = decision.target_status();

    // Single guarded UPDATE: the status = 'PENDING' predicate makes the
    // transition atomic and loses gracefully to a concurrent respond.
    let updated = sqlx::query(
        r#"
        UPDATE introduction_requests
        SET status = $1,
            professional_response = $2,
            response_date = $3,
            viewed_by_professional = TRUE,
            viewed_at = COALESCE(viewed_at, $3)
        WHERE id = $4 AND status = 'PENDING'
        "#,
    )
    .bind(status.as_str())
    .bind(&response)
    .bind(now)
    .bind(request_id)
    .execute(db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::Conflict(
            "This introduction request was already resolved".to_string(),
        ));
    }

    info!(
        "Introduction request {request_id} {} by professional {}",
        decision.verb(),
        actor.id
    );

    let context: Option<(String, String, String)> = sqlx::query_as(
        "SELECT jr.title, p.first_name, p.last_name \
         FROM job_roles jr, professionals p \
         WHERE jr.id = $1 AND p.id = $2",
    )
    .bind(request.job_role_id)
    .bind(actor.id)
    .fetch_optional(db)
    .await?;
    if let Some((title, first_name, last_name)) = context {
        notify::dispatch(
            notifier,
            NewNotification {
                recipient_id: request.sender_id,
                kind: "introduction_response",
                title: format!("Introduction request {}", decision.verb()),
                message: format!(
                    "{first_name} {last_name} {} your introduction request for {title}",
                    decision.verb()
                ),
            },
        )
        .await;
    }
    notify::record_activity(
        db,
        actor.id,
        match decision {
            Decision::Accept => "introduction.accepted",
            Decision::Decline => "introduction.declined",
        },
        "introduction_request",
        request_id,
        json!({ "jobRoleId": request.job_role_id }),
    )
    .await;

    request.status = status.as_str().to_string();
    request.professional_response = response;
    request.response_date = Some(now);
    request.viewed_by_professional = true;
    request.viewed_at = request.viewed_at.or(Some(now));
    Ok(IntroductionDetail::from_row(&request, now))
}

/// Marks a request as seen by its recipient. Monotonic: repeat calls are
/// no-ops, viewed_at is only ever set once. Does not transition status.
pub async fn mark_viewed(
    db: &PgPool,
    actor: &AuthenticatedActor,
    request_id: Uuid,
) -> Result<(), AppError> {
    actor.require_role(ActorRole::Professional)?;

    let updated = sqlx::query(
        r#"
        UPDATE introduction_requests
        SET viewed_by_professional = TRUE,
            viewed_at = COALESCE(viewed_at, $1)
        WHERE id = $2 AND professional_id = $3
        "#,
    )
    .bind(Utc::now())
    .bind(request_id)
    .bind(actor.id)
    .execute(db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Introduction request not found".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn professional(open: bool, blocked: Vec<Uuid>) -> ProfessionalRow {
        let now = Utc::now();
        ProfessionalRow {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            profile_headline: None,
            location_city: None,
            location_state: None,
            current_industry: None,
            current_title: None,
            current_company: None,
            years_of_experience: 6,
            profile_summary: None,
            resume_url: None,
            profile_photo_url: None,
            linkedin_url: None,
            portfolio_url: None,
            verification_status: "UNVERIFIED".to_string(),
            phone_verified: false,
            open_to_opportunities: open,
            blocked_company_ids: blocked,
            profile_completeness: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn job_role(company_id: Uuid, status: &str) -> JobRoleRow {
        JobRoleRow {
            id: Uuid::new_v4(),
            company_id,
            title: "Senior Engineer".to_string(),
            location: None,
            status: status.to_string(),
            is_confidential: false,
            created_at: Utc::now(),
        }
    }

    fn pending_request(expires_in: Duration) -> IntroductionRequestRow {
        let now = Utc::now();
        IntroductionRequestRow {
            id: Uuid::new_v4(),
            job_role_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            professional_id: Uuid::new_v4(),
            status: "PENDING".to_string(),
            personalized_message: "Hello".to_string(),
            professional_response: None,
            sent_at: now,
            response_date: None,
            expires_at: now + expires_in,
            viewed_by_professional: false,
            viewed_at: None,
        }
    }

    #[test]
    fn test_message_required() {
        assert!(matches!(
            validate_message("   "),
            Err(AppError::Validation(_))
        ));
        assert!(validate_message("We'd love to talk to you").is_ok());
    }

    #[test]
    fn test_message_length_bound() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            validate_message(&long),
            Err(AppError::Validation(_))
        ));
        let max = "x".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message(&max).is_ok());
    }

    #[test]
    fn test_recipient_not_open() {
        let p = professional(false, vec![]);
        assert!(matches!(
            check_recipient(&p, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_recipient_privacy_firewall() {
        let company = Uuid::new_v4();
        let p = professional(true, vec![company]);
        assert!(matches!(
            check_recipient(&p, company),
            Err(AppError::Forbidden(_))
        ));
        // Other companies still pass
        assert!(check_recipient(&p, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_job_role_wrong_company() {
        let role = job_role(Uuid::new_v4(), "ACTIVE");
        assert!(matches!(
            check_job_role(&role, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_job_role_not_active() {
        let company = Uuid::new_v4();
        let role = job_role(company, "CLOSED");
        assert!(matches!(
            check_job_role(&role, company),
            Err(AppError::UnprocessableEntity(_))
        ));
        let active = job_role(company, "ACTIVE");
        assert!(check_job_role(&active, company).is_ok());
    }

    #[test]
    fn test_expired_request_rejected() {
        let request = pending_request(Duration::hours(-1));
        let err = ensure_actionable(&request, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));
        // The row itself is untouched: still PENDING, no response recorded.
        assert_eq!(request.status, "PENDING");
        assert!(request.professional_response.is_none());
    }

    #[test]
    fn test_unexpired_request_actionable() {
        let request = pending_request(Duration::days(3));
        assert!(ensure_actionable(&request, Utc::now()).is_ok());
    }

    #[test]
    fn test_decision_targets() {
        assert_eq!(
            Decision::Accept.target_status(),
            IntroductionStatus::Accepted
        );
        assert_eq!(
            Decision::Decline.target_status(),
            IntroductionStatus::Declined
        );
        assert!(Decision::Accept.target_status().is_terminal());
    }
}
