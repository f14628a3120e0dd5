use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::introduction::{IntroductionRequestRow, IntroductionStatus};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntroductionRequest {
    pub professional_id: Uuid,
    pub job_role_id: Uuid,
    pub personalized_message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RespondRequest {
    pub message: Option<String>,
}

/// Creation response: enough for the sender's UI to show the new card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroductionSummary {
    pub id: Uuid,
    pub status: IntroductionStatus,
    pub sent_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroductionDetail {
    pub id: Uuid,
    pub job_role_id: Uuid,
    pub status: IntroductionStatus,
    pub personalized_message: String,
    pub professional_response: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub viewed_by_professional: bool,
    pub viewed_at: Option<DateTime<Utc>>,
}

impl IntroductionDetail {
    pub fn from_row(row: &IntroductionRequestRow, now: DateTime<Utc>) -> Self {
        IntroductionDetail {
            id: row.id,
            job_role_id: row.job_role_id,
            status: row.effective_status(now),
            personalized_message: row.personalized_message.clone(),
            professional_response: row.professional_response.clone(),
            sent_at: row.sent_at,
            response_date: row.response_date,
            expires_at: row.expires_at,
            viewed_by_professional: row.viewed_by_professional,
            viewed_at: row.viewed_at,
        }
    }
}

/// Accept response: the updated request plus the unlock flag telling
/// downstream systems they may now reveal private contact info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    #[serde(flatten)]
    pub request: IntroductionDetail,
    pub contact_details_unlocked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRoleCard {
    pub id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub is_confidential: bool,
}

/// Company identity as shown to the professional. For confidential roles the
/// name and location are replaced with fixed placeholders; industry and size
/// stay visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCard {
    pub company_name: String,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters_location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalCard {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_headline: Option<String>,
}

/// Item in the recipient's "received" listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedIntroduction {
    pub id: Uuid,
    pub status: IntroductionStatus,
    pub personalized_message: String,
    pub professional_response: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub viewed_by_professional: bool,
    pub job_role: JobRoleCard,
    pub company: CompanyCard,
}

/// Item in the sender's "sent" listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentIntroduction {
    pub id: Uuid,
    pub status: IntroductionStatus,
    pub personalized_message: String,
    pub professional_response: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub viewed_by_professional: bool,
    pub job_role: JobRoleCard,
    pub professional: ProfessionalCard,
}

/// Flat join row backing the received listing.
#[derive(Debug, Clone, FromRow)]
pub struct ReceivedListingRow {
    pub id: Uuid,
    pub status: String,
    pub personalized_message: String,
    pub professional_response: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub viewed_by_professional: bool,
    pub job_role_id: Uuid,
    pub job_role_title: String,
    pub job_role_location: Option<String>,
    pub is_confidential: bool,
    pub company_name: String,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters_location: Option<String>,
}

/// Flat join row backing the sent listing.
#[derive(Debug, Clone, FromRow)]
pub struct SentListingRow {
    pub id: Uuid,
    pub status: String,
    pub personalized_message: String,
    pub professional_response: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub viewed_by_professional: bool,
    pub job_role_id: Uuid,
    pub job_role_title: String,
    pub job_role_location: Option<String>,
    pub is_confidential: bool,
    pub professional_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_headline: Option<String>,
}
