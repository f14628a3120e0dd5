use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity-verification tiers, stored as TEXT in the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Basic,
    Full,
    Premium,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "UNVERIFIED",
            VerificationStatus::Basic => "BASIC",
            VerificationStatus::Full => "FULL",
            VerificationStatus::Premium => "PREMIUM",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UNVERIFIED" => Some(VerificationStatus::Unverified),
            "BASIC" => Some(VerificationStatus::Basic),
            "FULL" => Some(VerificationStatus::Full),
            "PREMIUM" => Some(VerificationStatus::Premium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_headline: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub current_industry: Option<String>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub years_of_experience: i32,
    pub profile_summary: Option<String>,
    pub resume_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub verification_status: String,
    pub phone_verified: bool,
    pub open_to_opportunities: bool,
    /// Privacy firewall: company ids this professional has hidden from.
    pub blocked_company_ids: Vec<Uuid>,
    pub profile_completeness: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfessionalRow {
    pub fn has_blocked(&self, company_id: Uuid) -> bool {
        self.blocked_company_ids.contains(&company_id)
    }
}

/// Child-collection counts used by the completeness scorer.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct RelationCounts {
    pub skills: i64,
    pub work_history: i64,
    pub education: i64,
    pub certifications: i64,
}
