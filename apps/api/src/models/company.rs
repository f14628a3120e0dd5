#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyRow {
    pub id: Uuid,
    pub company_name: String,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters_location: Option<String>,
    /// Consumable quota: one credit per introduction request created.
    pub introduction_credits: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HrPartnerRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub display_name: String,
    pub can_send_introductions: bool,
    pub created_at: DateTime<Utc>,
}

/// Job role posting states, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobRoleStatus {
    Active,
    Paused,
    Closed,
}

impl JobRoleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobRoleStatus::Active => "ACTIVE",
            JobRoleStatus::Paused => "PAUSED",
            JobRoleStatus::Closed => "CLOSED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRoleRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub status: String,
    /// Confidential roles hide the sponsoring company's identity from the
    /// recipient until acceptance.
    pub is_confidential: bool,
    pub created_at: DateTime<Utc>,
}

impl JobRoleRow {
    pub fn is_active(&self) -> bool {
        self.status == JobRoleStatus::Active.as_str()
    }
}
