#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Introduction request states, stored as TEXT.
///
/// EXPIRED is never written by a background sweep: a request past its expiry
/// window stays PENDING at rest and reads as EXPIRED at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntroductionStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl IntroductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntroductionStatus::Pending => "PENDING",
            IntroductionStatus::Accepted => "ACCEPTED",
            IntroductionStatus::Declined => "DECLINED",
            IntroductionStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(IntroductionStatus::Pending),
            "ACCEPTED" => Some(IntroductionStatus::Accepted),
            "DECLINED" => Some(IntroductionStatus::Declined),
            "EXPIRED" => Some(IntroductionStatus::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, IntroductionStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IntroductionRequestRow {
    pub id: Uuid,
    pub job_role_id: Uuid,
    pub company_id: Uuid,
    pub sender_id: Uuid,
    pub professional_id: Uuid,
    pub status: String,
    pub personalized_message: String,
    pub professional_response: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub viewed_by_professional: bool,
    pub viewed_at: Option<DateTime<Utc>>,
}

impl IntroductionRequestRow {
    /// Read-time status: a PENDING row past its expiry window is EXPIRED.
    pub fn effective_status(&self, now: DateTime<Utc>) -> IntroductionStatus {
        match IntroductionStatus::parse(&self.status) {
            Some(IntroductionStatus::Pending) if now > self.expires_at => {
                IntroductionStatus::Expired
            }
            Some(status) => status,
            None => IntroductionStatus::Expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(status: &str, expires_in: Duration) -> IntroductionRequestRow {
        let now = Utc::now();
        IntroductionRequestRow {
            id: Uuid::new_v4(),
            job_role_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            professional_id: Uuid::new_v4(),
            status: status.to_string(),
            personalized_message: "We think you would be a great fit".to_string(),
            professional_response: None,
            sent_at: now,
            response_date: None,
            expires_at: now + expires_in,
            viewed_by_professional: false,
            viewed_at: None,
        }
    }

    #[test]
    fn test_pending_within_window() {
        let r = row("PENDING", Duration::days(3));
        assert_eq!(r.effective_status(Utc::now()), IntroductionStatus::Pending);
    }

    #[test]
    fn test_pending_past_window_reads_expired() {
        let r = row("PENDING", Duration::days(-1));
        assert_eq!(r.effective_status(Utc::now()), IntroductionStatus::Expired);
    }

    #[test]
    fn test_terminal_states_unaffected_by_expiry() {
        let r = row("ACCEPTED", Duration::days(-1));
        assert_eq!(r.effective_status(Utc::now()), IntroductionStatus::Accepted);
        let r = row("DECLINED", Duration::days(-1));
        assert_eq!(r.effective_status(Utc::now()), IntroductionStatus::Declined);
    }

    #[test]
    fn test_status_roundtrip() {
        for s in ["PENDING", "ACCEPTED", "DECLINED", "EXPIRED"] {
            assert_eq!(IntroductionStatus::parse(s).unwrap().as_str(), s);
        }
        assert_eq!(
            IntroductionStatus::parse("pending"),
            Some(IntroductionStatus::Pending)
        );
        assert_eq!(IntroductionStatus::parse("bogus"), None);
    }
}
