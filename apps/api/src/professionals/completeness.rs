use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::professional::{ProfessionalRow, RelationCounts, VerificationStatus};

pub const RECOMMENDATION_LIMIT: usize = 5;

const MIN_SUMMARY_CHARS: usize = 50;
const MIN_EXPERIENCE_YEARS: i32 = 5;
const MIN_SKILLS: i64 = 3;

/// Input aggregate for the scorer: profile scalars plus collection counts.
/// The scorer itself does no I/O and is deterministic over this snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
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
    pub verification_status: VerificationStatus,
    pub phone_verified: bool,
    pub skill_count: i64,
    pub work_history_count: i64,
    pub education_count: i64,
    pub certification_count: i64,
}

impl ProfileSnapshot {
    pub fn new(row: &ProfessionalRow, counts: &RelationCounts) -> Self {
        ProfileSnapshot {
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            profile_headline: row.profile_headline.clone(),
            location_city: row.location_city.clone(),
            location_state: row.location_state.clone(),
            current_industry: row.current_industry.clone(),
            current_title: row.current_title.clone(),
            current_company: row.current_company.clone(),
            years_of_experience: row.years_of_experience,
            profile_summary: row.profile_summary.clone(),
            resume_url: row.resume_url.clone(),
            profile_photo_url: row.profile_photo_url.clone(),
            linkedin_url: row.linkedin_url.clone(),
            portfolio_url: row.portfolio_url.clone(),
            verification_status: VerificationStatus::parse(&row.verification_status)
                .unwrap_or_default(),
            phone_verified: row.phone_verified,
            skill_count: counts.skills,
            work_history_count: counts.work_history,
            education_count: counts.education,
            certification_count: counts.certifications,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub score: i32,
    pub weight: u32,
    pub completed: usize,
    pub total: usize,
    pub items: BTreeMap<&'static str, bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub basic_info: CategoryBreakdown,
    pub professional_details: CategoryBreakdown,
    pub verification: CategoryBreakdown,
    pub documents: CategoryBreakdown,
    pub network_and_skills: CategoryBreakdown,
    pub additional: CategoryBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    pub overall: i32,
    pub categories: CategoryScores,
}

struct Item {
    key: &'static str,
    passed: bool,
    suggestion: &'static str,
}

struct Category {
    weight: u32,
    items: Vec<Item>,
}

fn filled(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

fn item(key: &'static str, passed: bool, suggestion: &'static str) -> Item {
    Item {
        key,
        passed,
        suggestion,
    }
}

/// The six categories in their fixed evaluation order. Weights sum to 100.
fn evaluate(p: &ProfileSnapshot) -> [Category; 6] {
    let basic_info = Category {
        weight: 20,
        items: vec![
            item("firstName", !p.first_name.trim().is_empty(), "Add your first name"),
            item("lastName", !p.last_name.trim().is_empty(), "Add your last name"),
            item(
                "profileHeadline",
                filled(&p.profile_headline),
                "Add a profile headline",
            ),
            item("locationCity", filled(&p.location_city), "Add your city"),
            item("locationState", filled(&p.location_state), "Add your state"),
            item(
                "currentIndustry",
                filled(&p.current_industry),
                "Select your current industry",
            ),
        ],
    };

    let has_summary = p
        .profile_summary
        .as_deref()
        .map(|s| s.trim().chars().count() >= MIN_SUMMARY_CHARS)
        .unwrap_or(false);
    let professional_details = Category {
        weight: 25,
        items: vec![
            item(
                "currentTitle",
                filled(&p.current_title),
                "Add your current job title",
            ),
            item(
                "currentCompany",
                filled(&p.current_company),
                "Add your current company",
            ),
            item(
                "yearsOfExperience",
                p.years_of_experience >= MIN_EXPERIENCE_YEARS,
                "Profiles with 5+ years of experience rank higher in search",
            ),
            item(
                "profileSummary",
                has_summary,
                "Write a profile summary of at least 50 characters",
            ),
        ],
    };

    let identity_verified = matches!(
        p.verification_status,
        VerificationStatus::Full | VerificationStatus::Premium
    );
    let verification = Category {
        weight: 20,
        items: vec![
            item(
                "identityVerified",
                identity_verified,
                "Complete identity verification to unlock the verified badge",
            ),
            item("phoneVerified", p.phone_verified, "Verify your phone number"),
        ],
    };

    let documents = Category {
        weight: 15,
        items: vec![
            item("resumeUrl", filled(&p.resume_url), "Upload your resume"),
            item(
                "profilePhotoUrl",
                filled(&p.profile_photo_url),
                "Upload a profile photo",
            ),
        ],
    };

    let network_and_skills = Category {
        weight: 10,
        items: vec![
            item(
                "linkedinUrl",
                filled(&p.linkedin_url),
                "Link your LinkedIn profile",
            ),
            item("skills", p.skill_count >= MIN_SKILLS, "List at least 3 skills"),
            item(
                "workHistory",
                p.work_history_count >= 1,
                "Add at least one work history entry",
            ),
        ],
    };

    let additional = Category {
        weight: 10,
        items: vec![
            item(
                "portfolioUrl",
                filled(&p.portfolio_url),
                "Add a portfolio link",
            ),
            item("education", p.education_count >= 1, "Add your education"),
            item(
                "certifications",
                p.certification_count >= 1,
                "Add a certification",
            ),
        ],
    };

    [
        basic_info,
        professional_details,
        verification,
        documents,
        network_and_skills,
        additional,
    ]
}

fn breakdown(category: Category) -> CategoryBreakdown {
    let total = category.items.len();
    let completed = category.items.iter().filter(|i| i.passed).count();
    // Rounded per category, before summation. Summing the unrounded values
    // can land on a different integer in edge cases.
    let score = (category.weight as f64 * completed as f64 / total as f64).round() as i32;
    CategoryBreakdown {
        score,
        weight: category.weight,
        completed,
        total,
        items: category.items.iter().map(|i| (i.key, i.passed)).collect(),
    }
}

/// Weighted 0-100 completeness score with per-category breakdowns.
pub fn compute_completeness(p: &ProfileSnapshot) -> CompletenessReport {
    let [basic_info, professional_details, verification, documents, network_and_skills, additional] =
        evaluate(p).map(breakdown);

    let overall = basic_info.score
        + professional_details.score
        + verification.score
        + documents.score
        + network_and_skills.score
        + additional.score;

    CompletenessReport {
        overall,
        categories: CategoryScores {
            basic_info,
            professional_details,
            verification,
            documents,
            network_and_skills,
            additional,
        },
    }
}

/// Up to five suggestions, drawn from failing items in fixed category order.
/// Later categories go unaddressed once the cap is hit.
pub fn recommendations(p: &ProfileSnapshot) -> Vec<String> {
    evaluate(p)
        .iter()
        .flat_map(|c| c.items.iter())
        .filter(|i| !i.passed)
        .map(|i| i.suggestion.to_string())
        .take(RECOMMENDATION_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> ProfileSnapshot {
        ProfileSnapshot {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            profile_headline: Some("CTO".to_string()),
            location_city: Some("Lagos".to_string()),
            location_state: Some("Lagos".to_string()),
            current_industry: Some("Tech".to_string()),
            current_title: Some("CTO".to_string()),
            current_company: Some("Analytical Engines Ltd".to_string()),
            years_of_experience: 6,
            profile_summary: Some("x".repeat(60)),
            resume_url: Some("https://cdn.example.com/cv.pdf".to_string()),
            profile_photo_url: Some("https://cdn.example.com/photo.jpg".to_string()),
            linkedin_url: Some("https://linkedin.com/in/ada".to_string()),
            portfolio_url: Some("https://ada.dev".to_string()),
            verification_status: VerificationStatus::Full,
            phone_verified: true,
            skill_count: 5,
            work_history_count: 2,
            education_count: 1,
            certification_count: 1,
        }
    }

    #[test]
    fn test_full_profile_scores_100() {
        let report = compute_completeness(&full_profile());
        assert_eq!(report.overall, 100);
        assert_eq!(report.categories.basic_info.score, 20);
        assert_eq!(report.categories.professional_details.score, 25);
        assert_eq!(report.categories.verification.score, 20);
        assert_eq!(report.categories.documents.score, 15);
        assert_eq!(report.categories.network_and_skills.score, 10);
        assert_eq!(report.categories.additional.score, 10);
    }

    #[test]
    fn test_empty_profile_scores_0() {
        let report = compute_completeness(&ProfileSnapshot::default());
        assert_eq!(report.overall, 0);
    }

    #[test]
    fn test_required_categories_only_scores_65() {
        // Basic, professional and verification complete; documents, network
        // and additional all empty: 20 + 25 + 20.
        let p = ProfileSnapshot {
            resume_url: None,
            profile_photo_url: None,
            linkedin_url: None,
            portfolio_url: None,
            skill_count: 0,
            work_history_count: 0,
            education_count: 0,
            certification_count: 0,
            ..full_profile()
        };
        let report = compute_completeness(&p);
        assert_eq!(report.overall, 65);
    }

    #[test]
    fn test_reference_scenario_scores_45() {
        let p = ProfileSnapshot {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            profile_headline: Some("CTO".to_string()),
            location_city: Some("Lagos".to_string()),
            location_state: Some("Lagos".to_string()),
            current_industry: Some("Tech".to_string()),
            current_title: Some("CTO".to_string()),
            current_company: Some("Analytical Engines Ltd".to_string()),
            years_of_experience: 6,
            profile_summary: Some("y".repeat(60)),
            verification_status: VerificationStatus::Unverified,
            phone_verified: false,
            skill_count: 2,
            ..ProfileSnapshot::default()
        };
        let report = compute_completeness(&p);
        assert_eq!(report.categories.basic_info.score, 20);
        assert_eq!(report.categories.professional_details.score, 25);
        assert_eq!(report.categories.verification.score, 0);
        assert_eq!(report.categories.documents.score, 0);
        assert_eq!(report.categories.network_and_skills.score, 0);
        assert_eq!(report.categories.additional.score, 0);
        assert_eq!(report.overall, 45);
    }

    #[test]
    fn test_rounding_happens_per_category() {
        // One of six basic items (20 * 1/6 = 3.33 -> 3), one of three network
        // items (10 * 1/3 -> 3), one of three additional items (-> 3).
        // Rounded-then-summed gives 9; rounding the unrounded sum would give 10.
        let p = ProfileSnapshot {
            first_name: "Ada".to_string(),
            linkedin_url: Some("https://linkedin.com/in/ada".to_string()),
            portfolio_url: Some("https://ada.dev".to_string()),
            ..ProfileSnapshot::default()
        };
        let report = compute_completeness(&p);
        assert_eq!(report.categories.basic_info.score, 3);
        assert_eq!(report.categories.network_and_skills.score, 3);
        assert_eq!(report.categories.additional.score, 3);
        assert_eq!(report.overall, 9);
    }

    #[test]
    fn test_score_monotonic_in_each_item() {
        // Flipping any single failing item to passing never lowers the score.
        let base = ProfileSnapshot {
            first_name: "Ada".to_string(),
            years_of_experience: 2,
            skill_count: 1,
            ..ProfileSnapshot::default()
        };
        let before = compute_completeness(&base).overall;

        let flips: Vec<ProfileSnapshot> = vec![
            ProfileSnapshot {
                last_name: "Lovelace".to_string(),
                ..base.clone()
            },
            ProfileSnapshot {
                years_of_experience: 5,
                ..base.clone()
            },
            ProfileSnapshot {
                phone_verified: true,
                ..base.clone()
            },
            ProfileSnapshot {
                verification_status: VerificationStatus::Premium,
                ..base.clone()
            },
            ProfileSnapshot {
                skill_count: 3,
                ..base.clone()
            },
            ProfileSnapshot {
                certification_count: 1,
                ..base.clone()
            },
        ];
        for flipped in flips {
            assert!(compute_completeness(&flipped).overall >= before);
        }
    }

    #[test]
    fn test_whitespace_fields_do_not_count() {
        let p = ProfileSnapshot {
            first_name: "  ".to_string(),
            profile_headline: Some("   ".to_string()),
            ..ProfileSnapshot::default()
        };
        let report = compute_completeness(&p);
        assert_eq!(report.categories.basic_info.completed, 0);
    }

    #[test]
    fn test_short_summary_fails_item() {
        let p = ProfileSnapshot {
            profile_summary: Some("Too short".to_string()),
            ..full_profile()
        };
        let report = compute_completeness(&p);
        assert_eq!(report.categories.professional_details.completed, 3);
        assert!(!report.categories.professional_details.items["profileSummary"]);
    }

    #[test]
    fn test_basic_verification_does_not_pass_identity_item() {
        let p = ProfileSnapshot {
            verification_status: VerificationStatus::Basic,
            ..full_profile()
        };
        let report = compute_completeness(&p);
        assert!(!report.categories.verification.items["identityVerified"]);
    }

    #[test]
    fn test_recommendations_capped_at_five_in_category_order() {
        let recs = recommendations(&ProfileSnapshot::default());
        assert_eq!(recs.len(), RECOMMENDATION_LIMIT);
        // All five come from basic info, the first category evaluated.
        assert_eq!(recs[0], "Add your first name");
        assert_eq!(recs[4], "Add your state");
    }

    #[test]
    fn test_recommendations_skip_passing_items() {
        let recs = recommendations(&full_profile());
        assert!(recs.is_empty());
    }
}
