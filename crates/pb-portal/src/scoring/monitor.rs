use serde::Serialize;

use crate::domain::{ApplicationId, ApplicationSummary, PortalUser, Score, CROSS_AREA};
use crate::roles::Role;

/// Committee progress and average score for one application under review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringProgress {
    pub application_id: ApplicationId,
    pub reference: String,
    pub project_title: String,
    pub area: String,
    pub committee_size: usize,
    pub scores_received: usize,
    pub percent_complete: u8,
    pub average_score: u8,
    pub meets_threshold: bool,
    /// Committee members in scope who have not scored yet.
    pub outstanding: Vec<String>,
}

/// Tracks how far each area committee has got with Stage 2 scoring.
#[derive(Debug, Clone, Copy)]
pub struct ScoringMonitor {
    threshold: u8,
}

impl ScoringMonitor {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.min(100),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Progress for every application awaiting committee review. With an area
    /// filter, cross-area applications are always included.
    pub fn progress(
        &self,
        applications: &[ApplicationSummary],
        users: &[PortalUser],
        scores: &[Score],
        area_filter: Option<&str>,
    ) -> Vec<ScoringProgress> {
        let committee: Vec<&PortalUser> = users
            .iter()
            .filter(|user| user.role == Role::Committee)
            .collect();

        applications
            .iter()
            .filter(|app| app.status.awaiting_committee())
            .filter(|app| match area_filter {
                Some(area) => app.area == area || app.area == CROSS_AREA,
                None => true,
            })
            .map(|app| self.application_progress(app, &committee, scores))
            .collect()
    }

    fn application_progress(
        &self,
        app: &ApplicationSummary,
        committee: &[&PortalUser],
        scores: &[Score],
    ) -> ScoringProgress {
        let relevant: Vec<&PortalUser> = committee
            .iter()
            .copied()
            .filter(|member| {
                app.area == CROSS_AREA || member.area.as_deref() == Some(app.area.as_str())
            })
            .collect();
        let app_scores: Vec<&Score> = scores.iter().filter(|s| s.app_id == app.id).collect();

        let percent_complete = if relevant.is_empty() {
            0
        } else {
            rounded_percent(app_scores.len() as f64 / relevant.len() as f64 * 100.0)
        };

        let average_score = if app_scores.is_empty() {
            0
        } else {
            let sum: u64 = app_scores.iter().map(|s| u64::from(s.weighted_total)).sum();
            rounded_percent(sum as f64 / app_scores.len() as f64)
        };

        let outstanding = relevant
            .iter()
            .filter(|member| !app_scores.iter().any(|s| s.scorer_id == member.uid))
            .map(|member| member.display_name.clone())
            .collect();

        ScoringProgress {
            application_id: app.id.clone(),
            reference: app.reference.clone(),
            project_title: app.project_title.clone(),
            area: app.area.clone(),
            committee_size: relevant.len(),
            scores_received: app_scores.len(),
            percent_complete,
            average_score,
            meets_threshold: !app_scores.is_empty() && average_score >= self.threshold,
            outstanding,
        }
    }
}

// Scores from members outside the area can push completion past 100.
fn rounded_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApplicationStatus;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn app(id: &str, area: &str, status: ApplicationStatus) -> ApplicationSummary {
        ApplicationSummary {
            id: ApplicationId(id.to_string()),
            reference: id.to_uppercase(),
            project_title: format!("Project {id}"),
            area: area.to_string(),
            priority: None,
            amount_requested: 1000.0,
            status,
        }
    }

    fn member(uid: &str, area: &str) -> PortalUser {
        PortalUser {
            uid: uid.to_string(),
            display_name: format!("Member {uid}"),
            role: Role::Committee,
            area: Some(area.to_string()),
        }
    }

    fn score(app_id: &str, scorer: &str, total: u8) -> Score {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).single().expect("valid");
        Score {
            id: Score::document_id(&ApplicationId(app_id.to_string()), scorer),
            app_id: ApplicationId(app_id.to_string()),
            scorer_id: scorer.to_string(),
            scorer_name: scorer.to_string(),
            breakdown: BTreeMap::new(),
            weighted_total: total,
            notes: BTreeMap::new(),
            is_final: true,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn reports_completion_and_average_per_area_committee() {
        let apps = vec![app("a1", "Blaenavon", ApplicationStatus::SubmittedStage2)];
        let users = vec![
            member("c1", "Blaenavon"),
            member("c2", "Blaenavon"),
            member("c3", "Blaenavon"),
            member("c4", "Thornhill & Upper Cwmbran"),
        ];
        let scores = vec![score("a1", "c1", 70), score("a1", "c2", 55)];

        let progress = ScoringMonitor::new(60).progress(&apps, &users, &scores, None);

        assert_eq!(progress.len(), 1);
        let entry = &progress[0];
        assert_eq!(entry.committee_size, 3);
        assert_eq!(entry.scores_received, 2);
        assert_eq!(entry.percent_complete, 67);
        assert_eq!(entry.average_score, 63);
        assert!(entry.meets_threshold);
        assert_eq!(entry.outstanding, vec!["Member c3".to_string()]);
    }

    #[test]
    fn cross_area_applications_involve_every_committee_member() {
        let apps = vec![app("x1", CROSS_AREA, ApplicationStatus::InvitedStage2)];
        let users = vec![member("c1", "Blaenavon"), member("c2", "Thornhill & Upper Cwmbran")];

        let progress = ScoringMonitor::new(60).progress(&apps, &users, &[], Some("Blaenavon"));

        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].committee_size, 2);
        assert_eq!(progress[0].percent_complete, 0);
        assert_eq!(progress[0].average_score, 0);
        assert!(!progress[0].meets_threshold);
    }

    #[test]
    fn skips_applications_not_awaiting_review_and_other_areas() {
        let apps = vec![
            app("a1", "Blaenavon", ApplicationStatus::Funded),
            app("a2", "Blaenavon", ApplicationStatus::SubmittedStage1),
            app("a3", "Thornhill & Upper Cwmbran", ApplicationStatus::SubmittedStage2),
        ];

        let progress = ScoringMonitor::new(60).progress(&apps, &[], &[], Some("Blaenavon"));

        assert!(progress.is_empty());
    }

    #[test]
    fn empty_committee_reports_zero_completion() {
        let apps = vec![app("a1", "Blaenavon", ApplicationStatus::SubmittedStage2)];
        let scores = vec![score("a1", "admin_01", 40)];

        let progress = ScoringMonitor::new(30).progress(&apps, &[], &scores, None);

        assert_eq!(progress[0].percent_complete, 0);
        assert_eq!(progress[0].average_score, 40);
        assert!(progress[0].meets_threshold);
    }
}
