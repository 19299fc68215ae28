use crate::model::{Candidate, CandidateStatus, Interview, InterviewStatus, Job};
use crate::store::{keys, Storage};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// Aggregates shown on the dashboard's landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_candidates: usize,
    pub total_jobs: usize,
    pub total_interviews: usize,
    /// Keyed by status label, every status present even when zero.
    pub candidates_by_status: BTreeMap<String, usize>,
    /// Mean score over candidates that have one.
    pub average_score: Option<f64>,
    pub open_jobs: usize,
    pub upcoming_interviews: usize,
}

impl DashboardSummary {
    pub fn compute(
        candidates: &[Candidate],
        jobs: &[Job],
        interviews: &[Interview],
        today: NaiveDate,
    ) -> Self {
        let mut candidates_by_status: BTreeMap<String, usize> = CandidateStatus::ALL
            .iter()
            .map(|s| (s.label().to_string(), 0))
            .collect();
        for c in candidates {
            *candidates_by_status
                .entry(c.status.label().to_string())
                .or_default() += 1;
        }

        let scored: Vec<f64> = candidates
            .iter()
            .filter(|c| c.score > 0)
            .map(|c| f64::from(c.score))
            .collect();
        let average_score = if scored.is_empty() {
            None
        } else {
            Some(scored.iter().sum::<f64>() / scored.len() as f64)
        };

        Self {
            total_candidates: candidates.len(),
            total_jobs: jobs.len(),
            total_interviews: interviews.len(),
            candidates_by_status,
            average_score,
            open_jobs: jobs.iter().filter(|j| j.is_accepting(today)).count(),
            upcoming_interviews: interviews
                .iter()
                .filter(|i| i.status == InterviewStatus::Scheduled && i.date >= today)
                .count(),
        }
    }
}

/// Cached summary, recomputed when the cache entry is missing or expired.
pub fn summary(storage: &Rc<Storage>, ttl: Duration) -> DashboardSummary {
    if let Some(cached) = storage.cache().get::<DashboardSummary>(keys::DASHBOARD) {
        return cached;
    }
    debug!("dashboard cache miss");
    let summary = DashboardSummary::compute(
        &storage.records::<Candidate>().find_all(),
        &storage.records::<Job>().find_all(),
        &storage.records::<Interview>().find_all(),
        storage.clock().now().date_naive(),
    );
    storage.cache().set(keys::DASHBOARD, &summary, Some(ttl));
    summary
}

/// Drop the cached summary whenever a collection changes.
pub fn invalidate_on_change(storage: &Rc<Storage>) {
    let weak = Rc::downgrade(storage);
    storage.subscribe(move |_| {
        if let Some(storage) = weak.upgrade() {
            storage.cache().invalidate(keys::DASHBOARD);
        }
    });
}
