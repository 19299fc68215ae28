//! First-run sample data.
//!
//! Each namespace gets its bundled fixture when, and only when, it reads as
//! empty. Fixtures are trusted and skip the validator. Running the seed again
//! changes nothing, so callers can run it on every startup.

use crate::error::Result;
use crate::model::{Candidate, Interview, Job, Namespace, Record};
use crate::store::Storage;
use serde::Serialize;
use std::rc::Rc;
use tracing::info;

const CANDIDATES: &str = include_str!("../fixtures/candidates.json");
const JOBS: &str = include_str!("../fixtures/jobs.json");
const INTERVIEWS: &str = include_str!("../fixtures/interviews.json");

/// Records written per namespace by one seed run. Zero means the namespace
/// already had data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub candidates: usize,
    pub jobs: usize,
    pub interviews: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.candidates + self.jobs + self.interviews
    }

    pub fn get(&self, namespace: Namespace) -> usize {
        match namespace {
            Namespace::Candidates => self.candidates,
            Namespace::Jobs => self.jobs,
            Namespace::Interviews => self.interviews,
        }
    }
}

fn seed_one<R: Record>(storage: &Rc<Storage>, fixture: &str) -> Result<usize> {
    let store = storage.records::<R>();
    if !store.find_all().is_empty() {
        return Ok(0);
    }
    let records: Vec<R> = serde_json::from_str(fixture)?;
    let count = records.len();
    store.replace_all(records);
    info!(namespace = %R::NAMESPACE, records = count, "seeded");
    Ok(count)
}

pub fn seed(storage: &Rc<Storage>) -> Result<SeedReport> {
    Ok(SeedReport {
        candidates: seed_one::<Candidate>(storage, CANDIDATES)?,
        jobs: seed_one::<Job>(storage, JOBS)?,
        interviews: seed_one::<Interview>(storage, INTERVIEWS)?,
    })
}
