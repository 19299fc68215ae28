use crate::api::{HireApi, HirePaths};
use crate::clock::FixedClock;
use crate::config::HireConfig;
use crate::init::build_tiers;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

/// A file-backed API in a throwaway directory, on a clock tests control.
pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub clock: Rc<FixedClock>,
    pub data: PathBuf,
    pub session: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let data = temp_dir.path().join("data");
        let session = temp_dir.path().join("session");
        Self {
            _temp_dir: temp_dir,
            clock: Rc::new(FixedClock::default()),
            data,
            session,
        }
    }

    /// A fresh API over the same directories, as a restarted process would
    /// see them.
    pub fn open(&self, config: HireConfig) -> HireApi {
        let kv = build_tiers(self.data.clone(), self.session.clone());
        let paths = HirePaths {
            data: Some(self.data.clone()),
            session: Some(self.session.clone()),
        };
        HireApi::new(kv, config, self.clock.clone(), paths)
    }
}
