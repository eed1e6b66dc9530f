//! Explicit path configuration, passed into processors by value — the
//! pipeline has no process-wide path state.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub applications_dir: PathBuf,
}

impl Paths {
    pub fn new(data_dir: PathBuf, applications_dir: PathBuf) -> Self {
        Self {
            data_dir,
            applications_dir,
        }
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.data_dir.join("manifest.json")
    }

    pub fn county_file(&self, county_id: &str) -> PathBuf {
        self.data_dir.join(format!("{county_id}.json"))
    }
}
