//! The manifest: one JSON array of full application documents, acting as the
//! authoritative index of onboarded counties.
//!
//! Lifecycle is read-whole-file, mutate in memory, write-whole-file. There is
//! no lock, so concurrent writers against the same manifest remain
//! unsupported; the save itself is atomic (temp file + rename) so a crash
//! mid-write can no longer corrupt the index.

use std::io::Write;
use std::path::{Path, PathBuf};

use mehko_core::Application;
use tempfile::NamedTempFile;
use tracing::info;

use crate::StoreError;

/// Handle to the manifest file. Holds only the path; the in-memory manifest
/// is passed explicitly through [`load`](Self::load), [`upsert`], and
/// [`save`](Self::save).
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the manifest file into a list of applications.
    ///
    /// A missing file is an error (the manifest is seeded with `[]` when the
    /// data directory is set up); invalid JSON is [`StoreError::Corrupt`].
    pub fn load(&self) -> Result<Vec<Application>, StoreError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::ManifestNotFound(self.path.clone())
            } else {
                StoreError::io("read", &self.path, e)
            }
        })?;
        let manifest: Vec<Application> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        info!(count = manifest.len(), path = %self.path.display(), "loaded manifest");
        Ok(manifest)
    }

    /// Serialize the whole manifest and replace the file on disk.
    ///
    /// Written to a temp file in the manifest's directory first, then renamed
    /// over the old file, so readers never observe a half-written index.
    pub fn save(&self, manifest: &[Application]) -> Result<(), StoreError> {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        let json = serde_json::to_vec_pretty(manifest).map_err(StoreError::Encode)?;

        let mut tmp =
            NamedTempFile::new_in(parent).map_err(|e| StoreError::io("create temp", parent, e))?;
        tmp.write_all(&json)
            .map_err(|e| StoreError::io("write", tmp.path().to_path_buf(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io("rename", &self.path, e.error))?;

        info!(count = manifest.len(), path = %self.path.display(), "saved manifest");
        Ok(())
    }
}

/// Replace the entry with the same `id` in place, or append if absent.
/// Memory only — the caller decides when to [`ManifestStore::save`].
pub fn upsert(manifest: &mut Vec<Application>, app: Application) {
    match manifest.iter_mut().find(|existing| existing.id == app.id) {
        Some(existing) => {
            info!(id = %app.id, "updating existing manifest entry");
            *existing = app;
        }
        None => {
            info!(id = %app.id, "appending new manifest entry");
            manifest.push(app);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mehko_core::{InfoStep, PdfStep, Step, SupportTools};

    fn app(id: &str, title: &str) -> Application {
        Application {
            id: id.to_string(),
            title: title.to_string(),
            description: "A county".to_string(),
            root_domain: "example.gov".to_string(),
            support_tools: SupportTools {
                ai_enabled: true,
                comments_enabled: true,
            },
            steps: vec![
                Step::Info(InfoStep {
                    id: "overview".into(),
                    title: "Overview".into(),
                    content: "...".into(),
                    action_required: false,
                    fill_pdf: false,
                    app_id: Some(id.to_string()),
                    search_terms: None,
                }),
                Step::Pdf(PdfStep {
                    id: "sop".into(),
                    title: "SOP".into(),
                    content: "...".into(),
                    action_required: true,
                    fill_pdf: true,
                    form_id: "SOP".into(),
                    pdf_url: "https://example.gov/sop.pdf".into(),
                    app_id: id.to_string(),
                    search_terms: None,
                }),
            ],
        }
    }

    #[test]
    fn upsert_appends_then_replaces() {
        let mut manifest = vec![app("alameda_county_mehko", "Alameda")];

        upsert(&mut manifest, app("lake_county_mehko", "Lake"));
        assert_eq!(manifest.len(), 2);

        upsert(&mut manifest, app("lake_county_mehko", "Lake County MEHKO"));
        assert_eq!(manifest.len(), 2, "upsert must not duplicate by id");
        assert_eq!(manifest[1].title, "Lake County MEHKO");
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut manifest = Vec::new();
        upsert(&mut manifest, app("lake_county_mehko", "Lake"));
        upsert(&mut manifest, app("lake_county_mehko", "Lake"));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest[0], app("lake_county_mehko", "Lake"));
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("manifest.json"));

        let manifest = vec![app("lake_county_mehko", "Lake")];
        store.save(&manifest).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, manifest);

        // Load followed by save with no mutation leaves the bytes unchanged.
        let before = std::fs::read(store.path()).unwrap();
        store.save(&loaded).unwrap();
        let after = std::fs::read(store.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("manifest.json"));
        assert!(matches!(
            store.load(),
            Err(StoreError::ManifestNotFound(_))
        ));
    }

    #[test]
    fn corrupt_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = ManifestStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }
}
