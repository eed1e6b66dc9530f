//! On-disk layout for downloaded form assets.
//!
//! One directory per `(appId, formId)` pair:
//!
//! ```text
//! applications/<appId>/forms/<formId>/meta.json
//! applications/<appId>/forms/<formId>/form.pdf
//! ```

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use mehko_core::PdfStep;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::StoreError;

const META_FILE: &str = "meta.json";
const PDF_FILE: &str = "form.pdf";

/// Provenance record written next to each downloaded PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMeta {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(rename = "stepId")]
    pub step_id: String,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
    /// ISO 8601 timestamp of when the asset directory was created.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl FormMeta {
    /// Build the provenance record for a `pdf` step, stamped with now.
    pub fn for_step(step: &PdfStep) -> Self {
        Self {
            id: step.form_id.clone(),
            title: step.title.clone(),
            kind: "pdf".to_string(),
            app_id: step.app_id.clone(),
            step_id: step.id.clone(),
            pdf_url: step.pdf_url.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Resolves and creates asset directories under a configured root.
/// No process-wide paths — callers pass the root in.
pub struct AssetLayout {
    applications_dir: PathBuf,
}

impl AssetLayout {
    pub fn new(applications_dir: impl Into<PathBuf>) -> Self {
        Self {
            applications_dir: applications_dir.into(),
        }
    }

    pub fn app_dir(&self, app_id: &str) -> PathBuf {
        self.applications_dir.join(app_id)
    }

    pub fn forms_dir(&self, app_id: &str) -> PathBuf {
        self.app_dir(app_id).join("forms")
    }

    pub fn form_dir(&self, app_id: &str, form_id: &str) -> PathBuf {
        self.forms_dir(app_id).join(form_id)
    }

    pub fn pdf_path(&self, app_id: &str, form_id: &str) -> PathBuf {
        self.form_dir(app_id, form_id).join(PDF_FILE)
    }

    pub fn meta_path(&self, app_id: &str, form_id: &str) -> PathBuf {
        self.form_dir(app_id, form_id).join(META_FILE)
    }

    /// Create `applications/<appId>/` and its `forms/` subdirectory.
    /// Existing directories are not an error.
    pub fn ensure_app_dirs(&self, app_id: &str) -> Result<PathBuf, StoreError> {
        let forms = self.forms_dir(app_id);
        std::fs::create_dir_all(&forms).map_err(|e| StoreError::io("create dir", &forms, e))?;
        info!(path = %self.app_dir(app_id).display(), "application directory ready");
        Ok(self.app_dir(app_id))
    }

    /// Create the per-form directory and write its `meta.json`.
    pub fn write_form_meta(&self, meta: &FormMeta) -> Result<PathBuf, StoreError> {
        let dir = self.form_dir(&meta.app_id, &meta.id);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io("create dir", &dir, e))?;

        let path = dir.join(META_FILE);
        let json = serde_json::to_vec_pretty(meta).map_err(StoreError::Encode)?;
        std::fs::write(&path, json).map_err(|e| StoreError::io("write", &path, e))?;
        Ok(path)
    }

    /// Write a fully buffered PDF body. Callers must pass the complete body —
    /// never a partial stream — so a failed download leaves no truncated file.
    pub fn write_form_pdf(
        &self,
        app_id: &str,
        form_id: &str,
        body: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let path = self.pdf_path(app_id, form_id);
        std::fs::write(&path, body).map_err(|e| StoreError::io("write", &path, e))?;
        info!(path = %path.display(), bytes = body.len(), "wrote form pdf");
        Ok(path)
    }

    pub fn read_form_meta(&self, app_id: &str, form_id: &str) -> Result<FormMeta, StoreError> {
        let path = self.meta_path(app_id, form_id);
        let raw = std::fs::read_to_string(&path).map_err(|e| StoreError::io("read", &path, e))?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })
    }

    pub fn root(&self) -> &Path {
        &self.applications_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_step() -> PdfStep {
        PdfStep {
            id: "sop_form".into(),
            title: "Standard Operating Procedures".into(),
            content: "...".into(),
            action_required: true,
            fill_pdf: true,
            form_id: "LAKE_SOP".into(),
            pdf_url: "https://lakecountyca.gov/sop.pdf".into(),
            app_id: "lake_county_mehko".into(),
            search_terms: None,
        }
    }

    #[test]
    fn ensure_app_dirs_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AssetLayout::new(dir.path());

        layout.ensure_app_dirs("lake_county_mehko").unwrap();
        layout.ensure_app_dirs("lake_county_mehko").unwrap();

        assert!(layout.forms_dir("lake_county_mehko").is_dir());
    }

    #[test]
    fn meta_roundtrip_uses_wire_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AssetLayout::new(dir.path());

        let meta = FormMeta::for_step(&sample_step());
        let path = layout.write_form_meta(&meta).unwrap();
        assert_eq!(
            path,
            dir.path()
                .join("lake_county_mehko/forms/LAKE_SOP/meta.json")
        );

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["type"], "pdf");
        assert_eq!(value["appId"], "lake_county_mehko");
        assert_eq!(value["stepId"], "sop_form");
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));

        let loaded = layout
            .read_form_meta("lake_county_mehko", "LAKE_SOP")
            .unwrap();
        assert_eq!(loaded, meta);
    }

    #[test]
    fn pdf_written_whole() {
        let dir = tempfile::tempdir().unwrap();
        let layout = AssetLayout::new(dir.path());
        layout.ensure_app_dirs("lake_county_mehko").unwrap();
        layout
            .write_form_meta(&FormMeta::for_step(&sample_step()))
            .unwrap();

        let body = b"%PDF-1.7 fake body";
        let path = layout
            .write_form_pdf("lake_county_mehko", "LAKE_SOP", body)
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), body);
    }
}
