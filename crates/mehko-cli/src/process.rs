//! Single-county processing pipeline.
//!
//! Strict forward order: load manifest → load county document → validate →
//! upsert manifest → ensure directories → download forms. The first three
//! stages are fatal on failure; a failed form download is logged, recorded in
//! the outcome, and the remaining forms still run. Downloads are strictly
//! sequential so county web servers see one request at a time.

use anyhow::Context;
use mehko_core::{Application, PdfStep, validate};
use mehko_store::{AssetLayout, FormMeta, ManifestStore, upsert};
use mehko_sync::FormFetcher;
use tracing::{info, warn};

use crate::config::Paths;

/// What one county run produced. Fatal errors never reach this type; only
/// per-form failures are carried here.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub county_id: String,
    pub title: String,
    pub forms_attempted: usize,
    pub forms_downloaded: usize,
    pub failures: Vec<FormFailure>,
}

#[derive(Debug)]
pub struct FormFailure {
    pub form_id: String,
    pub error: String,
}

impl ProcessOutcome {
    pub fn print(&self) {
        println!(
            "processed {} ({}): {}/{} forms downloaded",
            self.county_id, self.title, self.forms_downloaded, self.forms_attempted
        );
        for failure in &self.failures {
            println!("  failed {}: {}", failure.form_id, failure.error);
        }
    }
}

pub struct CountyProcessor<'a, F> {
    paths: &'a Paths,
    fetcher: &'a F,
}

impl<'a, F: FormFetcher> CountyProcessor<'a, F> {
    pub fn new(paths: &'a Paths, fetcher: &'a F) -> Self {
        Self { paths, fetcher }
    }

    /// Run the whole pipeline for one county id.
    pub async fn run(&self, county_id: &str) -> anyhow::Result<ProcessOutcome> {
        let store = ManifestStore::new(self.paths.manifest_file());
        let mut manifest = store.load().context("loading manifest")?;

        let county_path = self.paths.county_file(county_id);
        let raw = std::fs::read_to_string(&county_path)
            .with_context(|| format!("reading county document {}", county_path.display()))?;
        let doc: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing county document {}", county_path.display()))?;

        let report = validate(&doc);
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
        if !report.is_valid() {
            let mut msg = format!("county document {county_id} failed validation:");
            for error in &report.errors {
                msg.push_str("\n  - ");
                msg.push_str(error);
            }
            anyhow::bail!(msg);
        }

        let app = Application::from_value(&doc).context("decoding validated county document")?;
        info!(id = %app.id, steps = app.steps.len(), "county document validated");

        upsert(&mut manifest, app.clone());
        store.save(&manifest).context("saving manifest")?;

        let layout = AssetLayout::new(&self.paths.applications_dir);
        layout
            .ensure_app_dirs(&app.id)
            .context("creating application directories")?;

        let mut outcome = ProcessOutcome {
            county_id: app.id.clone(),
            title: app.title.clone(),
            forms_attempted: 0,
            forms_downloaded: 0,
            failures: Vec::new(),
        };

        for step in app.pdf_steps() {
            outcome.forms_attempted += 1;
            match self.download_form(&layout, step).await {
                Ok(bytes) => {
                    outcome.forms_downloaded += 1;
                    info!(form_id = %step.form_id, bytes, "form downloaded");
                }
                // Best-effort asset acquisition: one bad form must not sink
                // the rest.
                Err(e) => {
                    warn!(form_id = %step.form_id, error = %e, "form download failed");
                    outcome.failures.push(FormFailure {
                        form_id: step.form_id.clone(),
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        Ok(outcome)
    }

    async fn download_form(&self, layout: &AssetLayout, step: &PdfStep) -> anyhow::Result<usize> {
        layout
            .write_form_meta(&FormMeta::for_step(step))
            .context("writing form meta")?;

        // The body is fully buffered before anything touches form.pdf, so a
        // failed download leaves no partial file.
        let body = self
            .fetcher
            .fetch_pdf(&step.pdf_url)
            .await
            .context("downloading pdf")?;
        layout
            .write_form_pdf(&step.app_id, &step.form_id, &body)
            .context("writing form.pdf")?;
        Ok(body.len())
    }
}
