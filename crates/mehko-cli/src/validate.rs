//! `mehko validate` — check county documents without ingesting anything.
//!
//! Validation itself is pure; the optional PDF probe is the only network
//! activity, on by default like the original workflow and skippable with
//! `--skip-pdf-check`.

use std::collections::HashMap;
use std::path::PathBuf;

use mehko_core::{Report, validate};
use mehko_sync::{PdfAccess, PdfProbe, PdfProber};
use serde_json::Value;

use crate::bulk::discover_county_ids;
use crate::config::Paths;

/// Returns whether every validated file had zero errors.
pub async fn run(
    paths: &Paths,
    file: Option<PathBuf>,
    all: bool,
    skip_pdf_check: bool,
) -> anyhow::Result<bool> {
    let files: Vec<PathBuf> = if all {
        discover_county_ids(&paths.data_dir)?
            .iter()
            .map(|id| paths.county_file(id))
            .collect()
    } else {
        // clap guarantees `file` when `--all` is absent.
        file.into_iter().collect()
    };

    if files.is_empty() {
        println!("no county files found in {}", paths.data_dir.display());
        return Ok(true);
    }

    let prober = if skip_pdf_check {
        None
    } else {
        Some(PdfProber::new()?)
    };
    // Probe results are shared across files within one run.
    let mut probe_cache: HashMap<String, PdfAccess> = HashMap::new();

    let mut all_valid = true;
    for path in &files {
        println!("validating {}", path.display());

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                println!("  error: cannot read file: {e}");
                all_valid = false;
                continue;
            }
        };
        let doc: Value = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                println!("  error: invalid JSON: {e}");
                all_valid = false;
                continue;
            }
        };

        let mut report = validate(&doc);
        if let Some(prober) = &prober {
            probe_pdf_urls(prober, &doc, &mut probe_cache, &mut report).await;
        }

        for error in &report.errors {
            println!("  error: {error}");
        }
        for warning in &report.warnings {
            println!("  warning: {warning}");
        }
        println!(
            "  {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );

        if !report.is_valid() {
            all_valid = false;
        }
    }

    if all_valid {
        println!("all county documents are valid");
    } else {
        println!("validation errors found; fix them before uploading");
    }
    Ok(all_valid)
}

/// Probe each distinct `pdfUrl` and fold the classification into the report:
/// unreachable is an error, 403 a verification warning. The cache guarantees
/// one probe per URL per run, however many steps share it.
async fn probe_pdf_urls<P: PdfProbe>(
    prober: &P,
    doc: &Value,
    cache: &mut HashMap<String, PdfAccess>,
    report: &mut Report,
) {
    let Some(steps) = doc.get("steps").and_then(Value::as_array) else {
        return;
    };

    for step in steps {
        if step.get("type").and_then(Value::as_str) != Some("pdf") {
            continue;
        }
        let Some(url) = step.get("pdfUrl").and_then(Value::as_str) else {
            continue;
        };
        if url.is_empty() {
            continue;
        }

        let access = match cache.get(url) {
            Some(access) => access.clone(),
            None => {
                let access = prober.probe(url).await;
                cache.insert(url.to_string(), access.clone());
                access
            }
        };

        match access {
            PdfAccess::Reachable => {}
            PdfAccess::NeedsVerification => report.warnings.push(format!(
                "PDF URL requires authentication or special access: {url} (HTTP 403, \
                 common for county websites; verify the URL by hand)"
            )),
            PdfAccess::Unreachable { reason } => report.errors.push(reason),
        }
    }
}
