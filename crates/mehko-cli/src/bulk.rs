//! Bulk processing: every county document in the data directory, one after
//! another. A county that fails is reported in the summary and the batch
//! keeps going; counties are never processed in parallel so the manifest is
//! only ever written by one run at a time.

use std::path::Path;

use mehko_sync::FormFetcher;
use tracing::{error, info};

use crate::config::Paths;
use crate::process::CountyProcessor;

/// Data-directory JSON files that are not county documents.
const NON_COUNTY_FILES: &[&str] = &[
    "manifest.json",
    "county-template.json",
    "example-county.json",
    "county-batch.json",
];

#[derive(Debug, Default)]
pub struct BulkSummary {
    pub processed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BulkSummary {
    pub fn print(&self) {
        println!("bulk processing complete");
        println!("  processed ({}):", self.processed.len());
        for id in &self.processed {
            println!("    {id}");
        }
        if !self.failed.is_empty() {
            println!("  failed ({}):", self.failed.len());
            for (id, err) in &self.failed {
                println!("    {id}: {err}");
            }
        }
    }
}

/// County ids derived from `*.json` files in the data directory, excluding
/// the manifest and the template/example/batch files. Sorted for a stable
/// processing order.
pub fn discover_county_ids(data_dir: &Path) -> anyhow::Result<Vec<String>> {
    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| anyhow::anyhow!("reading data directory {}: {e}", data_dir.display()))?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.ends_with(".json") || NON_COUNTY_FILES.contains(&name) {
            continue;
        }
        ids.push(name.trim_end_matches(".json").to_string());
    }
    ids.sort();
    Ok(ids)
}

/// Process every discovered county sequentially, collecting per-county
/// outcomes. Only a failure to list the data directory is fatal.
pub async fn run_all<F: FormFetcher>(paths: &Paths, fetcher: &F) -> anyhow::Result<BulkSummary> {
    let ids = discover_county_ids(&paths.data_dir)?;
    info!(count = ids.len(), "found county files to process");

    let mut summary = BulkSummary::default();
    let processor = CountyProcessor::new(paths, fetcher);

    for id in ids {
        match processor.run(&id).await {
            Ok(outcome) => {
                outcome.print();
                summary.processed.push(id);
            }
            Err(e) => {
                error!(county = %id, error = format!("{e:#}"), "county failed");
                summary.failed.push((id, format!("{e:#}")));
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mehko_sync::SyncError;
    use serde_json::json;

    struct OkFetcher;

    #[async_trait]
    impl FormFetcher for OkFetcher {
        async fn fetch_pdf(&self, _url: &str) -> Result<Vec<u8>, SyncError> {
            Ok(b"%PDF-1.7 stub".to_vec())
        }
    }

    fn county_doc(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("{id} title"),
            "description": "Home kitchen permits",
            "rootDomain": "example.gov",
            "supportTools": {"aiEnabled": true, "commentsEnabled": false},
            "steps": [
                {"id": "overview", "type": "info", "title": "Plan", "content": "read", "appId": id},
                {
                    "id": "sop", "type": "pdf", "title": "SOP", "content": "submit",
                    "formId": "SOP", "pdfUrl": "https://example.gov/sop.pdf", "appId": id
                }
            ]
        })
    }

    #[test]
    fn discovery_skips_non_county_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "manifest.json",
            "county-template.json",
            "example-county.json",
            "county-batch.json",
            "lake_county_mehko.json",
            "alameda_county_mehko.json",
            "notes.txt",
        ] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }

        let ids = discover_county_ids(dir.path()).unwrap();
        assert_eq!(ids, vec!["alameda_county_mehko", "lake_county_mehko"]);
    }

    #[tokio::test]
    async fn one_bad_county_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::new(dir.path().join("data"), dir.path().join("applications"));
        std::fs::create_dir_all(&paths.data_dir).unwrap();
        std::fs::write(paths.manifest_file(), "[]").unwrap();

        std::fs::write(
            paths.county_file("alameda_county_mehko"),
            county_doc("alameda_county_mehko").to_string(),
        )
        .unwrap();
        // Invalid: steps missing entirely.
        std::fs::write(
            paths.county_file("broken_county_mehko"),
            json!({"id": "broken_county_mehko"}).to_string(),
        )
        .unwrap();
        std::fs::write(
            paths.county_file("lake_county_mehko"),
            county_doc("lake_county_mehko").to_string(),
        )
        .unwrap();

        let summary = run_all(&paths, &OkFetcher).await.unwrap();
        assert_eq!(
            summary.processed,
            vec!["alameda_county_mehko", "lake_county_mehko"]
        );
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "broken_county_mehko");

        let manifest = mehko_store::ManifestStore::new(paths.manifest_file())
            .load()
            .unwrap();
        assert_eq!(manifest.len(), 2);
    }
}
