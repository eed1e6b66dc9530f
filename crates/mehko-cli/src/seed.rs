//! `mehko seed` — validate application documents and upsert them into the
//! remote document store.
//!
//! Accepts three input shapes and flattens them before validation: a single
//! application object, an array of applications, or a map keyed by id.
//! Per-document failures are reported and skipped; the batch continues.

use std::path::PathBuf;

use mehko_core::validate;
use mehko_sync::SeedClient;
use serde_json::Value;
use tracing::info;

use crate::cli::SeedArgs;

/// One flattened document with the file it came from, for error labelling.
struct SeedDoc {
    source: String,
    doc: Value,
}

impl SeedDoc {
    fn id(&self) -> &str {
        self.doc.get("id").and_then(Value::as_str).unwrap_or("")
    }

    fn label(&self) -> String {
        if self.id().is_empty() {
            self.source.clone()
        } else {
            self.id().to_string()
        }
    }
}

/// Returns whether the run finished without validation or write errors.
pub async fn run(args: SeedArgs) -> anyhow::Result<bool> {
    let files = gather_files(&args)?;
    if files.is_empty() {
        anyhow::bail!("no JSON files found");
    }

    let mut ok = true;
    let mut docs: Vec<SeedDoc> = Vec::new();
    for file in &files {
        let source = file.display().to_string();
        let raw = match std::fs::read_to_string(file) {
            Ok(raw) => raw,
            Err(e) => {
                println!("failed {source}: cannot read file: {e}");
                ok = false;
                continue;
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(data) => {
                let (mut flattened, errors) = normalize(&source, data);
                for error in errors {
                    println!("failed {error}");
                    ok = false;
                }
                docs.append(&mut flattened);
            }
            Err(e) => {
                println!("failed {source}: invalid JSON: {e}");
                ok = false;
            }
        }
    }

    let client = SeedClient::new(args.effective_base_url());
    info!(
        documents = docs.len(),
        dry_run = args.dry_run,
        "seeding application documents"
    );

    for doc in &docs {
        if let Some(only) = &args.only
            && doc.id() != only
        {
            continue;
        }

        let report = validate(&doc.doc);
        if !report.is_valid() {
            ok = false;
            println!("failed {}:", doc.label());
            for error in &report.errors {
                println!("  - {error}");
            }
            continue;
        }
        for warning in &report.warnings {
            println!("warning {}: {warning}", doc.label());
        }

        if args.dry_run {
            println!("plan: upsert applications/{}", doc.id());
            continue;
        }

        match client.upsert_application(doc.id(), &doc.doc).await {
            Ok(()) => println!("upserted: {}", doc.id()),
            Err(e) => {
                ok = false;
                println!("failed {}: {e}", doc.id());
            }
        }
    }

    Ok(ok)
}

fn gather_files(args: &SeedArgs) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if let Some(file) = &args.file {
        files.push(file.clone());
    }
    if let Some(dir) = &args.path {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("reading directory {}: {e}", dir.display()))?;
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// Flatten one parsed file into application documents.
///
/// Shapes, tried in order: array of applications, single application (object
/// carrying a string `id`), map of id to application. A map key only becomes
/// the document's `id` when the document does not carry its own.
fn normalize(source: &str, data: Value) -> (Vec<SeedDoc>, Vec<String>) {
    let mut docs = Vec::new();
    let mut errors = Vec::new();

    match data {
        Value::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                if item.is_object() {
                    docs.push(SeedDoc {
                        source: format!("{source}[{i}]"),
                        doc: item,
                    });
                } else {
                    errors.push(format!("{source}[{i}]: unsupported JSON structure"));
                }
            }
        }
        Value::Object(map) => {
            if map.get("id").is_some_and(Value::is_string) {
                docs.push(SeedDoc {
                    source: source.to_string(),
                    doc: Value::Object(map),
                });
            } else {
                for (key, value) in map {
                    let Value::Object(mut app) = value else {
                        errors.push(format!("{source}.{key}: unsupported JSON structure"));
                        continue;
                    };
                    app.entry("id").or_insert_with(|| Value::String(key.clone()));
                    docs.push(SeedDoc {
                        source: format!("{source}.{key}"),
                        doc: Value::Object(app),
                    });
                }
            }
        }
        _ => errors.push(format!("{source}: unsupported JSON structure")),
    }

    (docs, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_an_array() {
        let data = json!([
            {"id": "lake_county_mehko"},
            {"id": "alameda_county_mehko"}
        ]);
        let (docs, errors) = normalize("apps.json", data);
        assert!(errors.is_empty());
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id(), "lake_county_mehko");
        assert_eq!(docs[0].source, "apps.json[0]");
    }

    #[test]
    fn normalizes_a_single_object() {
        let (docs, errors) = normalize("lake.json", json!({"id": "lake_county_mehko"}));
        assert!(errors.is_empty());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id(), "lake_county_mehko");
    }

    #[test]
    fn normalizes_an_id_keyed_map() {
        let data = json!({
            "lake_county_mehko": {"title": "Lake"},
            "alameda_county_mehko": {"title": "Alameda"}
        });
        let (docs, errors) = normalize("apps.json", data);
        assert!(errors.is_empty());
        assert_eq!(docs.len(), 2);
        let mut ids: Vec<&str> = docs.iter().map(SeedDoc::id).collect();
        ids.sort();
        assert_eq!(ids, vec!["alameda_county_mehko", "lake_county_mehko"]);
    }

    #[test]
    fn map_key_does_not_override_inner_id() {
        let data = json!({"outer_key": {"id": "inner_id", "title": "T"}});
        let (docs, _) = normalize("apps.json", data);
        assert_eq!(docs[0].id(), "inner_id");
    }

    #[test]
    fn rejects_non_object_shapes() {
        let (docs, errors) = normalize("apps.json", json!(42));
        assert!(docs.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("unsupported JSON structure"));

        let (docs, errors) = normalize("apps.json", json!([1, {"id": "ok_id"}]));
        assert_eq!(docs.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn labels_fall_back_to_source() {
        let (docs, _) = normalize("apps.json", json!([{"title": "no id"}]));
        assert_eq!(docs[0].label(), "apps.json[0]");
    }
}
