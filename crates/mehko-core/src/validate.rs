//! Schema validation for county application documents.
//!
//! This is the single rule set shared by every entry point (single-county
//! processing, bulk processing, standalone validation, and seeding), so the
//! rules cannot drift between tools.
//!
//! Validation walks raw `serde_json::Value` rather than deserializing into
//! the typed model: a malformed document should yield the full itemized list
//! of problems, not just the first field serde trips over. Pure and
//! side-effect-free — PDF reachability lives in `mehko-sync`, not here.

use std::collections::HashSet;

use serde_json::Value;
use url::Url;

use crate::model::is_valid_id;

const REQUIRED_FIELDS: &[&str] = &[
    "id",
    "title",
    "description",
    "rootDomain",
    "supportTools",
    "steps",
];

/// Section headers every step's content is expected to carry.
const RECOMMENDED_SECTIONS: &[&str] = &[
    "What to do:",
    "Why it matters:",
    "What you need:",
    "Where/how:",
    "Cost & time:",
    "Ready when:",
];

/// Outcome of validating one document. Valid means zero errors; warnings are
/// advisory and never fail validation.
#[derive(Debug, Default, Clone)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Validate a county application document against the schema rules.
pub fn validate(doc: &Value) -> Report {
    let mut report = Report::default();

    let Some(obj) = doc.as_object() else {
        report.error("document must be a JSON object");
        return report;
    };

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(*field) {
            report.error(format!("missing required field: {field}"));
        }
    }

    if let Some(id) = obj.get("id") {
        match id.as_str() {
            Some(s) if is_valid_id(s) => {}
            Some(s) => report.error(format!("id \"{s}\" must match [a-z0-9_]+")),
            None => report.error("id must be a string"),
        }
    }

    for field in ["title", "description"] {
        if let Some(v) = obj.get(field) {
            match v.as_str() {
                Some(s) if !s.trim().is_empty() => {}
                _ => report.error(format!("{field} must be a non-empty string")),
            }
        }
    }

    if let Some(v) = obj.get("rootDomain") {
        validate_root_domain(v, &mut report);
    }

    if let Some(v) = obj.get("supportTools") {
        validate_support_tools(v, &mut report);
    }

    let app_id = obj.get("id").and_then(Value::as_str).unwrap_or_default();
    if let Some(v) = obj.get("steps") {
        validate_steps(v, app_id, &mut report);
    }

    report
}

fn validate_root_domain(value: &Value, report: &mut Report) {
    let Some(domain) = value.as_str() else {
        report.error("rootDomain must be a string");
        return;
    };
    if domain.trim().is_empty() {
        report.error("rootDomain must be a non-empty string");
        return;
    }
    if domain.starts_with("http://") || domain.starts_with("https://") {
        report.error("rootDomain should not include protocol (http:// or https://)");
    }
    if domain.starts_with("www.") {
        report.warning("rootDomain should not include www prefix");
    }
    if !domain.contains('.') {
        report.error("rootDomain appears to be invalid (no dots found)");
    }
}

fn validate_support_tools(value: &Value, report: &mut Report) {
    let Some(tools) = value.as_object() else {
        report.error("supportTools must be an object");
        return;
    };
    for key in ["aiEnabled", "commentsEnabled"] {
        if !matches!(tools.get(key), Some(Value::Bool(_))) {
            report.error(format!("supportTools.{key} must be a boolean"));
        }
    }
}

fn validate_steps(value: &Value, app_id: &str, report: &mut Report) {
    let Some(steps) = value.as_array() else {
        report.error("steps must be an array");
        return;
    };
    if steps.is_empty() {
        report.error("steps array cannot be empty");
        return;
    }

    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut has_info = false;
    let mut has_pdf = false;

    for (i, step) in steps.iter().enumerate() {
        let p = format!("steps[{i}]");
        let Some(obj) = step.as_object() else {
            report.error(format!("{p} must be an object"));
            continue;
        };

        for key in ["id", "title", "type", "content"] {
            if !matches!(obj.get(key), Some(Value::String(s)) if !s.trim().is_empty()) {
                report.error(format!("{p}.{key} must be a non-empty string"));
            }
        }

        // Optional flags, but when present they must be booleans so the
        // typed model can decode what the validator accepted.
        for key in ["action_required", "fill_pdf"] {
            if let Some(v) = obj.get(key)
                && !v.is_boolean()
            {
                report.error(format!("{p}.{key} must be a boolean"));
            }
        }

        // Uniqueness is enforced across all step types.
        if let Some(id) = obj.get("id").and_then(Value::as_str) {
            if !id.is_empty() && !is_valid_id(id) {
                report.error(format!("{p}.id \"{id}\" must match [a-z0-9_]+"));
            }
            if !seen_ids.insert(id) {
                report.error(format!("{p}.id \"{id}\" is duplicated"));
            }
        }

        if let Some(terms) = obj.get("searchTerms") {
            validate_search_terms(terms, &p, report);
        }

        if let Some(content) = obj.get("content").and_then(Value::as_str) {
            validate_content(content, &p, report);
        }

        match obj.get("type").and_then(Value::as_str) {
            Some("info") => {
                has_info = true;
                match obj.get("appId").and_then(Value::as_str) {
                    None => report.warning(format!(
                        "{p}.appId is missing (recommended for info steps)"
                    )),
                    Some(step_app) if !app_id.is_empty() && step_app != app_id => {
                        report.error(format!(
                            "{p}.appId \"{step_app}\" does not match county ID \"{app_id}\""
                        ));
                    }
                    Some(_) => {}
                }
            }
            Some("form") => {
                if !matches!(obj.get("formName"), Some(Value::String(s)) if !s.trim().is_empty()) {
                    report.error(format!("{p}.formName is required for type=form"));
                }
            }
            Some("pdf") => {
                has_pdf = true;
                validate_pdf_step(obj, &p, app_id, report);
            }
            Some(other) => {
                report.error(format!("{p}.type \"{other}\" must be one of: info, form, pdf"));
            }
            // Missing/non-string type was already reported above.
            None => {}
        }
    }

    if !has_info {
        report.error("at least one step must have type \"info\"");
    }
    if !has_pdf {
        report.error("at least one step must have type \"pdf\"");
    }
}

fn validate_pdf_step(
    obj: &serde_json::Map<String, Value>,
    p: &str,
    app_id: &str,
    report: &mut Report,
) {
    for key in ["formId", "pdfUrl", "appId"] {
        if !matches!(obj.get(key), Some(Value::String(s)) if !s.trim().is_empty()) {
            report.error(format!("{p}.{key} is required for pdf steps"));
        }
    }

    if let Some(step_app) = obj.get("appId").and_then(Value::as_str)
        && !step_app.is_empty()
        && !app_id.is_empty()
        && step_app != app_id
    {
        report.error(format!(
            "{p}.appId \"{step_app}\" does not match county ID \"{app_id}\""
        ));
    }

    if let Some(form_id) = obj.get("formId").and_then(Value::as_str)
        && !form_id.is_empty()
        && !form_id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_')
    {
        report.warning(format!(
            "{p}.formId \"{form_id}\" should use UPPER_CASE format"
        ));
    }

    if let Some(pdf_url) = obj.get("pdfUrl").and_then(Value::as_str)
        && !pdf_url.is_empty()
    {
        match Url::parse(pdf_url) {
            Ok(_) => {
                if !pdf_url.to_lowercase().ends_with(".pdf") {
                    report.warning(format!("{p}.pdfUrl does not end with .pdf"));
                }
            }
            Err(_) => report.error(format!("{p}.pdfUrl is not a valid URL")),
        }
    }
}

fn validate_search_terms(value: &Value, p: &str, report: &mut Report) {
    let Some(terms) = value.as_array() else {
        report.error(format!("{p}.searchTerms must be an array"));
        return;
    };
    for (i, term) in terms.iter().enumerate() {
        if !matches!(term, Value::String(s) if !s.trim().is_empty()) {
            report.error(format!("{p}.searchTerms[{i}] must be a non-empty string"));
        }
    }
}

fn validate_content(content: &str, p: &str, report: &mut Report) {
    if !content.contains("**") {
        report.warning(format!("{p}.content should use **bold** formatting for headers"));
    }
    if !content.contains('☐') {
        report.warning(format!("{p}.content should use ☐ for checkboxes"));
    }
    let missing: Vec<&str> = RECOMMENDED_SECTIONS
        .iter()
        .copied()
        .filter(|section| !content.contains(section))
        .collect();
    if !missing.is_empty() {
        report.warning(format!(
            "{p}.content missing recommended sections: {}",
            missing.join(", ")
        ));
    }
}
