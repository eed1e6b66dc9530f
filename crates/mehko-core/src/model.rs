//! Typed model for county application documents.
//!
//! Field names on the wire are the ones the county JSON files use: camelCase
//! for `rootDomain`, `supportTools`, `formId`, `pdfUrl`, `appId`, `formName`,
//! `searchTerms`, and snake_case for `action_required` / `fill_pdf`.
//!
//! A document is only deserialized into these types after it has passed
//! [`crate::validate::validate`] — the validator walks raw JSON so it can
//! report every problem at once instead of stopping at the first serde error.

use serde::{Deserialize, Serialize};

/// One county application: the unit stored in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "rootDomain")]
    pub root_domain: String,
    #[serde(rename = "supportTools")]
    pub support_tools: SupportTools,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTools {
    #[serde(rename = "aiEnabled")]
    pub ai_enabled: bool,
    #[serde(rename = "commentsEnabled")]
    pub comments_enabled: bool,
}

/// One checklist step, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    Info(InfoStep),
    Form(FormStep),
    Pdf(PdfStep),
}

/// Informational step. `appId` is recommended but optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoStep {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default)]
    pub fill_pdf: bool,
    #[serde(rename = "appId", default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(rename = "searchTerms", default, skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<Vec<String>>,
}

/// Step pointing at a named form the applicant fills elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStep {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default)]
    pub fill_pdf: bool,
    #[serde(rename = "formName")]
    pub form_name: String,
    #[serde(rename = "searchTerms", default, skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<Vec<String>>,
}

/// Step backed by a downloadable PDF form asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfStep {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default)]
    pub fill_pdf: bool,
    #[serde(rename = "formId")]
    pub form_id: String,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(rename = "searchTerms", default, skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<Vec<String>>,
}

impl Step {
    pub fn id(&self) -> &str {
        match self {
            Step::Info(s) => &s.id,
            Step::Form(s) => &s.id,
            Step::Pdf(s) => &s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Step::Info(s) => &s.title,
            Step::Form(s) => &s.title,
            Step::Pdf(s) => &s.title,
        }
    }

    pub fn as_pdf(&self) -> Option<&PdfStep> {
        match self {
            Step::Pdf(s) => Some(s),
            _ => None,
        }
    }
}

impl Application {
    /// Deserialize a document that has already passed validation.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    /// The `pdf` steps, in checklist order.
    pub fn pdf_steps(&self) -> impl Iterator<Item = &PdfStep> {
        self.steps.iter().filter_map(Step::as_pdf)
    }
}

/// Identifier rule shared by application ids and step ids: `[a-z0-9_]+`.
pub fn is_valid_id(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
