//! Report Builder output types and the plain-text template.
//!
//! Every submitted URL yields exactly one [`ExtractionReport`], successful or
//! not. Reports render to:
//!
//! ```text
//! BEGIN
//! URL: <url>
//! Title: <title>
//! H2/H3/H4/H5: <headings joined with ", ">
//! Body:
//! <one block per line>
//! END
//! ```
//!
//! Failed reports replace the `Body:` section with `ERROR: <reason>`.

use serde::Serialize;

use crate::error::Error;
use crate::serializer::{Block, Serialized};

/// Outcome of one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Extraction result for one submitted URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// The URL as submitted.
    pub url: String,
    pub title: String,
    pub headings: Vec<String>,
    pub body_blocks: Vec<Block>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
}

impl ExtractionReport {
    /// Successful report from serialized content.
    #[must_use]
    pub fn ok(url: impl Into<String>, title: impl Into<String>, content: Serialized) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            headings: content.headings,
            body_blocks: content.blocks,
            status: Status::Ok,
            error_reason: None,
        }
    }

    /// Failed report. Carries no title, headings or blocks.
    #[must_use]
    pub fn error(url: impl Into<String>, error: &Error) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            headings: Vec::new(),
            body_blocks: Vec::new(),
            status: Status::Error,
            error_reason: Some(error.reason()),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Render with the text template, without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![
            "BEGIN".to_string(),
            labeled("URL", &self.url),
            labeled("Title", &self.title),
            labeled("H2/H3/H4/H5", &self.headings.join(", ")),
        ];

        match self.status {
            Status::Ok => {
                lines.push("Body:".to_string());
                lines.extend(self.body_blocks.iter().map(Block::render));
            }
            Status::Error => {
                lines.push(labeled("ERROR", self.error_reason.as_deref().unwrap_or_default()));
            }
        }

        lines.push("END".to_string());
        lines.join("\n")
    }
}

/// `Label: value`, or just `Label:` when the value is empty.
fn labeled(label: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{label}:")
    } else {
        format!("{label}: {value}")
    }
}

/// Render all reports, separated by a blank line and ending with a newline.
/// An empty slice renders as an empty string.
#[must_use]
pub fn render_reports(reports: &[ExtractionReport]) -> String {
    if reports.is_empty() {
        return String::new();
    }
    let mut out = reports
        .iter()
        .map(ExtractionReport::render)
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}
