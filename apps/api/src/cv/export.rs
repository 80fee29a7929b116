//! Export pipeline: normalize → project → flow → PDF bytes.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::cv::normalizer::normalize;
use crate::layout::flow::flow_document;
use crate::layout::font_metrics::PageConfig;
use crate::layout::projector::{project, ProjectionOptions, SkillLayout};
use crate::layout::tree::DocumentTree;
use crate::models::cv::CvDocument;
use crate::render::pdf::{write_pdf, PdfMetadata};

const FILE_SUFFIX: &str = "CV.pdf";

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub skill_layout: SkillLayout,
    /// Date printed in the page footer; no footer when `None`.
    pub generated_on: Option<NaiveDate>,
    /// Written to the PDF info dictionary.
    pub created_at: Option<DateTime<Utc>>,
}

impl ExportOptions {
    fn projection(&self) -> ProjectionOptions {
        ProjectionOptions {
            skill_layout: self.skill_layout,
            generated_on: self.generated_on,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub file_name: String,
    pub document: DocumentTree,
}

#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Bytes,
}

/// `"<firstName>_<lastName>_CV.pdf"`, with every run of whitespace collapsed
/// to a single underscore. Control characters, quotes, backslashes and path
/// separators are dropped.
pub fn derive_file_name(first_name: &str, last_name: &str) -> String {
    let first = file_name_part(first_name);
    let last = file_name_part(last_name);
    let stem: Vec<&str> = first
        .split_whitespace()
        .chain(last.split_whitespace())
        .collect();
    if stem.is_empty() {
        FILE_SUFFIX.to_string()
    } else {
        format!("{}_{FILE_SUFFIX}", stem.join("_"))
    }
}

fn file_name_part(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/'))
        .collect()
}

/// `Content-Disposition` value for the download: a quoted ASCII fallback plus
/// the RFC 6266 `filename*` form carrying the UTF-8 name.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_control() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

/// The normalized document tree the PDF is drawn from. The caller's
/// document is left untouched.
pub fn preview(doc: &CvDocument, options: &ExportOptions) -> Preview {
    let normalized = normalize(Some(doc));
    Preview {
        file_name: derive_file_name(&normalized.first_name, &normalized.last_name),
        document: project(&normalized, &options.projection()),
    }
}

pub fn export_pdf(doc: &CvDocument, options: &ExportOptions, page_config: &PageConfig) -> ExportedPdf {
    let Preview {
        file_name,
        document,
    } = preview(doc, options);

    let layout = flow_document(&document, page_config);
    let metadata = PdfMetadata {
        title: file_name.trim_end_matches(".pdf").to_string(),
        created_at: options.created_at,
    };
    let bytes = Bytes::from(write_pdf(&layout, &metadata));

    info!(
        file_name = %file_name,
        pages = layout.page_count(),
        size = bytes.len(),
        "CV exported"
    );

    ExportedPdf {
        file_name,
        page_count: layout.page_count(),
        bytes,
    }
}
