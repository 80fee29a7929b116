//! Resolution between structured `additionalInfo` and the older single-string
//! fields (`languages`, `certifications`, `interests`).
//!
//! Rule: structured data wins whenever it yields at least one renderable item;
//! the legacy string is used only as a fallback. Every reader of additional
//! information goes through [`resolve_additional`].

use serde::Serialize;

use crate::cv::dates::format_month_year;
use crate::models::cv::{is_blank, Certification, CvDocument, Language, Reference};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum AdditionalContent {
    /// Display lines built from structured records.
    Structured(Vec<String>),
    /// Free text from the older single-field form.
    Legacy(String),
    Empty,
}

impl AdditionalContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, AdditionalContent::Empty)
    }

    fn resolve(structured: Vec<String>, legacy: &str) -> Self {
        if !structured.is_empty() {
            AdditionalContent::Structured(structured)
        } else if !is_blank(legacy) {
            AdditionalContent::Legacy(legacy.trim().to_string())
        } else {
            AdditionalContent::Empty
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAdditional {
    pub languages: AdditionalContent,
    pub certifications: AdditionalContent,
    pub interests: AdditionalContent,
    /// References only exist in the structured schema.
    pub references: Vec<Reference>,
}

pub fn resolve_additional(doc: &CvDocument) -> ResolvedAdditional {
    let info = doc.additional_info.clone().unwrap_or_default();

    let languages = info.languages.iter().filter_map(language_line).collect();
    let certifications = info
        .certifications
        .iter()
        .filter_map(certification_line)
        .collect();
    let interests = info
        .interests
        .iter()
        .map(|interest| interest.trim())
        .filter(|interest| !interest.is_empty())
        .map(str::to_string)
        .collect();
    let references = info
        .references
        .into_iter()
        .filter(|reference| !is_blank(&reference.name))
        .collect();

    ResolvedAdditional {
        languages: AdditionalContent::resolve(languages, &doc.languages),
        certifications: AdditionalContent::resolve(certifications, &doc.certifications),
        interests: AdditionalContent::resolve(interests, &doc.interests),
        references,
    }
}

/// "Spanish (Fluent)", or just the name when no proficiency is recorded.
pub fn language_line(language: &Language) -> Option<String> {
    let name = language.name.trim();
    if name.is_empty() {
        return None;
    }
    Some(match language.proficiency {
        Some(level) => format!("{name} ({})", level.label()),
        None => name.to_string(),
    })
}

/// "Name - Issuer (Mon YYYY)" with the missing parts left out.
pub fn certification_line(certification: &Certification) -> Option<String> {
    let name = certification.name.trim();
    if name.is_empty() {
        return None;
    }
    let mut line = name.to_string();
    let issuer = certification.issuer.trim();
    if !issuer.is_empty() {
        line.push_str(" - ");
        line.push_str(issuer);
    }
    let date = format_month_year(&certification.date);
    if !date.is_empty() {
        line.push_str(&format!(" ({date})"));
    }
    Some(line)
}

/// Lines describing one reference: name, "title at company", then contact details.
pub fn reference_lines(reference: &Reference) -> Vec<String> {
    let mut lines = vec![reference.name.trim().to_string()];
    let role = match (reference.title.trim(), reference.company.trim()) {
        ("", "") => String::new(),
        (title, "") => title.to_string(),
        ("", company) => company.to_string(),
        (title, company) => format!("{title} at {company}"),
    };
    if !role.is_empty() {
        lines.push(role);
    }
    let contact: Vec<&str> = [reference.email.trim(), reference.phone.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if !contact.is_empty() {
        lines.push(contact.join(" | "));
    }
    lines
}
