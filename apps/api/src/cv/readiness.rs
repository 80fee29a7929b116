//! Export readiness: a non-blocking, per-section health report for the CV.
//!
//! Nothing here prevents export. Gaps are reported so the wizard can prompt the
//! user, and the normalizer fills whatever is still missing at export time.

use serde::Serialize;
use tracing::debug;

use crate::cv::additional::resolve_additional;
use crate::models::cv::{is_blank, CvDocument, SkillBucket};

pub const MIN_SUMMARY_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Partial,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionReadiness {
    pub section: &'static str,
    pub status: SectionStatus,
    pub filled: usize,
    pub expected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    /// Fraction of sections that are complete, 0.0–1.0.
    pub overall_score: f64,
    pub sections: Vec<SectionReadiness>,
    pub missing_sections: Vec<&'static str>,
    pub warnings: Vec<String>,
}

impl ReadinessReport {
    pub fn section(&self, name: &str) -> Option<&SectionReadiness> {
        self.sections.iter().find(|s| s.section == name)
    }
}

fn status_for(filled: usize, expected: usize) -> SectionStatus {
    match filled {
        0 => SectionStatus::Missing,
        n if n >= expected => SectionStatus::Complete,
        _ => SectionStatus::Partial,
    }
}

fn count_filled(fields: &[&String]) -> usize {
    fields.iter().filter(|f| !is_blank(f)).count()
}

fn section(section: &'static str, filled: usize, expected: usize) -> SectionReadiness {
    SectionReadiness {
        section,
        status: status_for(filled, expected),
        filled,
        expected,
    }
}

/// Loose `local@domain.tld` shape check; the wizard form does the strict one.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

pub fn compute_readiness(doc: &CvDocument) -> ReadinessReport {
    let mut warnings = Vec::new();

    let personal = section(
        "personal",
        count_filled(&[
            &doc.first_name,
            &doc.last_name,
            &doc.email,
            &doc.phone,
            &doc.city,
            &doc.country,
        ]),
        6,
    );
    if doc.full_name().is_empty() {
        warnings.push("No name entered; the sample name will be used".to_string());
    }
    if !is_blank(&doc.email) && !looks_like_email(&doc.email) {
        warnings.push(format!("E-mail address '{}' does not look valid", doc.email.trim()));
    }

    let professional = section(
        "professional",
        count_filled(&[&doc.job_title, &doc.professional_summary]),
        2,
    );
    let summary_chars = doc.professional_summary.trim().chars().count();
    if summary_chars > 0 && summary_chars < MIN_SUMMARY_CHARS {
        warnings.push(format!(
            "Professional summary is {summary_chars} characters; at least {MIN_SUMMARY_CHARS} are recommended"
        ));
    }

    let renderable_experiences = doc.experiences.iter().filter(|e| e.is_renderable()).count();
    let experience = section("experience", renderable_experiences, 1);
    if renderable_experiences == 0 {
        warnings.push(
            "No work experience with a job title or company; a sample entry will be shown"
                .to_string(),
        );
    }

    let renderable_educations = doc.educations.iter().filter(|e| e.is_renderable()).count();
    let education = section("education", renderable_educations, 1);

    // Two or more populated buckets reads as a complete skills section.
    let populated_buckets = SkillBucket::ALL
        .iter()
        .filter(|bucket| {
            doc.skills
                .bucket(**bucket)
                .iter()
                .any(|entry| !entry.name().trim().is_empty())
        })
        .count();
    let skills = section("skills", populated_buckets, 2);

    let resolved = resolve_additional(doc);
    let additional_filled = [
        !resolved.languages.is_empty(),
        !resolved.certifications.is_empty(),
        !resolved.interests.is_empty(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    let additional = section("additional", additional_filled, 1);

    let sections = vec![personal, professional, experience, education, skills, additional];
    let complete = sections
        .iter()
        .filter(|s| s.status == SectionStatus::Complete)
        .count();
    let missing_sections = sections
        .iter()
        .filter(|s| s.status == SectionStatus::Missing)
        .map(|s| s.section)
        .collect();

    debug!(complete, warnings = warnings.len(), "Readiness computed");

    ReadinessReport {
        overall_score: complete as f64 / sections.len() as f64,
        sections,
        missing_sections,
        warnings,
    }
}
