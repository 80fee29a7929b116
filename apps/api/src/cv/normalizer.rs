//! Field normalization: produces a fully populated copy of a CV Document so
//! the template never renders a visually broken page.
//!
//! The sample values are placeholders, not user intent. Normalization works on
//! a copy, is deterministic, and cannot fail.

use serde_json::Value;

use crate::models::cv::{is_blank, CvDocument, Education, Experience, SkillBucket, SkillEntry};

pub const SAMPLE_FIRST_NAME: &str = "John";
pub const SAMPLE_LAST_NAME: &str = "Doe";
pub const SAMPLE_EMAIL: &str = "john.doe@example.com";
pub const SAMPLE_PHONE: &str = "+1 (555) 123-4567";
pub const SAMPLE_CITY: &str = "New York";
pub const SAMPLE_COUNTRY: &str = "United States";
pub const SAMPLE_PROFILE_PICTURE_URL: &str = "https://example.com/profile.png";
pub const SAMPLE_JOB_TITLE: &str = "Software Engineer";
pub const SAMPLE_SUMMARY: &str = "Results-driven software engineer with experience designing, \
building and shipping reliable web applications. Comfortable across the stack and focused on \
clean code, measurable impact and close collaboration with product teams.";
pub const SAMPLE_PORTFOLIO_URL: &str = "https://johndoe.dev";
pub const SAMPLE_GITHUB_URL: &str = "https://github.com/johndoe";
pub const SAMPLE_LINKEDIN_URL: &str = "https://linkedin.com/in/johndoe";
pub const SAMPLE_LANGUAGES: &str = "English (Native), Spanish (Intermediate)";
pub const SAMPLE_CERTIFICATIONS: &str = "AWS Certified Solutions Architect - Associate";
pub const SAMPLE_INTERESTS: &str = "Open source, Hiking, Photography";

fn sample_experience() -> Experience {
    Experience {
        job_title: SAMPLE_JOB_TITLE.to_string(),
        company: "Tech Solutions Inc.".to_string(),
        location: "New York, NY".to_string(),
        start_date: "2021-03".to_string(),
        end_date: String::new(),
        current: true,
        description: "Developed and maintained customer-facing web applications, collaborating \
                      with designers and product managers to deliver new features on schedule."
            .to_string(),
    }
}

fn sample_education() -> Education {
    Education {
        degree: "Bachelor of Science".to_string(),
        institution: "State University".to_string(),
        field_of_study: "Computer Science".to_string(),
        start_year: "2016".to_string(),
        end_year: "2020".to_string(),
        ..Education::default()
    }
}

fn sample_skills(bucket: SkillBucket) -> Vec<SkillEntry> {
    let names: &[&str] = match bucket {
        SkillBucket::Technical => &["JavaScript", "Python", "SQL"],
        SkillBucket::Soft => &["Communication", "Teamwork", "Problem Solving"],
        SkillBucket::Creative => &["UI Design", "Technical Writing"],
        SkillBucket::Analytical => &["Data Analysis", "Debugging"],
    };
    names.iter().map(|name| SkillEntry::plain(*name)).collect()
}

/// Returns a fully populated copy of `doc`. `None` yields the complete sample document.
///
/// Blank scalars get their sample value. `experiences` / `educations` with no
/// renderable entry (empty, or only blank forms as a fresh wizard has) are
/// replaced by one sample entry each; each empty skill bucket gets a short
/// sample list. Everything else passes through untouched.
pub fn normalize(doc: Option<&CvDocument>) -> CvDocument {
    let mut out = doc.cloned().unwrap_or_default();

    fill(&mut out.first_name, SAMPLE_FIRST_NAME);
    fill(&mut out.last_name, SAMPLE_LAST_NAME);
    fill(&mut out.email, SAMPLE_EMAIL);
    fill(&mut out.phone, SAMPLE_PHONE);
    fill(&mut out.city, SAMPLE_CITY);
    fill(&mut out.country, SAMPLE_COUNTRY);
    fill(&mut out.profile_picture_url, SAMPLE_PROFILE_PICTURE_URL);
    fill(&mut out.job_title, SAMPLE_JOB_TITLE);
    fill(&mut out.professional_summary, SAMPLE_SUMMARY);
    fill(&mut out.portfolio_url, SAMPLE_PORTFOLIO_URL);
    fill(&mut out.github_url, SAMPLE_GITHUB_URL);
    fill(&mut out.linkedin_url, SAMPLE_LINKEDIN_URL);
    fill(&mut out.languages, SAMPLE_LANGUAGES);
    fill(&mut out.certifications, SAMPLE_CERTIFICATIONS);
    fill(&mut out.interests, SAMPLE_INTERESTS);

    if !out.experiences.iter().any(Experience::is_renderable) {
        out.experiences = vec![sample_experience()];
    }
    if !out.educations.iter().any(Education::is_renderable) {
        out.educations = vec![sample_education()];
    }
    for bucket in SkillBucket::ALL {
        let entries = out.skills.bucket_mut(bucket);
        if entries.is_empty() {
            *entries = sample_skills(bucket);
        }
    }

    out
}

/// Normalizes raw JSON input. Values that are not document-shaped are treated
/// as an absent document.
pub fn normalize_value(value: &Value) -> CvDocument {
    normalize(CvDocument::from_value(value).as_ref())
}

fn fill(field: &mut String, sample: &str) {
    if is_blank(field) {
        *field = sample.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::projector::{project, ProjectionOptions};
    use crate::layout::tree::SectionKind;
    use crate::models::cv::Skills;
    use serde_json::json;

    fn scalars(doc: &CvDocument) -> Vec<&str> {
        vec![
            doc.first_name.as_str(),
            doc.last_name.as_str(),
            doc.email.as_str(),
            doc.phone.as_str(),
            doc.city.as_str(),
            doc.country.as_str(),
            doc.profile_picture_url.as_str(),
            doc.job_title.as_str(),
            doc.professional_summary.as_str(),
            doc.portfolio_url.as_str(),
            doc.github_url.as_str(),
            doc.linkedin_url.as_str(),
            doc.languages.as_str(),
            doc.certifications.as_str(),
            doc.interests.as_str(),
        ]
    }

    #[test]
    fn test_absent_document_becomes_full_sample() {
        let doc = normalize(None);
        assert_eq!(doc.full_name(), "John Doe");
        assert!(scalars(&doc).iter().all(|s| !s.is_empty()));
        assert_eq!(doc.experiences.len(), 1);
        assert_eq!(doc.educations.len(), 1);
    }

    #[test]
    fn test_minimal_document_scenario() {
        let input: CvDocument = serde_json::from_value(json!({
            "firstName": "",
            "lastName": "",
            "experiences": [],
            "educations": [],
            "skills": { "technical": [], "soft": [], "creative": [], "analytical": [] }
        }))
        .unwrap();
        let doc = normalize(Some(&input));
        assert_eq!(doc.first_name, SAMPLE_FIRST_NAME);
        assert_eq!(doc.last_name, SAMPLE_LAST_NAME);
        assert_eq!(doc.experiences, vec![sample_experience()]);
        assert_eq!(doc.educations, vec![sample_education()]);
        assert!(!doc.skills.technical.is_empty());
        assert!(!doc.skills.soft.is_empty());
    }

    #[test]
    fn test_every_scalar_is_filled_for_any_missing_subset() {
        let partial = CvDocument {
            first_name: "Ada".into(),
            phone: "   ".into(),
            github_url: "https://github.com/ada".into(),
            ..CvDocument::default()
        };
        let doc = normalize(Some(&partial));
        assert!(scalars(&doc).iter().all(|s| !s.trim().is_empty()));
        assert_eq!(doc.first_name, "Ada");
        assert_eq!(doc.phone, SAMPLE_PHONE);
        assert_eq!(doc.github_url, "https://github.com/ada");
    }

    #[test]
    fn test_non_empty_sequences_pass_through() {
        let entered = Experience {
            company: "Acme".into(),
            ..Experience::default()
        };
        let input = CvDocument {
            experiences: vec![entered.clone(), Experience::default()],
            skills: Skills {
                analytical: vec![SkillEntry::rated("Statistics", 4)],
                ..Skills::default()
            },
            ..CvDocument::default()
        };
        let doc = normalize(Some(&input));
        assert_eq!(doc.experiences, vec![entered, Experience::default()]);
        assert_eq!(doc.skills.analytical, vec![SkillEntry::rated("Statistics", 4)]);
        assert_eq!(doc.skills.creative, sample_skills(SkillBucket::Creative));
    }

    #[test]
    fn test_blank_wizard_forms_are_replaced_by_samples() {
        let doc = normalize(Some(&CvDocument::wizard_start()));
        assert_eq!(doc.experiences, vec![sample_experience()]);
        assert_eq!(doc.educations, vec![sample_education()]);

        let tree = project(&doc, &ProjectionOptions::default());
        assert!(tree.has_section(SectionKind::Experience));
        assert!(tree.has_section(SectionKind::Education));
        assert_eq!(normalize(Some(&doc)), doc);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = CvDocument {
            last_name: "Lovelace".into(),
            ..CvDocument::default()
        };
        let once = normalize(Some(&input));
        let twice = normalize(Some(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fully_populated_document_is_unchanged() {
        let full = normalize(None);
        assert_eq!(normalize(Some(&full)), full);
    }

    #[test]
    fn test_caller_copy_is_not_mutated() {
        let input = CvDocument::wizard_start();
        let before = input.clone();
        let _ = normalize(Some(&input));
        assert_eq!(input, before);
    }

    #[test]
    fn test_non_document_value_normalizes_to_sample() {
        assert_eq!(normalize_value(&serde_json::Value::Null), normalize(None));
        assert_eq!(normalize_value(&json!("just text")), normalize(None));
    }

    #[test]
    fn test_malformed_bucket_is_defaulted() {
        let doc = normalize_value(&json!({ "skills": { "technical": "Rust" } }));
        assert_eq!(doc.skills.technical, sample_skills(SkillBucket::Technical));
    }
}
