//! PDF Projector: a pure transformation from a CV Document to a document tree.
//!
//! # Section rules
//! - Header always renders the name; job title and each contact item only when present.
//! - Links, summary and every additional section render only when their data is non-empty.
//! - Experience keeps entries with a job title or a company; education keeps entries with
//!   a degree or an institution. Entries keep the order they were supplied in.
//! - A section whose entries are all dropped is suppressed, never rendered blank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cv::additional::{reference_lines, resolve_additional, AdditionalContent};
use crate::cv::dates::{format_date_range, format_year_range};
use crate::cv::skills::{extract_skill_names, group_skill_names};
use crate::layout::tree::{
    Block, DocumentTree, EntryBlock, PageSize, Section, SectionKind, TextStyle,
};
use crate::models::cv::{is_blank, CvDocument, Education, Experience};

pub const TEMPLATE_NAME: &str = "Professional Resume Template";
pub const NO_DATA_MESSAGE: &str = "No CV data available.";

/// How the skills section is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLayout {
    /// One undifferentiated tag list (the Professional template's layout).
    #[default]
    Tags,
    /// One labelled group per non-empty bucket.
    Grouped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    pub skill_layout: SkillLayout,
    /// When set, adds the "CV generated on …" footer.
    pub generated_on: Option<NaiveDate>,
}

pub fn project(doc: &CvDocument, options: &ProjectionOptions) -> DocumentTree {
    let mut sections = vec![header_section(doc)];

    sections.extend(links_section(doc));
    sections.extend(summary_section(doc));
    sections.extend(experience_section(&doc.experiences));
    sections.extend(education_section(&doc.educations));
    sections.extend(skills_section(doc, options.skill_layout));
    sections.extend(additional_sections(doc));

    let title = doc.full_name();
    DocumentTree {
        title: if title.is_empty() { "CV".to_string() } else { title },
        page_size: PageSize::A4,
        sections,
        footer: options.generated_on.map(footer_text),
    }
}

/// Projects raw JSON. Values that are not document-shaped produce the
/// one-line "no data" document instead of an error.
pub fn project_value(value: &Value, options: &ProjectionOptions) -> DocumentTree {
    match CvDocument::from_value(value) {
        Some(doc) => project(&doc, options),
        None => no_data_document(),
    }
}

pub fn no_data_document() -> DocumentTree {
    DocumentTree {
        title: "CV".to_string(),
        page_size: PageSize::A4,
        sections: vec![Section::new(
            SectionKind::NoData,
            vec![text(TextStyle::Notice, NO_DATA_MESSAGE)],
        )],
        footer: None,
    }
}

pub fn footer_text(date: NaiveDate) -> String {
    format!("CV generated on {} | {TEMPLATE_NAME}", date.format("%m/%d/%Y"))
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn header_section(doc: &CvDocument) -> Section {
    let mut blocks = vec![text(TextStyle::Name, &doc.full_name())];
    if let Some(title) = present(&doc.job_title) {
        blocks.push(text(TextStyle::Headline, title));
    }
    for item in [present(&doc.email), present(&doc.phone)]
        .into_iter()
        .flatten()
    {
        blocks.push(text(TextStyle::Contact, item));
    }
    if let Some(location) = location_line(&doc.city, &doc.country) {
        blocks.push(text(TextStyle::Contact, &location));
    }
    Section::new(SectionKind::Header, blocks)
}

/// "City, Country" when both are present, otherwise whichever one is.
fn location_line(city: &str, country: &str) -> Option<String> {
    match (present(city), present(country)) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

fn links_section(doc: &CvDocument) -> Option<Section> {
    let blocks: Vec<Block> = [
        ("LinkedIn Profile", &doc.linkedin_url),
        ("GitHub Profile", &doc.github_url),
        ("Portfolio", &doc.portfolio_url),
    ]
    .into_iter()
    .filter_map(|(label, url)| {
        present(url).map(|url| Block::Link {
            label: label.to_string(),
            url: url.to_string(),
        })
    })
    .collect();
    non_empty_section(SectionKind::Links, blocks)
}

fn summary_section(doc: &CvDocument) -> Option<Section> {
    let summary = present(&doc.professional_summary)?;
    Some(Section::new(
        SectionKind::Summary,
        vec![text(TextStyle::Summary, summary)],
    ))
}

fn experience_section(experiences: &[Experience]) -> Option<Section> {
    let blocks = experiences
        .iter()
        .filter(|exp| exp.is_renderable())
        .map(|exp| Block::Entry(experience_entry(exp)))
        .collect();
    non_empty_section(SectionKind::Experience, blocks)
}

fn experience_entry(exp: &Experience) -> EntryBlock {
    let (title, subtitle) = title_pair(&exp.job_title, &exp.company);
    EntryBlock {
        title,
        subtitle,
        details: present(&exp.location).map(str::to_string).into_iter().collect(),
        date_range: optional(format_date_range(&exp.start_date, &exp.end_date, exp.current)),
        description: present(&exp.description).map(str::to_string),
    }
}

fn education_section(educations: &[Education]) -> Option<Section> {
    let blocks = educations
        .iter()
        .filter(|edu| edu.is_renderable())
        .map(|edu| Block::Entry(education_entry(edu)))
        .collect();
    non_empty_section(SectionKind::Education, blocks)
}

fn education_entry(edu: &Education) -> EntryBlock {
    let (title, subtitle) = title_pair(&edu.degree, &edu.institution);
    let details = [
        present(&edu.field_of_study).map(str::to_string),
        present(&edu.location).map(str::to_string),
        present(&edu.gpa).map(|gpa| format!("GPA: {gpa}")),
        present(&edu.honors).map(|honors| format!("Honors: {honors}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    EntryBlock {
        title,
        subtitle,
        details,
        date_range: optional(format_year_range(&edu.start_year, &edu.end_year, edu.current)),
        description: present(&edu.description).map(str::to_string),
    }
}

fn skills_section(doc: &CvDocument, layout: SkillLayout) -> Option<Section> {
    let blocks = match layout {
        SkillLayout::Tags => {
            let items = extract_skill_names(&doc.skills);
            if items.is_empty() {
                Vec::new()
            } else {
                vec![Block::Tags { items }]
            }
        }
        SkillLayout::Grouped => group_skill_names(&doc.skills)
            .into_iter()
            .map(|group| Block::Group {
                label: group.bucket.label().to_string(),
                items: group.names,
            })
            .collect(),
    };
    non_empty_section(SectionKind::Skills, blocks)
}

fn additional_sections(doc: &CvDocument) -> Vec<Section> {
    let resolved = resolve_additional(doc);
    let mut sections = Vec::new();

    let languages = content_blocks(resolved.languages, |lines| {
        lines.into_iter().map(|line| text(TextStyle::Body, &line)).collect()
    });
    sections.extend(non_empty_section(SectionKind::Languages, languages));

    let certifications = content_blocks(resolved.certifications, |lines| {
        lines.into_iter().map(|line| text(TextStyle::Body, &line)).collect()
    });
    sections.extend(non_empty_section(SectionKind::Certifications, certifications));

    let interests = content_blocks(resolved.interests, |items| vec![Block::Tags { items }]);
    sections.extend(non_empty_section(SectionKind::Interests, interests));

    let references = resolved
        .references
        .iter()
        .map(|reference| Block::Entry(reference_entry(reference_lines(reference))))
        .collect();
    sections.extend(non_empty_section(SectionKind::References, references));

    sections
}

fn content_blocks(
    content: AdditionalContent,
    structured: impl FnOnce(Vec<String>) -> Vec<Block>,
) -> Vec<Block> {
    match content {
        AdditionalContent::Structured(lines) => structured(lines),
        AdditionalContent::Legacy(raw) => vec![text(TextStyle::Body, &raw)],
        AdditionalContent::Empty => Vec::new(),
    }
}

fn reference_entry(mut lines: Vec<String>) -> EntryBlock {
    let title = lines.remove(0);
    EntryBlock {
        title,
        subtitle: None,
        details: lines,
        date_range: None,
        description: None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn text(style: TextStyle, value: &str) -> Block {
    Block::Text {
        style,
        text: value.to_string(),
    }
}

fn present(value: &str) -> Option<&str> {
    (!is_blank(value)).then(|| value.trim())
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Primary line and optional secondary line. When the primary field is blank the
/// secondary one is promoted so an entry never starts with an empty heading.
fn title_pair(primary: &str, secondary: &str) -> (String, Option<String>) {
    match (present(primary), present(secondary)) {
        (Some(primary), secondary) => (primary.to_string(), secondary.map(str::to_string)),
        (None, Some(secondary)) => (secondary.to_string(), None),
        (None, None) => (String::new(), None),
    }
}

fn non_empty_section(kind: SectionKind, blocks: Vec<Block>) -> Option<Section> {
    (!blocks.is_empty()).then(|| Section::new(kind, blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{
        AdditionalInfo, Certification, Language, Proficiency, Reference, SkillEntry, Skills,
    };
    use serde_json::json;

    fn options() -> ProjectionOptions {
        ProjectionOptions::default()
    }

    fn base_doc() -> CvDocument {
        CvDocument {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..CvDocument::default()
        }
    }

    fn entries(tree: &DocumentTree, kind: SectionKind) -> Vec<EntryBlock> {
        tree.section(kind)
            .map(|section| {
                section
                    .blocks
                    .iter()
                    .filter_map(|block| match block {
                        Block::Entry(entry) => Some(entry.clone()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn texts(section: &Section) -> Vec<String> {
        section
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    // ── header ──────────────────────────────────────────────────────────────

    #[test]
    fn test_header_always_renders_name() {
        let tree = project(&CvDocument::default(), &options());
        let header = tree.section(SectionKind::Header).unwrap();
        assert_eq!(header.blocks.len(), 1);
        assert_eq!(tree.sections.len(), 1);
    }

    #[test]
    fn test_contact_items_render_independently() {
        let doc = CvDocument {
            job_title: "Analyst".into(),
            phone: "555-0100".into(),
            country: "UK".into(),
            ..base_doc()
        };
        let tree = project(&doc, &options());
        let header = tree.section(SectionKind::Header).unwrap();
        assert_eq!(texts(header), vec!["Ada Lovelace", "Analyst", "555-0100", "UK"]);
    }

    #[test]
    fn test_city_and_country_join_with_comma() {
        assert_eq!(location_line("Paris", "France").as_deref(), Some("Paris, France"));
        assert_eq!(location_line("Paris", "").as_deref(), Some("Paris"));
        assert_eq!(location_line(" ", " "), None);
    }

    // ── links / summary ─────────────────────────────────────────────────────

    #[test]
    fn test_links_render_only_when_present() {
        assert!(!project(&base_doc(), &options()).has_section(SectionKind::Links));

        let doc = CvDocument {
            github_url: "https://github.com/ada".into(),
            ..base_doc()
        };
        let tree = project(&doc, &options());
        let links = tree.section(SectionKind::Links).unwrap();
        assert_eq!(
            links.blocks,
            vec![Block::Link {
                label: "GitHub Profile".into(),
                url: "https://github.com/ada".into()
            }]
        );
    }

    #[test]
    fn test_empty_summary_is_suppressed() {
        let doc = CvDocument {
            professional_summary: String::new(),
            ..base_doc()
        };
        assert!(!project(&doc, &options()).has_section(SectionKind::Summary));

        let doc = CvDocument {
            professional_summary: "Mathematician".into(),
            ..base_doc()
        };
        let tree = project(&doc, &options());
        let summary = tree.section(SectionKind::Summary).unwrap();
        assert_eq!(summary.heading.as_deref(), Some("PROFESSIONAL SUMMARY"));
    }

    // ── experience ──────────────────────────────────────────────────────────

    #[test]
    fn test_blank_experience_produces_no_blocks() {
        let doc = CvDocument {
            experiences: vec![Experience::default()],
            ..base_doc()
        };
        let tree = project(&doc, &options());
        assert!(!tree.has_section(SectionKind::Experience));
    }

    #[test]
    fn test_current_job_renders_present() {
        let doc = CvDocument {
            experiences: vec![Experience {
                job_title: "Eng".into(),
                company: "Acme".into(),
                start_date: "2022-01".into(),
                end_date: "2019-01".into(),
                current: true,
                ..Experience::default()
            }],
            ..base_doc()
        };
        let items = entries(&project(&doc, &options()), SectionKind::Experience);
        let entry = &items[0];
        assert_eq!(entry.date_range.as_deref(), Some("Jan 2022 \u{2013} Present"));
        assert_eq!(entry.title, "Eng");
        assert_eq!(entry.subtitle.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_experience_keeps_supplied_order_and_either_key() {
        let doc = CvDocument {
            experiences: vec![
                Experience {
                    company: "Later Co".into(),
                    start_date: "2023-05".into(),
                    ..Experience::default()
                },
                Experience::default(),
                Experience {
                    job_title: "Intern".into(),
                    start_date: "2010-01".into(),
                    end_date: "bad".into(),
                    ..Experience::default()
                },
            ],
            ..base_doc()
        };
        let items = entries(&project(&doc, &options()), SectionKind::Experience);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Later Co");
        assert_eq!(items[0].subtitle, None);
        assert_eq!(items[1].title, "Intern");
        assert_eq!(items[1].date_range.as_deref(), Some("Jan 2010 \u{2013} bad"));
    }

    // ── education ───────────────────────────────────────────────────────────

    #[test]
    fn test_education_keeps_entries_with_either_key() {
        let doc = CvDocument {
            educations: vec![
                Education {
                    degree: "MSc Mathematics".into(),
                    ..Education::default()
                },
                Education {
                    field_of_study: "History".into(),
                    ..Education::default()
                },
                Education {
                    institution: "Open University".into(),
                    ..Education::default()
                },
            ],
            ..base_doc()
        };
        let items = entries(&project(&doc, &options()), SectionKind::Education);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "MSc Mathematics");
        assert_eq!(items[0].subtitle, None);
        assert_eq!(items[1].title, "Open University");
        assert_eq!(items[1].subtitle, None);
    }

    #[test]
    fn test_education_entry_details() {
        let doc = CvDocument {
            educations: vec![
                Education {
                    degree: "BSc".into(),
                    institution: "MIT".into(),
                    field_of_study: "Physics".into(),
                    start_year: "2015".into(),
                    end_year: "2019".into(),
                    gpa: "3.9".into(),
                    ..Education::default()
                },
                Education::default(),
            ],
            ..base_doc()
        };
        let items = entries(&project(&doc, &options()), SectionKind::Education);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].details, vec!["Physics", "GPA: 3.9"]);
        assert_eq!(items[0].date_range.as_deref(), Some("2015 \u{2013} 2019"));
    }

    // ── skills ──────────────────────────────────────────────────────────────

    fn skilled_doc() -> CvDocument {
        CvDocument {
            skills: Skills {
                technical: vec![SkillEntry::plain("Go"), SkillEntry::rated("Rust", 5)],
                analytical: vec![SkillEntry::plain("Statistics")],
                ..Skills::default()
            },
            ..base_doc()
        }
    }

    #[test]
    fn test_skills_as_tag_list() {
        let tree = project(&skilled_doc(), &options());
        let skills = tree.section(SectionKind::Skills).unwrap();
        assert_eq!(
            skills.blocks,
            vec![Block::Tags {
                items: vec!["Go".into(), "Rust".into(), "Statistics".into()]
            }]
        );
    }

    #[test]
    fn test_skills_grouped_omits_empty_categories() {
        let opts = ProjectionOptions {
            skill_layout: SkillLayout::Grouped,
            ..options()
        };
        let tree = project(&skilled_doc(), &opts);
        let labels: Vec<String> = tree
            .section(SectionKind::Skills)
            .unwrap()
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Group { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Technical Skills", "Analytical Skills"]);
    }

    #[test]
    fn test_no_skills_no_section() {
        assert!(!project(&base_doc(), &options()).has_section(SectionKind::Skills));
    }

    // ── additional ──────────────────────────────────────────────────────────

    #[test]
    fn test_legacy_additional_fields_render_as_text() {
        let doc = CvDocument {
            languages: "English, French".into(),
            ..base_doc()
        };
        let tree = project(&doc, &options());
        let languages = tree.section(SectionKind::Languages).unwrap();
        assert_eq!(texts(languages), vec!["English, French"]);
        assert!(!tree.has_section(SectionKind::Certifications));
        assert!(!tree.has_section(SectionKind::Interests));
    }

    #[test]
    fn test_structured_additional_info_wins() {
        let doc = CvDocument {
            languages: "ignored".into(),
            additional_info: Some(AdditionalInfo {
                languages: vec![Language {
                    name: "French".into(),
                    proficiency: Some(Proficiency::Advanced),
                }],
                certifications: vec![Certification {
                    name: "CKA".into(),
                    issuer: "CNCF".into(),
                    date: String::new(),
                }],
                interests: vec!["Chess".into(), "Go".into()],
                references: vec![Reference {
                    name: "Grace Hopper".into(),
                    ..Reference::default()
                }],
            }),
            ..base_doc()
        };
        let tree = project(&doc, &options());
        assert_eq!(
            texts(tree.section(SectionKind::Languages).unwrap()),
            vec!["French (Advanced)"]
        );
        assert_eq!(
            texts(tree.section(SectionKind::Certifications).unwrap()),
            vec!["CKA - CNCF"]
        );
        assert_eq!(
            tree.section(SectionKind::Interests).unwrap().blocks,
            vec![Block::Tags {
                items: vec!["Chess".into(), "Go".into()]
            }]
        );
        assert_eq!(entries(&tree, SectionKind::References)[0].title, "Grace Hopper");
    }

    #[test]
    fn test_section_order_follows_template() {
        let doc = crate::cv::normalizer::normalize(None);
        let kinds: Vec<SectionKind> = project(&doc, &options())
            .sections
            .iter()
            .map(|section| section.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Header,
                SectionKind::Links,
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
                SectionKind::Languages,
                SectionKind::Certifications,
                SectionKind::Interests,
            ]
        );
    }

    // ── footer / fallbacks ──────────────────────────────────────────────────

    #[test]
    fn test_footer_only_when_date_given() {
        assert!(project(&base_doc(), &options()).footer.is_none());
        let opts = ProjectionOptions {
            generated_on: NaiveDate::from_ymd_opt(2024, 3, 9),
            ..options()
        };
        assert_eq!(
            project(&base_doc(), &opts).footer.as_deref(),
            Some("CV generated on 03/09/2024 | Professional Resume Template")
        );
    }

    #[test]
    fn test_non_document_value_projects_no_data() {
        let tree = project_value(&Value::Null, &options());
        assert_eq!(tree, no_data_document());
        let tree = project_value(&json!([1, 2, 3]), &options());
        assert!(tree.has_section(SectionKind::NoData));
    }

    #[test]
    fn test_document_value_is_projected() {
        let tree = project_value(&json!({ "firstName": "Ada", "lastName": "L" }), &options());
        assert_eq!(tree.title, "Ada L");
        assert!(!tree.has_section(SectionKind::NoData));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let doc = crate::cv::normalizer::normalize(None);
        assert_eq!(project(&doc, &options()), project(&doc, &options()));
    }
}
