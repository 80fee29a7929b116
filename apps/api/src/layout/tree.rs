//! The structured document tree produced by the projector.
//!
//! The tree is presentation-ready (styled text blocks grouped into sections)
//! but carries no coordinates; pagination happens later in `layout::flow`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageSize {
    A4,
}

impl PageSize {
    /// Width and height in PDF points.
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Links,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Interests,
    References,
    NoData,
}

impl SectionKind {
    /// Printed section heading; the header, links and notice sections have none.
    pub fn heading(self) -> Option<&'static str> {
        match self {
            SectionKind::Header | SectionKind::Links | SectionKind::NoData => None,
            SectionKind::Summary => Some("PROFESSIONAL SUMMARY"),
            SectionKind::Experience => Some("WORK EXPERIENCE"),
            SectionKind::Education => Some("EDUCATION"),
            SectionKind::Skills => Some("SKILLS"),
            SectionKind::Languages => Some("LANGUAGES"),
            SectionKind::Certifications => Some("CERTIFICATIONS"),
            SectionKind::Interests => Some("INTERESTS"),
            SectionKind::References => Some("REFERENCES"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Name,
    Headline,
    Contact,
    Summary,
    Body,
    Notice,
}

/// One experience or education item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryBlock {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Secondary lines such as location, field of study, GPA.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text { style: TextStyle, text: String },
    Link { label: String, url: String },
    Tags { items: Vec<String> },
    Group { label: String, items: Vec<String> },
    Entry(EntryBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(kind: SectionKind, blocks: Vec<Block>) -> Self {
        Section {
            kind,
            heading: kind.heading().map(str::to_string),
            blocks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTree {
    pub title: String,
    pub page_size: PageSize,
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl DocumentTree {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }
}
