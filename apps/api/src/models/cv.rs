//! The CV Document: the single aggregate the wizard accumulates and the
//! projector reads.
//!
//! Input is lenient by contract. Scalars accept strings or numbers, sequences
//! skip malformed elements, and any value with the wrong shape deserializes as
//! if it were absent. Deserializing a JSON object into a `CvDocument` never fails.

use std::fmt;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rated skills default to the middle of the 1–5 scale.
pub const DEFAULT_SKILL_LEVEL: u8 = 3;
pub const MIN_SKILL_LEVEL: u8 = 1;
pub const MAX_SKILL_LEVEL: u8 = 5;

/// True when the string is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field readers
// ────────────────────────────────────────────────────────────────────────────

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(seq_from_value(value))
}

fn seq_from_value<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Strings pass through, numbers are printed, everything else reads as empty.
pub(crate) fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn skill_level_from_value(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match raw {
        Some(level) => level.clamp(MIN_SKILL_LEVEL as u64, MAX_SKILL_LEVEL as u64) as u8,
        None => DEFAULT_SKILL_LEVEL,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience / Education
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(deserialize_with = "lenient_text")]
    pub job_title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub company: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
    /// `YYYY-MM`, or empty.
    #[serde(deserialize_with = "lenient_text")]
    pub start_date: String,
    /// `YYYY-MM`, or empty. Ignored when `current` is set.
    #[serde(deserialize_with = "lenient_text")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient_flag")]
    pub current: bool,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
}

impl Experience {
    /// An entry with neither a job title nor a company is dropped from the document.
    pub fn is_renderable(&self) -> bool {
        !is_blank(&self.job_title) || !is_blank(&self.company)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_text")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_text")]
    pub institution: String,
    #[serde(deserialize_with = "lenient_text")]
    pub field_of_study: String,
    #[serde(deserialize_with = "lenient_text")]
    pub start_year: String,
    #[serde(deserialize_with = "lenient_text")]
    pub end_year: String,
    #[serde(deserialize_with = "lenient_flag")]
    pub current: bool,
    #[serde(deserialize_with = "lenient_text")]
    pub gpa: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub honors: String,
}

impl Education {
    pub fn is_renderable(&self) -> bool {
        !is_blank(&self.degree) || !is_blank(&self.institution)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// A skill is stored either as a bare name or as a rated record.
///
/// Both shapes occur in saved documents; readers go through [`SkillEntry::name`]
/// rather than matching on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SkillEntry {
    PlainName(String),
    Rated { name: String, level: u8 },
}

impl SkillEntry {
    pub fn plain(name: impl Into<String>) -> Self {
        SkillEntry::PlainName(name.into())
    }

    pub fn rated(name: impl Into<String>, level: u8) -> Self {
        SkillEntry::Rated {
            name: name.into(),
            level: level.clamp(MIN_SKILL_LEVEL, MAX_SKILL_LEVEL),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SkillEntry::PlainName(name) => name,
            SkillEntry::Rated { name, .. } => name,
        }
    }

    pub fn level(&self) -> Option<u8> {
        match self {
            SkillEntry::PlainName(_) => None,
            SkillEntry::Rated { level, .. } => Some(*level),
        }
    }

    /// Returns `None` for values that are neither a string nor a record.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(SkillEntry::PlainName(name.clone())),
            Value::Object(fields) => Some(SkillEntry::Rated {
                name: fields.get("name").map(text_from_value).unwrap_or_default(),
                level: fields
                    .get("level")
                    .map(skill_level_from_value)
                    .unwrap_or(DEFAULT_SKILL_LEVEL),
            }),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for SkillEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        SkillEntry::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom("skill entry must be a string or a {name, level} record")
        })
    }
}

/// One of the four named skill categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillBucket {
    Technical,
    Soft,
    Creative,
    Analytical,
}

impl SkillBucket {
    /// Fixed reading order used everywhere skills are flattened or listed.
    pub const ALL: [SkillBucket; 4] = [
        SkillBucket::Technical,
        SkillBucket::Soft,
        SkillBucket::Creative,
        SkillBucket::Analytical,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SkillBucket::Technical => "technical",
            SkillBucket::Soft => "soft",
            SkillBucket::Creative => "creative",
            SkillBucket::Analytical => "analytical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillBucket::Technical => "Technical Skills",
            SkillBucket::Soft => "Soft Skills",
            SkillBucket::Creative => "Creative Skills",
            SkillBucket::Analytical => "Analytical Skills",
        }
    }
}

impl fmt::Display for SkillBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SkillBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillBucket::ALL
            .into_iter()
            .find(|bucket| bucket.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown skill bucket '{s}'"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Skills {
    pub technical: Vec<SkillEntry>,
    pub soft: Vec<SkillEntry>,
    pub creative: Vec<SkillEntry>,
    pub analytical: Vec<SkillEntry>,
}

impl Skills {
    pub fn bucket(&self, bucket: SkillBucket) -> &[SkillEntry] {
        match bucket {
            SkillBucket::Technical => &self.technical,
            SkillBucket::Soft => &self.soft,
            SkillBucket::Creative => &self.creative,
            SkillBucket::Analytical => &self.analytical,
        }
    }

    pub fn bucket_mut(&mut self, bucket: SkillBucket) -> &mut Vec<SkillEntry> {
        match bucket {
            SkillBucket::Technical => &mut self.technical,
            SkillBucket::Soft => &mut self.soft,
            SkillBucket::Creative => &mut self.creative,
            SkillBucket::Analytical => &mut self.analytical,
        }
    }

    pub fn is_empty(&self) -> bool {
        SkillBucket::ALL
            .into_iter()
            .all(|bucket| self.bucket(bucket).is_empty())
    }

    /// Reads the four-bucket record; a comma-separated string is the older
    /// single-field form and lands in the technical bucket.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(fields) => {
                let read = |key: &str| -> Vec<SkillEntry> {
                    match fields.get(key) {
                        Some(Value::Array(items)) => {
                            items.iter().filter_map(SkillEntry::from_value).collect()
                        }
                        _ => Vec::new(),
                    }
                };
                Skills {
                    technical: read("technical"),
                    soft: read("soft"),
                    creative: read("creative"),
                    analytical: read("analytical"),
                }
            }
            Value::String(legacy) => Skills {
                technical: legacy
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(SkillEntry::plain)
                    .collect(),
                ..Skills::default()
            },
            _ => Skills::default(),
        }
    }
}

impl<'de> Deserialize<'de> for Skills {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Skills::from_value(&value))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Additional information
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Fluent,
    Native,
}

impl Proficiency {
    pub fn label(self) -> &'static str {
        match self {
            Proficiency::Beginner => "Beginner",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::Advanced => "Advanced",
            Proficiency::Fluent => "Fluent",
            Proficiency::Native => "Native",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<Proficiency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub issuer: String,
    #[serde(deserialize_with = "lenient_text")]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub company: String,
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: String,
}

/// Structured additional information (the newer schema).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalInfo {
    #[serde(deserialize_with = "lenient_seq")]
    pub languages: Vec<Language>,
    #[serde(deserialize_with = "lenient_seq")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "lenient_seq")]
    pub interests: Vec<String>,
    #[serde(deserialize_with = "lenient_seq")]
    pub references: Vec<Reference>,
}

// ────────────────────────────────────────────────────────────────────────────
// CV Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvDocument {
    // Personal
    #[serde(deserialize_with = "lenient_text")]
    pub first_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub last_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_text")]
    pub city: String,
    #[serde(deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(deserialize_with = "lenient_text")]
    pub profile_picture_url: String,

    // Professional
    #[serde(deserialize_with = "lenient_text")]
    pub job_title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub professional_summary: String,
    #[serde(deserialize_with = "lenient_text")]
    pub portfolio_url: String,
    #[serde(deserialize_with = "lenient_text")]
    pub github_url: String,
    #[serde(deserialize_with = "lenient_text")]
    pub linkedin_url: String,

    #[serde(deserialize_with = "lenient_seq")]
    pub experiences: Vec<Experience>,
    #[serde(deserialize_with = "lenient_seq")]
    pub educations: Vec<Education>,
    pub skills: Skills,

    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,

    // Older single-field forms, kept as a fallback for `additional_info`.
    #[serde(deserialize_with = "lenient_text")]
    pub languages: String,
    #[serde(deserialize_with = "lenient_text")]
    pub certifications: String,
    #[serde(deserialize_with = "lenient_text")]
    pub interests: String,
}

impl CvDocument {
    /// The state a fresh wizard starts from: every field blank, with one empty
    /// experience and one empty education form ready to fill in.
    pub fn wizard_start() -> Self {
        CvDocument {
            experiences: vec![Experience::default()],
            educations: vec![Education::default()],
            ..CvDocument::default()
        }
    }

    /// Reads a document from an arbitrary JSON value. Only objects are
    /// document-shaped; anything else returns `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
