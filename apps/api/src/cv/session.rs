//! The wizard session: sole owner of the CV document while it is being built.
//!
//! Each wizard page writes only its own slice through the operations below.
//! Step order is exposed for navigation but never enforced; any step may be
//! visited at any time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::cv::{
    AdditionalInfo, Certification, CvDocument, Education, Experience, Language, Reference,
    SkillBucket, SkillEntry,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{collection} index {index} is out of range ({len} entries)")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    #[error("unknown skill bucket '{0}'")]
    UnknownBucket(String),

    #[error("unknown additional section '{0}'")]
    UnknownSection(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Steps
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    #[default]
    Personal,
    Professional,
    Experience,
    Education,
    Skills,
    AdditionalInfo,
    Template,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Personal,
        WizardStep::Professional,
        WizardStep::Experience,
        WizardStep::Education,
        WizardStep::Skills,
        WizardStep::AdditionalInfo,
        WizardStep::Template,
    ];

    /// Route of the wizard page for this step.
    pub fn path(self) -> &'static str {
        match self {
            WizardStep::Personal => "/",
            WizardStep::Professional => "/professional-info",
            WizardStep::Experience => "/experience",
            WizardStep::Education => "/education",
            WizardStep::Skills => "/skills",
            WizardStep::AdditionalInfo => "/additional-info",
            WizardStep::Template => "/cv-templates",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Personal => "Personal Info",
            WizardStep::Professional => "Professional Info",
            WizardStep::Experience => "Experience",
            WizardStep::Education => "Education",
            WizardStep::Skills => "Skills",
            WizardStep::AdditionalInfo => "Additional Info",
            WizardStep::Template => "CV Templates",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            WizardStep::Personal => "personal",
            WizardStep::Professional => "professional",
            WizardStep::Experience => "experience",
            WizardStep::Education => "education",
            WizardStep::Skills => "skills",
            WizardStep::AdditionalInfo => "additional-info",
            WizardStep::Template => "template",
        }
    }

    pub fn position(self) -> usize {
        WizardStep::ALL
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<WizardStep> {
        WizardStep::ALL.get(self.position() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.position()
            .checked_sub(1)
            .and_then(|index| WizardStep::ALL.get(index).copied())
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WizardStep {
    type Err = String;

    /// Accepts either the step key or its page route.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        WizardStep::ALL
            .into_iter()
            .find(|step| step.key() == s || step.path() == s)
            .ok_or_else(|| format!("unknown wizard step '{s}'"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page payloads
// ────────────────────────────────────────────────────────────────────────────

/// Fields written by the personal-info page. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Fields written by the professional-info page. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalInfo {
    pub job_title: Option<String>,
    pub professional_summary: Option<String>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

/// The older single-string additional fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyAdditional {
    pub languages: Option<String>,
    pub certifications: Option<String>,
    pub interests: Option<String>,
}

fn apply(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdditionalSection {
    Languages,
    Certifications,
    Interests,
    References,
}

impl AdditionalSection {
    pub const ALL: [AdditionalSection; 4] = [
        AdditionalSection::Languages,
        AdditionalSection::Certifications,
        AdditionalSection::Interests,
        AdditionalSection::References,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AdditionalSection::Languages => "languages",
            AdditionalSection::Certifications => "certifications",
            AdditionalSection::Interests => "interests",
            AdditionalSection::References => "references",
        }
    }
}

impl FromStr for AdditionalSection {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdditionalSection::ALL
            .into_iter()
            .find(|section| section.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SessionError::UnknownSection(s.to_string()))
    }
}

/// Parses a skill bucket name from a route segment.
pub fn parse_bucket(s: &str) -> Result<SkillBucket, SessionError> {
    s.parse()
        .map_err(|_| SessionError::UnknownBucket(s.to_string()))
}

/// One item of a structured additional section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalItem {
    Language(Language),
    Certification(Certification),
    Interest(String),
    Reference(Reference),
}

impl AdditionalItem {
    pub fn section(&self) -> AdditionalSection {
        match self {
            AdditionalItem::Language(_) => AdditionalSection::Languages,
            AdditionalItem::Certification(_) => AdditionalSection::Certifications,
            AdditionalItem::Interest(_) => AdditionalSection::Interests,
            AdditionalItem::Reference(_) => AdditionalSection::References,
        }
    }

    /// Reads an item for `section`. Interests accept a bare string or `{ "name": … }`.
    pub fn from_value(section: AdditionalSection, value: Value) -> Option<Self> {
        match section {
            AdditionalSection::Languages => record(value).map(AdditionalItem::Language),
            AdditionalSection::Certifications => {
                record(value).map(AdditionalItem::Certification)
            }
            AdditionalSection::Interests => {
                let text = match &value {
                    Value::String(s) => s.trim().to_string(),
                    Value::Object(fields) => fields
                        .get("name")
                        .and_then(Value::as_str)
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                };
                (!text.is_empty()).then_some(AdditionalItem::Interest(text))
            }
            AdditionalSection::References => record(value).map(AdditionalItem::Reference),
        }
    }
}

fn record<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_object() {
        serde_json::from_value(value).ok()
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub step: WizardStep,
    pub document: CvDocument,
}

impl Default for WizardSession {
    fn default() -> Self {
        WizardSession::new()
    }
}

fn check_index(collection: &'static str, index: usize, len: usize) -> Result<(), SessionError> {
    if index < len {
        Ok(())
    } else {
        Err(SessionError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}

fn replace_at<T>(
    items: &mut [T],
    collection: &'static str,
    index: usize,
    value: T,
) -> Result<(), SessionError> {
    check_index(collection, index, items.len())?;
    items[index] = value;
    Ok(())
}

fn splice_out<T>(items: &mut Vec<T>, collection: &'static str, index: usize) -> Result<T, SessionError> {
    check_index(collection, index, items.len())?;
    Ok(items.remove(index))
}

impl WizardSession {
    /// A fresh session starting on the personal-info page with a blank document.
    pub fn new() -> Self {
        WizardSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            step: WizardStep::default(),
            document: CvDocument::wizard_start(),
        }
    }

    pub fn document(&self) -> &CvDocument {
        &self.document
    }

    /// Discards all entered data and starts over with a new session id.
    pub fn reset(&mut self) {
        let previous = self.id;
        *self = WizardSession::new();
        info!(previous = %previous, session_id = %self.id, "Wizard session reset");
    }

    pub fn replace_document(&mut self, document: CvDocument) {
        self.document = document;
        info!(session_id = %self.id, "CV document replaced");
    }

    pub fn update_personal(&mut self, info: PersonalInfo) {
        let doc = &mut self.document;
        apply(&mut doc.first_name, info.first_name);
        apply(&mut doc.last_name, info.last_name);
        apply(&mut doc.email, info.email);
        apply(&mut doc.phone, info.phone);
        apply(&mut doc.city, info.city);
        apply(&mut doc.country, info.country);
        apply(&mut doc.profile_picture_url, info.profile_picture_url);
        info!(session_id = %self.id, "Personal info updated");
    }

    pub fn update_professional(&mut self, info: ProfessionalInfo) {
        let doc = &mut self.document;
        apply(&mut doc.job_title, info.job_title);
        apply(&mut doc.professional_summary, info.professional_summary);
        apply(&mut doc.portfolio_url, info.portfolio_url);
        apply(&mut doc.github_url, info.github_url);
        apply(&mut doc.linkedin_url, info.linkedin_url);
        info!(session_id = %self.id, "Professional info updated");
    }

    // ── experience ──────────────────────────────────────────────────────────

    /// Appends an entry and returns its index.
    pub fn add_experience(&mut self, experience: Experience) -> usize {
        self.document.experiences.push(experience);
        let index = self.document.experiences.len() - 1;
        info!(session_id = %self.id, index, "Experience added");
        index
    }

    pub fn update_experience(&mut self, index: usize, experience: Experience) -> Result<(), SessionError> {
        replace_at(&mut self.document.experiences, "experiences", index, experience)
    }

    pub fn remove_experience(&mut self, index: usize) -> Result<Experience, SessionError> {
        let removed = splice_out(&mut self.document.experiences, "experiences", index)?;
        info!(session_id = %self.id, index, "Experience removed");
        Ok(removed)
    }

    // ── education ───────────────────────────────────────────────────────────

    pub fn add_education(&mut self, education: Education) -> usize {
        self.document.educations.push(education);
        let index = self.document.educations.len() - 1;
        info!(session_id = %self.id, index, "Education added");
        index
    }

    pub fn update_education(&mut self, index: usize, education: Education) -> Result<(), SessionError> {
        replace_at(&mut self.document.educations, "educations", index, education)
    }

    pub fn remove_education(&mut self, index: usize) -> Result<Education, SessionError> {
        let removed = splice_out(&mut self.document.educations, "educations", index)?;
        info!(session_id = %self.id, index, "Education removed");
        Ok(removed)
    }

    // ── skills ──────────────────────────────────────────────────────────────

    pub fn add_skill(&mut self, bucket: SkillBucket, entry: SkillEntry) -> usize {
        let entries = self.document.skills.bucket_mut(bucket);
        entries.push(entry);
        let index = entries.len() - 1;
        info!(session_id = %self.id, %bucket, index, "Skill added");
        index
    }

    pub fn update_skill(
        &mut self,
        bucket: SkillBucket,
        index: usize,
        entry: SkillEntry,
    ) -> Result<(), SessionError> {
        replace_at(self.document.skills.bucket_mut(bucket), bucket.key(), index, entry)
    }

    pub fn remove_skill(&mut self, bucket: SkillBucket, index: usize) -> Result<SkillEntry, SessionError> {
        let removed = splice_out(self.document.skills.bucket_mut(bucket), bucket.key(), index)?;
        info!(session_id = %self.id, %bucket, index, "Skill removed");
        Ok(removed)
    }

    // ── additional info ─────────────────────────────────────────────────────

    pub fn set_additional_info(&mut self, info: AdditionalInfo) {
        self.document.additional_info = Some(info);
        info!(session_id = %self.id, "Additional info replaced");
    }

    pub fn set_legacy_additional(&mut self, legacy: LegacyAdditional) {
        let doc = &mut self.document;
        apply(&mut doc.languages, legacy.languages);
        apply(&mut doc.certifications, legacy.certifications);
        apply(&mut doc.interests, legacy.interests);
        info!(session_id = %self.id, "Legacy additional info updated");
    }

    pub fn add_additional_item(&mut self, item: AdditionalItem) -> usize {
        let section = item.section();
        let info = self.document.additional_info.get_or_insert_with(AdditionalInfo::default);
        let index = match item {
            AdditionalItem::Language(language) => push(&mut info.languages, language),
            AdditionalItem::Certification(certification) => {
                push(&mut info.certifications, certification)
            }
            AdditionalItem::Interest(interest) => push(&mut info.interests, interest),
            AdditionalItem::Reference(reference) => push(&mut info.references, reference),
        };
        info!(session_id = %self.id, section = section.key(), index, "Additional item added");
        index
    }

    pub fn remove_additional_item(
        &mut self,
        section: AdditionalSection,
        index: usize,
    ) -> Result<AdditionalItem, SessionError> {
        let mut none = AdditionalInfo::default();
        let info = self.document.additional_info.as_mut().unwrap_or(&mut none);
        let key = section.key();
        let removed = match section {
            AdditionalSection::Languages => {
                splice_out(&mut info.languages, key, index).map(AdditionalItem::Language)
            }
            AdditionalSection::Certifications => {
                splice_out(&mut info.certifications, key, index).map(AdditionalItem::Certification)
            }
            AdditionalSection::Interests => {
                splice_out(&mut info.interests, key, index).map(AdditionalItem::Interest)
            }
            AdditionalSection::References => {
                splice_out(&mut info.references, key, index).map(AdditionalItem::Reference)
            }
        }?;
        info!(session_id = %self.id, section = key, index, "Additional item removed");
        Ok(removed)
    }

    // ── navigation ──────────────────────────────────────────────────────────

    /// Moves to the next step; stays on the last step.
    pub fn advance(&mut self) -> WizardStep {
        if let Some(next) = self.step.next() {
            self.go_to(next);
        }
        self.step
    }

    /// Moves to the previous step; stays on the first step.
    pub fn go_back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.go_to(previous);
        }
        self.step
    }

    pub fn go_to(&mut self, step: WizardStep) {
        info!(session_id = %self.id, from = %self.step, to = %step, "Wizard step changed");
        self.step = step;
    }

    pub fn progress(&self) -> WizardProgress {
        WizardProgress {
            session_id: self.id,
            started_at: self.started_at,
            current: StepInfo::from(self.step),
            position: self.step.position() + 1,
            total: WizardStep::ALL.len(),
            previous: self.step.previous().map(StepInfo::from),
            next: self.step.next().map(StepInfo::from),
            steps: WizardStep::ALL.into_iter().map(StepInfo::from).collect(),
        }
    }
}

fn push<T>(items: &mut Vec<T>, item: T) -> usize {
    items.push(item);
    items.len() - 1
}

#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    pub step: WizardStep,
    pub path: &'static str,
    pub label: &'static str,
}

impl From<WizardStep> for StepInfo {
    fn from(step: WizardStep) -> Self {
        StepInfo {
            step,
            path: step.path(),
            label: step.label(),
        }
    }
}

/// Where the session is in the wizard.
#[derive(Debug, Clone, Serialize)]
pub struct WizardProgress {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub current: StepInfo,
    /// 1-based.
    pub position: usize,
    pub total: usize,
    pub previous: Option<StepInfo>,
    pub next: Option<StepInfo>,
    pub steps: Vec<StepInfo>,
}
