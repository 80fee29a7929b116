//! Axum route handlers for the CV wizard API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cv::export::{content_disposition, export_pdf, preview, ExportOptions, Preview};
use crate::cv::normalizer::normalize_value;
use crate::cv::readiness::{compute_readiness, ReadinessReport};
use crate::cv::session::{
    parse_bucket, AdditionalItem, AdditionalSection, LegacyAdditional, PersonalInfo,
    ProfessionalInfo, WizardProgress, WizardStep,
};
use crate::errors::AppError;
use crate::layout::projector::{project, project_value, ProjectionOptions, SkillLayout};
use crate::layout::tree::DocumentTree;
use crate::models::cv::{AdditionalInfo, CvDocument, Education, Experience, SkillEntry};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LayoutQuery {
    pub skills: Option<SkillLayout>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub skills: Option<SkillLayout>,
    /// Fill blanks with sample data before projecting.
    #[serde(default)]
    pub normalize: bool,
}

#[derive(Debug, Serialize)]
pub struct ItemCreated {
    pub index: usize,
}

/// Body of `PUT /api/v1/cv/additional`: the structured record, the older
/// single-string fields, or both.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalUpdate {
    #[serde(default)]
    pub additional_info: Option<AdditionalInfo>,
    #[serde(flatten)]
    pub legacy: LegacyAdditional,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: String,
}

fn record<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T, AppError> {
    if !value.is_object() {
        return Err(AppError::Validation(format!("{what} must be a JSON object")));
    }
    serde_json::from_value(value).map_err(|e| AppError::Validation(format!("Invalid {what}: {e}")))
}

fn export_options(state: &AppState, query: &LayoutQuery) -> ExportOptions {
    ExportOptions {
        skill_layout: query.skills.unwrap_or_default(),
        generated_on: state
            .config
            .footer_enabled
            .then(|| Local::now().date_naive()),
        created_at: Some(Utc::now()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cv
pub async fn handle_get_cv(State(state): State<AppState>) -> Json<CvDocument> {
    let session = state.session.lock().await;
    Json(session.document().clone())
}

/// PUT /api/v1/cv
/// Replaces the whole document, e.g. when restoring a saved draft.
pub async fn handle_replace_cv(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CvDocument>, AppError> {
    let document = CvDocument::from_value(&body)
        .ok_or_else(|| AppError::Validation("CV document must be a JSON object".to_string()))?;
    let mut session = state.session.lock().await;
    session.replace_document(document);
    Ok(Json(session.document().clone()))
}

/// POST /api/v1/cv/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<WizardProgress> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(session.progress())
}

/// PUT /api/v1/cv/personal
pub async fn handle_update_personal(
    State(state): State<AppState>,
    Json(req): Json<PersonalInfo>,
) -> Json<CvDocument> {
    let mut session = state.session.lock().await;
    session.update_personal(req);
    Json(session.document().clone())
}

/// PUT /api/v1/cv/professional
pub async fn handle_update_professional(
    State(state): State<AppState>,
    Json(req): Json<ProfessionalInfo>,
) -> Json<CvDocument> {
    let mut session = state.session.lock().await;
    session.update_professional(req);
    Json(session.document().clone())
}

// ────────────────────────────────────────────────────────────────────────────
// Experience / Education
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ItemCreated>), AppError> {
    let experience: Experience = record(body, "experience")?;
    let index = state.session.lock().await.add_experience(experience);
    Ok((StatusCode::CREATED, Json(ItemCreated { index })))
}

/// PUT /api/v1/cv/experiences/:index
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let experience: Experience = record(body, "experience")?;
    state
        .session
        .lock()
        .await
        .update_experience(index, experience)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/cv/experiences/:index
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, AppError> {
    state.session.lock().await.remove_experience(index)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cv/educations
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ItemCreated>), AppError> {
    let education: Education = record(body, "education")?;
    let index = state.session.lock().await.add_education(education);
    Ok((StatusCode::CREATED, Json(ItemCreated { index })))
}

/// PUT /api/v1/cv/educations/:index
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let education: Education = record(body, "education")?;
    state
        .session
        .lock()
        .await
        .update_education(index, education)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/cv/educations/:index
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, AppError> {
    state.session.lock().await.remove_education(index)?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

fn skill_entry(body: &Value) -> Result<SkillEntry, AppError> {
    SkillEntry::from_value(body).ok_or_else(|| {
        AppError::Validation("Skill must be a string or a {name, level} record".to_string())
    })
}

/// POST /api/v1/cv/skills/:bucket
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ItemCreated>), AppError> {
    let bucket = parse_bucket(&bucket)?;
    let entry = skill_entry(&body)?;
    let index = state.session.lock().await.add_skill(bucket, entry);
    Ok((StatusCode::CREATED, Json(ItemCreated { index })))
}

/// PUT /api/v1/cv/skills/:bucket/:index
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path((bucket, index)): Path<(String, usize)>,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let bucket = parse_bucket(&bucket)?;
    let entry = skill_entry(&body)?;
    state
        .session
        .lock()
        .await
        .update_skill(bucket, index, entry)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/cv/skills/:bucket/:index
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((bucket, index)): Path<(String, usize)>,
) -> Result<StatusCode, AppError> {
    let bucket = parse_bucket(&bucket)?;
    state.session.lock().await.remove_skill(bucket, index)?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Additional info
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/cv/additional
pub async fn handle_update_additional(
    State(state): State<AppState>,
    Json(req): Json<AdditionalUpdate>,
) -> Json<CvDocument> {
    let mut session = state.session.lock().await;
    if let Some(info) = req.additional_info {
        session.set_additional_info(info);
    }
    session.set_legacy_additional(req.legacy);
    Json(session.document().clone())
}

/// POST /api/v1/cv/additional/:section
pub async fn handle_add_additional_item(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ItemCreated>), AppError> {
    let section: AdditionalSection = section.parse()?;
    let item = AdditionalItem::from_value(section, body).ok_or_else(|| {
        AppError::Validation(format!("Invalid {} item", section.key()))
    })?;
    let index = state.session.lock().await.add_additional_item(item);
    Ok((StatusCode::CREATED, Json(ItemCreated { index })))
}

/// DELETE /api/v1/cv/additional/:section/:index
pub async fn handle_remove_additional_item(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<StatusCode, AppError> {
    let section: AdditionalSection = section.parse()?;
    state
        .session
        .lock()
        .await
        .remove_additional_item(section, index)?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Wizard navigation
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/wizard
pub async fn handle_get_wizard(State(state): State<AppState>) -> Json<WizardProgress> {
    Json(state.session.lock().await.progress())
}

/// POST /api/v1/wizard/next
pub async fn handle_wizard_next(State(state): State<AppState>) -> Json<WizardProgress> {
    let mut session = state.session.lock().await;
    session.advance();
    Json(session.progress())
}

/// POST /api/v1/wizard/back
pub async fn handle_wizard_back(State(state): State<AppState>) -> Json<WizardProgress> {
    let mut session = state.session.lock().await;
    session.go_back();
    Json(session.progress())
}

/// PUT /api/v1/wizard/step
/// Jumps to any step, by key (`"skills"`) or page route (`"/skills"`).
pub async fn handle_wizard_go_to(
    State(state): State<AppState>,
    Json(req): Json<StepRequest>,
) -> Result<Json<WizardProgress>, AppError> {
    let step: WizardStep = req.step.parse().map_err(AppError::Validation)?;
    let mut session = state.session.lock().await;
    session.go_to(step);
    Ok(Json(session.progress()))
}

// ────────────────────────────────────────────────────────────────────────────
// Readiness / preview / export
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cv/readiness
pub async fn handle_readiness(State(state): State<AppState>) -> Json<ReadinessReport> {
    let session = state.session.lock().await;
    let report = compute_readiness(session.document());
    if !report.warnings.is_empty() {
        tracing::warn!(warnings = ?report.warnings, "CV has readiness warnings");
    }
    Json(report)
}

/// GET /api/v1/cv/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<LayoutQuery>,
) -> Json<Preview> {
    let options = export_options(&state, &query);
    let session = state.session.lock().await;
    Json(preview(session.document(), &options))
}

/// GET /api/v1/cv/export
/// Streams the rendered PDF as a download named after the CV owner.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<LayoutQuery>,
) -> Result<Response, AppError> {
    let options = export_options(&state, &query);
    let document = state.session.lock().await.document().clone();
    let page_config = state.page_config.clone();

    // Layout and PDF writing are CPU-bound; keep them off the async executor.
    let exported = tokio::task::spawn_blocking(move || export_pdf(&document, &options, &page_config))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&exported.file_name),
            ),
        ],
        exported.bytes,
    )
        .into_response())
}

/// POST /api/v1/documents/preview
/// Projects any JSON value without touching the session. Values that are not
/// document-shaped yield the one-line "no data" document, or the full sample
/// document when `normalize=true`.
pub async fn handle_project_document(
    Query(query): Query<ProjectQuery>,
    Json(body): Json<Value>,
) -> Json<DocumentTree> {
    let options = ProjectionOptions {
        skill_layout: query.skills.unwrap_or_default(),
        generated_on: None,
    };
    let tree = if query.normalize {
        project(&normalize_value(&body), &options)
    } else {
        project_value(&body, &options)
    };
    Json(tree)
}
