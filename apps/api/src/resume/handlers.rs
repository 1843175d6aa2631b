use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::resume::export::render_resume_to_md;
use crate::resume::mapping::SectionEntry;
use crate::resume::models::{PersonalInfo, ResumeData, UNASSIGNED_ID};
use crate::resume::repository::ResumeStats;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub template: Option<String>,
    pub updated_within_days: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize, Default)]
pub struct DuplicateRequest {
    pub title: Option<String>,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ResumeData>>, AppError> {
    let resumes = match (params.template, params.updated_within_days) {
        (Some(template), _) => state.resumes.resumes_by_template(&template).await?,
        (None, Some(days)) => state.resumes.recently_updated(days).await?,
        (None, None) => state.resumes.list_resumes().await?,
    };
    Ok(Json(resumes))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(doc): Json<ResumeData>,
) -> Result<(StatusCode, Json<ResumeData>), AppError> {
    // Ids in the body are ignored; POST always creates
    let created = state.resumes.save_resume(&doc.unassigned()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ResumeData>, AppError> {
    Ok(Json(state.resumes.get_resume(id).await?))
}

/// PUT /api/v1/resumes/:id
/// The path id wins over any id in the body. Never creates; use POST for that.
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(doc): Json<ResumeData>,
) -> Result<Json<ResumeData>, AppError> {
    if id == UNASSIGNED_ID {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    state.resumes.update_resume(&doc.with_id(id)).await?;
    Ok(Json(state.resumes.get_resume(id).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete_resume(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/search?q=
pub async fn handle_search_resumes(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<ResumeData>>, AppError> {
    Ok(Json(state.resumes.search_resumes(&params.q).await?))
}

/// GET /api/v1/resumes/stats
pub async fn handle_resume_stats(
    State(state): State<AppState>,
) -> Result<Json<ResumeStats>, AppError> {
    Ok(Json(state.resumes.stats().await?))
}

/// POST /api/v1/resumes/:id/duplicate
pub async fn handle_duplicate_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<DuplicateRequest>>,
) -> Result<(StatusCode, Json<ResumeData>), AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let copy = state.resumes.duplicate_resume(id, req.title).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// PUT /api/v1/resumes/:id/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(info): Json<PersonalInfo>,
) -> Result<Json<ResumeData>, AppError> {
    Ok(Json(state.resumes.update_personal_info(id, &info).await?))
}

/// GET /api/v1/resumes/:id/export
pub async fn handle_export_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let doc = state.resumes.get_resume(id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_resume_to_md(&doc),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Section entries, one route set per collection (see `routes::section_routes`)
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/:id/<section>
pub async fn handle_add_entry<E: SectionEntry>(
    State(state): State<AppState>,
    Path(resume_id): Path<i64>,
    Json(entry): Json<E>,
) -> Result<(StatusCode, Json<E>), AppError> {
    let added = state.resumes.add_entry(resume_id, entry).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// PUT /api/v1/resumes/:id/<section>/:entry_id
pub async fn handle_update_entry<E: SectionEntry>(
    State(state): State<AppState>,
    Path((resume_id, entry_id)): Path<(i64, i64)>,
    Json(entry): Json<E>,
) -> Result<Json<E>, AppError> {
    Ok(Json(state.resumes.update_entry(resume_id, entry_id, entry).await?))
}

/// DELETE /api/v1/resumes/:id/<section>/:entry_id
pub async fn handle_delete_entry<E: SectionEntry>(
    State(state): State<AppState>,
    Path((resume_id, entry_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete_entry::<E>(resume_id, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
