//! The boundary handlers consume. Runs the validation gate ahead of every
//! write and turns store outcomes into `Result<_, AppError>`.

use chrono::{TimeDelta, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::resume::mapping::SectionEntry;
use crate::resume::models::{PersonalInfo, ResumeData, UNASSIGNED_ID};
use crate::resume::store;
use crate::resume::validation::{validate_contact_update, validate_entry, validate_resume};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeStats {
    pub total: i64,
    pub completed: i64,
    pub templates: Vec<String>,
}

#[derive(Clone)]
pub struct ResumeRepository {
    pool: SqlitePool,
}

impl ResumeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ── Whole resumes ───────────────────────────────────────────────────────

    /// Validates and inserts a new resume. Any id on `doc` is ignored.
    pub async fn create_resume(&self, doc: &ResumeData) -> Result<i64, AppError> {
        validate_resume(doc).into_result()?;
        store::create_complete(&self.pool, doc).await
    }

    /// Validates and fully replaces an existing resume.
    pub async fn update_resume(&self, doc: &ResumeData) -> Result<(), AppError> {
        validate_resume(doc).into_result()?;
        store::update_complete(&self.pool, doc).await
    }

    /// Creates when `doc` has never been saved, replaces otherwise, then re-reads
    /// so the caller gets storage-assigned identities back.
    pub async fn save_resume(&self, doc: &ResumeData) -> Result<ResumeData, AppError> {
        let id = if doc.is_persisted() {
            self.update_resume(doc).await?;
            doc.id
        } else {
            self.create_resume(doc).await?
        };
        self.get_resume(id).await
    }

    pub async fn get_resume(&self, id: i64) -> Result<ResumeData, AppError> {
        store::get_complete(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
    }

    pub async fn list_resumes(&self) -> Result<Vec<ResumeData>, AppError> {
        store::list_complete(&self.pool).await
    }

    pub async fn delete_resume(&self, id: i64) -> Result<(), AppError> {
        store::delete_complete(&self.pool, id).await
    }

    /// Copies a resume into a new, independent one. The copy is never marked
    /// complete and shares no child identities with the source.
    pub async fn duplicate_resume(
        &self,
        id: i64,
        new_title: Option<String>,
    ) -> Result<ResumeData, AppError> {
        let source = self.get_resume(id).await?;
        let now = Utc::now();
        let title = new_title.unwrap_or_else(|| format!("{} (Copy)", source.title));
        let copy = ResumeData {
            title,
            created_at: now,
            updated_at: now,
            is_complete: false,
            ..source.unassigned()
        };

        let new_id = store::create_complete(&self.pool, &copy).await?;
        info!("Duplicated resume {id} into {new_id}");
        self.get_resume(new_id).await
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Blank queries match nothing.
    pub async fn search_resumes(&self, query: &str) -> Result<Vec<ResumeData>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        store::search_complete(&self.pool, query).await
    }

    pub async fn resumes_by_template(&self, template_id: &str) -> Result<Vec<ResumeData>, AppError> {
        store::list_by_template(&self.pool, template_id).await
    }

    /// Resumes touched within the last `days` days. Negative windows are treated as zero;
    /// a window reaching past the earliest representable instant covers every resume.
    pub async fn recently_updated(&self, days: i64) -> Result<Vec<ResumeData>, AppError> {
        if days < 0 {
            warn!("Negative recency window {days}, using 0");
        }
        let since = TimeDelta::try_days(days.max(0))
            .and_then(|window| Utc::now().checked_sub_signed(window));
        match since {
            Some(since) => store::list_updated_since(&self.pool, since).await,
            None => {
                warn!("Recency window of {days} days is out of range, listing all resumes");
                store::list_complete(&self.pool).await
            }
        }
    }

    pub async fn stats(&self) -> Result<ResumeStats, AppError> {
        Ok(ResumeStats {
            total: store::resume_count(&self.pool).await?,
            completed: store::completed_resume_count(&self.pool).await?,
            templates: store::used_templates(&self.pool).await?,
        })
    }

    // ── Partial edits ───────────────────────────────────────────────────────

    pub async fn update_personal_info(
        &self,
        resume_id: i64,
        info: &PersonalInfo,
    ) -> Result<ResumeData, AppError> {
        validate_contact_update(info).into_result()?;
        store::update_personal_info(&self.pool, resume_id, info).await?;
        self.get_resume(resume_id).await
    }

    /// Adds one record to a section of `resume_id` and returns it with its new id.
    pub async fn add_entry<E: SectionEntry>(&self, resume_id: i64, entry: E) -> Result<E, AppError> {
        validate_entry(&entry).into_result()?;
        let entry = entry.with_identity(UNASSIGNED_ID, resume_id);
        let entry_id = store::insert_entry(&self.pool, resume_id, &entry).await?;
        Ok(entry.with_identity(entry_id, resume_id))
    }

    /// Rewrites record `entry_id` of `resume_id`; the ids carried by `entry` are ignored.
    pub async fn update_entry<E: SectionEntry>(
        &self,
        resume_id: i64,
        entry_id: i64,
        entry: E,
    ) -> Result<E, AppError> {
        validate_entry(&entry).into_result()?;
        let entry = entry.with_identity(entry_id, resume_id);
        store::update_entry(&self.pool, &entry).await?;
        Ok(entry)
    }

    pub async fn delete_entry<E: SectionEntry>(
        &self,
        resume_id: i64,
        entry_id: i64,
    ) -> Result<(), AppError> {
        store::delete_entry::<E>(&self.pool, resume_id, entry_id).await
    }
}
