//! Aggregate store: keeps the normalized tables consistent with a resume document.
//!
//! Every public operation runs in a single transaction. Writes either persist
//! the parent row and all child collections or nothing at all; a concurrent
//! reader never sees a parent whose children are mid-rewrite.
//!
//! Full replace deletes and re-inserts every child row. Child storage ids are
//! therefore NOT stable across `update_complete`; only `sort_order` is.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::resume::{ChildRow, NormalizedResume, ResumeRow};
use crate::resume::mapping::{resume_row, to_aggregate, to_normalized, SectionEntry};
use crate::resume::models::{PersonalInfo, ResumeData};

// ────────────────────────────────────────────────────────────────────────────
// Whole-aggregate operations
// ────────────────────────────────────────────────────────────────────────────

/// Inserts the parent row, then every non-empty child collection under the new id.
pub async fn create_complete(pool: &SqlitePool, doc: &ResumeData) -> Result<i64, AppError> {
    let set = to_normalized(doc)?;
    let mut tx = pool.begin().await?;

    // 1. Parent row; SQLite assigns the id
    let sql = format!(
        "INSERT INTO resumes ({}) VALUES ({})",
        ResumeRow::COLUMNS.join(", "),
        placeholders(ResumeRow::COLUMNS.len())
    );
    let resume_id = set
        .resume
        .bind_columns(sqlx::query(&sql))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    // 2. Children, back-referencing the new id
    insert_children(&mut tx, resume_id, &set).await?;

    tx.commit().await?;
    info!("Created resume {resume_id} ('{}')", doc.title);
    Ok(resume_id)
}

/// Overwrites the parent row (refreshing `updated_at`) and replaces all eight collections.
pub async fn update_complete(pool: &SqlitePool, doc: &ResumeData) -> Result<(), AppError> {
    let mut set = to_normalized(doc)?;
    set.resume.updated_at = Utc::now();
    let resume_id = doc.id;

    let mut tx = pool.begin().await?;

    // 1. Parent row
    let assignments = ResumeRow::COLUMNS
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE resumes SET {assignments} WHERE id = ?");
    let updated = set
        .resume
        .bind_columns(sqlx::query(&sql))
        .bind(resume_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }

    // 2. Drop every existing child, 3. re-insert what the document holds now
    delete_children(&mut tx, resume_id).await?;
    insert_children(&mut tx, resume_id, &set).await?;

    tx.commit().await?;
    info!("Replaced resume {resume_id} and all of its sections");
    Ok(())
}

/// Deletes all eight child collections by back-reference, then the parent row.
pub async fn delete_complete(pool: &SqlitePool, resume_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    delete_children(&mut tx, resume_id).await?;
    let deleted = sqlx::query("DELETE FROM resumes WHERE id = ?")
        .bind(resume_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }

    tx.commit().await?;
    info!("Deleted resume {resume_id}");
    Ok(())
}

/// Reads one resume with every collection ordered by `sort_order`. `None` if absent.
pub async fn get_complete(pool: &SqlitePool, resume_id: i64) -> Result<Option<ResumeData>, AppError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = ?")
        .bind(resume_id)
        .fetch_optional(&mut *tx)
        .await?;
    let doc = match row {
        Some(row) => Some(assemble(&mut tx, row).await?),
        None => None,
    };

    tx.commit().await?;
    debug!("Loaded resume {resume_id} (found: {})", doc.is_some());
    Ok(doc)
}

/// Every resume, most recently updated first.
pub async fn list_complete(pool: &SqlitePool) -> Result<Vec<ResumeData>, AppError> {
    list_where(pool, "SELECT * FROM resumes ORDER BY updated_at DESC, id DESC", &[]).await
}

/// Resumes whose title or full name contains `query`, ASCII case-insensitively.
pub async fn search_complete(pool: &SqlitePool, query: &str) -> Result<Vec<ResumeData>, AppError> {
    let pattern = like_pattern(query);
    list_where(
        pool,
        r"SELECT * FROM resumes
          WHERE title LIKE ?1 ESCAPE '\' OR full_name LIKE ?1 ESCAPE '\'
          ORDER BY updated_at DESC, id DESC",
        &[pattern],
    )
    .await
}

pub async fn list_by_template(
    pool: &SqlitePool,
    template_id: &str,
) -> Result<Vec<ResumeData>, AppError> {
    list_where(
        pool,
        "SELECT * FROM resumes WHERE template_id = ? ORDER BY updated_at DESC, id DESC",
        &[template_id.to_string()],
    )
    .await
}

pub async fn list_updated_since(
    pool: &SqlitePool,
    since: DateTime<Utc>,
) -> Result<Vec<ResumeData>, AppError> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE updated_at >= ? ORDER BY updated_at DESC, id DESC",
    )
    .bind(since)
    .fetch_all(&mut *tx)
    .await?;
    let docs = assemble_all(&mut tx, rows).await?;
    tx.commit().await?;
    Ok(docs)
}

// ────────────────────────────────────────────────────────────────────────────
// Parent-only and single-entry operations
// ────────────────────────────────────────────────────────────────────────────

/// Rewrites the embedded personal-info columns and refreshes `updated_at`.
pub async fn update_personal_info(
    pool: &SqlitePool,
    resume_id: i64,
    info: &PersonalInfo,
) -> Result<(), AppError> {
    let row = resume_row(&ResumeData {
        personal_info: info.clone(),
        ..Default::default()
    });

    let mut tx = pool.begin().await?;
    let updated = sqlx::query(
        r#"
        UPDATE resumes SET
            full_name = ?, job_title = ?, email = ?, phone = ?, linked_in = ?,
            github = ?, website = ?, address = ?, city = ?, state = ?,
            zip_code = ?, country = ?, profile_photo_path = ?, summary = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(row.full_name)
    .bind(row.job_title)
    .bind(row.email)
    .bind(row.phone)
    .bind(row.linked_in)
    .bind(row.github)
    .bind(row.website)
    .bind(row.address)
    .bind(row.city)
    .bind(row.state)
    .bind(row.zip_code)
    .bind(row.country)
    .bind(row.profile_photo_path)
    .bind(row.summary)
    .bind(Utc::now())
    .bind(resume_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    if updated == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }

    tx.commit().await?;
    info!("Updated personal info of resume {resume_id}");
    Ok(())
}

/// Appends one child record to an existing resume and returns its new storage id.
pub async fn insert_entry<E: SectionEntry>(
    pool: &SqlitePool,
    resume_id: i64,
    entry: &E,
) -> Result<i64, AppError> {
    let row = entry.to_row()?;
    let mut tx = pool.begin().await?;

    touch(&mut tx, resume_id).await?;
    let ids = insert_rows(&mut tx, resume_id, std::slice::from_ref(&row)).await?;

    tx.commit().await?;
    let entry_id = ids.first().copied().unwrap_or_default();
    info!("Added {} {entry_id} to resume {resume_id}", E::LABEL.to_lowercase());
    Ok(entry_id)
}

/// Rewrites one child record in place, keyed by its id and owning resume.
pub async fn update_entry<E: SectionEntry>(pool: &SqlitePool, entry: &E) -> Result<(), AppError> {
    let row = entry.to_row()?;
    let columns = <E::Row as ChildRow>::COLUMNS;
    let assignments = columns
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {assignments} WHERE id = ? AND resume_id = ?",
        <E::Row as ChildRow>::TABLE
    );

    let mut tx = pool.begin().await?;
    let updated = row
        .bind_columns(sqlx::query(&sql))
        .bind(row.id())
        .bind(row.resume_id())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(AppError::NotFound(format!(
            "{} {} not found in resume {}",
            E::LABEL,
            row.id(),
            row.resume_id()
        )));
    }
    touch(&mut tx, row.resume_id()).await?;

    tx.commit().await?;
    info!("Updated {} {} of resume {}", E::LABEL.to_lowercase(), row.id(), row.resume_id());
    Ok(())
}

pub async fn delete_entry<E: SectionEntry>(
    pool: &SqlitePool,
    resume_id: i64,
    entry_id: i64,
) -> Result<(), AppError> {
    let sql = format!(
        "DELETE FROM {} WHERE id = ? AND resume_id = ?",
        <E::Row as ChildRow>::TABLE
    );

    let mut tx = pool.begin().await?;
    let deleted = sqlx::query(&sql)
        .bind(entry_id)
        .bind(resume_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "{} {entry_id} not found in resume {resume_id}",
            E::LABEL
        )));
    }
    touch(&mut tx, resume_id).await?;

    tx.commit().await?;
    info!("Deleted {} {entry_id} from resume {resume_id}", E::LABEL.to_lowercase());
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregates
// ────────────────────────────────────────────────────────────────────────────

pub async fn resume_count(pool: &SqlitePool) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
        .fetch_one(pool)
        .await?)
}

pub async fn completed_resume_count(pool: &SqlitePool) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE is_complete = 1")
        .fetch_one(pool)
        .await?)
}

pub async fn used_templates(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    Ok(
        sqlx::query_scalar("SELECT DISTINCT template_id FROM resumes ORDER BY template_id")
            .fetch_all(pool)
            .await?,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers (all run on the caller's transaction)
// ────────────────────────────────────────────────────────────────────────────

async fn list_where(
    pool: &SqlitePool,
    sql: &str,
    args: &[String],
) -> Result<Vec<ResumeData>, AppError> {
    let mut tx = pool.begin().await?;
    let mut query = sqlx::query_as::<_, ResumeRow>(sql);
    for arg in args {
        query = query.bind(arg.clone());
    }
    let rows = query.fetch_all(&mut *tx).await?;
    let docs = assemble_all(&mut tx, rows).await?;
    tx.commit().await?;
    debug!("Loaded {} resumes", docs.len());
    Ok(docs)
}

async fn assemble_all(
    conn: &mut SqliteConnection,
    rows: Vec<ResumeRow>,
) -> Result<Vec<ResumeData>, AppError> {
    let mut docs = Vec::with_capacity(rows.len());
    for row in rows {
        docs.push(assemble(conn, row).await?);
    }
    Ok(docs)
}

async fn assemble(conn: &mut SqliteConnection, resume: ResumeRow) -> Result<ResumeData, AppError> {
    let id = resume.id;
    let set = NormalizedResume {
        resume,
        experiences: fetch_rows(conn, id).await?,
        education: fetch_rows(conn, id).await?,
        skills: fetch_rows(conn, id).await?,
        projects: fetch_rows(conn, id).await?,
        certifications: fetch_rows(conn, id).await?,
        languages: fetch_rows(conn, id).await?,
        references: fetch_rows(conn, id).await?,
        custom_sections: fetch_rows(conn, id).await?,
    };
    Ok(to_aggregate(set))
}

async fn insert_children(
    conn: &mut SqliteConnection,
    resume_id: i64,
    set: &NormalizedResume,
) -> Result<(), AppError> {
    insert_rows(conn, resume_id, &set.experiences).await?;
    insert_rows(conn, resume_id, &set.education).await?;
    insert_rows(conn, resume_id, &set.skills).await?;
    insert_rows(conn, resume_id, &set.projects).await?;
    insert_rows(conn, resume_id, &set.certifications).await?;
    insert_rows(conn, resume_id, &set.languages).await?;
    insert_rows(conn, resume_id, &set.references).await?;
    insert_rows(conn, resume_id, &set.custom_sections).await?;
    Ok(())
}

async fn delete_children(conn: &mut SqliteConnection, resume_id: i64) -> Result<(), AppError> {
    use crate::models::resume::{
        CertificationRow, CustomSectionRow, EducationRow, LanguageRow, ProjectRow, ReferenceRow,
        SkillRow, WorkExperienceRow,
    };

    delete_rows::<WorkExperienceRow>(conn, resume_id).await?;
    delete_rows::<EducationRow>(conn, resume_id).await?;
    delete_rows::<SkillRow>(conn, resume_id).await?;
    delete_rows::<ProjectRow>(conn, resume_id).await?;
    delete_rows::<CertificationRow>(conn, resume_id).await?;
    delete_rows::<LanguageRow>(conn, resume_id).await?;
    delete_rows::<ReferenceRow>(conn, resume_id).await?;
    delete_rows::<CustomSectionRow>(conn, resume_id).await?;
    Ok(())
}

/// Inserts rows under `resume_id`, ignoring their own ids. Empty input writes nothing.
async fn insert_rows<R: ChildRow>(
    conn: &mut SqliteConnection,
    resume_id: i64,
    rows: &[R],
) -> Result<Vec<i64>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "INSERT INTO {} (resume_id, {}) VALUES (?, {})",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders(R::COLUMNS.len())
    );

    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        let result = row
            .bind_columns(sqlx::query(&sql).bind(resume_id))
            .execute(&mut *conn)
            .await?;
        ids.push(result.last_insert_rowid());
    }
    Ok(ids)
}

async fn fetch_rows<R: ChildRow>(
    conn: &mut SqliteConnection,
    resume_id: i64,
) -> Result<Vec<R>, AppError> {
    let sql = format!(
        "SELECT * FROM {} WHERE resume_id = ? ORDER BY sort_order ASC, id ASC",
        R::TABLE
    );
    Ok(sqlx::query_as::<_, R>(&sql)
        .bind(resume_id)
        .fetch_all(&mut *conn)
        .await?)
}

async fn delete_rows<R: ChildRow>(conn: &mut SqliteConnection, resume_id: i64) -> Result<u64, AppError> {
    let sql = format!("DELETE FROM {} WHERE resume_id = ?", R::TABLE);
    Ok(sqlx::query(&sql)
        .bind(resume_id)
        .execute(&mut *conn)
        .await?
        .rows_affected())
}

/// Refreshes the parent's `updated_at`; NotFound if the resume does not exist.
async fn touch(conn: &mut SqliteConnection, resume_id: i64) -> Result<(), AppError> {
    let updated = sqlx::query("UPDATE resumes SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(resume_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    Ok(())
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// `%query%` with LIKE metacharacters escaped by `\`.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::resume::mapping::tests::sample_resume;
    use crate::resume::models::{Skill, WorkExperience};
    use chrono::{Duration, TimeZone};

    async fn count_rows(pool: &SqlitePool, table: &str, resume_id: i64) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE resume_id = ?"))
            .bind(resume_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    const CHILD_TABLES: [&str; 8] = [
        "work_experiences",
        "education",
        "skills",
        "projects",
        "certifications",
        "languages",
        "\"references\"",
        "custom_sections",
    ];

    /// Strips storage-assigned ids so documents can be compared by content.
    fn without_ids(doc: ResumeData) -> ResumeData {
        doc.unassigned()
    }

    fn sorted_by_order(mut doc: ResumeData) -> ResumeData {
        doc.experiences.sort_by_key(|e| e.sort_order);
        doc.education.sort_by_key(|e| e.sort_order);
        doc.skills.sort_by_key(|e| e.sort_order);
        doc.projects.sort_by_key(|e| e.sort_order);
        doc.certifications.sort_by_key(|e| e.sort_order);
        doc.languages.sort_by_key(|e| e.sort_order);
        doc.references.sort_by_key(|e| e.sort_order);
        doc.custom_sections.sort_by_key(|e| e.sort_order);
        doc
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let pool = test_pool().await;
        let doc = sample_resume();

        let id = create_complete(&pool, &doc).await.unwrap();
        assert_ne!(id, 0);

        let loaded = get_complete(&pool, id).await.unwrap().expect("resume exists");
        assert_eq!(loaded.id, id);
        assert!(loaded.experiences.iter().all(|e| e.resume_id == id && e.id != 0));
        assert!(loaded.custom_sections.iter().all(|c| c.resume_id == id));
        assert_eq!(without_ids(loaded), sorted_by_order(doc));
    }

    #[tokio::test]
    async fn test_get_missing_resume_is_none() {
        let pool = test_pool().await;
        assert!(get_complete(&pool, 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_children_returned_in_sort_order() {
        let pool = test_pool().await;
        let doc = ResumeData {
            experiences: [2, 0, 1]
                .into_iter()
                .map(|order| WorkExperience {
                    job_title: format!("Role {order}"),
                    company: "Acme".into(),
                    sort_order: order,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let id = create_complete(&pool, &doc).await.unwrap();
        let loaded = get_complete(&pool, id).await.unwrap().unwrap();
        let orders: Vec<i32> = loaded.experiences.iter().map(|e| e.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(loaded.experiences[0].job_title, "Role 0");
    }

    #[tokio::test]
    async fn test_empty_collections_write_no_rows() {
        let pool = test_pool().await;
        let id = create_complete(&pool, &ResumeData::default()).await.unwrap();
        for table in CHILD_TABLES {
            assert_eq!(count_rows(&pool, table, id).await, 0, "{table}");
        }
    }

    #[tokio::test]
    async fn test_update_replaces_instead_of_merging() {
        let pool = test_pool().await;
        let mut doc = sample_resume();
        doc.experiences = (0..3)
            .map(|i| WorkExperience {
                job_title: format!("Job {i}"),
                company: "Acme".into(),
                sort_order: i,
                ..Default::default()
            })
            .collect();
        let id = create_complete(&pool, &doc).await.unwrap();
        assert_eq!(count_rows(&pool, "work_experiences", id).await, 3);

        let mut stored = get_complete(&pool, id).await.unwrap().unwrap();
        stored.experiences.truncate(1);
        update_complete(&pool, &stored).await.unwrap();

        assert_eq!(count_rows(&pool, "work_experiences", id).await, 1);
        let reloaded = get_complete(&pool, id).await.unwrap().unwrap();
        assert_eq!(reloaded.experiences[0].job_title, "Job 0");
    }

    #[tokio::test]
    async fn test_update_of_unmodified_document_keeps_order_and_content() {
        let pool = test_pool().await;
        let id = create_complete(&pool, &sample_resume()).await.unwrap();
        let before = get_complete(&pool, id).await.unwrap().unwrap();

        update_complete(&pool, &before).await.unwrap();
        let after = get_complete(&pool, id).await.unwrap().unwrap();

        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);
        let strip = |doc: ResumeData| ResumeData {
            updated_at: doc.created_at,
            ..without_ids(doc)
        };
        assert_eq!(strip(after), strip(before));
    }

    #[tokio::test]
    async fn test_update_missing_resume_is_not_found() {
        let pool = test_pool().await;
        let ghost = ResumeData { id: 77, ..sample_resume() };
        let err = update_complete(&pool, &ghost).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(count_rows(&pool, "work_experiences", 77).await, 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_all_sections() {
        let pool = test_pool().await;
        let id = create_complete(&pool, &sample_resume()).await.unwrap();

        delete_complete(&pool, id).await.unwrap();

        assert!(get_complete(&pool, id).await.unwrap().is_none());
        for table in CHILD_TABLES {
            assert_eq!(count_rows(&pool, table, id).await, 0, "{table}");
        }
        assert!(matches!(
            delete_complete(&pool, id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_nothing_behind() {
        let pool = test_pool().await;
        sqlx::query("DROP TABLE certifications")
            .execute(&pool)
            .await
            .unwrap();

        let result = create_complete(&pool, &sample_resume()).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        assert_eq!(resume_count(&pool).await.unwrap(), 0);
        let experiences: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM work_experiences")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(experiences, 0);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_children() {
        let pool = test_pool().await;
        let id = create_complete(&pool, &sample_resume()).await.unwrap();
        let stored = get_complete(&pool, id).await.unwrap().unwrap();
        sqlx::query("DROP TABLE custom_sections")
            .execute(&pool)
            .await
            .unwrap();

        assert!(update_complete(&pool, &stored).await.is_err());

        assert_eq!(count_rows(&pool, "work_experiences", id).await, 2);
        assert_eq!(count_rows(&pool, "skills", id).await, 3);
    }

    #[tokio::test]
    async fn test_list_orders_by_last_update() {
        let pool = test_pool().await;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for (title, offset) in [("old", 0), ("newest", 2), ("middle", 1)] {
            let doc = ResumeData {
                title: title.into(),
                updated_at: base + Duration::hours(offset),
                ..Default::default()
            };
            create_complete(&pool, &doc).await.unwrap();
        }

        let titles: Vec<String> = list_complete(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["newest", "middle", "old"]);

        let recent = list_updated_since(&pool, base + Duration::minutes(30)).await.unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_name_case_insensitively() {
        let pool = test_pool().await;
        let mut doc = sample_resume();
        create_complete(&pool, &doc).await.unwrap();
        doc.title = "Designer 100%".into();
        doc.personal_info.full_name = "Someone Else".into();
        create_complete(&pool, &doc).await.unwrap();

        assert_eq!(search_complete(&pool, "HOPPER").await.unwrap().len(), 1);
        assert_eq!(search_complete(&pool, "backend").await.unwrap().len(), 1);
        assert_eq!(search_complete(&pool, "100%").await.unwrap().len(), 1);
        assert!(search_complete(&pool, "0_%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_entry_operations_touch_parent() {
        let pool = test_pool().await;
        let doc = ResumeData {
            updated_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            ..sample_resume()
        };
        let id = create_complete(&pool, &doc).await.unwrap();

        let skill = Skill { name: "Zig".into(), sort_order: 9, ..Default::default() };
        let skill_id = insert_entry(&pool, id, &skill).await.unwrap();
        let loaded = get_complete(&pool, id).await.unwrap().unwrap();
        assert!(loaded.updated_at > doc.updated_at);
        assert_eq!(loaded.skills.last().unwrap().id, skill_id);

        let renamed = Skill { name: "Zig 0.13".into(), ..loaded.skills.last().unwrap().clone() };
        update_entry(&pool, &renamed).await.unwrap();
        let loaded = get_complete(&pool, id).await.unwrap().unwrap();
        assert_eq!(loaded.skills.last().unwrap().name, "Zig 0.13");

        delete_entry::<Skill>(&pool, id, skill_id).await.unwrap();
        assert_eq!(count_rows(&pool, "skills", id).await, 3);
    }

    #[tokio::test]
    async fn test_entry_operations_on_missing_targets() {
        let pool = test_pool().await;
        let skill = Skill { name: "Zig".into(), ..Default::default() };
        assert!(matches!(
            insert_entry(&pool, 999, &skill).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        let id = create_complete(&pool, &ResumeData::default()).await.unwrap();
        let ghost = Skill { id: 123, resume_id: id, ..skill };
        assert!(matches!(
            update_entry(&pool, &ghost).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            delete_entry::<Skill>(&pool, id, 123).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_personal_info_update_and_aggregates() {
        let pool = test_pool().await;
        let id = create_complete(&pool, &sample_resume()).await.unwrap();
        create_complete(
            &pool,
            &ResumeData { is_complete: true, template_id: "classic".into(), ..Default::default() },
        )
        .await
        .unwrap();

        let info = PersonalInfo { full_name: "G. Hopper".into(), ..Default::default() };
        update_personal_info(&pool, id, &info).await.unwrap();
        let loaded = get_complete(&pool, id).await.unwrap().unwrap();
        assert_eq!(loaded.personal_info, info);
        assert_eq!(loaded.experiences.len(), 2);

        assert_eq!(resume_count(&pool).await.unwrap(), 2);
        assert_eq!(completed_resume_count(&pool).await.unwrap(), 1);
        assert_eq!(used_templates(&pool).await.unwrap(), vec!["classic", "modern"]);
        assert_eq!(list_by_template(&pool, "classic").await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reader_never_sees_half_replaced_resume() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("resumes.db").display());
        let pool = crate::db::create_pool(&url, 4).await.unwrap();

        let id = create_complete(&pool, &sample_resume()).await.unwrap();
        let stored = get_complete(&pool, id).await.unwrap().unwrap();

        let writer = {
            let pool = pool.clone();
            tokio::spawn(async move {
                for _ in 0..40 {
                    update_complete(&pool, &stored).await.unwrap();
                }
            })
        };

        let mut reads = 0;
        while !writer.is_finished() || reads < 40 {
            let doc = get_complete(&pool, id).await.unwrap().expect("resume exists");
            assert_eq!(doc.experiences.len(), 2);
            assert_eq!(doc.skills.len(), 3);
            assert_eq!(doc.custom_sections.len(), 1);
            reads += 1;
        }
        writer.await.unwrap();
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("ab"), "%ab%");
        assert_eq!(like_pattern("5%_\\"), "%5\\%\\_\\\\%");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
