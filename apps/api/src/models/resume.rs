//! Normalized storage rows: one `resumes` row plus eight child tables keyed by `resume_id`.
//!
//! Enumerated columns hold their symbol name and repeated-string columns hold a
//! JSON array; both are decoded by `crate::resume::mapping`, never here.

use chrono::{DateTime, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub title: String,
    pub template_id: String,
    pub full_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub linked_in: String,
    pub github: String,
    pub website: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub profile_photo_path: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_complete: bool,
}

impl ResumeRow {
    /// Writable columns, in `bind_columns` order.
    pub const COLUMNS: &'static [&'static str] = &[
        "title",
        "template_id",
        "full_name",
        "job_title",
        "email",
        "phone",
        "linked_in",
        "github",
        "website",
        "address",
        "city",
        "state",
        "zip_code",
        "country",
        "profile_photo_path",
        "summary",
        "created_at",
        "updated_at",
        "is_complete",
    ];

    pub fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.title.clone())
            .bind(self.template_id.clone())
            .bind(self.full_name.clone())
            .bind(self.job_title.clone())
            .bind(self.email.clone())
            .bind(self.phone.clone())
            .bind(self.linked_in.clone())
            .bind(self.github.clone())
            .bind(self.website.clone())
            .bind(self.address.clone())
            .bind(self.city.clone())
            .bind(self.state.clone())
            .bind(self.zip_code.clone())
            .bind(self.country.clone())
            .bind(self.profile_photo_path.clone())
            .bind(self.summary.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(self.is_complete)
    }
}

/// A row in one of the eight child tables.
///
/// `COLUMNS` lists the data columns in the order `bind_columns` binds them;
/// `id` and `resume_id` are handled by the store.
pub trait ChildRow: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;
    fn resume_id(&self) -> i64;
    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkExperienceRow {
    pub id: i64,
    pub resume_id: i64,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_current_position: bool,
    pub description: String,
    pub bullet_points: String,
    pub achievements: String,
    pub technologies: String,
    pub sort_order: i32,
}

impl ChildRow for WorkExperienceRow {
    const TABLE: &'static str = "work_experiences";
    const COLUMNS: &'static [&'static str] = &[
        "job_title",
        "company",
        "location",
        "start_date",
        "end_date",
        "is_current_position",
        "description",
        "bullet_points",
        "achievements",
        "technologies",
        "sort_order",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.job_title.clone())
            .bind(self.company.clone())
            .bind(self.location.clone())
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.is_current_position)
            .bind(self.description.clone())
            .bind(self.bullet_points.clone())
            .bind(self.achievements.clone())
            .bind(self.technologies.clone())
            .bind(self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EducationRow {
    pub id: i64,
    pub resume_id: i64,
    pub degree: String,
    pub field_of_study: String,
    pub institution: String,
    pub location: String,
    pub graduation_date: Option<DateTime<Utc>>,
    pub gpa: String,
    pub max_gpa: String,
    pub relevant_courses: String,
    pub honors: String,
    pub activities: String,
    pub thesis: String,
    pub sort_order: i32,
}

impl ChildRow for EducationRow {
    const TABLE: &'static str = "education";
    const COLUMNS: &'static [&'static str] = &[
        "degree",
        "field_of_study",
        "institution",
        "location",
        "graduation_date",
        "gpa",
        "max_gpa",
        "relevant_courses",
        "honors",
        "activities",
        "thesis",
        "sort_order",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.degree.clone())
            .bind(self.field_of_study.clone())
            .bind(self.institution.clone())
            .bind(self.location.clone())
            .bind(self.graduation_date)
            .bind(self.gpa.clone())
            .bind(self.max_gpa.clone())
            .bind(self.relevant_courses.clone())
            .bind(self.honors.clone())
            .bind(self.activities.clone())
            .bind(self.thesis.clone())
            .bind(self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SkillRow {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub category: String,
    pub proficiency_level: String,
    pub years_of_experience: i32,
    pub keywords: String,
    pub sort_order: i32,
}

impl ChildRow for SkillRow {
    const TABLE: &'static str = "skills";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "category",
        "proficiency_level",
        "years_of_experience",
        "keywords",
        "sort_order",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.category.clone())
            .bind(self.proficiency_level.clone())
            .bind(self.years_of_experience)
            .bind(self.keywords.clone())
            .bind(self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub description: String,
    pub role: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_ongoing: bool,
    pub technologies: String,
    pub features: String,
    pub challenges: String,
    pub solutions: String,
    pub results: String,
    pub project_url: String,
    pub github_url: String,
    pub demo_url: String,
    pub images: String,
    pub sort_order: i32,
}

impl ChildRow for ProjectRow {
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "role",
        "start_date",
        "end_date",
        "is_ongoing",
        "technologies",
        "features",
        "challenges",
        "solutions",
        "results",
        "project_url",
        "github_url",
        "demo_url",
        "images",
        "sort_order",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.description.clone())
            .bind(self.role.clone())
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.is_ongoing)
            .bind(self.technologies.clone())
            .bind(self.features.clone())
            .bind(self.challenges.clone())
            .bind(self.solutions.clone())
            .bind(self.results.clone())
            .bind(self.project_url.clone())
            .bind(self.github_url.clone())
            .bind(self.demo_url.clone())
            .bind(self.images.clone())
            .bind(self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CertificationRow {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub credential_id: String,
    pub credential_url: String,
    pub description: String,
    pub skills: String,
    pub sort_order: i32,
}

impl ChildRow for CertificationRow {
    const TABLE: &'static str = "certifications";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "issuing_organization",
        "issue_date",
        "expiration_date",
        "credential_id",
        "credential_url",
        "description",
        "skills",
        "sort_order",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.issuing_organization.clone())
            .bind(self.issue_date)
            .bind(self.expiration_date)
            .bind(self.credential_id.clone())
            .bind(self.credential_url.clone())
            .bind(self.description.clone())
            .bind(self.skills.clone())
            .bind(self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct LanguageRow {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub proficiency: String,
    pub native_language: bool,
    pub certifications: String,
    pub sort_order: i32,
}

impl ChildRow for LanguageRow {
    const TABLE: &'static str = "languages";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "proficiency",
        "native_language",
        "certifications",
        "sort_order",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.proficiency.clone())
            .bind(self.native_language)
            .bind(self.certifications.clone())
            .bind(self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ReferenceRow {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub relationship: String,
    pub years_known: i32,
    pub notes: String,
    pub sort_order: i32,
}

impl ChildRow for ReferenceRow {
    // Quoted: REFERENCES is an SQL keyword.
    const TABLE: &'static str = "\"references\"";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "title",
        "company",
        "email",
        "phone",
        "relationship",
        "years_known",
        "notes",
        "sort_order",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.title.clone())
            .bind(self.company.clone())
            .bind(self.email.clone())
            .bind(self.phone.clone())
            .bind(self.relationship.clone())
            .bind(self.years_known)
            .bind(self.notes.clone())
            .bind(self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CustomSectionRow {
    pub id: i64,
    pub resume_id: i64,
    pub title: String,
    pub content: String,
    pub items: String,
    pub section_type: String,
    pub sort_order: i32,
}

impl ChildRow for CustomSectionRow {
    const TABLE: &'static str = "custom_sections";
    const COLUMNS: &'static [&'static str] =
        &["title", "content", "items", "section_type", "sort_order"];

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.title.clone())
            .bind(self.content.clone())
            .bind(self.items.clone())
            .bind(self.section_type.clone())
            .bind(self.sort_order)
    }
}

/// The full storage representation of one resume.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResume {
    pub resume: ResumeRow,
    pub experiences: Vec<WorkExperienceRow>,
    pub education: Vec<EducationRow>,
    pub skills: Vec<SkillRow>,
    pub projects: Vec<ProjectRow>,
    pub certifications: Vec<CertificationRow>,
    pub languages: Vec<LanguageRow>,
    pub references: Vec<ReferenceRow>,
    pub custom_sections: Vec<CustomSectionRow>,
}
