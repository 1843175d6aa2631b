//! Mapping layer between the aggregate document and its normalized rows.
//!
//! Both directions are pure. Decoding never fails on a damaged column: an
//! unknown enum symbol falls back to the field's default and an unreadable
//! list decodes as empty, each with a warning, so one bad value cannot block
//! loading the rest of a resume.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::models::resume::{
    CertificationRow, ChildRow, CustomSectionRow, EducationRow, LanguageRow, NormalizedResume,
    ProjectRow, ReferenceRow, ResumeRow, SkillRow, WorkExperienceRow,
};
use crate::resume::models::{
    Certification, CustomSection, CustomSectionItem, CustomSectionType, Education, Language,
    LanguageProficiency, PersonalInfo, ProficiencyLevel, Project, Reference, ResumeData, Skill,
    SkillCategory, WorkExperience,
};
use crate::resume::validation;

// ────────────────────────────────────────────────────────────────────────────
// Column encodings
// ────────────────────────────────────────────────────────────────────────────

/// Encodes a list column as a JSON array. Entries are kept verbatim, blanks included.
pub fn encode_list<T: Serialize>(values: &[T]) -> Result<String, AppError> {
    Ok(serde_json::to_string(values)?)
}

pub fn decode_list<T: DeserializeOwned>(raw: &str, column: &str) -> Vec<T> {
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("Unreadable list in column '{column}', loading as empty: {e}");
            Vec::new()
        }
    }
}

/// Decodes an enum symbol, falling back to the type's default for anything unknown.
pub fn decode_symbol<E>(raw: &str, column: &str) -> E
where
    E: FromStr + Default + AsRef<str>,
{
    raw.parse::<E>().unwrap_or_else(|_| {
        let fallback = E::default();
        warn!(
            "Unknown symbol '{raw}' in column '{column}', using '{}'",
            fallback.as_ref()
        );
        fallback
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Section entries
// ────────────────────────────────────────────────────────────────────────────

/// A child value type of the aggregate, tied to the table that stores it.
pub trait SectionEntry: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Row: ChildRow;

    /// URL segment naming the collection.
    const SLUG: &'static str;
    /// Human label used to prefix validation messages.
    const LABEL: &'static str;

    fn id(&self) -> i64;
    fn resume_id(&self) -> i64;
    fn with_identity(self, id: i64, resume_id: i64) -> Self;
    fn to_row(&self) -> Result<Self::Row, AppError>;
    fn from_row(row: Self::Row) -> Self;

    /// Rule violations for this record; empty when valid.
    fn violations(&self) -> Vec<String> {
        Vec::new()
    }
}

impl SectionEntry for WorkExperience {
    type Row = WorkExperienceRow;
    const SLUG: &'static str = "experiences";
    const LABEL: &'static str = "Work experience";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<WorkExperienceRow, AppError> {
        Ok(WorkExperienceRow {
            id: self.id,
            resume_id: self.resume_id,
            job_title: self.job_title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            is_current_position: self.is_current_position,
            description: self.description.clone(),
            bullet_points: encode_list(&self.bullet_points)?,
            achievements: encode_list(&self.achievements)?,
            technologies: encode_list(&self.technologies)?,
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: WorkExperienceRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            job_title: row.job_title,
            company: row.company,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            is_current_position: row.is_current_position,
            description: row.description,
            bullet_points: decode_list(&row.bullet_points, "work_experiences.bullet_points"),
            achievements: decode_list(&row.achievements, "work_experiences.achievements"),
            technologies: decode_list(&row.technologies, "work_experiences.technologies"),
            sort_order: row.sort_order,
        }
    }

    fn violations(&self) -> Vec<String> {
        validation::work_experience_violations(self)
    }
}

impl SectionEntry for Education {
    type Row = EducationRow;
    const SLUG: &'static str = "education";
    const LABEL: &'static str = "Education";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<EducationRow, AppError> {
        Ok(EducationRow {
            id: self.id,
            resume_id: self.resume_id,
            degree: self.degree.clone(),
            field_of_study: self.field_of_study.clone(),
            institution: self.institution.clone(),
            location: self.location.clone(),
            graduation_date: self.graduation_date,
            gpa: self.gpa.clone(),
            max_gpa: self.max_gpa.clone(),
            relevant_courses: encode_list(&self.relevant_courses)?,
            honors: encode_list(&self.honors)?,
            activities: encode_list(&self.activities)?,
            thesis: self.thesis.clone(),
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: EducationRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            degree: row.degree,
            field_of_study: row.field_of_study,
            institution: row.institution,
            location: row.location,
            graduation_date: row.graduation_date,
            gpa: row.gpa,
            max_gpa: row.max_gpa,
            relevant_courses: decode_list(&row.relevant_courses, "education.relevant_courses"),
            honors: decode_list(&row.honors, "education.honors"),
            activities: decode_list(&row.activities, "education.activities"),
            thesis: row.thesis,
            sort_order: row.sort_order,
        }
    }

    fn violations(&self) -> Vec<String> {
        validation::education_violations(self)
    }
}

impl SectionEntry for Skill {
    type Row = SkillRow;
    const SLUG: &'static str = "skills";
    const LABEL: &'static str = "Skill";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<SkillRow, AppError> {
        Ok(SkillRow {
            id: self.id,
            resume_id: self.resume_id,
            name: self.name.clone(),
            category: self.category.as_ref().to_string(),
            proficiency_level: self.proficiency_level.as_ref().to_string(),
            years_of_experience: self.years_of_experience,
            keywords: encode_list(&self.keywords)?,
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: SkillRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            name: row.name,
            category: decode_symbol::<SkillCategory>(&row.category, "skills.category"),
            proficiency_level: decode_symbol::<ProficiencyLevel>(
                &row.proficiency_level,
                "skills.proficiency_level",
            ),
            years_of_experience: row.years_of_experience,
            keywords: decode_list(&row.keywords, "skills.keywords"),
            sort_order: row.sort_order,
        }
    }

    fn violations(&self) -> Vec<String> {
        validation::skill_violations(self)
    }
}

impl SectionEntry for Project {
    type Row = ProjectRow;
    const SLUG: &'static str = "projects";
    const LABEL: &'static str = "Project";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<ProjectRow, AppError> {
        Ok(ProjectRow {
            id: self.id,
            resume_id: self.resume_id,
            name: self.name.clone(),
            description: self.description.clone(),
            role: self.role.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            is_ongoing: self.is_ongoing,
            technologies: encode_list(&self.technologies)?,
            features: encode_list(&self.features)?,
            challenges: self.challenges.clone(),
            solutions: self.solutions.clone(),
            results: self.results.clone(),
            project_url: self.project_url.clone(),
            github_url: self.github_url.clone(),
            demo_url: self.demo_url.clone(),
            images: encode_list(&self.images)?,
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            name: row.name,
            description: row.description,
            role: row.role,
            start_date: row.start_date,
            end_date: row.end_date,
            is_ongoing: row.is_ongoing,
            technologies: decode_list(&row.technologies, "projects.technologies"),
            features: decode_list(&row.features, "projects.features"),
            challenges: row.challenges,
            solutions: row.solutions,
            results: row.results,
            project_url: row.project_url,
            github_url: row.github_url,
            demo_url: row.demo_url,
            images: decode_list(&row.images, "projects.images"),
            sort_order: row.sort_order,
        }
    }

    fn violations(&self) -> Vec<String> {
        validation::project_violations(self)
    }
}

impl SectionEntry for Certification {
    type Row = CertificationRow;
    const SLUG: &'static str = "certifications";
    const LABEL: &'static str = "Certification";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<CertificationRow, AppError> {
        Ok(CertificationRow {
            id: self.id,
            resume_id: self.resume_id,
            name: self.name.clone(),
            issuing_organization: self.issuing_organization.clone(),
            issue_date: self.issue_date,
            expiration_date: self.expiration_date,
            credential_id: self.credential_id.clone(),
            credential_url: self.credential_url.clone(),
            description: self.description.clone(),
            skills: encode_list(&self.skills)?,
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: CertificationRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            name: row.name,
            issuing_organization: row.issuing_organization,
            issue_date: row.issue_date,
            expiration_date: row.expiration_date,
            credential_id: row.credential_id,
            credential_url: row.credential_url,
            description: row.description,
            skills: decode_list(&row.skills, "certifications.skills"),
            sort_order: row.sort_order,
        }
    }
}

impl SectionEntry for Language {
    type Row = LanguageRow;
    const SLUG: &'static str = "languages";
    const LABEL: &'static str = "Language";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<LanguageRow, AppError> {
        Ok(LanguageRow {
            id: self.id,
            resume_id: self.resume_id,
            name: self.name.clone(),
            proficiency: self.proficiency.as_ref().to_string(),
            native_language: self.native_language,
            certifications: encode_list(&self.certifications)?,
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: LanguageRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            name: row.name,
            proficiency: decode_symbol::<LanguageProficiency>(
                &row.proficiency,
                "languages.proficiency",
            ),
            native_language: row.native_language,
            certifications: decode_list(&row.certifications, "languages.certifications"),
            sort_order: row.sort_order,
        }
    }
}

impl SectionEntry for Reference {
    type Row = ReferenceRow;
    const SLUG: &'static str = "references";
    const LABEL: &'static str = "Reference";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<ReferenceRow, AppError> {
        Ok(ReferenceRow {
            id: self.id,
            resume_id: self.resume_id,
            name: self.name.clone(),
            title: self.title.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            relationship: self.relationship.clone(),
            years_known: self.years_known,
            notes: self.notes.clone(),
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: ReferenceRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            name: row.name,
            title: row.title,
            company: row.company,
            email: row.email,
            phone: row.phone,
            relationship: row.relationship,
            years_known: row.years_known,
            notes: row.notes,
            sort_order: row.sort_order,
        }
    }
}

impl SectionEntry for CustomSection {
    type Row = CustomSectionRow;
    const SLUG: &'static str = "custom-sections";
    const LABEL: &'static str = "Custom section";

    fn id(&self) -> i64 {
        self.id
    }

    fn resume_id(&self) -> i64 {
        self.resume_id
    }

    fn with_identity(self, id: i64, resume_id: i64) -> Self {
        Self { id, resume_id, ..self }
    }

    fn to_row(&self) -> Result<CustomSectionRow, AppError> {
        Ok(CustomSectionRow {
            id: self.id,
            resume_id: self.resume_id,
            title: self.title.clone(),
            content: self.content.clone(),
            items: encode_list(&self.items)?,
            section_type: self.section_type.as_ref().to_string(),
            sort_order: self.sort_order,
        })
    }

    fn from_row(row: CustomSectionRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            title: row.title,
            content: row.content,
            items: decode_list::<CustomSectionItem>(&row.items, "custom_sections.items"),
            section_type: decode_symbol::<CustomSectionType>(
                &row.section_type,
                "custom_sections.section_type",
            ),
            sort_order: row.sort_order,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Whole-aggregate mapping
// ────────────────────────────────────────────────────────────────────────────

fn rows_of<E: SectionEntry>(entries: &[E]) -> Result<Vec<E::Row>, AppError> {
    entries.iter().map(E::to_row).collect()
}

fn entries_of<E: SectionEntry>(rows: Vec<E::Row>) -> Vec<E> {
    rows.into_iter().map(E::from_row).collect()
}

pub fn resume_row(doc: &ResumeData) -> ResumeRow {
    let info = &doc.personal_info;
    ResumeRow {
        id: doc.id,
        title: doc.title.clone(),
        template_id: doc.template_id.clone(),
        full_name: info.full_name.clone(),
        job_title: info.job_title.clone(),
        email: info.email.clone(),
        phone: info.phone.clone(),
        linked_in: info.linked_in.clone(),
        github: info.github.clone(),
        website: info.website.clone(),
        address: info.address.clone(),
        city: info.city.clone(),
        state: info.state.clone(),
        zip_code: info.zip_code.clone(),
        country: info.country.clone(),
        profile_photo_path: info.profile_photo_path.clone(),
        summary: info.summary.clone(),
        created_at: doc.created_at,
        updated_at: doc.updated_at,
        is_complete: doc.is_complete,
    }
}

/// Splits an aggregate into its parent row and eight child collections.
pub fn to_normalized(doc: &ResumeData) -> Result<NormalizedResume, AppError> {
    Ok(NormalizedResume {
        resume: resume_row(doc),
        experiences: rows_of(&doc.experiences)?,
        education: rows_of(&doc.education)?,
        skills: rows_of(&doc.skills)?,
        projects: rows_of(&doc.projects)?,
        certifications: rows_of(&doc.certifications)?,
        languages: rows_of(&doc.languages)?,
        references: rows_of(&doc.references)?,
        custom_sections: rows_of(&doc.custom_sections)?,
    })
}

/// Reassembles an aggregate. Child order is taken as given; the store sorts before calling.
pub fn to_aggregate(set: NormalizedResume) -> ResumeData {
    let NormalizedResume {
        resume,
        experiences,
        education,
        skills,
        projects,
        certifications,
        languages,
        references,
        custom_sections,
    } = set;

    ResumeData {
        id: resume.id,
        title: resume.title,
        template_id: resume.template_id,
        personal_info: PersonalInfo {
            full_name: resume.full_name,
            job_title: resume.job_title,
            email: resume.email,
            phone: resume.phone,
            linked_in: resume.linked_in,
            github: resume.github,
            website: resume.website,
            address: resume.address,
            city: resume.city,
            state: resume.state,
            zip_code: resume.zip_code,
            country: resume.country,
            profile_photo_path: resume.profile_photo_path,
            summary: resume.summary,
        },
        experiences: entries_of(experiences),
        education: entries_of(education),
        skills: entries_of(skills),
        projects: entries_of(projects),
        certifications: entries_of(certifications),
        languages: entries_of(languages),
        references: entries_of(references),
        custom_sections: entries_of(custom_sections),
        created_at: resume.created_at,
        updated_at: resume.updated_at,
        is_complete: resume.is_complete,
    }
}
