//! The aggregate document: one resume with every section embedded.
//!
//! All types are plain values. Edits produce a new value through struct-update
//! syntax (`WorkExperience { sort_order: 2, ..exp }`) rather than in-place
//! mutation, so a document can be handed across tasks freely.
//!
//! Identity `0` means "not yet persisted" for the resume and for every child.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Identity value of a record that has not been stored yet.
pub const UNASSIGNED_ID: i64 = 0;

pub const DEFAULT_TEMPLATE_ID: &str = "olivia";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    pub id: i64,
    pub title: String,
    pub template_id: String,
    pub personal_info: PersonalInfo,
    pub experiences: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
    pub references: Vec<Reference>,
    pub custom_sections: Vec<CustomSection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_complete: bool,
}

impl Default for ResumeData {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: UNASSIGNED_ID,
            title: String::new(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            personal_info: PersonalInfo::default(),
            experiences: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            languages: Vec::new(),
            references: Vec::new(),
            custom_sections: Vec::new(),
            created_at: now,
            updated_at: now,
            is_complete: false,
        }
    }
}

impl ResumeData {
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    /// Returns a copy carrying `id`, with every child back-reference pointing at it.
    pub fn with_id(self, id: i64) -> Self {
        Self {
            id,
            experiences: self.experiences.into_iter().map(|e| WorkExperience { resume_id: id, ..e }).collect(),
            education: self.education.into_iter().map(|e| Education { resume_id: id, ..e }).collect(),
            skills: self.skills.into_iter().map(|s| Skill { resume_id: id, ..s }).collect(),
            projects: self.projects.into_iter().map(|p| Project { resume_id: id, ..p }).collect(),
            certifications: self
                .certifications
                .into_iter()
                .map(|c| Certification { resume_id: id, ..c })
                .collect(),
            languages: self.languages.into_iter().map(|l| Language { resume_id: id, ..l }).collect(),
            references: self.references.into_iter().map(|r| Reference { resume_id: id, ..r }).collect(),
            custom_sections: self
                .custom_sections
                .into_iter()
                .map(|c| CustomSection { resume_id: id, ..c })
                .collect(),
            ..self
        }
    }

    /// Returns a copy with the resume and all child identities reset to the sentinel.
    pub fn unassigned(self) -> Self {
        let reset = self.with_id(UNASSIGNED_ID);
        Self {
            experiences: reset.experiences.into_iter().map(|e| WorkExperience { id: UNASSIGNED_ID, ..e }).collect(),
            education: reset.education.into_iter().map(|e| Education { id: UNASSIGNED_ID, ..e }).collect(),
            skills: reset.skills.into_iter().map(|s| Skill { id: UNASSIGNED_ID, ..s }).collect(),
            projects: reset.projects.into_iter().map(|p| Project { id: UNASSIGNED_ID, ..p }).collect(),
            certifications: reset
                .certifications
                .into_iter()
                .map(|c| Certification { id: UNASSIGNED_ID, ..c })
                .collect(),
            languages: reset.languages.into_iter().map(|l| Language { id: UNASSIGNED_ID, ..l }).collect(),
            references: reset.references.into_iter().map(|r| Reference { id: UNASSIGNED_ID, ..r }).collect(),
            custom_sections: reset
                .custom_sections
                .into_iter()
                .map(|c| CustomSection { id: UNASSIGNED_ID, ..c })
                .collect(),
            ..reset
        }
    }
}

/// Contact block. Stored inline on the resume row, never as its own table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
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
}

impl PersonalInfo {
    /// Non-blank address parts joined with ", ".
    pub fn formatted_address(&self) -> String {
        [&self.address, &self.city, &self.state, &self.zip_code, &self.country]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub id: i64,
    pub resume_id: i64,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_current_position: bool,
    pub description: String,
    pub bullet_points: Vec<String>,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub sort_order: i32,
}

impl WorkExperience {
    /// "Jan 2020 - Mar 2023", with "Present" for a missing or current end.
    pub fn formatted_duration(&self) -> String {
        let start = self
            .start_date
            .map(month_year)
            .unwrap_or_else(|| "Present".to_string());
        let end = match (self.is_current_position, self.end_date) {
            (false, Some(end)) => month_year(end),
            _ => "Present".to_string(),
        };
        format!("{start} - {end}")
    }

    /// Calendar months from start to end, measured to `now` when current or open-ended.
    pub fn duration_in_months(&self, now: DateTime<Utc>) -> i32 {
        let Some(start) = self.start_date else {
            return 0;
        };
        let end = match (self.is_current_position, self.end_date) {
            (false, Some(end)) => end,
            _ => now,
        };
        (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub id: i64,
    pub resume_id: i64,
    pub degree: String,
    pub field_of_study: String,
    pub institution: String,
    pub location: String,
    pub graduation_date: Option<DateTime<Utc>>,
    pub gpa: String,
    pub max_gpa: String,
    pub relevant_courses: Vec<String>,
    pub honors: Vec<String>,
    pub activities: Vec<String>,
    pub thesis: String,
    pub sort_order: i32,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            id: UNASSIGNED_ID,
            resume_id: UNASSIGNED_ID,
            degree: String::new(),
            field_of_study: String::new(),
            institution: String::new(),
            location: String::new(),
            graduation_date: None,
            gpa: String::new(),
            max_gpa: "4.0".to_string(),
            relevant_courses: Vec::new(),
            honors: Vec::new(),
            activities: Vec::new(),
            thesis: String::new(),
            sort_order: 0,
        }
    }
}

impl Education {
    pub fn formatted_graduation(&self) -> String {
        self.graduation_date.map(month_year).unwrap_or_default()
    }

    pub fn formatted_gpa(&self) -> String {
        if self.gpa.trim().is_empty() || self.max_gpa.trim().is_empty() {
            return String::new();
        }
        format!("GPA: {}/{}", self.gpa, self.max_gpa)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency_level: ProficiencyLevel,
    pub years_of_experience: i32,
    pub keywords: Vec<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub description: String,
    pub role: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_ongoing: bool,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub challenges: String,
    pub solutions: String,
    pub results: String,
    pub project_url: String,
    pub github_url: String,
    pub demo_url: String,
    pub images: Vec<String>,
    pub sort_order: i32,
}

impl Project {
    /// Like the work duration, but omits whichever side is unknown.
    pub fn formatted_duration(&self) -> String {
        let start = self.start_date.map(month_year).unwrap_or_default();
        let end = if self.is_ongoing {
            "Ongoing".to_string()
        } else {
            self.end_date.map(month_year).unwrap_or_default()
        };
        match (start.is_empty(), end.is_empty()) {
            (true, true) => String::new(),
            (true, false) => end,
            (false, true) => start,
            (false, false) => format!("{start} - {end}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub credential_id: String,
    pub credential_url: String,
    pub description: String,
    pub skills: Vec<String>,
    pub sort_order: i32,
}

impl Certification {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|expires| expires < now)
    }

    pub fn formatted_issue_date(&self) -> String {
        self.issue_date.map(month_year).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub id: i64,
    pub resume_id: i64,
    pub name: String,
    pub proficiency: LanguageProficiency,
    pub native_language: bool,
    pub certifications: Vec<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    pub id: i64,
    pub resume_id: i64,
    pub title: String,
    pub content: String,
    pub items: Vec<CustomSectionItem>,
    pub section_type: CustomSectionType,
    pub sort_order: i32,
}

/// Entry inside a custom section. Serialized together with its section, not a table of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSectionItem {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub url: String,
    pub sort_order: i32,
}

// ────────────────────────────────────────────────────────────────────────────
// Enumerated fields. Stored by symbol; `#[default]` is the decode fallback.
// ────────────────────────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillCategory {
    #[default]
    Technical,
    Software,
    Programming,
    Frameworks,
    Databases,
    Cloud,
    Tools,
    SoftSkills,
    Languages,
    Certifications,
    Other,
}

impl SkillCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "Technical Skills",
            SkillCategory::Software => "Software",
            SkillCategory::Programming => "Programming Languages",
            SkillCategory::Frameworks => "Frameworks & Libraries",
            SkillCategory::Databases => "Databases",
            SkillCategory::Cloud => "Cloud Technologies",
            SkillCategory::Tools => "Tools & Technologies",
            SkillCategory::SoftSkills => "Soft Skills",
            SkillCategory::Languages => "Languages",
            SkillCategory::Certifications => "Certifications",
            SkillCategory::Other => "Other",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProficiencyLevel {
    Beginner,
    Basic,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Beginner",
            ProficiencyLevel::Basic => "Basic",
            ProficiencyLevel::Intermediate => "Intermediate",
            ProficiencyLevel::Advanced => "Advanced",
            ProficiencyLevel::Expert => "Expert",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LanguageProficiency {
    Native,
    Fluent,
    Advanced,
    #[default]
    Intermediate,
    Basic,
    Beginner,
}

impl LanguageProficiency {
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageProficiency::Native => "Native",
            LanguageProficiency::Fluent => "Fluent",
            LanguageProficiency::Advanced => "Advanced",
            LanguageProficiency::Intermediate => "Intermediate",
            LanguageProficiency::Basic => "Basic",
            LanguageProficiency::Beginner => "Beginner",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomSectionType {
    #[default]
    Text,
    List,
    Timeline,
    Links,
    Achievements,
    Publications,
    Volunteer,
    Awards,
    Interests,
}

pub(crate) fn month_year(date: DateTime<Utc>) -> String {
    date.format("%b %Y").to_string()
}
