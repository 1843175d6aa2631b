//! Pre-write checks. A failing check blocks the write before storage is touched
//! and reports every violation at once, not just the first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::mapping::SectionEntry;
use crate::resume::models::{Education, PersonalInfo, Project, ResumeData, Skill, WorkExperience};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            passed: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.passed {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Validates a whole resume before create or full replace.
///
/// Personal-info rules are reported unprefixed. Child violations are prefixed
/// with the section label and 1-based position, e.g. `Project 2: Project name is required`.
pub fn validate_resume(doc: &ResumeData) -> ValidationResult {
    let mut errors = personal_info_violations(&doc.personal_info);

    collect_entry_violations(&doc.experiences, &mut errors);
    collect_entry_violations(&doc.education, &mut errors);
    collect_entry_violations(&doc.skills, &mut errors);
    collect_entry_violations(&doc.projects, &mut errors);
    collect_entry_violations(&doc.certifications, &mut errors);
    collect_entry_violations(&doc.languages, &mut errors);
    collect_entry_violations(&doc.references, &mut errors);
    collect_entry_violations(&doc.custom_sections, &mut errors);

    ValidationResult::from_errors(errors)
}

/// Validates a single child record for the add/update-entry paths.
pub fn validate_entry<E: SectionEntry>(entry: &E) -> ValidationResult {
    ValidationResult::from_errors(entry.violations())
}

/// Partial personal-info edits only check that a supplied email looks like one.
pub fn validate_contact_update(info: &PersonalInfo) -> ValidationResult {
    let mut errors = Vec::new();
    if !info.email.trim().is_empty() && !info.email.contains('@') {
        errors.push("Email must contain @".to_string());
    }
    ValidationResult::from_errors(errors)
}

fn collect_entry_violations<E: SectionEntry>(entries: &[E], errors: &mut Vec<String>) {
    for (index, entry) in entries.iter().enumerate() {
        for violation in entry.violations() {
            errors.push(format!("{} {}: {violation}", E::LABEL, index + 1));
        }
    }
}

pub fn personal_info_violations(info: &PersonalInfo) -> Vec<String> {
    let mut errors = Vec::new();
    if info.full_name.trim().is_empty() {
        errors.push("Full name is required".to_string());
    }
    // Deliberately weak: only the presence of '@' is checked.
    if info.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    } else if !info.email.contains('@') {
        errors.push("Valid email is required".to_string());
    }
    if info.job_title.trim().is_empty() {
        errors.push("Job title is required".to_string());
    }
    errors
}

pub fn work_experience_violations(exp: &WorkExperience) -> Vec<String> {
    let mut errors = Vec::new();
    if exp.job_title.trim().is_empty() {
        errors.push("Job title is required".to_string());
    }
    if exp.company.trim().is_empty() {
        errors.push("Company name is required".to_string());
    }
    if !exp.is_current_position && starts_after_end(exp.start_date, exp.end_date) {
        errors.push("Start date cannot be after end date".to_string());
    }
    errors
}

pub fn education_violations(edu: &Education) -> Vec<String> {
    let mut errors = Vec::new();
    if edu.degree.trim().is_empty() {
        errors.push("Degree is required".to_string());
    }
    if edu.institution.trim().is_empty() {
        errors.push("Institution name is required".to_string());
    }
    errors
}

pub fn project_violations(project: &Project) -> Vec<String> {
    let mut errors = Vec::new();
    if project.name.trim().is_empty() {
        errors.push("Project name is required".to_string());
    }
    if project.description.trim().is_empty() {
        errors.push("Project description is required".to_string());
    }
    if !project.is_ongoing && starts_after_end(project.start_date, project.end_date) {
        errors.push("Start date cannot be after end date".to_string());
    }
    errors
}

pub fn skill_violations(skill: &Skill) -> Vec<String> {
    if skill.name.trim().is_empty() {
        vec!["Skill name cannot be empty".to_string()]
    } else {
        Vec::new()
    }
}

fn starts_after_end(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    matches!((start, end), (Some(start), Some(end)) if start > end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::models::{Certification, Reference};
    use chrono::TimeZone;

    fn valid_resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                job_title: "Analyst".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn date(y: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_resume_passes() {
        let r = validate_resume(&valid_resume());
        assert!(r.passed);
        assert!(r.errors.is_empty());
        assert!(r.into_result().is_ok());
    }

    #[test]
    fn test_blank_full_name() {
        let mut doc = valid_resume();
        doc.personal_info.full_name = "   ".into();
        let r = validate_resume(&doc);
        assert!(!r.passed);
        assert_eq!(r.errors, vec!["Full name is required"]);
    }

    #[test]
    fn test_all_personal_violations_reported_together() {
        let r = validate_resume(&ResumeData::default());
        assert_eq!(
            r.errors,
            vec![
                "Full name is required",
                "Email is required",
                "Job title is required"
            ]
        );
    }

    #[test]
    fn test_email_without_at_sign() {
        let mut doc = valid_resume();
        doc.personal_info.email = "ada.example.com".into();
        assert_eq!(validate_resume(&doc).errors, vec!["Valid email is required"]);
    }

    #[test]
    fn test_weak_email_check_accepts_odd_addresses() {
        let mut doc = valid_resume();
        doc.personal_info.email = "@".into();
        assert!(validate_resume(&doc).passed);
    }

    #[test]
    fn test_child_violations_are_prefixed_with_position() {
        let mut doc = valid_resume();
        doc.experiences = vec![
            WorkExperience { job_title: "Dev".into(), company: "Acme".into(), ..Default::default() },
            WorkExperience::default(),
        ];
        doc.skills = vec![Skill::default()];
        let r = validate_resume(&doc);
        assert_eq!(
            r.errors,
            vec![
                "Work experience 2: Job title is required",
                "Work experience 2: Company name is required",
                "Skill 1: Skill name cannot be empty",
            ]
        );
    }

    #[test]
    fn test_work_dates_out_of_order() {
        let exp = WorkExperience {
            job_title: "Dev".into(),
            company: "Acme".into(),
            start_date: Some(date(2022)),
            end_date: Some(date(2020)),
            ..Default::default()
        };
        assert_eq!(
            work_experience_violations(&exp),
            vec!["Start date cannot be after end date"]
        );
    }

    #[test]
    fn test_current_position_ignores_end_date() {
        let exp = WorkExperience {
            job_title: "Dev".into(),
            company: "Acme".into(),
            start_date: Some(date(2022)),
            end_date: Some(date(2020)),
            is_current_position: true,
            ..Default::default()
        };
        assert!(work_experience_violations(&exp).is_empty());
    }

    #[test]
    fn test_single_date_is_never_out_of_order() {
        let exp = WorkExperience {
            job_title: "Dev".into(),
            company: "Acme".into(),
            start_date: Some(date(2022)),
            ..Default::default()
        };
        assert!(work_experience_violations(&exp).is_empty());
    }

    #[test]
    fn test_project_rules() {
        let project = Project {
            start_date: Some(date(2023)),
            end_date: Some(date(2021)),
            ..Default::default()
        };
        assert_eq!(
            project_violations(&project),
            vec![
                "Project name is required",
                "Project description is required",
                "Start date cannot be after end date",
            ]
        );

        let ongoing = Project {
            name: "X".into(),
            description: "Y".into(),
            is_ongoing: true,
            ..project
        };
        assert!(project_violations(&ongoing).is_empty());
    }

    #[test]
    fn test_education_rules() {
        assert_eq!(
            education_violations(&Education::default()),
            vec!["Degree is required", "Institution name is required"]
        );
    }

    #[test]
    fn test_sections_without_rules_always_pass() {
        assert!(validate_entry(&Certification::default()).passed);
        assert!(validate_entry(&Reference::default()).passed);
    }

    #[test]
    fn test_into_result_carries_every_message() {
        let err = validate_entry(&Education::default()).into_result().unwrap_err();
        match err {
            AppError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_update_allows_blank_email() {
        assert!(validate_contact_update(&PersonalInfo::default()).passed);
        let info = PersonalInfo { email: "nope".into(), ..Default::default() };
        assert_eq!(validate_contact_update(&info).errors, vec!["Email must contain @"]);
    }
}
