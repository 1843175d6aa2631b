//! Read-only Markdown rendering of a resume. No storage access.

use chrono::Utc;

use crate::resume::models::{month_year, ResumeData, SkillCategory};

/// Renders `doc` as Markdown. Sections follow a fixed order and empty ones are skipped;
/// entries within a section keep their `sort_order`.
pub fn render_resume_to_md(doc: &ResumeData) -> String {
    let info = &doc.personal_info;
    let name = if info.full_name.trim().is_empty() {
        doc.title.as_str()
    } else {
        info.full_name.as_str()
    };
    let mut md = format!("# {name}\n\n");
    if !info.job_title.trim().is_empty() {
        md.push_str(&format!("**{}**\n\n", info.job_title));
    }

    let contact: Vec<String> = [
        info.email.clone(),
        info.phone.clone(),
        info.formatted_address(),
        info.linked_in.clone(),
        info.github.clone(),
        info.website.clone(),
    ]
    .into_iter()
    .filter(|part| !part.trim().is_empty())
    .collect();
    if !contact.is_empty() {
        md.push_str(&contact.join(" | "));
        md.push_str("\n\n");
    }

    if !info.summary.trim().is_empty() {
        md.push_str("## Summary\n\n");
        md.push_str(info.summary.trim());
        md.push_str("\n\n");
    }

    let mut experiences: Vec<_> = doc.experiences.iter().collect();
    experiences.sort_by_key(|e| e.sort_order);
    if !experiences.is_empty() {
        md.push_str("## Experience\n\n");
        for exp in experiences {
            md.push_str(&format!("### {} at {}\n", exp.job_title, exp.company));
            md.push_str(&format!("_{}_", exp.formatted_duration()));
            let months = exp.duration_in_months(Utc::now());
            if months > 0 {
                md.push_str(&format!(" ({})", tenure(months)));
            }
            if !exp.location.is_empty() {
                md.push_str(&format!(" · {}", exp.location));
            }
            md.push_str("\n\n");
            if !exp.description.is_empty() {
                md.push_str(&format!("{}\n\n", exp.description));
            }
            push_bullets(&mut md, &exp.bullet_points);
            push_bullets(&mut md, &exp.achievements);
            push_labelled(&mut md, "Technologies", &exp.technologies);
        }
    }

    let mut education: Vec<_> = doc.education.iter().collect();
    education.sort_by_key(|e| e.sort_order);
    if !education.is_empty() {
        md.push_str("## Education\n\n");
        for edu in education {
            let degree = if edu.field_of_study.is_empty() {
                edu.degree.clone()
            } else {
                format!("{} in {}", edu.degree, edu.field_of_study)
            };
            md.push_str(&format!("### {degree}, {}\n", edu.institution));
            let details: Vec<String> = [edu.formatted_graduation(), edu.formatted_gpa()]
                .into_iter()
                .filter(|d| !d.is_empty())
                .collect();
            if !details.is_empty() {
                md.push_str(&format!("_{}_\n", details.join(" · ")));
            }
            md.push('\n');
            push_labelled(&mut md, "Honors", &edu.honors);
            push_labelled(&mut md, "Relevant courses", &edu.relevant_courses);
        }
    }

    let mut skills: Vec<_> = doc.skills.iter().collect();
    skills.sort_by_key(|s| s.sort_order);
    if !skills.is_empty() {
        md.push_str("## Skills\n\n");
        // Grouped by category, categories in order of first appearance
        let mut categories: Vec<SkillCategory> = Vec::new();
        for skill in &skills {
            if !categories.contains(&skill.category) {
                categories.push(skill.category);
            }
        }
        for category in categories {
            let names: Vec<&str> = skills
                .iter()
                .filter(|s| s.category == category)
                .map(|s| s.name.as_str())
                .collect();
            md.push_str(&format!("- **{}:** {}\n", category.display_name(), names.join(", ")));
        }
        md.push('\n');
    }

    let mut projects: Vec<_> = doc.projects.iter().collect();
    projects.sort_by_key(|p| p.sort_order);
    if !projects.is_empty() {
        md.push_str("## Projects\n\n");
        for project in projects {
            md.push_str(&format!("### {}\n", project.name));
            let duration = project.formatted_duration();
            if !duration.is_empty() {
                md.push_str(&format!("_{duration}_\n"));
            }
            md.push('\n');
            md.push_str(&format!("{}\n\n", project.description));
            push_bullets(&mut md, &project.features);
            push_labelled(&mut md, "Technologies", &project.technologies);
            if !project.project_url.is_empty() {
                md.push_str(&format!("<{}>\n\n", project.project_url));
            }
        }
    }

    let mut certifications: Vec<_> = doc.certifications.iter().collect();
    certifications.sort_by_key(|c| c.sort_order);
    if !certifications.is_empty() {
        md.push_str("## Certifications\n\n");
        for cert in certifications {
            md.push_str(&format!("- **{}**", cert.name));
            if !cert.issuing_organization.is_empty() {
                md.push_str(&format!(", {}", cert.issuing_organization));
            }
            let issued = cert.formatted_issue_date();
            if !issued.is_empty() {
                md.push_str(&format!(" ({issued})"));
            }
            if cert.is_expired_at(Utc::now()) {
                md.push_str(" *expired*");
            }
            md.push('\n');
        }
        md.push('\n');
    }

    let mut languages: Vec<_> = doc.languages.iter().collect();
    languages.sort_by_key(|l| l.sort_order);
    if !languages.is_empty() {
        md.push_str("## Languages\n\n");
        for language in languages {
            md.push_str(&format!(
                "- {}: {}\n",
                language.name,
                language.proficiency.display_name()
            ));
        }
        md.push('\n');
    }

    let mut references: Vec<_> = doc.references.iter().collect();
    references.sort_by_key(|r| r.sort_order);
    if !references.is_empty() {
        md.push_str("## References\n\n");
        for reference in references {
            let role: Vec<&str> = [reference.title.as_str(), reference.company.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect();
            md.push_str(&format!("- **{}**", reference.name));
            if !role.is_empty() {
                md.push_str(&format!(", {}", role.join(", ")));
            }
            if !reference.email.is_empty() {
                md.push_str(&format!(" ({})", reference.email));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    let mut custom_sections: Vec<_> = doc.custom_sections.iter().collect();
    custom_sections.sort_by_key(|c| c.sort_order);
    for section in custom_sections {
        md.push_str(&format!("## {}\n\n", section.title));
        if !section.content.is_empty() {
            md.push_str(&format!("{}\n\n", section.content));
        }
        let mut items: Vec<_> = section.items.iter().collect();
        items.sort_by_key(|i| i.sort_order);
        for item in &items {
            md.push_str(&format!("- **{}**", item.title));
            if !item.subtitle.is_empty() {
                md.push_str(&format!(", {}", item.subtitle));
            }
            if let Some(date) = item.date {
                md.push_str(&format!(" ({})", month_year(date)));
            }
            if !item.description.is_empty() {
                md.push_str(&format!(": {}", item.description));
            }
            md.push('\n');
        }
        if !items.is_empty() {
            md.push('\n');
        }
    }

    md
}

/// "2 yrs 5 mos", "1 yr", "3 mos".
fn tenure(months: i32) -> String {
    let (years, months) = (months / 12, months % 12);
    let mut parts = Vec::new();
    match years {
        0 => {}
        1 => parts.push("1 yr".to_string()),
        n => parts.push(format!("{n} yrs")),
    }
    match months {
        0 => {}
        1 => parts.push("1 mo".to_string()),
        n => parts.push(format!("{n} mos")),
    }
    parts.join(" ")
}

/// Non-blank lines as a bullet list.
fn push_bullets(md: &mut String, lines: &[String]) {
    let lines: Vec<&String> = lines.iter().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return;
    }
    for line in lines {
        md.push_str(&format!("- {line}\n"));
    }
    md.push('\n');
}

fn push_labelled(md: &mut String, label: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    md.push_str(&format!("**{label}:** {}\n\n", values.join(", ")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::mapping::tests::sample_resume;

    #[test]
    fn test_header_and_contact_line() {
        let md = render_resume_to_md(&sample_resume());
        assert!(md.starts_with("# Grace Hopper\n\n**Staff Engineer**\n\n"));
        assert!(md.contains("grace@example.com | Arlington\n"));
        assert!(md.contains("## Summary\n\nCompilers and distributed systems."));
    }

    #[test]
    fn test_sections_follow_sort_order() {
        let md = render_resume_to_md(&sample_resume());
        let lead = md.find("### Lead at Globex").unwrap();
        let engineer = md.find("### Engineer at Acme").unwrap();
        assert!(lead < engineer);
        assert!(md.contains("_Jun 2022 - Present_"));
        assert!(md.contains("_Jan 2020 - Jun 2022_ (2 yrs 5 mos)"));
    }

    #[test]
    fn test_tenure_wording() {
        assert_eq!(tenure(29), "2 yrs 5 mos");
        assert_eq!(tenure(12), "1 yr");
        assert_eq!(tenure(1), "1 mo");
    }

    #[test]
    fn test_blank_bullets_are_not_rendered() {
        let md = render_resume_to_md(&sample_resume());
        assert!(md.contains("- Shipped v2\n- Cut p99 by 40%\n"));
        assert!(!md.contains("- \n"));
    }

    #[test]
    fn test_skills_grouped_by_category() {
        let md = render_resume_to_md(&sample_resume());
        assert!(md.contains("- **Soft Skills:** Leadership\n"));
        assert!(md.contains("- **Databases:** SQL\n"));
        assert!(md.contains("- **Programming Languages:** Rust\n"));
    }

    #[test]
    fn test_custom_section_and_languages() {
        let md = render_resume_to_md(&sample_resume());
        assert!(md.contains("## Talks\n\n- **Nanoseconds** (Jan 2020)\n"));
        assert!(md.contains("- English: Native\n"));
        assert!(md.contains("- **AWS SA** (Jan 2020)\n"));
    }

    #[test]
    fn test_expired_certification_is_marked() {
        let mut doc = sample_resume();
        doc.certifications[0].expiration_date = Some(Utc::now() - chrono::Duration::days(1));
        let md = render_resume_to_md(&doc);
        assert!(md.contains("- **AWS SA** (Jan 2020) *expired*\n"));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let doc = ResumeData { title: "Draft".into(), ..Default::default() };
        let md = render_resume_to_md(&doc);
        assert_eq!(md, "# Draft\n\n");
    }
}
