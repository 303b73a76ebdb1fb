//! Places a résumé payload on the page canvas.
//!
//! Offsets: heading 100pt below the top edge, section labels 10pt below the
//! cursor with the cursor moving 25pt in total, 15pt per body line and an extra
//! 15pt after every entry.

use crate::layout::page::{DocumentLayout, PageCursor, PageSpec, TextStyle};
use crate::models::resume::{non_blank, text, Education, Experience, Project, ResumeData};

const TITLE_STEP: f32 = 20.0;
const LINE_STEP: f32 = 15.0;
const SECTION_GAP: f32 = 10.0;
const ENTRY_GAP: f32 = 15.0;
const NESTED_INDENT: f32 = 15.0;

pub const SUMMARY_LABEL: &str = "Summary:";
pub const SKILLS_LABEL: &str = "Skills:";
pub const EXPERIENCE_LABEL: &str = "Internship Experience:";
pub const PROJECTS_LABEL: &str = "Project Experience:";
pub const EDUCATION_LABEL: &str = "Education:";
pub const RESPONSIBILITIES_LABEL: &str = "Key Responsibilities:";

/// Lays out every non-empty section of `data`, paginating as needed.
pub fn layout_resume(data: &ResumeData, spec: &PageSpec) -> DocumentLayout {
    let mut cursor = PageCursor::new(spec);

    cursor.write(0.0, data.heading(), TextStyle::HEADING, TITLE_STEP);
    if let Some(subtitle) = data.subtitle() {
        cursor.write(0.0, subtitle, TextStyle::BODY, LINE_STEP);
    }
    if let Some(contact) = data.contact_line() {
        cursor.write(0.0, &contact, TextStyle::BODY, LINE_STEP);
    }

    if let Some(summary) = text(&data.summary) {
        section(&mut cursor, SUMMARY_LABEL);
        cursor.write(0.0, summary, TextStyle::BODY, LINE_STEP);
    }

    let skills = data.skill_list();
    if !skills.is_empty() {
        section(&mut cursor, SKILLS_LABEL);
        for skill in skills {
            bullet(&mut cursor, 0.0, skill);
        }
    }

    let experience: Vec<&Experience> = data
        .experience
        .iter()
        .filter(|e| !experience_is_empty(e))
        .collect();
    if !experience.is_empty() {
        section(&mut cursor, EXPERIENCE_LABEL);
        for entry in experience {
            field(&mut cursor, "Company", &entry.company);
            field(&mut cursor, "Title", &entry.title);
            field(&mut cursor, "Dates", &entry.dates);
            field(&mut cursor, "Description", &entry.description);
            for item in non_blank(&entry.responsibilities) {
                bullet(&mut cursor, NESTED_INDENT, item);
            }
            cursor.advance(ENTRY_GAP);
        }
    }

    let projects: Vec<&Project> = data
        .all_projects()
        .into_iter()
        .filter(|p| !project_is_empty(p))
        .collect();
    if !projects.is_empty() {
        section(&mut cursor, PROJECTS_LABEL);
        for project in projects {
            field(&mut cursor, "Project", &project.name);
            field(&mut cursor, "Dates", &project.dates);
            field(&mut cursor, "Description", &project.description);
            let tech: Vec<&str> = non_blank(&project.technologies).collect();
            if !tech.is_empty() {
                let line = format!("Technologies: {}", tech.join(", "));
                cursor.write(0.0, &line, TextStyle::BODY, LINE_STEP);
            }
            cursor.advance(ENTRY_GAP);
        }
    }

    let education: Vec<&Education> = data
        .education
        .iter()
        .filter(|e| !education_is_empty(e))
        .collect();
    if !education.is_empty() {
        section(&mut cursor, EDUCATION_LABEL);
        for entry in education {
            field(&mut cursor, "Institution", &entry.institution);
            field(&mut cursor, "Degree", &entry.degree);
            field(&mut cursor, "Dates", &entry.dates);
            field(&mut cursor, "Details", &entry.details);
            cursor.advance(ENTRY_GAP);
        }
    }

    // Per-entry responsibilities are already drawn under their experience.
    let responsibilities: Vec<&str> = non_blank(&data.responsibilities).collect();
    if !responsibilities.is_empty() {
        section(&mut cursor, RESPONSIBILITIES_LABEL);
        for item in responsibilities {
            bullet(&mut cursor, 0.0, item);
        }
    }

    cursor.finish()
}

fn section(cursor: &mut PageCursor<'_>, label: &str) {
    cursor.advance(SECTION_GAP);
    cursor.write(0.0, label, TextStyle::SECTION, LINE_STEP);
}

fn field(cursor: &mut PageCursor<'_>, label: &str, value: &Option<String>) {
    if let Some(value) = text(value) {
        cursor.write(0.0, &format!("{label}: {value}"), TextStyle::BODY, LINE_STEP);
    }
}

fn bullet(cursor: &mut PageCursor<'_>, indent: f32, item: &str) {
    cursor.write(indent, &format!("- {item}"), TextStyle::BODY, LINE_STEP);
}

fn experience_is_empty(e: &Experience) -> bool {
    [&e.company, &e.title, &e.dates, &e.description]
        .into_iter()
        .all(|f| text(f).is_none())
        && non_blank(&e.responsibilities).next().is_none()
}

fn project_is_empty(p: &Project) -> bool {
    [&p.name, &p.dates, &p.description]
        .into_iter()
        .all(|f| text(f).is_none())
        && non_blank(&p.technologies).next().is_none()
}

fn education_is_empty(e: &Education) -> bool {
    [&e.institution, &e.degree, &e.dates, &e.details]
        .into_iter()
        .all(|f| text(f).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResumeData {
        ResumeData::from_value(json!({
            "title": "Resume - Data Science Intern",
            "skills": ["Python", "SQL"],
            "internship": [{
                "company": "Acme Analytics",
                "title": "Data Science Intern",
                "dates": "Jun 2023 - Aug 2023",
                "description": "Built churn models"
            }],
            "project_1": { "name": "Forecasting", "dates": "2022", "description": "ARIMA baselines" },
            "project_2": { "name": "Dashboards", "dates": "2023", "description": "Streamlit app" }
        }))
        .unwrap()
    }

    fn y_of(layout: &DocumentLayout, text: &str) -> f32 {
        layout
            .find(text)
            .unwrap_or_else(|| panic!("missing {text}"))
            .1
            .y
    }

    #[test]
    fn test_offsets_match_single_page_renderer() {
        let layout = layout_resume(&sample(), &PageSpec::letter());

        assert_eq!(y_of(&layout, "Resume - Data Science Intern"), 692.0);
        assert_eq!(y_of(&layout, "Skills:"), 662.0);
        assert_eq!(y_of(&layout, "- Python"), 647.0);
        assert_eq!(y_of(&layout, "- SQL"), 632.0);
        assert_eq!(y_of(&layout, "Internship Experience:"), 607.0);
        assert_eq!(y_of(&layout, "Company: Acme Analytics"), 592.0);
        assert_eq!(y_of(&layout, "Description: Built churn models"), 547.0);
        // 30pt after the description, then the 10pt section gap.
        assert_eq!(y_of(&layout, "Project Experience:"), 507.0);
        assert_eq!(y_of(&layout, "Project: Forecasting"), 492.0);
        assert_eq!(y_of(&layout, "Project: Dashboards"), 432.0);
    }

    #[test]
    fn test_numeric_values_are_drawn_as_text() {
        let data = ResumeData::from_value(json!({
            "internship": [{ "company": "Acme", "dates": 2023 }],
            "education": [{ "institution": "UCL", "details": 3.9 }]
        }))
        .unwrap();
        let layout = layout_resume(&data, &PageSpec::letter());
        assert!(layout.find("Dates: 2023").is_some());
        assert!(layout.find("Details: 3.9").is_some());
    }

    #[test]
    fn test_heading_uses_heading_style() {
        let layout = layout_resume(&sample(), &PageSpec::letter());
        let (_, heading) = layout.find("Resume - Data Science Intern").unwrap();
        assert_eq!(heading.style, TextStyle::HEADING);
        assert_eq!(heading.x, 100.0);
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let data = ResumeData::from_value(json!({ "name": "Ada", "skills": [] })).unwrap();
        let layout = layout_resume(&data, &PageSpec::letter());
        let texts: Vec<&str> = layout.texts().collect();
        assert_eq!(texts, vec!["Ada"]);
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let data = ResumeData::from_value(json!({
            "experience": [{ "company": "  " }],
            "education": [{}]
        }))
        .unwrap();
        let layout = layout_resume(&data, &PageSpec::letter());
        assert!(layout.find(EXPERIENCE_LABEL).is_none());
        assert!(layout.find(EDUCATION_LABEL).is_none());
    }

    #[test]
    fn test_nested_responsibilities_are_indented() {
        let data = ResumeData::from_value(json!({
            "experience": [{
                "company": "Acme",
                "responsibilities": ["Owned the ETL pipeline"]
            }],
            "responsibilities": ["Mentored two interns"]
        }))
        .unwrap();
        let layout = layout_resume(&data, &PageSpec::letter());

        let (_, nested) = layout.find("- Owned the ETL pipeline").unwrap();
        assert_eq!(nested.x, 115.0);

        assert!(layout.find(RESPONSIBILITIES_LABEL).is_some());
        let (_, top) = layout.find("- Mentored two interns").unwrap();
        assert_eq!(top.x, 100.0);
    }

    #[test]
    fn test_sections_in_order() {
        let data = ResumeData::from_value(json!({
            "name": "Ada",
            "summary": "Analyst",
            "skills": ["R"],
            "experience": [{ "company": "A" }],
            "projects": [{ "name": "P" }],
            "education": [{ "institution": "U" }],
            "responsibilities": ["X"]
        }))
        .unwrap();
        let layout = layout_resume(&data, &PageSpec::letter());
        let labels: Vec<&str> = layout.texts().filter(|t| t.ends_with(':')).collect();
        assert_eq!(
            labels,
            vec![
                SUMMARY_LABEL,
                SKILLS_LABEL,
                EXPERIENCE_LABEL,
                PROJECTS_LABEL,
                EDUCATION_LABEL,
                RESPONSIBILITIES_LABEL
            ]
        );
    }

    #[test]
    fn test_long_lists_paginate() {
        let skills: Vec<String> = (0..120).map(|i| format!("Skill {i}")).collect();
        let data = ResumeData::from_value(json!({ "skills": skills })).unwrap();
        let spec = PageSpec::letter();
        let layout = layout_resume(&data, &spec);

        assert!(layout.page_count() >= 3);
        let (page, _) = layout.find("- Skill 119").unwrap();
        assert_eq!(page, layout.page_count() - 1);
        assert!(layout
            .pages
            .iter()
            .flat_map(|p| &p.items)
            .all(|i| i.y >= spec.bottom_margin_pt));
    }

    #[test]
    fn test_long_description_wraps_to_text_width() {
        let data = ResumeData::from_value(json!({
            "experience": [{
                "company": "Acme",
                "description": "word ".repeat(80)
            }]
        }))
        .unwrap();
        let layout = layout_resume(&data, &PageSpec::letter());
        let descr_lines = layout
            .texts()
            .skip_while(|t| !t.starts_with("Description:"))
            .take_while(|t| t.starts_with("Description:") || t.starts_with("word"))
            .count();
        assert!(descr_lines > 1);
    }
}
