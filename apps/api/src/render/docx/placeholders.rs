//! `{{key}}` tokens and the values a résumé payload supplies for them.

use std::collections::BTreeMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{non_blank, text, Education, Experience, Project, ResumeData};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.\-]*)\s*\}\}").unwrap());

const BULLET: &str = "\u{2022} ";

/// A placeholder occurrence: byte range of the whole `{{ ... }}` and the trimmed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub span: Range<usize>,
    pub key: String,
}

pub fn find_tokens(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let key = caps.get(1)?;
            Some(Token {
                span: whole.range(),
                key: key.as_str().to_string(),
            })
        })
        .collect()
}

/// Placeholder values keyed by name. Multi-line values use `\n`.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    values: BTreeMap<String, String>,
}

impl PlaceholderMap {
    pub fn from_resume(data: &ResumeData) -> Self {
        let mut map = Self::default();

        map.insert("heading", data.heading());
        map.insert("name", text(&data.name).unwrap_or_default());
        map.insert("title", text(&data.title).unwrap_or_default());
        map.insert("email", text(&data.email).unwrap_or_default());
        map.insert("phone", text(&data.phone).unwrap_or_default());
        map.insert("location", text(&data.location).unwrap_or_default());
        map.insert("links", non_blank(&data.links).collect::<Vec<_>>().join(" | "));
        map.insert("contact", data.contact_line().unwrap_or_default());
        map.insert("summary", text(&data.summary).unwrap_or_default());
        map.insert("skills", data.skill_list().join(", "));
        map.insert("responsibilities", bullets(data.all_responsibilities()));

        map.insert(
            "experience",
            blocks(data.experience.iter().map(experience_block)),
        );
        for (i, entry) in data.experience.iter().enumerate() {
            let prefix = format!("experience_{}", i + 1);
            map.insert_field(&prefix, "company", &entry.company);
            map.insert_field(&prefix, "title", &entry.title);
            map.insert_field(&prefix, "dates", &entry.dates);
            map.insert_field(&prefix, "description", &entry.description);
            map.insert(
                &format!("{prefix}_responsibilities"),
                bullets(non_blank(&entry.responsibilities)),
            );
        }

        let projects = data.all_projects();
        map.insert(
            "projects",
            blocks(projects.iter().map(|p| project_block(p))),
        );
        for (i, project) in projects.iter().enumerate() {
            let prefix = format!("project_{}", i + 1);
            map.insert_field(&prefix, "name", &project.name);
            map.insert_field(&prefix, "dates", &project.dates);
            map.insert_field(&prefix, "description", &project.description);
            map.insert(
                &format!("{prefix}_technologies"),
                non_blank(&project.technologies).collect::<Vec<_>>().join(", "),
            );
        }

        map.insert(
            "education",
            blocks(data.education.iter().map(education_block)),
        );
        for (i, entry) in data.education.iter().enumerate() {
            let prefix = format!("education_{}", i + 1);
            map.insert_field(&prefix, "institution", &entry.institution);
            map.insert_field(&prefix, "degree", &entry.degree);
            map.insert_field(&prefix, "dates", &entry.dates);
            map.insert_field(&prefix, "details", &entry.details);
        }

        map
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    fn insert_field(&mut self, prefix: &str, field: &str, value: &Option<String>) {
        self.insert(
            &format!("{prefix}_{field}"),
            text(value).unwrap_or_default(),
        );
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

fn bullets<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("{BULLET}{item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins non-empty entry blocks with a blank line.
fn blocks(items: impl Iterator<Item = String>) -> String {
    items
        .filter(|b| !b.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn joined(parts: &[&Option<String>]) -> Option<String> {
    let present: Vec<&str> = parts.iter().filter_map(|p| text(p)).collect();
    (!present.is_empty()).then(|| present.join(" | "))
}

fn experience_block(e: &Experience) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.extend(joined(&[&e.title, &e.company, &e.dates]));
    lines.extend(text(&e.description).map(str::to_string));
    lines.extend(non_blank(&e.responsibilities).map(|r| format!("{BULLET}{r}")));
    lines.join("\n")
}

fn project_block(p: &Project) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.extend(joined(&[&p.name, &p.dates]));
    lines.extend(text(&p.description).map(str::to_string));
    let tech: Vec<&str> = non_blank(&p.technologies).collect();
    if !tech.is_empty() {
        lines.push(format!("Technologies: {}", tech.join(", ")));
    }
    lines.join("\n")
}

fn education_block(e: &Education) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.extend(joined(&[&e.degree, &e.institution, &e.dates]));
    lines.extend(text(&e.details).map(str::to_string));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResumeData {
        ResumeData::from_value(json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "skills": ["Python", " ", "SQL"],
            "experience": [{
                "company": "Acme",
                "title": "Intern",
                "dates": "2023",
                "description": "Built churn models",
                "responsibilities": ["Owned ETL"]
            }],
            "project_1": { "name": "Forecasting", "technologies": ["pandas", "statsmodels"] },
            "education": [{ "institution": "UCL", "degree": "BSc Mathematics" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_find_tokens_tolerates_inner_whitespace() {
        let tokens = find_tokens("Hi {{ name }}, see {{skills}}.");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].key, "name");
        assert_eq!(tokens[0].span, 3..13);
        assert_eq!(tokens[1].key, "skills");
    }

    #[test]
    fn test_find_tokens_ignores_malformed() {
        assert!(find_tokens("{name} {{ }} {{1abc}} {{ two words }}").is_empty());
    }

    #[test]
    fn test_scalar_values() {
        let map = PlaceholderMap::from_resume(&sample());
        assert_eq!(map.get("name"), Some("Ada Lovelace"));
        assert_eq!(map.get("heading"), Some("Ada Lovelace"));
        assert_eq!(map.get("skills"), Some("Python, SQL"));
        assert_eq!(map.get("phone"), Some(""));
        assert_eq!(map.get("contact"), Some("ada@example.com"));
    }

    #[test]
    fn test_experience_block_and_indexed_keys() {
        let map = PlaceholderMap::from_resume(&sample());
        assert_eq!(
            map.get("experience"),
            Some("Intern | Acme | 2023\nBuilt churn models\n\u{2022} Owned ETL")
        );
        assert_eq!(map.get("experience_1_company"), Some("Acme"));
        assert_eq!(map.get("experience_1_responsibilities"), Some("\u{2022} Owned ETL"));
        assert_eq!(map.get("experience_2_company"), None);
    }

    #[test]
    fn test_legacy_project_slot_is_indexed() {
        let map = PlaceholderMap::from_resume(&sample());
        assert_eq!(map.get("project_1_name"), Some("Forecasting"));
        assert_eq!(map.get("project_1_technologies"), Some("pandas, statsmodels"));
        assert_eq!(
            map.get("projects"),
            Some("Forecasting\nTechnologies: pandas, statsmodels")
        );
    }

    #[test]
    fn test_education_block() {
        let map = PlaceholderMap::from_resume(&sample());
        assert_eq!(map.get("education"), Some("BSc Mathematics | UCL"));
        assert_eq!(map.get("education_1_institution"), Some("UCL"));
    }

    #[test]
    fn test_responsibilities_collects_nested() {
        let map = PlaceholderMap::from_resume(&sample());
        assert_eq!(map.get("responsibilities"), Some("\u{2022} Owned ETL"));
    }
}
