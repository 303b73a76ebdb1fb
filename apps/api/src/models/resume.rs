use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Heading used when the payload carries neither a name nor a title.
pub const DEFAULT_HEADING: &str = "Resume";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("No data provided")]
    NoData,

    #[error("Resume payload must be a JSON object")]
    NotAnObject,

    #[error("Invalid resume payload: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// The résumé document accepted by every render endpoint.
///
/// Every key is optional. Lists default to empty (JSON `null` included) so a
/// sparse payload renders whatever sections it does carry. Text fields and
/// string list items also accept numbers and booleans, stored as their JSON text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub links: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, alias = "internship", deserialize_with = "nullable")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "nullable")]
    pub projects: Vec<Project>,
    /// Legacy fixed project slots from the first form version.
    #[serde(default)]
    pub project_1: Option<Project>,
    #[serde(default)]
    pub project_2: Option<Project>,
    #[serde(default, deserialize_with = "nullable")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient_text")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub details: Option<String>,
}

impl ResumeData {
    /// Builds a payload from an already-parsed JSON body.
    ///
    /// Falsy JSON (`null`, `{}`, `[]`, `""`, `0`, `false`) means no data. Any other
    /// non-object is rejected before key lookup.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        match &value {
            Value::Object(map) if !map.is_empty() => {}
            Value::Null | Value::Bool(false) => return Err(PayloadError::NoData),
            Value::Object(_) => return Err(PayloadError::NoData),
            Value::Array(items) if items.is_empty() => return Err(PayloadError::NoData),
            Value::String(s) if s.is_empty() => return Err(PayloadError::NoData),
            Value::Number(n) if n.as_f64() == Some(0.0) => return Err(PayloadError::NoData),
            _ => return Err(PayloadError::NotAnObject),
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn heading(&self) -> &str {
        text(&self.name)
            .or_else(|| text(&self.title))
            .unwrap_or(DEFAULT_HEADING)
    }

    /// Title line shown under the heading. Only present when a name took the heading slot.
    pub fn subtitle(&self) -> Option<&str> {
        text(&self.name).and(text(&self.title))
    }

    /// Email, phone, location and links joined with ` | `.
    pub fn contact_line(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.email, &self.phone, &self.location]
            .into_iter()
            .filter_map(text)
            .chain(non_blank(&self.links))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }

    pub fn skill_list(&self) -> Vec<&str> {
        non_blank(&self.skills).collect()
    }

    /// `projects` followed by the legacy `project_1` / `project_2` slots.
    pub fn all_projects(&self) -> Vec<&Project> {
        self.projects
            .iter()
            .chain(self.project_1.iter())
            .chain(self.project_2.iter())
            .collect()
    }

    /// Résumé-wide responsibilities, then each experience's own, in order.
    pub fn all_responsibilities(&self) -> Vec<&str> {
        non_blank(&self.responsibilities)
            .chain(
                self.experience
                    .iter()
                    .flat_map(|e| non_blank(&e.responsibilities)),
            )
            .collect()
    }
}

/// Returns the trimmed field, treating blank strings as absent.
pub fn text(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Stringifies a JSON scalar. `null` is absent; arrays and objects are rejected.
fn scalar_text(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err("expected a string or number, found an array".to_string()),
        Value::Object(_) => Err("expected a string or number, found an object".to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Value> = nullable(deserializer)?;
    items
        .into_iter()
        .filter_map(|item| scalar_text(item).transpose())
        .collect::<Result<_, _>>()
        .map_err(D::Error::custom)
}
