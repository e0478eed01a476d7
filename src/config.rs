//! Column-name mapping and data-source settings.
//!
//! Spreadsheet headers differ between deployments, so nothing in the
//! normalizer hardcodes them. A `ColumnConfig` is built here (defaults or
//! TOML) and handed to `Normalizer::new`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Expected header text for each canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub timestamp: String,
    pub date: String,
    pub meeting_id: String,
    pub student: String,
    pub project: String,
    pub topic: String,
    pub subtopics: String,
    pub my_inputs: String,
    pub link: String,
    pub action_points: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            timestamp: "Timestamp".to_string(),
            date: "Date of Meeting".to_string(),
            meeting_id: "Meeting ID".to_string(),
            student: "Student Name (be consistent)".to_string(),
            // the published form really has two spaces here
            project: "Discussed Project Title  (be consistent)".to_string(),
            topic: "Meeting Topic".to_string(),
            subtopics: "Subtopics / Agenda Items".to_string(),
            my_inputs: "Supervisor Inputs & Suggestions".to_string(),
            link: "Link to Document / Slides".to_string(),
            action_points: "Action Points".to_string(),
        }
    }
}

impl ColumnConfig {
    /// Copy with surrounding whitespace removed from every header name.
    pub fn trimmed(self) -> Self {
        let trim = |name: String| name.trim().to_string();
        ColumnConfig {
            timestamp: trim(self.timestamp),
            date: trim(self.date),
            meeting_id: trim(self.meeting_id),
            student: trim(self.student),
            project: trim(self.project),
            topic: trim(self.topic),
            subtopics: trim(self.subtopics),
            my_inputs: trim(self.my_inputs),
            link: trim(self.link),
            action_points: trim(self.action_points),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Published CSV export loaded when no other source is given.
    pub source_url: Option<String>,
    pub columns: ColumnConfig,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        if let Some(url) = &config.source_url {
            if url.trim().is_empty() {
                return Err(Error::Config("source_url must not be blank".to_string()));
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            source_url = "https://example.org/pub?output=csv"

            [columns]
            project = "Project"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.source_url.as_deref(),
            Some("https://example.org/pub?output=csv")
        );
        assert_eq!(config.columns.project, "Project");
        assert_eq!(config.columns.date, ColumnConfig::default().date);
    }

    #[test]
    fn trimmed_strips_header_padding() {
        let config = AppConfig::from_toml("[columns]\nstudent = \" Student \"").unwrap();
        let columns = config.columns.trimmed();
        assert_eq!(columns.student, "Student");
        // inner double space of the default project header survives
        assert_eq!(columns.project, ColumnConfig::default().project);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.source_url.is_none());
    }

    #[test]
    fn blank_source_url_is_rejected() {
        let err = AppConfig::from_toml("source_url = \"  \"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = AppConfig::from_toml("[columns\nproject = 1").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[columns]\nstudent = \"Student\"").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.columns.student, "Student");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
