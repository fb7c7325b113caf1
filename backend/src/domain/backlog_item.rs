//! Backlog item under estimation

use crate::error::{EffortLoggerError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BacklogItem {
    pub name: String,
    pub project: String,
    pub language: String,
    pub keywords: String,
}

impl BacklogItem {
    pub fn new(name: &str, project: &str, language: &str, keywords: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            project: project.trim().to_string(),
            language: language.trim().to_string(),
            keywords: keywords.trim().to_string(),
        }
    }

    /// Name, project and language are required; keywords may be empty.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("backlog item name", &self.name),
            ("project", &self.project),
            ("language", &self.language),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EffortLoggerError::InvalidInput(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_fields() {
        let item = BacklogItem::new("  Login page ", "Portal", "Rust", "");
        assert_eq!(item.name, "Login page");
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let err = BacklogItem::new("", "Portal", " ", "auth").validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("backlog item name"));
        assert!(message.contains("language"));
        assert!(!message.contains("project"));
    }
}
