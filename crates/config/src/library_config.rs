//! Library configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rules for books entering the library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Refuse books without a cover image
    pub require_cover: bool,

    /// Audio file extensions accepted as a book's source, without the dot
    pub supported_extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            require_cover: false,
            supported_extensions: vec![
                "mp3".to_string(),
                "m4a".to_string(),
                "m4b".to_string(),
                "ogg".to_string(),
                "opus".to_string(),
                "flac".to_string(),
                "wav".to_string(),
            ],
        }
    }
}

impl LibraryConfig {
    /// Checks a source path or URL against `supported_extensions`, ignoring case
    pub fn is_supported(&self, source: &str) -> bool {
        let source = source.split(['?', '#']).next().unwrap_or(source);
        Path::new(source)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.supported_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

impl ConfigSection for LibraryConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![Validator::not_empty_list(
            &self.supported_extensions,
            "library.supported_extensions",
        )];

        for (i, ext) in self.supported_extensions.iter().enumerate() {
            let field = format!("library.supported_extensions[{}]", i);
            results.push(Validator::not_empty(ext, &field));
            if ext.starts_with('.') {
                results.push(Err(ValidationError::with_value(
                    field,
                    "must not start with a dot",
                    ext,
                )));
            }
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.require_cover = other.require_cover;
        self.supported_extensions = other.supported_extensions;
    }

    fn section_name(&self) -> &'static str {
        "library"
    }
}
