use crate::domain::ports::TemplateSource;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads template files relative to a base directory.
#[derive(Debug, Clone)]
pub struct LocalTemplates {
    base_path: PathBuf,
}

impl LocalTemplates {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl TemplateSource for LocalTemplates {
    fn read_template(&self, path: &str) -> Option<String> {
        if path.trim().is_empty() {
            return None;
        }
        let full_path = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.base_path.join(path)
        };

        match fs::read_to_string(&full_path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!("Template {} skipped: {}", full_path.display(), e);
                None
            }
        }
    }
}
