use crate::adapters::markup::escape_html;
use crate::domain::ports::{AssetSink, ScriptAttributes};
use crate::utils::error::{ConsentError, Result};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisteredScript {
    External {
        name: String,
        url: String,
        attributes: ScriptAttributes,
    },
    Inline {
        id: String,
        code: String,
        attributes: ScriptAttributes,
    },
}

impl RegisteredScript {
    pub fn attributes(&self) -> &ScriptAttributes {
        match self {
            RegisteredScript::External { attributes, .. } | RegisteredScript::Inline { attributes, .. } => {
                attributes
            }
        }
    }

    /// `<script>` tag as the page would receive it.
    pub fn to_tag(&self) -> String {
        let mut attrs = String::new();
        for (name, value) in self.attributes().to_pairs() {
            attrs.push_str(&format!(" {}=\"{}\"", name, escape_html(&value)));
        }
        match self {
            RegisteredScript::External { url, .. } => format!(
                "<script src=\"{}\"{}></script>",
                escape_html(url),
                attrs
            ),
            RegisteredScript::Inline { id, code, .. } => {
                format!("<script id=\"{}\"{}>{}</script>", id, attrs, code)
            }
        }
    }
}

/// Collects registrations in memory, in registration order.
#[derive(Debug, Default)]
pub struct AssetCollector {
    scripts: Mutex<Vec<RegisteredScript>>,
}

impl AssetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> Vec<RegisteredScript> {
        self.scripts
            .lock()
            .map(|scripts| scripts.clone())
            .unwrap_or_default()
    }

    fn push(&self, name: &str, script: RegisteredScript) -> Result<()> {
        let mut scripts = self
            .scripts
            .lock()
            .map_err(|e| ConsentError::AssetRegistrationError {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        scripts.push(script);
        Ok(())
    }
}

impl AssetSink for AssetCollector {
    fn register_external_script(
        &self,
        name: &str,
        url: &str,
        attributes: &ScriptAttributes,
    ) -> Result<()> {
        tracing::debug!(name, url, service = %attributes.service, "registering external script");
        self.push(
            name,
            RegisteredScript::External {
                name: name.to_string(),
                url: url.to_string(),
                attributes: attributes.clone(),
            },
        )
    }

    fn register_inline_script(
        &self,
        id: &str,
        code: &str,
        attributes: &ScriptAttributes,
    ) -> Result<()> {
        tracing::debug!(id, service = %attributes.service, "registering inline script");
        self.push(
            id,
            RegisteredScript::Inline {
                id: id.to_string(),
                code: code.to_string(),
                attributes: attributes.clone(),
            },
        )
    }
}
