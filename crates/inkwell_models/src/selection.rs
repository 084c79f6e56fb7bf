//! Environment-based provider selection.

use crate::{AnthropicClient, GeminiClient, OpenAICompatibleClient};
use inkwell_core::ProviderSettings;
use inkwell_error::{ConfigError, InkwellResult};
use inkwell_interface::InkwellDriver;
use std::fmt;
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Supported model providers, in selection order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// OpenAI chat completions
    #[strum(serialize = "openai")]
    OpenAi,
    /// Google Gemini
    Gemini,
    /// Groq (OpenAI-compatible)
    Groq,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    pub fn env_var(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
        }
    }

    /// Model used when settings do not override it.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::Groq => "llama-3.3-70b-versatile",
        }
    }
}

/// The provider chosen from the environment, with its credential.
#[derive(Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ProviderSelection {
    /// Selected provider
    kind: ProviderKind,
    /// API key
    api_key: String,
}

impl fmt::Debug for ProviderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSelection")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl ProviderSelection {
    /// Select explicitly.
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
        }
    }

    /// Select the first provider whose key is set in the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Select the first provider whose key `lookup` returns non-blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use inkwell_models::{ProviderKind, ProviderSelection};
    ///
    /// let selection = ProviderSelection::from_lookup(|name| {
    ///     (name == "GEMINI_API_KEY").then(|| "key".to_string())
    /// })
    /// .unwrap();
    /// assert_eq!(*selection.kind(), ProviderKind::Gemini);
    /// ```
    #[instrument(skip(lookup))]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for kind in ProviderKind::iter() {
            if let Some(key) = lookup(kind.env_var()).filter(|k| !k.trim().is_empty()) {
                debug!(provider = %kind, "Selected provider from environment");
                return Ok(Self::new(kind, key.trim()));
            }
        }

        let names = ProviderKind::iter()
            .map(ProviderKind::env_var)
            .collect::<Vec<_>>()
            .join(", ");
        Err(ConfigError::new(format!(
            "missing credentials: set one of {}",
            names
        )))
    }
}

/// Build the driver for `selection` using `settings` for model and timeout.
#[instrument(skip(selection, settings), fields(provider = %selection.kind()))]
pub fn build_driver(
    selection: &ProviderSelection,
    settings: &ProviderSettings,
) -> InkwellResult<Box<dyn InkwellDriver>> {
    let kind = *selection.kind();
    let model = settings
        .model()
        .clone()
        .unwrap_or_else(|| kind.default_model().to_string());
    let timeout = Duration::from_secs(*settings.timeout_secs());
    let api_key = selection.api_key().clone();

    info!(provider = %kind, model = %model, "Building model driver");

    let driver: Box<dyn InkwellDriver> = match kind {
        ProviderKind::Anthropic => Box::new(AnthropicClient::new(api_key, model, timeout)?),
        ProviderKind::OpenAi => Box::new(OpenAICompatibleClient::openai(api_key, model, timeout)?),
        ProviderKind::Gemini => Box::new(GeminiClient::new(api_key, model, timeout)?),
        ProviderKind::Groq => Box::new(OpenAICompatibleClient::groq(api_key, model, timeout)?),
    };
    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_first_present_key_wins() {
        let selection = ProviderSelection::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "g"),
            ("OPENAI_API_KEY", "o"),
        ]))
        .unwrap();
        assert_eq!(*selection.kind(), ProviderKind::OpenAi);
        assert_eq!(selection.api_key(), "o");
    }

    #[test]
    fn test_blank_keys_are_skipped() {
        let selection = ProviderSelection::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "  "),
            ("GROQ_API_KEY", "g"),
        ]))
        .unwrap();
        assert_eq!(*selection.kind(), ProviderKind::Groq);
    }

    #[test]
    fn test_no_keys_is_a_configuration_error() {
        let err = ProviderSelection::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.message.contains("missing credentials"));
        assert!(err.message.contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_debug_output_redacts_the_key() {
        let selection = ProviderSelection::new(ProviderKind::Anthropic, "sk-secret");
        assert!(!format!("{:?}", selection).contains("sk-secret"));
    }

    #[test]
    fn test_settings_model_overrides_default() {
        let selection = ProviderSelection::new(ProviderKind::Gemini, "key");
        let settings = ProviderSettings::default().with_model("gemini-custom");
        let driver = build_driver(&selection, &settings).unwrap();
        assert_eq!(driver.provider_name(), "gemini");
        assert_eq!(driver.model_name(), "gemini-custom");

        let driver = build_driver(&selection, &ProviderSettings::default()).unwrap();
        assert_eq!(driver.model_name(), ProviderKind::Gemini.default_model());
    }

    #[test]
    fn test_kind_names_are_snake_case() {
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
        assert_eq!("groq".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!(ProviderKind::Anthropic.as_ref(), "anthropic");
    }
}
