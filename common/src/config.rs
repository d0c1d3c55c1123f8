use crate::error::{Nl2SqlError, Result};
use crate::llm::model::ModelConfig;
use std::env;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "NL2SQL_MODEL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// everything needed to reach the completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: ModelConfig,
}

impl CompletionSettings {
    /// explicit values win, then environment variables, then defaults.
    /// a missing api key is fatal.
    pub fn resolve(model: Option<String>, base_url: Option<String>) -> Result<Self> {
        Self::resolve_with(model, base_url, |key| env::var(key).ok())
    }

    pub fn resolve_with<F>(model: Option<String>, base_url: Option<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or_else(|| {
            Nl2SqlError::Config(format!("{} not found in environment variables", API_KEY_VAR))
        })?;

        let base_url = base_url
            .filter(|s| !s.is_empty())
            .or_else(|| non_empty(BASE_URL_VAR))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut model_config = ModelConfig::default();
        if let Some(name) = model.filter(|s| !s.is_empty()).or_else(|| non_empty(MODEL_VAR)) {
            model_config.model = name;
        }

        tracing::debug!(base_url = %base_url, model = %model_config.model, "completion settings resolved");

        Ok(Self {
            api_key,
            base_url,
            model: model_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = CompletionSettings::resolve_with(None, None, lookup(&[])).unwrap_err();
        assert!(matches!(err, Nl2SqlError::Config(msg) if msg.contains("OPENAI_API_KEY")));

        let blank = CompletionSettings::resolve_with(None, None, lookup(&[(API_KEY_VAR, "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn test_defaults() {
        let settings =
            CompletionSettings::resolve_with(None, None, lookup(&[(API_KEY_VAR, "sk-test")])).unwrap();

        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.model, ModelConfig::default());
    }

    #[test]
    fn test_env_overrides_defaults_and_explicit_overrides_env() {
        let vars = lookup(&[
            (API_KEY_VAR, "sk-test"),
            (BASE_URL_VAR, "http://localhost:1234/v1"),
            (MODEL_VAR, "qwen/qwen3-8b"),
        ]);

        let from_env = CompletionSettings::resolve_with(None, None, &vars).unwrap();
        assert_eq!(from_env.base_url, "http://localhost:1234/v1");
        assert_eq!(from_env.model.model, "qwen/qwen3-8b");

        let explicit = CompletionSettings::resolve_with(
            Some("gpt-4o".to_string()),
            Some("http://proxy/v1".to_string()),
            &vars,
        )
        .unwrap();
        assert_eq!(explicit.base_url, "http://proxy/v1");
        assert_eq!(explicit.model.model, "gpt-4o");
    }
}
