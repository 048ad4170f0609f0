// LLM provider settings derived from a user's SettingsMap
//
// The `llm_providers` setting holds a comma-separated priority list such as
// "openai,mistral". Each recognized provider contributes one ProviderConfig
// built from its `<provider>_api_key` and `<provider>_model_name` settings.
// Provider-specific setting codes live in a descriptor table, so adding a
// provider means adding a variant and one table row.

use serde::{Deserialize, Serialize};

use crate::settings::{setting_codes, SettingsMap};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// LLM provider recognized in the `llm_providers` priority list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    Openai = 0,
    Google = 1,
    Mistral = 2,
}

/// Setting codes associated with one provider
#[derive(Debug)]
pub struct ProviderDescriptor {
    pub kind: LlmProviderKind,
    /// Identifier used in the priority list
    pub name: &'static str,
    pub api_key_code: &'static str,
    pub model_name_code: &'static str,
}

/// Indexed by `LlmProviderKind` discriminant
static PROVIDER_DESCRIPTORS: [ProviderDescriptor; 3] = [
    ProviderDescriptor {
        kind: LlmProviderKind::Openai,
        name: "openai",
        api_key_code: setting_codes::OPENAI_API_KEY,
        model_name_code: setting_codes::OPENAI_MODEL_NAME,
    },
    ProviderDescriptor {
        kind: LlmProviderKind::Google,
        name: "google",
        api_key_code: setting_codes::GOOGLE_API_KEY,
        model_name_code: setting_codes::GOOGLE_MODEL_NAME,
    },
    ProviderDescriptor {
        kind: LlmProviderKind::Mistral,
        name: "mistral",
        api_key_code: setting_codes::MISTRAL_API_KEY,
        model_name_code: setting_codes::MISTRAL_MODEL_NAME,
    },
];

impl LlmProviderKind {
    /// All recognized providers
    pub const ALL: [LlmProviderKind; 3] = [
        LlmProviderKind::Openai,
        LlmProviderKind::Google,
        LlmProviderKind::Mistral,
    ];

    pub fn descriptor(self) -> &'static ProviderDescriptor {
        &PROVIDER_DESCRIPTORS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.descriptor().name
    }

    /// Build this provider's config from the settings map
    pub fn config_from(self, settings: &SettingsMap) -> ProviderConfig {
        let descriptor = self.descriptor();
        ProviderConfig {
            provider: self,
            api_key: settings
                .get(descriptor.api_key_code)
                .cloned()
                .unwrap_or_default(),
            model: settings.get(descriptor.model_name_code).cloned(),
        }
    }
}

impl std::fmt::Display for LlmProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LlmProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PROVIDER_DESCRIPTORS
            .iter()
            .find(|d| d.name == s)
            .map(|d| d.kind)
            .ok_or_else(|| format!("Unknown LLM provider: {}", s))
    }
}

/// Credentials and model for one configured provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub provider: LlmProviderKind,
    /// Empty when the user never stored a key
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Configured providers in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LlmSettings {
    pub providers: Vec<ProviderConfig>,
}

impl LlmSettings {
    /// Highest-priority configured provider
    pub fn primary(&self) -> Option<&ProviderConfig> {
        self.providers.first()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Split the priority list into trimmed, non-empty tokens
///
/// Order is preserved and duplicates are kept.
pub fn parse_priority_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Derive the configured LLM providers from a user's settings
///
/// Unrecognized identifiers in `llm_providers` are skipped. A missing or
/// malformed priority list yields no providers.
pub fn get_llm_settings(settings: &SettingsMap) -> LlmSettings {
    let priorities = settings
        .get(setting_codes::LLM_PROVIDERS)
        .map(String::as_str)
        .unwrap_or_default();

    let providers = parse_priority_list(priorities)
        .into_iter()
        .filter_map(|token| match token.parse::<LlmProviderKind>() {
            Ok(kind) => Some(kind.config_from(settings)),
            Err(_) => {
                tracing::trace!(provider = token, "Skipping unrecognized LLM provider");
                None
            }
        })
        .collect();

    LlmSettings { providers }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> SettingsMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_settings_yield_no_providers() {
        let llm = get_llm_settings(&SettingsMap::new());
        assert_eq!(llm, LlmSettings { providers: vec![] });
        assert!(llm.is_empty());
        assert!(llm.primary().is_none());
    }

    #[test]
    fn test_providers_follow_priority_order() {
        let llm = get_llm_settings(&settings(&[
            ("llm_providers", "openai,google"),
            ("openai_api_key", "k1"),
            ("openai_model_name", "m1"),
            ("google_api_key", "k2"),
        ]));

        assert_eq!(
            llm.providers,
            vec![
                ProviderConfig {
                    provider: LlmProviderKind::Openai,
                    api_key: "k1".to_string(),
                    model: Some("m1".to_string()),
                },
                ProviderConfig {
                    provider: LlmProviderKind::Google,
                    api_key: "k2".to_string(),
                    model: None,
                },
            ]
        );
        assert_eq!(llm.primary().unwrap().provider, LlmProviderKind::Openai);
    }

    #[test]
    fn test_whitespace_trimmed_and_unknown_dropped() {
        let llm = get_llm_settings(&settings(&[("llm_providers", " openai , bogus , mistral ")]));

        assert_eq!(
            llm.providers,
            vec![
                ProviderConfig {
                    provider: LlmProviderKind::Openai,
                    api_key: String::new(),
                    model: None,
                },
                ProviderConfig {
                    provider: LlmProviderKind::Mistral,
                    api_key: String::new(),
                    model: None,
                },
            ]
        );
    }

    #[test]
    fn test_duplicates_are_not_removed() {
        let llm = get_llm_settings(&settings(&[
            ("llm_providers", "openai,openai"),
            ("openai_api_key", "sk"),
        ]));

        assert_eq!(llm.providers.len(), 2);
        assert!(llm
            .providers
            .iter()
            .all(|p| p.provider == LlmProviderKind::Openai && p.api_key == "sk"));
    }

    #[test]
    fn test_garbled_priority_list_yields_nothing() {
        for raw in ["", ",,,", "  ,  ", "OpenAI", "anthropic;openai"] {
            let llm = get_llm_settings(&settings(&[("llm_providers", raw)]));
            assert!(llm.is_empty(), "expected no providers for {:?}", raw);
        }
    }

    #[test]
    fn test_output_never_longer_than_tokens() {
        let raw = "mistral, google,bogus,,openai";
        let llm = get_llm_settings(&settings(&[("llm_providers", raw)]));
        assert!(llm.providers.len() <= parse_priority_list(raw).len());
        assert_eq!(
            llm.providers.iter().map(|p| p.provider).collect::<Vec<_>>(),
            vec![
                LlmProviderKind::Mistral,
                LlmProviderKind::Google,
                LlmProviderKind::Openai
            ]
        );
    }

    #[test]
    fn test_empty_model_name_is_present_but_empty() {
        let llm = get_llm_settings(&settings(&[
            ("llm_providers", "mistral"),
            ("mistral_model_name", ""),
        ]));
        assert_eq!(llm.providers[0].model, Some(String::new()));
    }

    #[test]
    fn test_descriptor_table_matches_variants() {
        for kind in LlmProviderKind::ALL {
            let descriptor = kind.descriptor();
            assert_eq!(descriptor.kind, kind);
            assert_eq!(descriptor.api_key_code, format!("{}_api_key", kind));
            assert_eq!(descriptor.model_name_code, format!("{}_model_name", kind));
            assert_eq!(kind.as_str().parse::<LlmProviderKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_provider_config_json_shape() {
        let json = serde_json::to_value(ProviderConfig {
            provider: LlmProviderKind::Google,
            api_key: "k".to_string(),
            model: None,
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({"provider": "google", "apiKey": "k"}));
    }
}
