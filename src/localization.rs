//! # Localization Module
//!
//! User-facing messages for the planner, backed by Fluent resources that are
//! compiled into the binary. English is the fallback for unknown languages.

use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

/// Languages with a bundled resource file
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "fr"];
pub const FALLBACK_LANGUAGE: &str = "en";

const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("fr", include_str!("../locales/fr/main.ftl")),
];

/// Localization manager for the meal planner
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a manager with every bundled language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();
        for (code, source) in RESOURCES {
            let locale: LanguageIdentifier = code.parse()?;
            bundles.insert(code.to_string(), Self::create_bundle(&locale, source)?);
        }
        Ok(Self { bundles })
    }

    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Failed to parse {locale} messages: {errors:?}"))?;

        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Keep output free of Unicode isolation marks; it ends up in plain text exports
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Failed to add {locale} messages: {errors:?}"))?;
        Ok(bundle)
    }

    /// Map a language code such as `fr-CA` to a supported language
    pub fn resolve_language(&self, language: Option<&str>) -> &'static str {
        let primary = language
            .and_then(|code| code.split(|c: char| c == '-' || c == '_').next())
            .map(str::trim)
            .unwrap_or(FALLBACK_LANGUAGE);

        SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .find(|supported| supported.eq_ignore_ascii_case(primary))
            .unwrap_or(FALLBACK_LANGUAGE)
    }

    /// Get a localized message in the given language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let language = self.resolve_language(Some(language));
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
        else {
            return format!("Missing translation: {key}");
        };

        let Some(message) = bundle.get_message(key) else {
            return format!("Missing translation: {key}");
        };
        let Some(pattern) = message.value() else {
            return format!("Missing value for key: {key}");
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            log::warn!("Formatting '{key}' in {language} reported {errors:?}");
        }
        value.into_owned()
    }

    /// Localized message without arguments
    pub fn t(&self, key: &str, language: &str) -> String {
        self.get_message_in_language(key, language, None)
    }

    /// Localized message with string arguments
    pub fn t_args(&self, key: &str, language: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().copied().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_languages_define_the_same_keys() {
        let manager = LocalizationManager::new().unwrap();
        let english: Vec<&str> = RESOURCES[0]
            .1
            .lines()
            .filter_map(|line| line.split_once(" = ").map(|(key, _)| key))
            .collect();

        assert!(!english.is_empty());
        for key in english {
            for language in SUPPORTED_LANGUAGES {
                let message = manager.t(key, language);
                assert!(!message.starts_with("Missing"), "{key} missing in {language}");
            }
        }
    }

    #[test]
    fn test_resolve_language() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(manager.resolve_language(Some("fr-CA")), "fr");
        assert_eq!(manager.resolve_language(Some("FR")), "fr");
        assert_eq!(manager.resolve_language(Some("de")), "en");
        assert_eq!(manager.resolve_language(None), "en");
    }
}
