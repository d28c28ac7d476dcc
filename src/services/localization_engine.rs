use std::collections::HashMap;

use serde_json::Value;

use crate::types::errors::LocaleError;

/// Catalogs compiled into the binary, keyed by locale.
const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("zh", include_str!("../../locales/zh.json")),
];

/// Locales with an embedded catalog.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "zh"];

/// Default locale when the requested one is not supported.
pub const DEFAULT_LOCALE: &str = "en";

/// Trait defining the localization engine interface.
pub trait LocalizationEngineTrait {
    fn initialize(&mut self) -> Result<(), LocaleError>;
    fn set_locale(&mut self, lang: &str) -> Result<(), LocaleError>;
    fn get_locale(&self) -> &str;
    fn t(&self, key: &str, params: Option<&HashMap<String, String>>) -> String;
    fn plural(&self, key: &str, count: u64, params: Option<&HashMap<String, String>>) -> String;
    fn detect_system_locale(&self) -> String;
    fn get_available_locales(&self) -> Vec<String>;
}

/// Localization engine serving the panel's English and Chinese strings.
pub struct LocalizationEngine {
    /// Current active locale (e.g., "en" or "zh").
    current_locale: String,
    /// Parsed catalogs: locale name to its JSON tree.
    locales: HashMap<String, Value>,
}

impl LocalizationEngine {
    pub fn new() -> Self {
        Self {
            current_locale: DEFAULT_LOCALE.to_string(),
            locales: HashMap::new(),
        }
    }

    /// Creates an initialized engine set to `lang`, falling back to English.
    pub fn for_locale(lang: &str) -> Result<Self, LocaleError> {
        let mut engine = Self::new();
        engine.initialize()?;
        if engine.set_locale(lang).is_err() {
            log::info!("Locale '{}' not supported, using {}", lang, DEFAULT_LOCALE);
        }
        Ok(engine)
    }

    /// Looks up a nested key in a JSON value using dot notation.
    /// For example, "groups.unnamed" looks up `value["groups"]["unnamed"]`.
    fn lookup_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
        key.split('.').try_fold(data, |current, part| current.get(part))
    }

    /// Replaces `{param_name}` placeholders in a string with values from the params map.
    fn interpolate(template: &str, params: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in params {
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, value);
        }
        result
    }

    /// Plural category for `count` in the current locale: "one" or "other".
    fn get_plural_form(&self, count: u64) -> &'static str {
        match self.current_locale.as_str() {
            // Chinese does not inflect for number.
            "zh" => "other",
            _ if count == 1 => "one",
            _ => "other",
        }
    }
}

impl Default for LocalizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalizationEngineTrait for LocalizationEngine {
    /// Parses every embedded catalog.
    fn initialize(&mut self) -> Result<(), LocaleError> {
        for (locale, source) in CATALOGS {
            let data: Value = serde_json::from_str(source).map_err(|e| LocaleError::InvalidCatalog {
                locale: locale.to_string(),
                reason: e.to_string(),
            })?;
            self.locales.insert(locale.to_string(), data);
        }
        Ok(())
    }

    /// Switches the active locale. Returns an error if the locale is not loaded.
    fn set_locale(&mut self, lang: &str) -> Result<(), LocaleError> {
        if !self.locales.contains_key(lang) {
            return Err(LocaleError::UnsupportedLocale(lang.to_string()));
        }
        self.current_locale = lang.to_string();
        Ok(())
    }

    fn get_locale(&self) -> &str {
        &self.current_locale
    }

    /// Looks up a translation key using dot notation and optionally interpolates parameters.
    /// Returns the key itself if the translation is not found.
    fn t(&self, key: &str, params: Option<&HashMap<String, String>>) -> String {
        let text = self
            .locales
            .get(&self.current_locale)
            .and_then(|data| Self::lookup_key(data, key))
            .and_then(Value::as_str);

        match (text, params) {
            (Some(s), Some(p)) => Self::interpolate(s, p),
            (Some(s), None) => s.to_string(),
            (None, _) => key.to_string(),
        }
    }

    /// Looks up `{key}_{form}` for the count's plural form, falling back to
    /// `{key}_other`. A `{count}` parameter is added automatically.
    fn plural(&self, key: &str, count: u64, params: Option<&HashMap<String, String>>) -> String {
        let plural_key = format!("{}_{}", key, self.get_plural_form(count));

        let mut merged_params = params.cloned().unwrap_or_default();
        merged_params
            .entry("count".to_string())
            .or_insert_with(|| count.to_string());

        let result = self.t(&plural_key, Some(&merged_params));
        if result != plural_key {
            return result;
        }

        let other_key = format!("{}_other", key);
        let other_result = self.t(&other_key, Some(&merged_params));
        if other_result == other_key {
            return key.to_string();
        }
        other_result
    }

    /// Detects the system locale from `LANG` (e.g. "zh_CN.UTF-8" → "zh").
    /// Falls back to "en" when unsupported.
    fn detect_system_locale(&self) -> String {
        let lang = std::env::var("LANG").unwrap_or_default();
        let lang_code = lang
            .split(['_', '.'])
            .next()
            .unwrap_or("");

        if SUPPORTED_LOCALES.contains(&lang_code) {
            lang_code.to_string()
        } else {
            DEFAULT_LOCALE.to_string()
        }
    }

    /// Returns a sorted list of all loaded locales.
    fn get_available_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.locales.keys().cloned().collect();
        locales.sort();
        locales
    }
}
