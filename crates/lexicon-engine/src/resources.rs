//! Locale dictionaries: locale → namespace → key → template.
//!
//! The JSON shape matches a conventional i18n `resources` object:
//!
//! ```json
//! { "en-US": { "translation": { "greeting": "Hello {{name}}", "menu": { "open": "Open" } } } }
//! ```
//!
//! Values are either template strings or nested objects. Nested objects
//! are addressed with the engine's key separator, or hold plural forms
//! keyed by CLDR category name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{I18nError, validate_locale};
use crate::plural::{PluralCategory, PluralForms};

/// A single dictionary value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceNode {
    /// A template string.
    Text(String),
    /// A nested group of values.
    Nested(HashMap<String, ResourceNode>),
}

impl ResourceNode {
    /// The template string, if this node is a leaf.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Nested(_) => None,
        }
    }

    /// Child node by name, if this node is a group.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&ResourceNode> {
        match self {
            Self::Text(_) => None,
            Self::Nested(children) => children.get(name),
        }
    }

    /// Select a plural form from a group keyed by category names.
    ///
    /// Falls back to the `other` child when the category is absent.
    #[must_use]
    pub fn select_plural(&self, category: PluralCategory) -> Option<&str> {
        self.child(category.as_str())
            .or_else(|| self.child(PluralCategory::Other.as_str()))
            .and_then(ResourceNode::as_text)
    }

    /// Interpret a group as [`PluralForms`]. Requires `one` and `other`.
    #[must_use]
    pub fn plural_forms(&self) -> Option<PluralForms> {
        let text = |cat: PluralCategory| {
            self.child(cat.as_str())
                .and_then(ResourceNode::as_text)
                .map(str::to_string)
        };
        Some(PluralForms {
            zero: text(PluralCategory::Zero),
            one: text(PluralCategory::One)?,
            two: text(PluralCategory::Two),
            few: text(PluralCategory::Few),
            many: text(PluralCategory::Many),
            other: text(PluralCategory::Other)?,
        })
    }
}

impl From<&str> for ResourceNode {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ResourceNode {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Messages of one namespace in one locale.
pub type Namespace = HashMap<String, ResourceNode>;

/// All dictionaries, keyed by locale then namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resources {
    locales: HashMap<String, HashMap<String, Namespace>>,
}

impl Resources {
    /// Create an empty dictionary set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse dictionaries from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, I18nError> {
        let resources: Self = serde_json::from_str(json)?;
        for locale in resources.locales.keys() {
            validate_locale(locale)?;
        }
        Ok(resources)
    }

    /// Insert a template string, replacing any existing value.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<ResourceNode>,
    ) {
        self.namespace_mut(locale.into(), namespace.into())
            .insert(key.into(), value.into());
    }

    /// Insert a template string, rejecting keys that already exist.
    pub fn insert_unique(
        &mut self,
        locale: impl Into<String>,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<ResourceNode>,
    ) -> Result<(), I18nError> {
        let locale = locale.into();
        let key = key.into();
        let bundle = self.namespace_mut(locale.clone(), namespace.into());
        if bundle.contains_key(&key) {
            return Err(I18nError::DuplicateKey { locale, key });
        }
        bundle.insert(key, value.into());
        Ok(())
    }

    /// Insert plural forms as suffixed keys (`key_one`, `key_other`, ...).
    pub fn insert_plural(
        &mut self,
        locale: impl Into<String>,
        namespace: impl Into<String>,
        key: &str,
        separator: &str,
        forms: PluralForms,
    ) {
        let bundle = self.namespace_mut(locale.into(), namespace.into());
        let optional = [
            (PluralCategory::Zero, forms.zero),
            (PluralCategory::Two, forms.two),
            (PluralCategory::Few, forms.few),
            (PluralCategory::Many, forms.many),
        ];
        let required = [
            (PluralCategory::One, Some(forms.one)),
            (PluralCategory::Other, Some(forms.other)),
        ];
        for (category, text) in optional.into_iter().chain(required) {
            if let Some(text) = text {
                bundle.insert(
                    format!("{key}{separator}{}", category.as_str()),
                    ResourceNode::Text(text),
                );
            }
        }
    }

    /// Merge a namespace bundle; keys in `bundle` overwrite existing ones.
    pub fn add_bundle(
        &mut self,
        locale: impl Into<String>,
        namespace: impl Into<String>,
        bundle: Namespace,
    ) {
        self.namespace_mut(locale.into(), namespace.into())
            .extend(bundle);
    }

    /// The messages of a namespace in a locale.
    #[must_use]
    pub fn bundle(&self, locale: &str, namespace: &str) -> Option<&Namespace> {
        self.locales.get(locale).and_then(|nss| nss.get(namespace))
    }

    /// Resolve a key in one locale and namespace.
    ///
    /// The key is tried verbatim first, then as a path split on
    /// `key_separator` through nested groups.
    #[must_use]
    pub fn lookup(
        &self,
        locale: &str,
        namespace: &str,
        key: &str,
        key_separator: &str,
    ) -> Option<&ResourceNode> {
        let bundle = self.bundle(locale, namespace)?;
        if let Some(node) = bundle.get(key) {
            return Some(node);
        }
        if key_separator.is_empty() || !key.contains(key_separator) {
            return None;
        }
        let mut parts = key.split(key_separator);
        let first = bundle.get(parts.next()?)?;
        parts.try_fold(first, |node, part| node.child(part))
    }

    /// All locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Namespaces present for a locale, sorted.
    #[must_use]
    pub fn namespaces(&self, locale: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .locales
            .get(locale)
            .map(|nss| nss.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Number of locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Whether no locale has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    fn namespace_mut(&mut self, locale: String, namespace: String) -> &mut Namespace {
        self.locales
            .entry(locale)
            .or_default()
            .entry(namespace)
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "en-US": {
            "translation": {
                "greeting": "Hello {{name}}",
                "menu": { "file": { "open": "Open" } },
                "apples": { "one": "an apple", "other": "{{count}} apples" }
            }
        },
        "de": { "translation": { "greeting": "Hallo {{name}}" } }
    }"#;

    #[test]
    fn parse_json_shape() {
        let res = Resources::from_json_str(SAMPLE).unwrap();
        assert_eq!(res.locales(), vec!["de", "en-US"]);
        assert_eq!(res.namespaces("en-US"), vec!["translation"]);
        assert_eq!(
            res.lookup("de", "translation", "greeting", ".")
                .and_then(ResourceNode::as_text),
            Some("Hallo {{name}}")
        );
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Resources::from_json_str("{\"en\": 3}").unwrap_err();
        assert!(matches!(err, I18nError::ParseError(_)));
    }

    #[test]
    fn blank_locale_rejected() {
        let err = Resources::from_json_str(r#"{"": {"translation": {}}}"#).unwrap_err();
        assert_eq!(err, I18nError::InvalidLocale(String::new()));
    }

    #[test]
    fn nested_path_lookup() {
        let res = Resources::from_json_str(SAMPLE).unwrap();
        let node = res.lookup("en-US", "translation", "menu::file::open", "::");
        assert_eq!(node.and_then(ResourceNode::as_text), Some("Open"));
        assert!(res.lookup("en-US", "translation", "menu::nope", "::").is_none());
    }

    #[test]
    fn verbatim_key_wins_over_path() {
        let mut res = Resources::new();
        res.insert("en", "translation", "errors.network", "Network down");
        let node = res.lookup("en", "translation", "errors.network", ".");
        assert_eq!(node.and_then(ResourceNode::as_text), Some("Network down"));
    }

    #[test]
    fn plural_group_selection() {
        let res = Resources::from_json_str(SAMPLE).unwrap();
        let node = res.lookup("en-US", "translation", "apples", ".").unwrap();
        assert_eq!(node.select_plural(PluralCategory::One), Some("an apple"));
        assert_eq!(
            node.select_plural(PluralCategory::Few),
            Some("{{count}} apples")
        );
        let forms = node.plural_forms().unwrap();
        assert_eq!(forms.one, "an apple");
        assert_eq!(forms.many, None);
    }

    #[test]
    fn insert_unique_detects_duplicates() {
        let mut res = Resources::new();
        res.insert_unique("en", "translation", "a", "A").unwrap();
        let err = res.insert_unique("en", "translation", "a", "B").unwrap_err();
        assert_eq!(
            err,
            I18nError::DuplicateKey {
                locale: "en".into(),
                key: "a".into()
            }
        );
    }

    #[test]
    fn insert_plural_writes_suffixed_keys() {
        let mut res = Resources::new();
        res.insert_plural(
            "ru",
            "translation",
            "files",
            "_",
            PluralForms {
                one: "{{count}} файл".into(),
                few: Some("{{count}} файла".into()),
                other: "{{count}} файлов".into(),
                ..Default::default()
            },
        );
        let bundle = res.bundle("ru", "translation").unwrap();
        let mut keys: Vec<&str> = bundle.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["files_few", "files_one", "files_other"]);
    }

    #[test]
    fn add_bundle_merges() {
        let mut res = Resources::new();
        res.insert("en", "common", "ok", "OK");
        let mut extra = Namespace::new();
        extra.insert("ok".into(), "Okay".into());
        extra.insert("cancel".into(), "Cancel".into());
        res.add_bundle("en", "common", extra);
        assert_eq!(res.bundle("en", "common").map(HashMap::len), Some(2));
        assert_eq!(
            res.lookup("en", "common", "ok", ".")
                .and_then(ResourceNode::as_text),
            Some("Okay")
        );
    }
}
