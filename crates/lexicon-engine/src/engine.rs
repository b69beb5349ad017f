//! Translation engine with namespaces, locale fallback and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: every lookup walks the resolution
//!    chain once, each locale at most once.
//!
//! 2. **Interpolation is single-pass**: `{{name}}` tokens are replaced in
//!    one scan; substituted values are never re-expanded.
//!
//! 3. **Thread safety**: `Engine` is `Send + Sync`. Dictionaries are
//!    immutable once shared; only the current language sits behind a lock.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in any locale of the chain | Key echoed back |
//! | Missing locale | Locale not loaded | Falls through chain |
//! | Group instead of string | Key names a nested group without count | Treated as missing |
//! | Bad interpolation arg | `{{name}}` but no `name` arg | Token left as-is |
//! | Bad config | Empty namespaces, clashing separators | `I18nError::InvalidConfig` from `init` |

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{I18nError, validate_locale};
use crate::plural::PluralRule;
use crate::resources::{Namespace, ResourceNode, Resources};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial language.
    pub lng: String,
    /// Locales tried, in order, after the language and its base language.
    pub fallback_lng: Vec<String>,
    /// Known namespaces.
    pub namespaces: Vec<String>,
    /// Namespace used when a key carries no namespace prefix.
    pub default_ns: String,
    /// Separates a namespace prefix from the key (`common:ok`).
    pub ns_separator: String,
    /// Separates path segments of nested keys (`menu.file.open`).
    pub key_separator: String,
    /// Joins a key and its context variant (`friend_male`).
    pub context_separator: String,
    /// Joins a key and its plural category (`item_one`).
    pub plural_separator: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lng: "en-US".into(),
            fallback_lng: vec!["en-US".into()],
            namespaces: vec!["translation".into()],
            default_ns: "translation".into(),
            ns_separator: ":".into(),
            key_separator: ".".into(),
            context_separator: "_".into(),
            plural_separator: "_".into(),
        }
    }
}

impl EngineConfig {
    /// Config with the given initial language and defaults elsewhere.
    #[must_use]
    pub fn with_language(lng: impl Into<String>) -> Self {
        Self {
            lng: lng.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), I18nError> {
        validate_locale(&self.lng)?;
        for tag in &self.fallback_lng {
            validate_locale(tag)?;
        }
        if self.namespaces.is_empty() {
            return Err(I18nError::InvalidConfig("no namespaces configured".into()));
        }
        if self.namespaces.iter().any(String::is_empty) {
            return Err(I18nError::InvalidConfig("empty namespace name".into()));
        }
        if !self.namespaces.contains(&self.default_ns) {
            return Err(I18nError::InvalidConfig(format!(
                "default namespace '{}' is not listed in namespaces",
                self.default_ns
            )));
        }
        if self.ns_separator.is_empty() || self.key_separator.is_empty() {
            return Err(I18nError::InvalidConfig("separators must not be empty".into()));
        }
        if self.ns_separator == self.key_separator {
            return Err(I18nError::InvalidConfig(format!(
                "namespace and key separators are both '{}'",
                self.ns_separator
            )));
        }
        Ok(())
    }
}

/// Per-call translation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Return the template with `{{...}}` tokens untouched.
    pub skip_interpolation: bool,
    /// Quantity used to select a plural form; also fills `{{count}}`.
    pub count: Option<i64>,
    /// Disambiguation variant (`friend` + `male` → `friend_male`).
    pub context: Option<String>,
    /// Language override for this call only.
    pub lng: Option<String>,
    /// Namespace override for this call only.
    pub ns: Option<String>,
    /// Values for `{{name}}` tokens when interpolation is not skipped.
    pub replace: Vec<(String, String)>,
}

impl TranslateOptions {
    /// Options with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip interpolation.
    #[must_use]
    pub fn skip_interpolation(mut self, skip: bool) -> Self {
        self.skip_interpolation = skip;
        self
    }

    /// Set the plural count.
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the context variant.
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Override the language.
    #[must_use]
    pub fn lng(mut self, lng: impl Into<String>) -> Self {
        self.lng = Some(lng.into());
        self
    }

    /// Override the namespace.
    #[must_use]
    pub fn ns(mut self, ns: impl Into<String>) -> Self {
        self.ns = Some(ns.into());
        self
    }

    /// Add an interpolation value.
    #[must_use]
    pub fn replace(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.replace.push((name.into(), value.into()));
        self
    }
}

/// Translation engine: dictionaries, current language and lookup policy.
///
/// # Example
///
/// ```
/// use lexicon_engine::{Engine, EngineConfig, Resources, TranslateOptions};
///
/// let resources = Resources::from_json_str(r#"{
///     "en-US": { "translation": {
///         "welcome": "Welcome, {{name}}!",
///         "items_one": "{{count}} item",
///         "items_other": "{{count}} items"
///     } },
///     "es": { "translation": { "welcome": "¡Bienvenido, {{name}}!" } }
/// }"#).unwrap();
/// let engine = Engine::init(EngineConfig::default(), resources).unwrap();
///
/// let opts = TranslateOptions::new().replace("name", "Alice");
/// assert_eq!(engine.t("welcome", &opts), "Welcome, Alice!");
/// assert_eq!(engine.t("items", &TranslateOptions::new().count(3)), "3 items");
///
/// engine.change_language("es-MX");
/// assert_eq!(engine.t("welcome", &opts), "¡Bienvenido, Alice!");
/// assert_eq!(engine.t("items", &TranslateOptions::new().count(1)), "1 item");
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    resources: Resources,
    language: RwLock<String>,
    plural_rules: HashMap<String, PluralRule>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::empty()
    }
}

impl Engine {
    /// Build an engine from a config and dictionaries.
    pub fn init(config: EngineConfig, resources: Resources) -> Result<Self, I18nError> {
        config.validate()?;
        for tag in resources.locales() {
            validate_locale(tag)?;
        }
        info!(
            language = %config.lng,
            locales = resources.len(),
            namespaces = config.namespaces.len(),
            "i18n engine initialized"
        );
        Ok(Self {
            language: RwLock::new(config.lng.clone()),
            config,
            resources,
            plural_rules: HashMap::new(),
        })
    }

    /// An engine with default config and no dictionaries.
    #[must_use]
    pub fn empty() -> Self {
        let config = EngineConfig::default();
        Self {
            language: RwLock::new(config.lng.clone()),
            config,
            resources: Resources::new(),
            plural_rules: HashMap::new(),
        }
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The loaded dictionaries.
    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Current language.
    #[must_use]
    pub fn language(&self) -> String {
        self.language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switch the current language.
    ///
    /// Unknown languages are accepted; lookups fall through the chain.
    pub fn change_language(&self, lng: impl Into<String>) {
        let lng = lng.into();
        let mut current = self.language.write().unwrap_or_else(PoisonError::into_inner);
        debug!(from = %current.as_str(), to = %lng, "language changed");
        *current = lng;
    }

    /// Resolution chain for the current language.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.resolution_chain(&self.language())
    }

    /// Override the plural rule for a locale.
    pub fn set_plural_rule(&mut self, locale: impl Into<String>, rule: PluralRule) {
        self.plural_rules.insert(locale.into(), rule);
    }

    /// Merge a namespace bundle into a locale.
    ///
    /// Unknown namespaces are registered.
    pub fn add_resource_bundle(
        &mut self,
        lng: &str,
        ns: &str,
        bundle: Namespace,
    ) -> Result<(), I18nError> {
        validate_locale(lng)?;
        if !self.config.namespaces.iter().any(|n| n == ns) {
            self.config.namespaces.push(ns.to_string());
        }
        debug!(lng, ns, keys = bundle.len(), "resource bundle added");
        self.resources.add_bundle(lng, ns, bundle);
        Ok(())
    }

    /// Whether a locale has messages for a namespace.
    #[must_use]
    pub fn has_resource_bundle(&self, lng: &str, ns: &str) -> bool {
        self.resources.bundle(lng, ns).is_some()
    }

    /// Translate a key.
    ///
    /// Returns the key itself (without namespace prefix) when no locale in
    /// the chain provides it.
    #[must_use]
    pub fn t(&self, key: &str, options: &TranslateOptions) -> String {
        let (ns, bare_key) = self.split_namespace(key, options.ns.as_deref());
        let lng = options.lng.clone().unwrap_or_else(|| self.language());

        let Some(template) = self.resolve(&lng, ns, bare_key, options) else {
            debug!(key = bare_key, ns, language = %lng, "missing translation key");
            return bare_key.to_string();
        };

        if options.skip_interpolation {
            return template.to_string();
        }
        let count = options.count.map(|c| c.to_string());
        let mut args: Vec<(&str, &str)> = Vec::with_capacity(options.replace.len() + 1);
        if let Some(count) = count.as_deref() {
            args.push(("count", count));
        }
        args.extend(
            options
                .replace
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        interpolate(template, &args)
    }

    /// Whether a key resolves in the chain for these options.
    #[must_use]
    pub fn exists(&self, key: &str, options: &TranslateOptions) -> bool {
        let (ns, bare_key) = self.split_namespace(key, options.ns.as_deref());
        let lng = options.lng.clone().unwrap_or_else(|| self.language());
        self.resolve(&lng, ns, bare_key, options).is_some()
    }

    fn split_namespace<'k>(
        &'k self,
        key: &'k str,
        ns_override: Option<&'k str>,
    ) -> (&'k str, &'k str) {
        if let Some((prefix, rest)) = key.split_once(self.config.ns_separator.as_str())
            && self.config.namespaces.iter().any(|n| n == prefix)
        {
            return (prefix, rest);
        }
        (ns_override.unwrap_or(&self.config.default_ns), key)
    }

    /// Language, its base language, then fallbacks; without repeats.
    fn resolution_chain(&self, lng: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::with_capacity(self.config.fallback_lng.len() + 2);
        let base = lng.split(['-', '_']).next().unwrap_or(lng);
        for tag in [lng, base]
            .into_iter()
            .chain(self.config.fallback_lng.iter().map(String::as_str))
        {
            if !tag.is_empty() && !chain.iter().any(|c| c == tag) {
                chain.push(tag.to_string());
            }
        }
        chain
    }

    fn plural_rule(&self, locale: &str) -> PluralRule {
        self.plural_rules
            .get(locale)
            .copied()
            .unwrap_or_else(|| PluralRule::for_locale(locale))
    }

    fn resolve(
        &self,
        lng: &str,
        ns: &str,
        key: &str,
        options: &TranslateOptions,
    ) -> Option<&str> {
        let context = options.context.as_deref().filter(|c| !c.is_empty());
        self.resolution_chain(lng)
            .iter()
            .find_map(|locale| self.resolve_in(locale, ns, key, context, options.count))
    }

    fn resolve_in(
        &self,
        locale: &str,
        ns: &str,
        key: &str,
        context: Option<&str>,
        count: Option<i64>,
    ) -> Option<&str> {
        let category = count.map(|c| self.plural_rule(locale).categorize(c));
        let cs = &self.config.context_separator;
        let ps = &self.config.plural_separator;

        let mut candidates: Vec<String> = Vec::with_capacity(4);
        if let Some(ctx) = context {
            if let Some(cat) = category {
                candidates.push(format!("{key}{cs}{ctx}{ps}{}", cat.as_str()));
            }
            candidates.push(format!("{key}{cs}{ctx}"));
        }
        if let Some(cat) = category {
            candidates.push(format!("{key}{ps}{}", cat.as_str()));
        }
        candidates.push(key.to_string());

        candidates.iter().find_map(|candidate| {
            let node = self
                .resources
                .lookup(locale, ns, candidate, &self.config.key_separator)?;
            match node {
                ResourceNode::Text(text) => Some(text.as_str()),
                ResourceNode::Nested(_) => category.and_then(|cat| node.select_plural(cat)),
            }
        })
    }
}

/// Single-pass `{{name}}` interpolation. Unmatched tokens left as-is.
///
/// Whitespace around the name inside the braces is ignored, so
/// `{{ name }}` and `{{name}}` are equivalent.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            // Unclosed token
            result.push_str(&rest[open..]);
            return result;
        };
        let token = &after[..close];
        match args.iter().find(|&&(name, _)| name == token.trim()) {
            Some(&(_, value)) => result.push_str(value),
            None => {
                result.push_str("{{");
                result.push_str(token);
                result.push_str("}}");
            }
        }
        rest = &after[close + 2..];
    }

    result.push_str(rest);
    result
}
