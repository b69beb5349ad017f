//! Provider: owns the engine and supplies context to descendants.

use std::sync::Arc;

use lexicon_engine::{Engine, EngineConfig, I18nError, Resources};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::{DEFAULT_LOCALE, I18nContext};
use crate::render::Renderable;

/// Namespace used for every message when no other is configured.
pub const DEFAULT_NAMESPACE: &str = "translation";

/// Engine settings a provider applies when it builds its own engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Initial locale.
    pub locale: String,
    /// Locale consulted when a key is missing.
    pub fallback_locale: String,
    /// The single namespace, also the default.
    pub namespace: String,
    /// Namespace separator. Not `:` so keys may contain colons.
    pub ns_separator: String,
    /// Key separator. Not `.` so dotted keys are not split into paths.
    pub key_separator: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.into(),
            fallback_locale: DEFAULT_LOCALE.into(),
            namespace: DEFAULT_NAMESPACE.into(),
            ns_separator: ":::".into(),
            key_separator: "::".into(),
        }
    }
}

impl ProviderConfig {
    /// Config starting in `locale`, defaults elsewhere.
    pub fn with_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Default::default()
        }
    }

    /// The engine configuration this provider config implies.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            lng: self.locale.clone(),
            fallback_lng: vec![self.fallback_locale.clone()],
            namespaces: vec![self.namespace.clone()],
            default_ns: self.namespace.clone(),
            ns_separator: self.ns_separator.clone(),
            key_separator: self.key_separator.clone(),
            ..Default::default()
        }
    }
}

/// Owns the engine and the current context.
///
/// Descendants never see the provider itself, only the [`I18nContext`]
/// passed to [`Renderable::render`].
#[derive(Debug, Clone)]
pub struct Provider {
    context: I18nContext,
}

impl Provider {
    /// Build an engine over `messages` with the default config.
    pub fn new(messages: Resources) -> Result<Self, I18nError> {
        Self::with_config(ProviderConfig::default(), messages)
    }

    /// Build an engine over `messages` with `config`.
    ///
    /// Engine initialization errors are returned unchanged.
    pub fn with_config(config: ProviderConfig, messages: Resources) -> Result<Self, I18nError> {
        let engine = Engine::init(config.engine_config(), messages)?;
        info!(locale = %config.locale, "provider initialized");
        Ok(Self {
            context: I18nContext::ready(Arc::new(engine), config.locale),
        })
    }

    /// Reuse an existing engine, starting at its current language.
    #[must_use]
    pub fn with_engine(engine: Arc<Engine>) -> Self {
        let locale = engine.language();
        debug!(locale = %locale, "provider attached to existing engine");
        Self {
            context: I18nContext::ready(engine, locale),
        }
    }

    /// The context descendants render under.
    #[must_use]
    pub fn context(&self) -> &I18nContext {
        &self.context
    }

    /// The engine handle.
    #[must_use]
    pub fn engine(&self) -> &Arc<Engine> {
        self.context.engine()
    }

    /// Current locale, including switches made by descendants through
    /// [`I18nContext::update_locale`].
    #[must_use]
    pub fn locale(&self) -> String {
        self.context.locale()
    }

    /// Switch locale: the engine changes language and every clone of the
    /// context sees the new locale.
    pub fn update_locale(&self, locale: impl Into<String>) {
        self.context.update_locale(locale);
    }

    /// Render a descendant under this provider's context.
    #[must_use]
    pub fn render(&self, child: &dyn Renderable) -> String {
        child.render(&self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Element;
    use lexicon_engine::TranslateOptions;
    use tracing_test::traced_test;

    fn messages() -> Resources {
        let mut res = Resources::new();
        res.insert("en-US", DEFAULT_NAMESPACE, "foo", "bar");
        res.insert("en-US", DEFAULT_NAMESPACE, "errors.network", "Network down");
        res.insert("de", DEFAULT_NAMESPACE, "foo", "Balken");
        res
    }

    #[test]
    fn default_config_matches_conventions() {
        let config = ProviderConfig::default();
        assert_eq!(config.locale, "en-US");
        assert_eq!(config.fallback_locale, "en-US");
        let engine = config.engine_config();
        assert_eq!(engine.namespaces, vec!["translation"]);
        assert_eq!(engine.default_ns, "translation");
        assert_eq!(engine.ns_separator, ":::");
        assert_eq!(engine.key_separator, "::");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ProviderConfig = serde_json::from_str(r#"{"locale": "de"}"#).unwrap();
        assert_eq!(config, ProviderConfig::with_locale("de"));
    }

    #[test]
    #[traced_test]
    fn new_provider_is_ready() {
        let provider = Provider::new(messages()).unwrap();
        assert!(provider.context().is_ready());
        assert_eq!(provider.locale(), "en-US");
        assert_eq!(provider.context().t("foo", &TranslateOptions::new()), "bar");
        assert!(logs_contain("provider initialized"));
    }

    #[test]
    fn dotted_keys_are_not_paths() {
        let provider = Provider::new(messages()).unwrap();
        assert_eq!(
            provider
                .engine()
                .t("errors.network", &TranslateOptions::new()),
            "Network down"
        );
    }

    #[test]
    fn init_errors_propagate() {
        let config = ProviderConfig {
            ns_separator: "::".into(),
            ..Default::default()
        };
        assert!(matches!(
            Provider::with_config(config, messages()),
            Err(I18nError::InvalidConfig(_))
        ));
    }

    #[test]
    #[traced_test]
    fn update_locale_switches_engine_and_context() {
        let provider = Provider::new(messages()).unwrap();
        let held = provider.context().clone();

        provider.update_locale("de");

        assert_eq!(provider.locale(), "de");
        assert_eq!(provider.engine().language(), "de");
        assert_eq!(provider.context().t("foo", &TranslateOptions::new()), "Balken");
        // Contexts already handed out observe the switch.
        assert_eq!(held.locale(), "de");
        assert!(logs_contain("locale updated"));
    }

    #[test]
    fn descendant_switch_reaches_provider() {
        let provider = Provider::new(messages()).unwrap();
        let cx: &I18nContext = provider.context();

        cx.update_locale("de");

        assert_eq!(provider.locale(), "de");
        assert_eq!(provider.engine().language(), "de");
        assert_eq!(provider.context().t("foo", &TranslateOptions::new()), "Balken");
    }

    #[test]
    fn with_engine_reuses_instance() {
        let first = Provider::new(messages()).unwrap();
        first.engine().change_language("de");

        let second = Provider::with_engine(Arc::clone(first.engine()));
        assert!(Arc::ptr_eq(first.engine(), second.engine()));
        assert!(second.context().is_ready());
        assert_eq!(second.locale(), "de");
    }

    #[test]
    fn render_passes_context_down() {
        let provider = Provider::new(messages()).unwrap();
        let out = provider.render(&Element::new("p").text("a & b"));
        assert_eq!(out, "<p>a &amp; b</p>");
    }
}
