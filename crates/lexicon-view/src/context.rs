//! Context handed from a provider to everything it renders.

use std::sync::{Arc, PoisonError, RwLock};

use lexicon_engine::{Engine, TranslateOptions};
use tracing::debug;

/// Locale assumed before any provider sets one.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Engine handle, locale, readiness and locale switching, as seen by
/// descendants.
///
/// Clones share the provider's locale cell, so a switch made through any
/// of them is seen by the provider and by every other clone.
#[derive(Debug, Clone)]
pub struct I18nContext {
    engine: Arc<Engine>,
    locale: Arc<RwLock<String>>,
    ready: bool,
}

impl Default for I18nContext {
    /// The state before a provider exists: an empty engine, the default
    /// locale, and not ready.
    fn default() -> Self {
        Self {
            engine: Arc::new(Engine::empty()),
            locale: Arc::new(RwLock::new(DEFAULT_LOCALE.to_string())),
            ready: false,
        }
    }
}

impl I18nContext {
    /// A consumable context over `engine`.
    #[must_use]
    pub fn ready(engine: Arc<Engine>, locale: impl Into<String>) -> Self {
        Self {
            engine,
            locale: Arc::new(RwLock::new(locale.into())),
            ready: true,
        }
    }

    /// The engine handle.
    #[must_use]
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// The locale last selected through this context or its provider.
    #[must_use]
    pub fn locale(&self) -> String {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether dictionaries are loaded and safe to query.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Switch locale: the engine changes language and the shared locale
    /// cell is updated under the same write lock.
    pub fn update_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        let mut current = self.locale.write().unwrap_or_else(PoisonError::into_inner);
        self.engine.change_language(locale.as_str());
        debug!(from = %current.as_str(), to = %locale, "locale updated");
        *current = locale;
    }

    /// Translate through the engine.
    #[must_use]
    pub fn t(&self, key: &str, options: &TranslateOptions) -> String {
        self.engine.t(key, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon_engine::{EngineConfig, Resources};
    use tracing_test::traced_test;

    #[test]
    fn default_is_not_ready() {
        let cx = I18nContext::default();
        assert!(!cx.is_ready());
        assert_eq!(cx.locale(), DEFAULT_LOCALE);
        assert!(cx.engine().resources().is_empty());
    }

    #[test]
    fn ready_context() {
        let engine = Arc::new(Engine::empty());
        let cx = I18nContext::ready(Arc::clone(&engine), "fr");
        assert!(cx.is_ready());
        assert_eq!(cx.locale(), "fr");
        assert!(Arc::ptr_eq(cx.engine(), &engine));
        assert_eq!(cx.t("k", &TranslateOptions::new()), "k");
    }

    #[test]
    #[traced_test]
    fn update_through_a_clone_is_shared() {
        let mut res = Resources::new();
        res.insert("en-US", "translation", "foo", "bar");
        res.insert("de", "translation", "foo", "Balken");
        let engine = Arc::new(Engine::init(EngineConfig::default(), res).unwrap());
        let cx = I18nContext::ready(engine, "en-US");
        let held = cx.clone();

        held.update_locale("de");

        assert_eq!(cx.locale(), "de");
        assert_eq!(cx.engine().language(), "de");
        assert_eq!(cx.t("foo", &TranslateOptions::new()), "Balken");
        assert!(logs_contain("locale updated"));
    }
}
