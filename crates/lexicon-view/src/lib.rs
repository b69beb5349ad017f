#![forbid(unsafe_code)]

//! Localized rendering for a tree of view components.
//!
//! A [`Provider`] owns the translation engine and hands an
//! [`I18nContext`] to everything it renders. A [`Consumer`] looks up a
//! message key through that context and substitutes `{{name}}`
//! placeholders with literal values or nested [`Renderable`] fragments.
//!
//! Context is passed explicitly: every [`Renderable`] receives the
//! context it renders under, so nested fragments resolve against the same
//! engine as their parent.
//!
//! ```
//! use lexicon_engine::Resources;
//! use lexicon_view::{Consumer, Element, Provider, Rendered, Value};
//!
//! let mut messages = Resources::new();
//! messages.insert("en-US", "translation", "greet", "Hello {{name}}, read the {{link}}");
//! messages.insert("en-US", "translation", "docs", "docs & notes");
//!
//! let provider = Provider::new(messages).unwrap();
//! let link = Element::new("a").attr("href", "/docs").child(Consumer::new("docs"));
//! let out = Consumer::new("greet")
//!     .value("name", "World")
//!     .value("link", Value::fragment(link))
//!     .localize(provider.context());
//!
//! assert_eq!(
//!     out,
//!     Rendered::Markup("Hello World, read the <a href=\"/docs\">docs & notes</a>".into())
//! );
//! ```

pub mod consumer;
pub mod context;
pub mod markup;
pub mod provider;
pub mod render;

pub use consumer::{Consumer, interpolate};
pub use context::{DEFAULT_LOCALE, I18nContext};
pub use markup::{MarkupPolicy, escape_html, unescape_rendered};
pub use provider::{Provider, ProviderConfig};
pub use render::{Element, Renderable, Rendered, Value};
