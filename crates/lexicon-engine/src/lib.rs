#![forbid(unsafe_code)]

//! Translation engine for lexicon.
//!
//! Provides namespaced locale dictionaries with key-based lookup,
//! locale fallback chains, CLDR-style plural forms, context variants,
//! and `{{name}}` interpolation.
//!
//! # Role in lexicon
//! `lexicon-engine` owns every dictionary concern: storage, fallback
//! policy and pluralization. The view layer (`lexicon-view`) only asks it
//! for template strings and never reimplements those policies.

pub mod engine;
pub mod error;
pub mod plural;
pub mod resources;

pub use engine::{Engine, EngineConfig, TranslateOptions, interpolate};
pub use error::I18nError;
pub use plural::{PluralCategory, PluralForms, PluralRule};
pub use resources::{Namespace, ResourceNode, Resources};
