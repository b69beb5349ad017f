//! Errors from engine construction and dictionary loading.

/// Errors from i18n operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale string was malformed.
    InvalidLocale(String),
    /// An engine configuration was unusable.
    InvalidConfig(String),
    /// A dictionary could not be parsed.
    ParseError(String),
    /// Duplicate key in the same locale and namespace.
    DuplicateKey { locale: String, key: String },
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(l) => write!(f, "invalid locale: '{l}'"),
            Self::InvalidConfig(msg) => write!(f, "invalid engine config: {msg}"),
            Self::ParseError(msg) => write!(f, "parse error: {msg}"),
            Self::DuplicateKey { locale, key } => {
                write!(f, "duplicate key '{key}' in locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

impl From<serde_json::Error> for I18nError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

/// Check that a locale tag is usable as a dictionary key.
///
/// Tags must be non-empty and free of whitespace; everything else is
/// accepted since tag negotiation is the caller's concern.
pub(crate) fn validate_locale(tag: &str) -> Result<(), I18nError> {
    if tag.is_empty() || tag.chars().any(char::is_whitespace) {
        return Err(I18nError::InvalidLocale(tag.to_string()));
    }
    Ok(())
}
