//! HTML escaping and the raw-markup decision.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Entities reversed after interpolation, in application order.
///
/// `&amp;` comes after `&#x27;` so an escaped apostrophe is restored
/// before the ampersand pass could touch it.
const RENDER_ENTITIES: [(&str, &str); 5] = [
    ("&#x27;", "'"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// Markers that flag an interpolated string as markup by default.
const DEFAULT_MARKERS: [&str; 3] = ["<b>", "<span", "</a>"];

/// Escape text for inclusion in HTML, the way text nodes are serialized
/// during rendering.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Reverse the entity escapes introduced by rendering.
///
/// Only the fixed set produced by [`escape_html`] is touched; any other
/// entity is left as written.
#[must_use]
pub fn unescape_rendered(markup: &str) -> String {
    RENDER_ENTITIES
        .iter()
        .fold(markup.to_string(), |acc, (entity, ch)| {
            if acc.contains(entity) {
                acc.replace(entity, ch)
            } else {
                acc
            }
        })
}

/// Decides whether an interpolated string is emitted as raw markup or as
/// plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupPolicy {
    /// Markup when any marker substring occurs.
    Markers(Vec<String>),
    /// Markup when anything that looks like a start or end tag occurs.
    AnyTag,
    /// Always plain text.
    Never,
}

impl Default for MarkupPolicy {
    fn default() -> Self {
        Self::Markers(DEFAULT_MARKERS.iter().map(|m| (*m).to_string()).collect())
    }
}

impl MarkupPolicy {
    /// Policy matching the given marker substrings.
    #[must_use]
    pub fn markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Markers(markers.into_iter().map(Into::into).collect())
    }

    /// Whether `output` should be emitted as raw markup.
    #[must_use]
    pub fn is_markup(&self, output: &str) -> bool {
        match self {
            Self::Markers(markers) => markers.iter().any(|m| output.contains(m.as_str())),
            Self::AnyTag => looks_like_tag(output),
            Self::Never => false,
        }
    }
}

fn looks_like_tag(s: &str) -> bool {
    s.match_indices('<').any(|(i, _)| {
        let rest = &s[i + 1..];
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        rest.starts_with(|c: char| c.is_ascii_alphabetic())
    })
}
