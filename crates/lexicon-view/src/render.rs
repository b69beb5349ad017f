//! Renderable fragments and render results.

use std::fmt;

use crate::context::I18nContext;
use crate::markup::escape_html;

/// Anything that can render itself to a markup string under a context.
pub trait Renderable {
    /// Render to markup. Text content must come out HTML-escaped.
    fn render(&self, cx: &I18nContext) -> String;
}

impl Renderable for str {
    fn render(&self, _cx: &I18nContext) -> String {
        escape_html(self).into_owned()
    }
}

impl Renderable for String {
    fn render(&self, cx: &I18nContext) -> String {
        self.as_str().render(cx)
    }
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn render(&self, cx: &I18nContext) -> String {
        (**self).render(cx)
    }
}

impl<T: Renderable + ?Sized> Renderable for Box<T> {
    fn render(&self, cx: &I18nContext) -> String {
        (**self).render(cx)
    }
}

impl<T: Renderable> Renderable for [T] {
    fn render(&self, cx: &I18nContext) -> String {
        self.iter().map(|child| child.render(cx)).collect()
    }
}

impl<T: Renderable> Renderable for Vec<T> {
    fn render(&self, cx: &I18nContext) -> String {
        self.as_slice().render(cx)
    }
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "meta", "wbr"];

/// A minimal HTML element with attributes and renderable children.
#[derive(Default)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Box<dyn Renderable>>,
}

impl Element {
    /// Create an element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add an attribute. The value is escaped on render.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append a child.
    pub fn child(mut self, child: impl Renderable + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    /// Append a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(text.into())
    }

    /// Tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("children", &self.children.len())
            .finish()
    }
}

impl Renderable for Element {
    fn render(&self, cx: &I18nContext) -> String {
        let mut out = String::new();
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        if self.children.is_empty() && VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push_str("/>");
            return out;
        }
        out.push('>');
        for child in &self.children {
            out.push_str(&child.render(cx));
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
        out
    }
}

/// A placeholder value: a literal or a renderable fragment.
pub enum Value {
    /// Literal text, escaped when rendered.
    Literal(String),
    /// A fragment rendered under the consumer's engine.
    Fragment(Box<dyn Renderable>),
}

impl Value {
    /// Wrap a renderable fragment.
    pub fn fragment(fragment: impl Renderable + 'static) -> Self {
        Self::Fragment(Box::new(fragment))
    }

    /// Render to markup under `cx`.
    #[must_use]
    pub fn render(&self, cx: &I18nContext) -> String {
        match self {
            Self::Literal(text) => text.render(cx),
            Self::Fragment(fragment) => fragment.render(cx),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Fragment(_) => f.write_str("Fragment(..)"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<Element> for Value {
    fn from(element: Element) -> Self {
        Self::fragment(element)
    }
}

macro_rules! literal_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Literal(v.to_string())
                }
            }
        )*
    };
}

literal_from_display!(i32, i64, u32, u64, usize, f64, char);

/// Booleans render as nothing, so `flag && fragment` style values collapse.
impl From<bool> for Value {
    fn from(_: bool) -> Self {
        Self::Literal(String::new())
    }
}

/// Output of a consumer: plain text or raw markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Text to be escaped by whoever displays it.
    Text(String),
    /// Markup to be inserted verbatim.
    Markup(String),
}

impl Rendered {
    /// The text or markup content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Markup(s) => s,
        }
    }

    /// Whether this is raw markup.
    #[must_use]
    pub fn is_markup(&self) -> bool {
        matches!(self, Self::Markup(_))
    }

    /// Take the content.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) | Self::Markup(s) => s,
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Renderable for Rendered {
    /// Text is escaped; markup is placed verbatim inside a `<span>`.
    fn render(&self, cx: &I18nContext) -> String {
        match self {
            Self::Text(text) => text.render(cx),
            Self::Markup(html) => format!("<span>{html}</span>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_renders_escaped() {
        let cx = I18nContext::default();
        assert_eq!("a < b".render(&cx), "a &lt; b");
        assert_eq!(String::from("\"q\"").render(&cx), "&quot;q&quot;");
    }

    #[test]
    fn element_with_attrs_and_children() {
        let cx = I18nContext::default();
        let el = Element::new("a")
            .attr("href", "/search?q=a&b")
            .text("Tom & Jerry")
            .child(Element::new("b").text("!"));
        assert_eq!(
            el.render(&cx),
            "<a href=\"/search?q=a&amp;b\">Tom &amp; Jerry<b>!</b></a>"
        );
    }

    #[test]
    fn void_element() {
        let cx = I18nContext::default();
        assert_eq!(Element::new("br").render(&cx), "<br/>");
        assert_eq!(Element::new("p").render(&cx), "<p></p>");
    }

    #[test]
    fn list_renders_concatenated() {
        let cx = I18nContext::default();
        let items = vec![Element::new("i").text("a"), Element::new("i").text("b")];
        assert_eq!(items.render(&cx), "<i>a</i><i>b</i>");
    }

    #[test]
    fn rendered_as_fragment() {
        let cx = I18nContext::default();
        assert_eq!(Rendered::Text("<x>".into()).render(&cx), "&lt;x&gt;");
        assert_eq!(
            Rendered::Markup("<b>x</b>".into()).render(&cx),
            "<span><b>x</b></span>"
        );
        assert_eq!(Rendered::Markup("m".into()).to_string(), "m");
    }

    #[test]
    fn values_from_literals() {
        let cx = I18nContext::default();
        assert_eq!(Value::from(0_i64).render(&cx), "0");
        assert_eq!(Value::from(2.5_f64).render(&cx), "2.5");
        assert_eq!(Value::from("<3").render(&cx), "&lt;3");
        assert_eq!(Value::from(true).render(&cx), "");
        assert_eq!(Value::from(false).render(&cx), "");
        assert_eq!(format!("{:?}", Value::from("x")), "Literal(\"x\")");
        assert_eq!(
            format!("{:?}", Value::fragment(Element::new("b"))),
            "Fragment(..)"
        );
    }
}
