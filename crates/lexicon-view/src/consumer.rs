//! Consumer: looks up a message and interpolates values into it.
//!
//! Interpolation works on rendered markup. The template is escaped as a
//! text node would be, each value is rendered to markup under a context
//! built from the same engine, tokens are replaced literally, and the
//! entity escapes added by rendering are reversed. The result is then
//! classified as plain text or raw markup by a [`MarkupPolicy`].

use regex::{NoExpand, Regex};
use tracing::{debug_span, trace, warn};

use lexicon_engine::TranslateOptions;

use crate::context::I18nContext;
use crate::markup::{MarkupPolicy, escape_html, unescape_rendered};
use crate::provider::Provider;
use crate::render::{Renderable, Rendered, Value};

/// Localized output for one message key.
///
/// # Example
///
/// ```
/// use lexicon_engine::Resources;
/// use lexicon_view::{Consumer, I18nContext, Provider, Rendered};
///
/// let mut messages = Resources::new();
/// messages.insert("en-US", "translation", "inbox_one", "{{count}} message");
/// messages.insert("en-US", "translation", "inbox_other", "{{count}} messages");
/// let provider = Provider::new(messages).unwrap();
///
/// let inbox = Consumer::new("inbox").count(0).value("count", 0);
/// assert_eq!(inbox.localize(provider.context()), Rendered::Text("0 messages".into()));
///
/// // Before a provider is ready the key is shown as-is.
/// assert_eq!(inbox.localize(&I18nContext::default()), Rendered::Text("inbox".into()));
/// ```
#[derive(Debug)]
pub struct Consumer {
    text: String,
    count: Option<i64>,
    context: Option<String>,
    values: Vec<(String, Value)>,
    policy: MarkupPolicy,
}

impl Consumer {
    /// Consumer for a message key.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            count: None,
            context: None,
            values: Vec::new(),
            policy: MarkupPolicy::default(),
        }
    }

    /// Quantity for plural selection.
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Disambiguation context.
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a placeholder value. Values are substituted in insertion order.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }

    /// Add several placeholder values.
    #[must_use]
    pub fn values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replace the raw-markup policy.
    #[must_use]
    pub fn markup_policy(mut self, policy: MarkupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The message key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.text
    }

    /// Options sent to the engine.
    ///
    /// Interpolation is always skipped since values are substituted here.
    /// A count is kept whenever given, zero included; an empty context
    /// counts as none.
    #[must_use]
    pub fn translate_options(&self) -> TranslateOptions {
        let mut options = TranslateOptions::new().skip_interpolation(true);
        options.count = self.count;
        options.context = self.context.clone().filter(|c| !c.is_empty());
        options
    }

    /// Produce the localized output under `cx`.
    #[must_use]
    pub fn localize(&self, cx: &I18nContext) -> Rendered {
        if !cx.is_ready() {
            return Rendered::Text(self.text.clone());
        }
        let template = cx.t(&self.text, &self.translate_options());
        interpolate(&template, &self.values, cx, &self.policy)
    }
}

impl Renderable for Consumer {
    fn render(&self, cx: &I18nContext) -> String {
        self.localize(cx).render(cx)
    }
}

impl From<Consumer> for Value {
    fn from(consumer: Consumer) -> Self {
        Value::fragment(consumer)
    }
}

/// Substitute `{{name}}` tokens in `template` with rendered values.
///
/// Values are rendered under a fresh provider context over `cx`'s engine,
/// so nested consumers resolve against the same dictionaries.
#[must_use]
pub fn interpolate(
    template: &str,
    values: &[(String, Value)],
    cx: &I18nContext,
    policy: &MarkupPolicy,
) -> Rendered {
    let _span = debug_span!("interpolate", placeholders = values.len()).entered();

    let mut output = escape_html(template).into_owned();

    if !values.is_empty() {
        let nested = Provider::with_engine(cx.engine().clone());
        for (name, value) in values {
            let rendered = value.render(nested.context());
            output = replace_placeholder(&output, name, &rendered);
            trace!(placeholder = %name, "placeholder substituted");
        }
    }

    let output = unescape_rendered(&output);
    if policy.is_markup(&output) {
        Rendered::Markup(output)
    } else {
        Rendered::Text(output)
    }
}

/// Replace every `{{name}}` in `markup`. The name is matched literally
/// in its escaped form, since the template was escaped before matching.
fn replace_placeholder(markup: &str, name: &str, replacement: &str) -> String {
    let escaped_name = escape_html(name);
    let pattern = format!(r"\{{\{{{}\}}\}}", regex::escape(&escaped_name));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(markup, NoExpand(replacement)).into_owned(),
        Err(err) => {
            warn!(placeholder = %name, error = %err, "placeholder pattern rejected");
            markup.replace(&format!("{{{{{escaped_name}}}}}"), replacement)
        }
    }
}
