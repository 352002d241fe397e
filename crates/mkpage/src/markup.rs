//! Tag rendering for the structural elements of a page.

use std::borrow::Cow;
use std::fmt::Write;
use std::path::Path;

use mkpage_config::AttrValue;

/// Attribute value as rendered into a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr<'a> {
    /// `name="value"`, with the value escaped.
    Text(&'a str),
    /// Bare attribute name, e.g. `async`.
    Bare,
    /// Not rendered at all.
    Absent,
}

impl<'a> From<&'a AttrValue> for Attr<'a> {
    fn from(value: &'a AttrValue) -> Self {
        match value {
            AttrValue::Text(text) => Attr::Text(text),
            AttrValue::Flag(true) => Attr::Bare,
            AttrValue::Flag(false) => Attr::Absent,
        }
    }
}

impl<'a> From<Option<&'a str>> for Attr<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Attr::Absent, Attr::Text)
    }
}

/// Shape of a rendered tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
    /// `<name ... />`
    SelfClosing,
}

/// Escape text for HTML content, or for a quoted attribute value when
/// `attribute` is set.
pub fn escape(text: &str, attribute: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (attribute && c == '"');
    if !text.contains(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Render a single tag. Attributes are written in slice order.
pub fn render_tag(name: &str, attrs: &[(&str, Attr<'_>)], kind: TagKind) -> String {
    if kind == TagKind::Close {
        return format!("</{name}>");
    }

    let mut out = format!("<{name}");
    for (key, value) in attrs {
        match value {
            Attr::Text(text) => {
                // Writing to a String cannot fail.
                let _ = write!(out, r#" {key}="{}""#, escape(text, true));
            }
            Attr::Bare => {
                out.push(' ');
                out.push_str(key);
            }
            Attr::Absent => {}
        }
    }
    if kind == TagKind::SelfClosing {
        out.push_str(" /");
    }
    out.push('>');
    out
}

/// `<name ...>`
pub fn open_tag(name: &str, attrs: &[(&str, Attr<'_>)]) -> String {
    render_tag(name, attrs, TagKind::Open)
}

/// `</name>`
pub fn close_tag(name: &str) -> String {
    render_tag(name, &[], TagKind::Close)
}

/// `<name ... />`
pub fn void_tag(name: &str, attrs: &[(&str, Attr<'_>)]) -> String {
    render_tag(name, attrs, TagKind::SelfClosing)
}

/// An element with escaped text content, e.g. `<title>..</title>`.
pub fn text_element(name: &str, attrs: &[(&str, Attr<'_>)], text: &str) -> String {
    format!(
        "{}{}{}",
        open_tag(name, attrs),
        escape(text, false),
        close_tag(name)
    )
}

/// MIME type for a favicon, inferred from the file extension.
///
/// Only `png` and `ico` are recognized.
pub fn favicon_mime(path: &str) -> Option<&'static str> {
    match Path::new(path).extension()?.to_str()? {
        "png" => Some("image/png"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}
