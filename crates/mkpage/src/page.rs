//! Page wrap transform.
//!
//! [`HtmlPage`] turns a stream of document nodes into a stream describing a
//! complete HTML page. The output is emitted in three phases:
//!
//! 1. **Head**, on the first content node: the opening boundary, doctype,
//!    `html`/`head` elements with metadata, inline stylesheet and script,
//!    the opening `body` tag, header includes and the container element.
//! 2. **Body**: every further input node is passed through unchanged.
//! 3. **Foot**, when input ends: the container close, footer includes,
//!    application scripts, closing `body`/`html` tags and the closing
//!    boundary.
//!
//! Include files are loaded one at a time while the triggering input node is
//! held back, so the input is not polled again until the phase completes.
//! A failed load ends the stream with the error; the closing boundary is
//! never emitted for a failed build.

use std::path::PathBuf;

use async_stream::try_stream;
use futures::Stream;
use mkpage_config::{Attributes, PageConfig};

use crate::error::{IncludeKind, PageError};
use crate::include::{Include, load_all};
use crate::markup::{Attr, close_tag, favicon_mime, open_tag, text_element, void_tag};
use crate::node::Node;
use crate::source::{FsSource, IncludeSource};

/// Lifecycle of one page build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Phase {
    /// No node emitted yet.
    Init,
    /// Emitting the head, possibly waiting on include loads.
    HeadPending,
    /// Passing content through.
    Body,
    /// Emitting the foot, possibly waiting on include loads.
    FootPending,
    /// Closing boundary emitted.
    Done,
}

/// Streaming transform wrapping a document in an HTML page.
///
/// Construction performs no I/O and never fails; include files are read
/// when the stream returned by [`HtmlPage::wrap`] is polled.
#[derive(Debug)]
pub struct HtmlPage<S = FsSource> {
    config: PageConfig,
    source: S,
    phase: Phase,
}

impl HtmlPage<FsSource> {
    /// Create a transform reading includes from the filesystem.
    #[must_use]
    pub fn new(config: PageConfig) -> Self {
        Self::with_source(config, FsSource)
    }
}

impl<S: IncludeSource> HtmlPage<S> {
    /// Create a transform reading includes from `source`.
    #[must_use]
    pub fn with_source(config: PageConfig, source: S) -> Self {
        Self {
            config: config.normalize(),
            source,
            phase: Phase::Init,
        }
    }

    /// The normalized configuration.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Wrap `input` in a page.
    ///
    /// Boundary nodes in the input are absorbed, so the output holds exactly
    /// one [`Node::Document`] and, on success, exactly one [`Node::Eof`].
    pub fn wrap<I>(mut self, input: I) -> impl Stream<Item = Result<Node, PageError>>
    where
        I: Stream<Item = Node>,
    {
        try_stream! {
            for await node in input {
                if node.is_boundary() {
                    continue;
                }
                if self.phase == Phase::Init {
                    self.advance(Phase::Init, Phase::HeadPending);
                    tracing::debug!("Emitting page head");
                    for await head in self.head() {
                        yield head?;
                    }
                    self.advance(Phase::HeadPending, Phase::Body);
                }
                yield node;
            }

            if self.phase == Phase::Init {
                self.advance(Phase::Init, Phase::HeadPending);
                tracing::debug!("Emitting page head for empty document");
                for await head in self.head() {
                    yield head?;
                }
                self.advance(Phase::HeadPending, Phase::Body);
            }

            self.advance(Phase::Body, Phase::FootPending);
            tracing::debug!("Emitting page foot");
            for await foot in self.foot() {
                yield foot?;
            }
            self.advance(Phase::FootPending, Phase::Done);
        }
    }

    /// Move from `from` to `to`. Phases only move forward.
    fn advance(&mut self, from: Phase, to: Phase) {
        debug_assert_eq!(self.phase, from, "page phase out of order");
        debug_assert!(from < to, "page phase moved backwards");
        tracing::trace!(?from, ?to, "Page phase");
        self.phase = to;
    }

    /// Everything up to, but not including, the first content node.
    fn head(&self) -> impl Stream<Item = Result<Node, PageError>> + '_ {
        try_stream! {
            for node in head_markup(&self.config) {
                yield node;
            }

            let inline = inline_includes(&self.config);
            for await nodes in load_all(&self.source, inline, false) {
                for node in nodes? {
                    yield node;
                }
            }

            yield Node::markup(close_tag("head"));
            yield Node::markup(open_tag("body", &attrs(&self.config.body_attrs)));

            let headers = includes(IncludeKind::Header, &self.config.header);
            for await nodes in load_all(&self.source, headers, self.config.markdown) {
                for node in nodes? {
                    yield node;
                }
            }

            if let Some(element) = &self.config.element {
                yield Node::markup(open_tag(element, &attrs(&self.config.attr)));
            }
        }
    }

    /// Everything after the last content node.
    fn foot(&self) -> impl Stream<Item = Result<Node, PageError>> + '_ {
        try_stream! {
            if let Some(element) = &self.config.element {
                yield Node::markup(close_tag(element));
            }

            let footers = includes(IncludeKind::Footer, &self.config.footer);
            for await nodes in load_all(&self.source, footers, self.config.markdown) {
                for node in nodes? {
                    yield node;
                }
            }

            for src in &self.config.app {
                yield Node::markup(script_tag(src, self.config.async_scripts));
            }

            yield Node::markup(close_tag("body"));
            yield Node::markup(close_tag("html"));
            yield Node::Eof;
        }
    }
}

/// Head nodes that need no I/O: boundary, doctype, `<html>`, `<head>` and
/// everything configured inside the head apart from inline includes.
pub(crate) fn head_markup(config: &PageConfig) -> Vec<Node> {
    let mut nodes = vec![
        Node::Document,
        Node::declaration(config.doctype.as_str()),
        Node::markup(open_tag("html", &attrs(&config.html_attrs))),
        Node::markup(open_tag("head", &[])),
        Node::markup(void_tag("meta", &[("charset", Attr::Text(&config.charset))])),
    ];

    if let Some(title) = &config.title {
        nodes.push(Node::markup(text_element("title", &[], title)));
    }

    for (name, content) in config.meta.iter() {
        nodes.push(Node::markup(void_tag(
            "meta",
            &[("name", Attr::Text(name)), ("content", Attr::Text(content))],
        )));
    }

    for (name, content) in config.equiv.iter() {
        nodes.push(Node::markup(void_tag(
            "meta",
            &[
                ("http-equiv", Attr::Text(name)),
                ("content", Attr::Text(content)),
            ],
        )));
    }

    if let Some(favicon) = &config.favicon {
        let mime = favicon_mime(favicon);
        if mime.is_none() {
            tracing::warn!(favicon = %favicon, "Unrecognized favicon extension, omitting type");
        }
        nodes.push(Node::markup(void_tag(
            "link",
            &[
                ("rel", Attr::Text("shortcut icon")),
                ("type", Attr::from(mime)),
                ("href", Attr::Text(favicon)),
            ],
        )));
    }

    for href in &config.style {
        nodes.push(Node::markup(void_tag(
            "link",
            &[
                ("rel", Attr::Text("stylesheet")),
                ("type", Attr::Text("text/css")),
                ("href", Attr::Text(href)),
                ("media", Attr::from(config.media.as_deref())),
            ],
        )));
    }

    for src in &config.script {
        nodes.push(Node::markup(script_tag(src, config.async_scripts)));
    }

    nodes
}

/// `<script type="text/javascript" src=".." [async]></script>`
fn script_tag(src: &str, async_scripts: bool) -> String {
    let async_attr = if async_scripts { Attr::Bare } else { Attr::Absent };
    let open = open_tag(
        "script",
        &[
            ("type", Attr::Text("text/javascript")),
            ("src", Attr::Text(src)),
            ("async", async_attr),
        ],
    );
    format!("{open}{}", close_tag("script"))
}

fn attrs(map: &Attributes) -> Vec<(&str, Attr<'_>)> {
    map.iter().map(|(key, value)| (key, Attr::from(value))).collect()
}

/// Inline stylesheet then inline script, whichever are configured.
fn inline_includes(config: &PageConfig) -> Vec<Include<'_>> {
    let css = config
        .css
        .as_deref()
        .map(|path| Include::new(IncludeKind::Css, path));
    let javascript = config
        .javascript
        .as_deref()
        .map(|path| Include::new(IncludeKind::Javascript, path));
    css.into_iter().chain(javascript).collect()
}

fn includes(kind: IncludeKind, paths: &[PathBuf]) -> Vec<Include<'_>> {
    paths.iter().map(|path| Include::new(kind, path)).collect()
}
