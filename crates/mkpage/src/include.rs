//! Loading include files into nodes.

use std::path::Path;

use futures::Stream;

use crate::error::{IncludeKind, PageError};
use crate::markdown::parse_fragment;
use crate::markup::{close_tag, escape, open_tag};
use crate::node::Node;
use crate::series::in_series;
use crate::source::IncludeSource;

/// A configured include file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Include<'a> {
    pub kind: IncludeKind,
    pub path: &'a Path,
}

impl<'a> Include<'a> {
    pub(crate) fn new(kind: IncludeKind, path: &'a Path) -> Self {
        Self { kind, path }
    }
}

/// Load `includes` one at a time, yielding the nodes of each in order.
pub(crate) fn load_all<'a, S: IncludeSource>(
    source: &'a S,
    includes: Vec<Include<'a>>,
    markdown: bool,
) -> impl Stream<Item = Result<Vec<Node>, PageError>> + 'a {
    in_series(
        includes
            .into_iter()
            .map(move |include| move || load(source, include, markdown)),
    )
}

/// Load one include and convert its text to nodes.
///
/// Stylesheets and scripts become a single inline element. Headers and
/// footers are parsed as markdown when `markdown` is set, otherwise they are
/// emitted as one raw block.
pub(crate) async fn load<S: IncludeSource>(
    source: &S,
    include: Include<'_>,
    markdown: bool,
) -> Result<Vec<Node>, PageError> {
    let text = source
        .read(include.path)
        .await
        .map_err(|err| PageError::include(include.kind, include.path, err))?;

    tracing::debug!(
        kind = %include.kind,
        path = %include.path.display(),
        bytes = text.len(),
        "Loaded include"
    );

    Ok(match include.kind {
        IncludeKind::Css => vec![Node::markup(inline_element("style", &text))],
        IncludeKind::Javascript => vec![Node::markup(inline_element("script", &text))],
        IncludeKind::Header | IncludeKind::Footer if markdown => parse_fragment(&text),
        IncludeKind::Header | IncludeKind::Footer => vec![Node::markup(text)],
    })
}

/// Wrap file contents in an element, escaped and on lines of their own.
fn inline_element(name: &str, content: &str) -> String {
    let mut body = escape(content, false).into_owned();
    if !body.starts_with('\n') {
        body.insert(0, '\n');
    }
    if !body.ends_with('\n') {
        body.push('\n');
    }
    format!("{}{body}{}", open_tag(name, &[]), close_tag(name))
}
