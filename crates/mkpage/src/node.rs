//! Document-tree events flowing through the page transform.

use pulldown_cmark::Event;

/// Kind of a raw HTML block, numbered after the CommonMark HTML block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlBlockKind {
    /// A declaration such as `<!doctype html>` (type 4).
    Declaration,
    /// A block of markup that may enclose further content (type 6).
    Markup,
}

impl HtmlBlockKind {
    /// CommonMark HTML block type number.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Declaration => 4,
            Self::Markup => 6,
        }
    }
}

/// Literal markup emitted verbatim by the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlBlock {
    pub kind: HtmlBlockKind,
    pub literal: String,
}

/// One event of a document stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Start of a self-contained document.
    Document,
    /// End of a self-contained document.
    Eof,
    /// Raw HTML block.
    Html(HtmlBlock),
    /// Any other markdown event, opaque to the page transform.
    Markdown(Event<'static>),
}

impl Node {
    /// Create a declaration block.
    pub fn declaration(literal: impl Into<String>) -> Self {
        Self::Html(HtmlBlock {
            kind: HtmlBlockKind::Declaration,
            literal: literal.into(),
        })
    }

    /// Create a markup block.
    pub fn markup(literal: impl Into<String>) -> Self {
        Self::Html(HtmlBlock {
            kind: HtmlBlockKind::Markup,
            literal: literal.into(),
        })
    }

    /// Literal text of an HTML block.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Html(block) => Some(&block.literal),
            _ => None,
        }
    }

    /// True for [`Node::Document`] and [`Node::Eof`].
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Document | Self::Eof)
    }
}
