//! Wrap markdown documents in complete HTML pages.
//!
//! [`HtmlPage`] is a streaming transform over document [`Node`]s. It emits
//! the doctype, `html`, `head` and `body` structure around the input
//! content, loading inline stylesheets, scripts and header/footer includes
//! through an [`IncludeSource`] one file at a time so output order is always
//! the same.
//!
//! # Example
//!
//! ```no_run
//! use futures::{TryStreamExt, stream};
//! use mkpage::{HtmlPage, PageConfig, markdown};
//!
//! # async fn example() -> Result<(), mkpage::PageError> {
//! let config = PageConfig {
//!     title: Some("Hello".to_owned()),
//!     ..Default::default()
//! };
//! let input = stream::iter(markdown::parse_document("## Heading\n\nParagraph."));
//! let nodes: Vec<_> = HtmlPage::new(config).wrap(input).try_collect().await?;
//! let html = markdown::to_html(&nodes);
//! # Ok(())
//! # }
//! ```

mod error;
mod include;
pub mod markdown;
pub mod markup;
mod node;
mod page;
pub mod series;
mod source;

use futures::{TryStreamExt, stream};

pub use error::{IncludeKind, PageError};
pub use mkpage_config::{AttrValue, Attributes, ConfigError, MetaPairs, PageConfig, PageSettings};
pub use node::{HtmlBlock, HtmlBlockKind, Node};
pub use page::HtmlPage;
pub use source::{FsSource, IncludeSource, MemorySource};

/// Parse `markdown`, wrap it in a page and format the page as HTML.
///
/// Nothing is returned unless the whole page was built, so a failed include
/// never yields a truncated document.
pub async fn render_page<S: IncludeSource>(
    config: PageConfig,
    source: S,
    markdown: &str,
) -> Result<String, PageError> {
    let input = stream::iter(markdown::parse_document(markdown));
    let nodes: Vec<Node> = HtmlPage::with_source(config, source)
        .wrap(input)
        .try_collect()
        .await?;
    Ok(markdown::to_html(&nodes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_render_page() {
        let source = MemorySource::new().with_file("footer.md", "*Footer*\n");
        let config = PageConfig {
            title: Some("Page".to_owned()),
            element: Some("article".to_owned()),
            footer: vec!["footer.md".into()],
            markdown: true,
            ..Default::default()
        };

        let html = render_page(config, source, "## Heading\n\nParagraph.")
            .await
            .unwrap();

        assert_eq!(
            html,
            concat!(
                "<!doctype html>\n",
                "<html lang=\"en-us\">\n",
                "<head>\n",
                "<meta charset=\"utf-8\" />\n",
                "<title>Page</title>\n",
                "</head>\n",
                "<body>\n",
                "<article>\n",
                "<h2>Heading</h2>\n",
                "<p>Paragraph.</p>\n",
                "</article>\n",
                "<p><em>Footer</em></p>\n",
                "</body>\n",
                "</html>\n",
            )
        );
    }

    #[tokio::test]
    async fn test_render_page_missing_include() {
        let config = PageConfig {
            header: vec!["non-existent.md".into()],
            ..Default::default()
        };

        let err = render_page(config, MemorySource::new(), "text")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.kind(), IncludeKind::Header);
    }

    #[tokio::test]
    async fn test_render_page_from_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let css = dir.path().join("style.css");
        std::fs::write(&css, "body{background:blue;}").unwrap();
        let config = PageConfig {
            css: Some(css),
            ..Default::default()
        };

        let html = render_page(config, FsSource, "text").await.unwrap();

        assert!(html.contains("<style>\nbody{background:blue;}\n</style>\n</head>\n"));
    }
}
