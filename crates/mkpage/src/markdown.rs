//! Markdown parsing into nodes and HTML formatting of node streams.

use pulldown_cmark::{Event, Options, Parser, html};

use crate::node::Node;

/// Parser options: GitHub Flavored Markdown tables, strikethrough and task lists.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Parse markdown into a self-contained document: [`Node::Document`], the
/// content events, then [`Node::Eof`].
pub fn parse_document(markdown: &str) -> Vec<Node> {
    let mut nodes = vec![Node::Document];
    nodes.extend(parse_fragment(markdown));
    nodes.push(Node::Eof);
    nodes
}

/// Parse markdown into content events without document boundaries.
pub fn parse_fragment(markdown: &str) -> Vec<Node> {
    Parser::new_ext(markdown, parser_options())
        .map(|event| Node::Markdown(event.into_static()))
        .collect()
}

/// Format nodes as HTML text.
///
/// HTML blocks are written verbatim, one per line. Consecutive markdown
/// events are rendered together so that block structure spanning several
/// events (lists, tables) stays intact. Boundaries produce no output.
pub fn to_html<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> String {
    let mut out = String::new();
    let mut pending: Vec<Event<'static>> = Vec::new();

    for node in nodes {
        match node {
            Node::Markdown(event) => pending.push(event.clone()),
            Node::Html(block) => {
                flush(&mut out, &mut pending);
                out.push_str(&block.literal);
                if !block.literal.ends_with('\n') {
                    out.push('\n');
                }
            }
            Node::Document | Node::Eof => flush(&mut out, &mut pending),
        }
    }
    flush(&mut out, &mut pending);

    out
}

fn flush(out: &mut String, pending: &mut Vec<Event<'static>>) {
    if !pending.is_empty() {
        html::push_html(out, pending.drain(..));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Tag, TagEnd};

    #[test]
    fn test_parse_document_boundaries() {
        let nodes = parse_document("## Heading\n\nParagraph.");
        assert_eq!(nodes.first(), Some(&Node::Document));
        assert_eq!(nodes.last(), Some(&Node::Eof));
        assert!(nodes[1..nodes.len() - 1].iter().all(|n| !n.is_boundary()));
    }

    #[test]
    fn test_parse_fragment_has_no_boundaries() {
        let nodes = parse_fragment("# Header\n");
        assert!(matches!(
            nodes.first(),
            Some(Node::Markdown(Event::Start(Tag::Heading { .. })))
        ));
        assert!(matches!(
            nodes.last(),
            Some(Node::Markdown(Event::End(TagEnd::Heading(_))))
        ));
        assert!(nodes.iter().all(|n| !n.is_boundary()));
    }

    #[test]
    fn test_parse_empty_document() {
        assert_eq!(parse_document(""), vec![Node::Document, Node::Eof]);
    }

    #[test]
    fn test_to_html_mixes_blocks_and_markdown() {
        let mut nodes = vec![Node::Document, Node::markup("<body>")];
        nodes.extend(parse_fragment("## Heading\n\n- one\n- two\n"));
        nodes.push(Node::markup("</body>"));
        nodes.push(Node::Eof);

        assert_eq!(
            to_html(&nodes),
            "<body>\n<h2>Heading</h2>\n<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n</body>\n"
        );
    }

    #[test]
    fn test_to_html_keeps_literal_newlines() {
        let nodes = vec![Node::markup("# Header\n")];
        assert_eq!(to_html(&nodes), "# Header\n");
    }

    #[test]
    fn test_to_html_renders_gfm_tables() {
        let nodes = parse_document("| a |\n|---|\n| 1 |\n");
        let html = to_html(&nodes);
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }
}
