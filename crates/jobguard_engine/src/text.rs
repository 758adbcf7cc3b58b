//! Text collection from DOM subtrees, roughly what a browser's `innerText` gives.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Selector};

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "iframe", "svg"];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Non-empty, whitespace-collapsed lines of visible text under `element`.
pub fn element_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut builder = LineBuilder::default();
    collect(*element, &mut builder);
    builder.finish()
}

/// Visible text with one space between lines; for short fields like titles.
pub fn inline_text(element: ElementRef<'_>) -> String {
    element_lines(element).join(" ")
}

/// Visible text with line structure kept; for descriptions.
pub fn block_text(element: ElementRef<'_>) -> String {
    element_lines(element).join("\n")
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// First non-empty text among `selectors`, tried in order, inside `scope`.
pub fn first_text<'a, I>(scope: ElementRef<'_>, selectors: I, block: bool) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    selectors.into_iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        scope.select(&selector).find_map(|element| {
            let text = if block {
                block_text(element)
            } else {
                inline_text(element)
            };
            (!text.is_empty()).then_some(text)
        })
    })
}

fn collect(node: NodeRef<'_, Node>, builder: &mut LineBuilder) {
    match node.value() {
        Node::Text(text) => builder.push_text(text),
        Node::Element(element) => {
            let tag = element.name();
            if SKIPPED_TAGS.contains(&tag) {
                return;
            }
            if tag == "br" {
                builder.break_line();
                return;
            }
            let block = BLOCK_TAGS.contains(&tag);
            if block {
                builder.break_line();
            }
            for child in node.children() {
                collect(child, builder);
            }
            if block {
                builder.break_line();
            }
        }
        _ => {
            for child in node.children() {
                collect(child, builder);
            }
        }
    }
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<String>,
    current: String,
    pending_space: bool,
}

impl LineBuilder {
    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.pending_space = !self.current.is_empty();
            } else {
                if self.pending_space {
                    self.current.push(' ');
                    self.pending_space = false;
                }
                self.current.push(ch);
            }
        }
    }

    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.pending_space = false;
    }

    fn finish(mut self) -> Vec<String> {
        self.break_line();
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::{block_text, element_lines, first_text, inline_text};

    #[test]
    fn blocks_and_breaks_split_lines() {
        let html = Html::parse_fragment(
            "<div><h2>Title</h2><span>Acme</span> <span>Corp</span><br>Austin, TX<p>  Great   job </p></div>",
        );
        let root = html.root_element();
        assert_eq!(
            element_lines(root),
            vec!["Title", "Acme Corp", "Austin, TX", "Great job"]
        );
    }

    #[test]
    fn scripts_and_styles_are_invisible() {
        let html = Html::parse_document(
            "<html><head><style>p{}</style></head><body><p>Seen</p><script>var x = 1;</script></body></html>",
        );
        assert_eq!(block_text(html.root_element()), "Seen");
    }

    #[test]
    fn first_text_skips_empty_matches() {
        let html = Html::parse_document(
            r#"<body><h1 class="a"> </h1><h1 class="b">Real title</h1></body>"#,
        );
        let found = first_text(html.root_element(), ["h1.a", "h1.b"], false);
        assert_eq!(found.as_deref(), Some("Real title"));
        assert_eq!(inline_text(html.root_element()), "Real title");
    }

    #[test]
    fn invalid_selectors_are_ignored() {
        let html = Html::parse_document("<body><p>x</p></body>");
        assert_eq!(
            first_text(html.root_element(), ["p[[", "p"], false).as_deref(),
            Some("x")
        );
    }
}
