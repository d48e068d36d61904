use crate::domain::ports::{LinkResolver, RichTextRenderer};
use pulldown_cmark::{html, Parser};

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Builds plain `<a>` tags. An empty target yields the bare label.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorLinkResolver;

impl LinkResolver for AnchorLinkResolver {
    fn resolve_link(&self, label: &str, target: &str, attributes: &[(&str, &str)]) -> String {
        let label = escape_html(label);
        let target = target.trim();
        if target.is_empty() {
            return label;
        }

        let mut tag = format!("<a href=\"{}\"", escape_html(target));
        for (name, value) in attributes {
            tag.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        tag.push('>');
        tag.push_str(&label);
        tag.push_str("</a>");
        tag
    }
}

/// Renders editor copy written in Markdown to HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl RichTextRenderer for MarkdownRenderer {
    fn render(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }
        let parser = Parser::new(raw);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output.trim_end().to_string()
    }
}
