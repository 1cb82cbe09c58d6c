//! HTML → text extraction.
//!
//! Output is `"<title> <visible text>"`, whitespace-collapsed and trimmed.
//! Parsing is html5ever-permissive, so malformed markup degrades to
//! whatever text the parser recovers instead of failing.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Elements whose text content is never counted. `<noscript>` text is.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

static TITLE_SELECTOR: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("title").ok());

/// Text extracted from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    /// Content of the first `<title>`, empty if absent
    pub title: String,
    /// Visible text nodes joined by single spaces
    pub body: String,
}

impl PageText {
    /// Title and text as one string, the form the classifier consumes.
    pub fn combined(&self) -> String {
        normalize_whitespace(&format!("{} {}", self.title, self.body))
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }
}

/// Parse `html` and collect its title and visible text.
pub fn extract_page_text(html: &str) -> PageText {
    let document = Html::parse_document(html);
    PageText {
        title: extract_title(&document),
        body: visible_text(&document),
    }
}

/// Convenience wrapper returning the combined string.
pub fn extract_text(html: &str) -> String {
    extract_page_text(html).combined()
}

fn extract_title(document: &Html) -> String {
    let Some(selector) = TITLE_SELECTOR.as_ref() else {
        return String::new();
    };
    document
        .select(selector)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|e| HIDDEN_ELEMENTS.contains(&e.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    normalize_whitespace(&parts.join(" "))
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Category, score};

    #[test]
    fn title_then_text() {
        let html = r#"
            <html>
                <head><title>  Nhà cái   uy tín </title></head>
                <body><h1>Casino</h1><p>Chơi   baccarat
                ngay</p></body>
            </html>
        "#;
        let page = extract_page_text(html);
        assert_eq!(page.title, "Nhà cái uy tín");
        assert!(page.body.contains("Casino Chơi baccarat ngay"));
        assert!(page.combined().starts_with("Nhà cái uy tín "));
    }

    #[test]
    fn hidden_elements_are_skipped() {
        let html = r#"
            <html><head>
              <style>.casino { color: red }</style>
              <script>var poker = 1;</script>
            </head>
            <body><p>hello</p><template><p>poker</p></template></body></html>
        "#;
        let text = extract_text(html);
        assert_eq!(text, "hello");
    }

    #[test]
    fn noscript_text_is_kept() {
        let html = "<html><body><p>hello</p><noscript>enable js for slot</noscript></body></html>";
        assert_eq!(extract_text(html), "hello enable js for slot");
    }

    #[test]
    fn title_is_counted_twice() {
        let page = extract_page_text("<html><head><title>casino</title></head><body></body></html>");
        assert_eq!(page.title, "casino");
        assert_eq!(page.body, "casino");
        assert_eq!(page.combined(), "casino casino");
        assert_eq!(score(&page.combined()).get(Category::Gambling), 2);
    }

    #[test]
    fn missing_title_leaves_no_leading_space() {
        let text = extract_text("<html><body><p>only body</p></body></html>");
        assert_eq!(text, "only body");
    }

    #[test]
    fn malformed_html_degrades_gracefully() {
        let text = extract_text("<div><p>unclosed <b>bold <i>text");
        assert_eq!(text, "unclosed bold text");
    }

    #[test]
    fn empty_document_is_empty() {
        let page = extract_page_text("<html><head></head><body>   </body></html>");
        assert!(page.is_empty());
        assert_eq!(page.combined(), "");
    }

    #[test]
    fn plain_text_input_passes_through() {
        assert_eq!(extract_text("just some words"), "just some words");
    }
}
