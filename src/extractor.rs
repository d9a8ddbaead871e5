//! Host page context extraction
//!
//! Reads the problem statement, the user's in-progress code, and the
//! declared language out of a coding-problem page. The DOM coupling is
//! inherently brittle (string-matched CSS selectors against a third-party
//! site's markup), so the engine only depends on the `ContextExtractor`
//! trait; `DomExtractor` is the single HTML-backed implementation and
//! tests substitute fixed-value fakes.

use scraper::{Html, Selector};

use crate::error::{CoachError, Result};

/// Sentinel language when the page exposes no usable selector control
pub const UNKNOWN_LANGUAGE: &str = "UNKNOWN";

/// Fallback problem statement when the page carries no description metadata
const PROBLEM_STATEMENT_PLACEHOLDER: &str = "(problem statement unavailable)";

/// Per-turn situational context read from the hosting page. Derived fresh
/// on every turn, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub problem_statement: String,
    pub programming_language: String,
    pub user_code: String,
}

/// Read-only view of the hosting page
pub trait ContextExtractor: Send + Sync {
    fn extract(&self) -> SessionContext;
}

/// CSS selectors for one supported host page
#[derive(Debug, Clone)]
pub struct PageSelectors {
    /// The editor's per-line rendering unit
    pub code_line: String,
    /// The language-selector control
    pub language_label: String,
    /// Page metadata element carrying the problem statement
    pub problem_statement: String,
}

impl PageSelectors {
    /// Selector profile for LeetCode-style problem pages (Monaco editor)
    pub fn leetcode() -> Self {
        Self {
            code_line: ".view-line".into(),
            language_label: "button[id^=headlessui-listbox-button]".into(),
            problem_statement: "meta[name=description]".into(),
        }
    }
}

/// HTML-backed extractor over a page snapshot
pub struct DomExtractor {
    html: String,
    code_line: Selector,
    language_label: Selector,
    problem_statement: Selector,
}

impl DomExtractor {
    /// Build an extractor for a page snapshot. Fails only on invalid
    /// selectors; a page that matches nothing is not an error.
    pub fn new(html: impl Into<String>, selectors: &PageSelectors) -> Result<Self> {
        Ok(Self {
            html: html.into(),
            code_line: parse_selector(&selectors.code_line)?,
            language_label: parse_selector(&selectors.language_label)?,
            problem_statement: parse_selector(&selectors.problem_statement)?,
        })
    }
}

fn parse_selector(source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|_| CoachError::Selector(source.to_string()))
}

impl ContextExtractor for DomExtractor {
    fn extract(&self) -> SessionContext {
        let document = Html::parse_document(&self.html);

        // Visible text of every line element, DOM order, joined by newline.
        // Line text is kept verbatim; no matches means empty code.
        let user_code = document
            .select(&self.code_line)
            .map(|line| line.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");

        let programming_language = document
            .select(&self.language_label)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

        // Prefer the element's content attribute (meta description), fall
        // back to its text for hosts that render the statement inline.
        let problem_statement = document
            .select(&self.problem_statement)
            .next()
            .map(|el| match el.value().attr("content") {
                Some(content) => content.to_string(),
                None => el.text().collect::<String>().trim().to_string(),
            })
            .filter(|statement| !statement.is_empty())
            .unwrap_or_else(|| PROBLEM_STATEMENT_PLACEHOLDER.to_string());

        SessionContext {
            problem_statement,
            programming_language,
            user_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
        <head><meta name="description" content="Given an array, return the two indices."></head>
        <body>
            <button id="headlessui-listbox-button-:r1:">Python</button>
            <div class="editor">
                <div class="view-line">def f():</div>
                <div class="view-line">    pass</div>
            </div>
        </body>
        </html>
    "#;

    fn extractor(html: &str) -> DomExtractor {
        DomExtractor::new(html, &PageSelectors::leetcode()).unwrap()
    }

    #[test]
    fn test_extracts_code_lines_in_order() {
        let ctx = extractor(PAGE).extract();
        assert_eq!(ctx.user_code, "def f():\n    pass");
    }

    #[test]
    fn test_extracts_language_label() {
        let ctx = extractor(PAGE).extract();
        assert_eq!(ctx.programming_language, "Python");
    }

    #[test]
    fn test_extracts_problem_statement_from_meta() {
        let ctx = extractor(PAGE).extract();
        assert_eq!(ctx.problem_statement, "Given an array, return the two indices.");
    }

    #[test]
    fn test_no_code_lines_is_empty_not_error() {
        let ctx = extractor("<html><body></body></html>").extract();
        assert_eq!(ctx.user_code, "");
    }

    #[test]
    fn test_missing_language_control_yields_sentinel() {
        let ctx = extractor("<html><body><div class='view-line'>x</div></body></html>").extract();
        assert_eq!(ctx.programming_language, UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_empty_language_label_yields_sentinel() {
        let html = "<html><body><button id='headlessui-listbox-button-:r1:'></button></body></html>";
        let ctx = extractor(html).extract();
        assert_eq!(ctx.programming_language, UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_line_text_kept_verbatim() {
        let html = "<html><body><div class='view-line'>  indented  </div></body></html>";
        let ctx = extractor(html).extract();
        assert_eq!(ctx.user_code, "  indented  ");
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let selectors = PageSelectors {
            code_line: ":::".into(),
            ..PageSelectors::leetcode()
        };
        assert!(DomExtractor::new("<html></html>", &selectors).is_err());
    }
}
