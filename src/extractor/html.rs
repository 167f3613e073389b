//! Email extraction over a parsed HTML document

use regex::Regex;
use scraper::{Html, Node, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::trace;

use crate::extractor::error::ExtractError;

/// Pattern matched against the flattened document text
pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Scheme prefix identifying an email link
pub const MAILTO_PREFIX: &str = "mailto:";

/// Elements whose text is never rendered
const HIDDEN_TEXT_ELEMENTS: [&str; 3] = ["script", "style", "template"];

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Extract the unique email addresses from an HTML document
///
/// Sources, merged by exact string equality:
///
/// * the target of every anchor whose `href` starts with `mailto:`, taken
///   verbatim after the prefix
/// * every non-overlapping [`EMAIL_PATTERN`] match in the visible document
///   text (script, style and template contents are skipped)
///
/// Parsing is lenient; broken markup is repaired by the parser rather than
/// rejected.
pub fn extract_emails_from_html(html: &str) -> Result<BTreeSet<String>, ExtractError> {
    let document = Html::parse_document(html);

    let anchor_selector = Selector::parse("a[href]")
        .map_err(|e| ExtractError::Parse(format!("Failed to parse anchor selector: {}", e)))?;

    let mut emails: BTreeSet<String> = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| href.strip_prefix(MAILTO_PREFIX))
        .map(String::from)
        .collect();
    trace!("{} mailto targets", emails.len());

    // Text nodes are joined without separators, so adjacent nodes can form a match.
    let text: String = document
        .root_element()
        .descendants()
        .filter(|node| !node.ancestors().any(|ancestor| is_hidden_element(ancestor.value())))
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect();
    emails.extend(
        EMAIL_REGEX
            .find_iter(&text)
            .map(|m| m.as_str().to_string()),
    );

    Ok(emails)
}

fn is_hidden_element(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|element| HIDDEN_TEXT_ELEMENTS.contains(&element.name()))
}
