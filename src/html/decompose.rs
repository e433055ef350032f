/*!
 * Document decomposition.
 *
 * Splits a fetched page into the pieces the translator works with. The head
 * and body fragments are verbatim slices of the input so that reassembly
 * never disturbs markup the translator did not touch. Decomposition never
 * fails: upstream fetches can be partially malformed, so absent parts degrade
 * to empty defaults.
 */

use log::debug;
use scraper::{Html, Selector};
use serde::Serialize;

use super::scanner::{element_end, find_open, NodeKind, Scanner};

/// Doctype used when a page declares none
pub const DEFAULT_DOCTYPE: &str = "<!DOCTYPE html>";

/// Head fragment used when a page has no `<head>`
pub const EMPTY_HEAD: &str = "<head></head>";

/// Body fragment used when a page has no `<body>`
pub const EMPTY_BODY: &str = "<body></body>";

/// The parts of an HTML document relevant to translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecomposedParts {
    /// Document type declaration, verbatim
    pub doctype: String,
    /// Raw attribute text of the `<html>` tag, with a leading space when non-empty
    pub root_attrs: String,
    /// `<head>...</head>` fragment
    pub head: String,
    /// `<body>...</body>` fragment
    pub body: String,
    /// Decoded text of the page title
    pub title: String,
    /// Decoded content of the description meta element
    pub description: String,
}

/// Decompose a raw HTML document
pub fn decompose(raw: &str) -> DecomposedParts {
    let doctype = Scanner::new(raw)
        .find(|n| n.kind == NodeKind::Doctype)
        .map(|n| n.text(raw).trim().to_string())
        .unwrap_or_else(|| DEFAULT_DOCTYPE.to_string());

    let root_attrs = find_open(raw, 0, "html")
        .map(|root| {
            let attrs = raw[root.attrs.clone()].trim();
            if attrs.is_empty() {
                String::new()
            } else {
                format!(" {}", attrs)
            }
        })
        .unwrap_or_default();

    let body_open = find_open(raw, 0, "body");

    let head = match find_open(raw, 0, "head") {
        Some(open) => {
            let end = element_end(raw, &open)
                .or_else(|| {
                    body_open
                        .as_ref()
                        .filter(|b| b.span.start > open.span.start)
                        .map(|b| b.span.start)
                })
                .unwrap_or(raw.len());
            raw[open.span.start..end].trim_end().to_string()
        }
        None => {
            debug!("Document has no <head>, using an empty one");
            EMPTY_HEAD.to_string()
        }
    };

    let body = match &body_open {
        Some(open) => {
            let end = element_end(raw, open)
                .or_else(|| {
                    Scanner::after(raw, open)
                        .find(|n| n.is_close("html"))
                        .map(|n| n.span.start)
                })
                .unwrap_or(raw.len());
            raw[open.span.start..end].trim_end().to_string()
        }
        None => {
            debug!("Document has no <body>, using an empty one");
            EMPTY_BODY.to_string()
        }
    };

    let (title, description) = extract_metadata(raw);

    DecomposedParts {
        doctype,
        root_attrs,
        head,
        body,
        title,
        description,
    }
}

/// Extract the decoded title and description text
fn extract_metadata(raw: &str) -> (String, String) {
    let document = Html::parse_document(raw);

    let title = ["head > title", "title"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>())
        })
        .unwrap_or_default();

    let description = Selector::parse(r#"meta[name="description"]"#)
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|el| el.value().attr("content").map(str::to_string))
        })
        .unwrap_or_default();

    (title, description)
}
