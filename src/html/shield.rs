/*!
 * Placeholder shielding of non-translatable markup.
 *
 * Rendered math (`<mjx-container>`) must survive translation byte for byte.
 * Before the body is sent out, each container is swapped for a small marker
 * element carrying a sequential token; after translation the markers are
 * swapped back by token lookup, so restoration does not depend on the
 * translator keeping the markers in place.
 *
 * The `PlaceholderMap` is a plain value owned by the caller for the duration
 * of one document. It is never shared between documents.
 */

use std::collections::HashMap;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::scanner::{element_end, NodeKind, Scanner};
use super::splice;

/// Prefix of every placeholder token
pub const PLACEHOLDER_PREFIX: &str = "MATH_PLACEHOLDER_";

/// Attribute carrying the token on the marker element
pub const PLACEHOLDER_ATTR: &str = "data-math-placeholder";

/// Element name of rendered math containers
pub const MATH_CONTAINER: &str = "mjx-container";

/// Matches a marker element, or a bare token the translator unwrapped.
///
/// A marker's content is plain text. When its `</span>` went missing only the
/// opening tag and an adjacent token are consumed, never the following markup.
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<span\b[^>]*?\bdata-math-placeholder\s*=\s*["']?(MATH_PLACEHOLDER_[0-9]+)["']?[^>]*>(?:[^<]*</span>|\s*MATH_PLACEHOLDER_[0-9]+)?|(MATH_PLACEHOLDER_[0-9]+)"#,
    )
    .expect("Invalid placeholder regex")
});

/// Token → original markup for one document
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PlaceholderMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Record `markup` under the next sequential token and return the token
    pub fn insert(&mut self, markup: impl Into<String>) -> String {
        let token = placeholder_token(self.entries.len());
        self.index.insert(token.clone(), self.entries.len());
        self.entries.push((token.clone(), markup.into()));
        token
    }

    /// Original markup recorded for `token`
    pub fn get(&self, token: &str) -> Option<&str> {
        self.index
            .get(token)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Number of recorded placeholders
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no placeholders were recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens in the order they were assigned
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// `(token, markup)` pairs in the order they were assigned
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, m)| (t.as_str(), m.as_str()))
    }
}

/// Token for the given sequence number
pub fn placeholder_token(seq: usize) -> String {
    format!("{}{:03}", PLACEHOLDER_PREFIX, seq)
}

/// Marker element that stands in for a shielded container
pub fn placeholder_marker(token: &str) -> String {
    format!(r#"<span {}="{}">{}</span>"#, PLACEHOLDER_ATTR, token, token)
}

/// Remove every HTML comment from a fragment
pub fn strip_comments(fragment: &str) -> String {
    let edits: Vec<_> = Scanner::new(fragment)
        .filter(|n| n.kind == NodeKind::Comment)
        .map(|n| (n.span, String::new()))
        .collect();

    if edits.is_empty() {
        return fragment.to_string();
    }
    debug!("Removing {} comments", edits.len());
    splice(fragment, edits)
}

/// Strip comments from `body` and replace math containers with placeholders.
///
/// `map` is cleared first and then filled in document order.
pub fn shield(body: &str, map: &mut PlaceholderMap) -> String {
    map.clear();

    let src = strip_comments(body);
    let mut edits = Vec::new();
    let mut scanner = Scanner::new(&src);

    while let Some(node) = scanner.next() {
        if !node.is_open(MATH_CONTAINER) {
            continue;
        }
        let end = element_end(&src, &node).unwrap_or(src.len());
        let token = map.insert(&src[node.span.start..end]);
        edits.push((node.span.start..end, placeholder_marker(&token)));
        // Nested containers belong to the outer one
        scanner = Scanner::at(&src, end);
    }

    info!("Extracted {} math containers", map.len());
    splice(&src, edits)
}

/// Outcome of putting shielded markup back
#[derive(Debug, Clone, Default)]
pub struct Restoration {
    /// Body with placeholders replaced by their original markup
    pub html: String,
    /// Number of placeholders restored
    pub restored: usize,
    /// Tokens found in the text that have no map entry (left as literal text)
    pub unknown: Vec<String>,
    /// Map tokens that never appeared in the text
    pub missing: Vec<String>,
    /// Map tokens that appeared more than once
    pub duplicated: Vec<String>,
}

impl Restoration {
    /// Whether every token came back exactly once
    pub fn is_complete(&self) -> bool {
        self.unknown.is_empty() && self.missing.is_empty() && self.duplicated.is_empty()
    }
}

/// Replace every marker (or bare token) in `translated` with its recorded markup.
///
/// Unknown tokens are left untouched as literal text.
pub fn restore(translated: &str, map: &PlaceholderMap) -> Restoration {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut unknown = Vec::new();

    let html = PLACEHOLDER_RE
        .replace_all(translated, |caps: &Captures| {
            let token = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match map.get(token) {
                Some(markup) => {
                    *seen.entry(token.to_string()).or_insert(0) += 1;
                    markup.to_string()
                }
                None => {
                    unknown.push(token.to_string());
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    let missing: Vec<String> = map
        .tokens()
        .filter(|t| !seen.contains_key(*t))
        .map(str::to_string)
        .collect();
    let mut duplicated: Vec<String> = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(t, _)| t.clone())
        .collect();
    duplicated.sort();

    for token in &unknown {
        warn!("Placeholder {} has no recorded markup, leaving it as text", token);
    }
    if !missing.is_empty() {
        warn!("Placeholders lost in translation: {}", missing.join(", "));
    }
    if !duplicated.is_empty() {
        warn!("Placeholders duplicated in translation: {}", duplicated.join(", "));
    }

    let restored = seen.values().sum();
    info!("Restored {} math containers", restored);

    Restoration {
        html,
        restored,
        unknown,
        missing,
        duplicated,
    }
}
