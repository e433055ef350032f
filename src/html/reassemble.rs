/*!
 * Reassembly of a translated document.
 *
 * Puts shielded markup back, merges the translated title and description
 * into the original head, forces the target language on the root element and
 * concatenates the parts. A final best-effort pass repairs the artifacts
 * translators are known to leave in front of the markup.
 */

use log::{debug, warn};

use super::decompose::{DecomposedParts, DEFAULT_DOCTYPE};
use super::scanner::{content_end, find_open, Scanner};
use super::shield::{restore, PlaceholderMap, Restoration};
use super::{escape_attr, escape_text, splice};

/// A reassembled document together with the placeholder audit
#[derive(Debug, Clone)]
pub struct Reassembled {
    /// Complete HTML document
    pub html: String,
    /// Outcome of placeholder restoration
    pub restoration: Restoration,
}

/// Builds the final document for a target locale
#[derive(Debug, Clone)]
pub struct Reassembler {
    target_locale: String,
}

impl Reassembler {
    /// Create a reassembler that stamps `lang="<target_locale>"`
    pub fn new(target_locale: impl Into<String>) -> Self {
        Self {
            target_locale: target_locale.into(),
        }
    }

    /// Target locale written to the root element
    pub fn target_locale(&self) -> &str {
        &self.target_locale
    }

    /// Rebuild a document from its parts and a translated body.
    ///
    /// Empty or absent title/description leave the head as it was.
    pub fn reassemble(
        &self,
        parts: &DecomposedParts,
        translated_body: &str,
        map: &PlaceholderMap,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Reassembled {
        let body = clean_translated_body(translated_body);
        let restoration = restore(&body, map);

        let mut head = parts.head.clone();
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            head = inject_title(&head, title);
        }
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            head = inject_description(&head, description);
        }

        let root_attrs = force_lang(&parts.root_attrs, &self.target_locale);
        let doctype = if parts.doctype.trim().is_empty() {
            DEFAULT_DOCTYPE
        } else {
            parts.doctype.as_str()
        };

        let html = format!(
            "{}\n<html{}>\n{}\n{}\n</html>",
            doctype, root_attrs, head, restoration.html
        );

        Reassembled {
            html: repair_prefix(&html),
            restoration,
        }
    }
}

/// Replace the text of the head's `<title>`, creating the element if needed
pub fn inject_title(head: &str, title: &str) -> String {
    let escaped = escape_text(title);

    if let Some(open) = find_open(head, 0, "title") {
        if let Some(end) = content_end(head, &open) {
            return splice(head, vec![(open.span.end..end, escaped)]);
        }
    }

    let element = format!("<title>{}</title>", escaped);
    match find_open(head, 0, "head") {
        Some(open) => splice(head, vec![(open.span.end..open.span.end, element)]),
        None => format!("{}{}", element, head),
    }
}

/// Set the `content` of the description meta element, creating it if needed
pub fn inject_description(head: &str, description: &str) -> String {
    let content = format!(r#"content="{}""#, escape_attr(description));

    let meta = Scanner::new(head).find(|n| {
        n.is_open("meta")
            && n.attr(head, "name")
                .and_then(|a| a.value)
                .is_some_and(|v| v.eq_ignore_ascii_case("description"))
    });

    if let Some(meta) = meta {
        let edit = match meta.attr(head, "content") {
            Some(attr) => (attr.span, content),
            None => (meta.attrs.end..meta.attrs.end, format!(" {}", content)),
        };
        return splice(head, vec![edit]);
    }

    let element = format!(r#"<meta name="description" {}>"#, content);
    let insert_at = find_open(head, 0, "head")
        .and_then(|open| content_end(head, &open))
        .unwrap_or(head.len());
    splice(head, vec![(insert_at..insert_at, element)])
}

/// Set `lang` on the root attribute text, replacing any existing value
pub fn force_lang(root_attrs: &str, locale: &str) -> String {
    let lang = format!(r#"lang="{}""#, escape_attr(locale));
    let tag = format!("<html{}>", root_attrs);

    let existing = Scanner::new(&tag)
        .next()
        .and_then(|node| node.attr(&tag, "lang"));

    match existing {
        Some(attr) => {
            let rewritten = splice(&tag, vec![(attr.span, lang)]);
            rewritten["<html".len()..rewritten.len() - 1].to_string()
        }
        None if root_attrs.trim().is_empty() => format!(" {}", lang),
        None => format!("{} {}", root_attrs.trim_end(), lang),
    }
}

/// Drop artifacts a translator may wrap around the body markup.
///
/// Removes a surrounding code fence and plain text in front of the markup.
pub fn clean_translated_body(body: &str) -> String {
    let mut text = body.trim();

    if text.starts_with("```") {
        debug!("Removing code fence around translated body");
        text = text.split_once('\n').map_or("", |(_, rest)| rest);
        text = text.trim_end();
        if let Some(stripped) = text.strip_suffix("```") {
            text = stripped.trim_end();
        }
    }

    strip_stray_first_line(text).to_string()
}

/// Repair the start of a complete document.
///
/// Plain text in front of the first line's markup is dropped (the whole line
/// when it holds no markup); a doctype is added when none remains.
pub fn repair_prefix(html: &str) -> String {
    let repaired = strip_stray_first_line(html);

    let has_doctype = repaired
        .lines()
        .any(|line| line.trim_start().to_ascii_uppercase().starts_with("<!DOCTYPE"));

    if has_doctype {
        repaired.to_string()
    } else {
        warn!("Document has no doctype, adding {}", DEFAULT_DOCTYPE);
        format!("{}\n{}", DEFAULT_DOCTYPE, repaired)
    }
}

fn strip_stray_first_line(text: &str) -> &str {
    let first = text.split_once('\n').map_or(text, |(first, _)| first);
    let trimmed = first.trim();

    // A doctype starts with '<' as well, so it is never stripped
    if trimmed.is_empty() || trimmed.starts_with('<') {
        return text;
    }

    // Text sharing its line with markup loses only the part before the markup
    let cut = first.find('<').unwrap_or_else(|| (first.len() + 1).min(text.len()));
    warn!("Removing stray text before markup: '{}'", text[..cut].trim());
    &text[cut..]
}
