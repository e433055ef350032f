/*!
 * Byte-offset HTML tag scanner.
 *
 * The translation pipeline must never re-serialize markup it does not own,
 * so instead of building a DOM this scanner walks the source and reports the
 * exact byte span of every tag, comment and declaration. Callers splice the
 * original text around those spans, which keeps everything else byte-identical.
 */

use std::ops::Range;

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text (no nested markup)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Kind of markup node found by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Opening tag, e.g. `<div class="x">`
    Open,
    /// Closing tag, e.g. `</div>`
    Close,
    /// `<!-- ... -->`
    Comment,
    /// `<!DOCTYPE ...>`
    Doctype,
    /// Any other declaration or processing instruction (`<![CDATA[`, `<?xml`)
    Other,
}

/// A single markup node with its location in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node kind
    pub kind: NodeKind,
    /// Lowercased tag name, empty for comments and declarations
    pub name: String,
    /// Byte span of the whole node, `<` through `>`
    pub span: Range<usize>,
    /// Byte span of the raw attribute text of an opening tag
    pub attrs: Range<usize>,
    /// Whether the opening tag ends with `/>`
    pub self_closing: bool,
}

impl Node {
    /// Source text of the node
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.span.clone()]
    }

    /// Whether this is an opening tag with the given name
    pub fn is_open(&self, name: &str) -> bool {
        self.kind == NodeKind::Open && self.name == name
    }

    /// Whether this is a closing tag with the given name
    pub fn is_close(&self, name: &str) -> bool {
        self.kind == NodeKind::Close && self.name == name
    }

    /// Whether the element can have no content
    pub fn is_void(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Parsed attributes of an opening tag
    pub fn attributes(&self, src: &str) -> Vec<Attribute> {
        if self.kind != NodeKind::Open {
            return Vec::new();
        }
        parse_attributes(src, self.attrs.clone())
    }

    /// Look up a single attribute by (case-insensitive) name
    pub fn attr(&self, src: &str, name: &str) -> Option<Attribute> {
        self.attributes(src)
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn class_list(&self, src: &str) -> Vec<String> {
        self.attr(src, "class")
            .and_then(|a| a.value)
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// An attribute of an opening tag, value kept exactly as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name
    pub name: String,
    /// Raw (undecoded) value, `None` for bare attributes
    pub value: Option<String>,
    /// Absolute byte span of the value, quotes excluded
    pub value_span: Option<Range<usize>>,
    /// Quote character around the value, if any
    pub quote: Option<char>,
    /// Absolute byte span of the whole `name=value` text
    pub span: Range<usize>,
}

/// Iterator over the markup nodes of a source string
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    pending_raw: Option<String>,
}

impl<'a> Scanner<'a> {
    /// Scan from the beginning of `src`
    pub fn new(src: &'a str) -> Self {
        Self::at(src, 0)
    }

    /// Scan from an arbitrary byte offset
    pub fn at(src: &'a str, pos: usize) -> Self {
        Self {
            src,
            pos: pos.min(src.len()),
            pending_raw: None,
        }
    }

    /// Scan the content that follows `node`, honouring raw-text elements
    pub fn after(src: &'a str, node: &Node) -> Self {
        let mut scanner = Self::at(src, node.span.end);
        if node.kind == NodeKind::Open && !node.self_closing && is_raw_text(&node.name) {
            scanner.pending_raw = Some(node.name.clone());
        }
        scanner
    }
}

impl Iterator for Scanner<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let bytes = self.src.as_bytes();
        let len = bytes.len();

        if let Some(name) = self.pending_raw.take() {
            let needle = format!("</{}", name);
            self.pos = find_ci(bytes, self.pos, needle.as_bytes()).unwrap_or(len);
        }

        loop {
            let lt = self.pos + bytes.get(self.pos..)?.iter().position(|&b| b == b'<')?;
            let rest = &bytes[lt..];

            if rest.starts_with(b"<!--") {
                let end = find(bytes, lt + 4, b"-->").map_or(len, |p| p + 3);
                self.pos = end;
                return Some(Node::bare(NodeKind::Comment, lt..end));
            }

            if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
                let end = bytes[lt..]
                    .iter()
                    .position(|&b| b == b'>')
                    .map_or(len, |p| lt + p + 1);
                self.pos = end;
                let kind = if rest.len() >= 9 && rest[..9].eq_ignore_ascii_case(b"<!doctype") {
                    NodeKind::Doctype
                } else {
                    NodeKind::Other
                };
                return Some(Node::bare(kind, lt..end));
            }

            let (kind, name_start) = if rest.starts_with(b"</") {
                (NodeKind::Close, lt + 2)
            } else {
                (NodeKind::Open, lt + 1)
            };

            if name_start >= len || !bytes[name_start].is_ascii_alphabetic() {
                // A stray '<' in text
                self.pos = lt + 1;
                continue;
            }

            let mut name_end = name_start;
            while name_end < len && is_name_byte(bytes[name_end]) {
                name_end += 1;
            }
            let name = self.src[name_start..name_end].to_ascii_lowercase();

            let end = tag_end(bytes, name_end);
            let mut attrs_end = if end > name_end && bytes[end - 1] == b'>' {
                end - 1
            } else {
                end
            };

            let mut self_closing = false;
            if kind == NodeKind::Open && attrs_end > name_end && bytes[attrs_end - 1] == b'/' {
                self_closing = true;
                attrs_end -= 1;
            }

            self.pos = end;
            if kind == NodeKind::Open && !self_closing && is_raw_text(&name) {
                self.pending_raw = Some(name.clone());
            }

            return Some(Node {
                kind,
                name,
                span: lt..end,
                attrs: if kind == NodeKind::Open {
                    name_end..attrs_end
                } else {
                    end..end
                },
                self_closing,
            });
        }
    }
}

impl Node {
    fn bare(kind: NodeKind, span: Range<usize>) -> Self {
        let end = span.end;
        Self {
            kind,
            name: String::new(),
            span,
            attrs: end..end,
            self_closing: false,
        }
    }
}

/// Find the first opening tag named `name` at or after `from`
pub fn find_open(src: &str, from: usize, name: &str) -> Option<Node> {
    Scanner::at(src, from).find(|n| n.is_open(name))
}

/// Byte offset just past the closing tag matching `open`.
///
/// Returns `None` when the element is never closed. Void and self-closing
/// elements end where their opening tag ends.
pub fn element_end(src: &str, open: &Node) -> Option<usize> {
    if open.is_void() {
        return Some(open.span.end);
    }

    let mut depth = 0usize;
    for node in Scanner::after(src, open) {
        if node.is_open(&open.name) && !node.self_closing {
            depth += 1;
        } else if node.is_close(&open.name) {
            if depth == 0 {
                return Some(node.span.end);
            }
            depth -= 1;
        }
    }
    None
}

/// Byte offset where the content of `open` ends (start of its closing tag)
pub fn content_end(src: &str, open: &Node) -> Option<usize> {
    let end = element_end(src, open)?;
    if open.is_void() {
        return Some(end);
    }
    Some(src[..end].rfind("</").unwrap_or(end))
}

fn parse_attributes(src: &str, range: Range<usize>) -> Vec<Attribute> {
    let bytes = src.as_bytes();
    let end = range.end.min(bytes.len());
    let mut i = range.start;
    let mut attrs = Vec::new();

    while i < end {
        while i < end && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= end {
            break;
        }

        let start = i;
        while i < end && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' && bytes[i] != b'/' {
            i += 1;
        }
        if i == start {
            // Lone '=' or similar junk
            i += 1;
            continue;
        }
        let name = src[start..i].to_ascii_lowercase();

        let mut j = i;
        while j < end && bytes[j].is_ascii_whitespace() {
            j += 1;
        }

        if j < end && bytes[j] == b'=' {
            j += 1;
            while j < end && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            let (value_span, quote, next) = if j < end && (bytes[j] == b'"' || bytes[j] == b'\'') {
                let q = bytes[j];
                let value_start = j + 1;
                let value_end = bytes[value_start..end]
                    .iter()
                    .position(|&b| b == q)
                    .map_or(end, |p| value_start + p);
                (value_start..value_end, Some(q as char), (value_end + 1).min(end))
            } else {
                let value_start = j;
                let mut value_end = j;
                while value_end < end && !bytes[value_end].is_ascii_whitespace() {
                    value_end += 1;
                }
                (value_start..value_end, None, value_end)
            };
            attrs.push(Attribute {
                name,
                value: Some(src[value_span.clone()].to_string()),
                value_span: Some(value_span),
                quote,
                span: start..next,
            });
            i = next;
        } else {
            attrs.push(Attribute {
                name,
                value: None,
                value_span: None,
                quote: None,
                span: start..i,
            });
        }
    }

    attrs
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'_' | b'.')
}

/// Index just past the `>` that ends a tag, skipping quoted attribute values
fn tag_end(bytes: &[u8], from: usize) -> usize {
    let mut quote: Option<u8> = None;
    let mut last_significant = 0u8;

    for (offset, &b) in bytes[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => {
                if (b == b'"' || b == b'\'') && last_significant == b'=' {
                    quote = Some(b);
                } else if b == b'>' {
                    return from + offset + 1;
                }
                if !b.is_ascii_whitespace() {
                    last_significant = b;
                }
            }
        }
    }
    bytes.len()
}

fn find(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn find_ci(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|p| from + p)
}
