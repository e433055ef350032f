/*!
 * Provenance header for translated pages.
 *
 * Adds a block naming the source article and the translator as the first
 * child of the article container. The block carries the `translation-info`
 * class; a page that already contains it is left alone, so annotating is
 * idempotent.
 */

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use std::path::Path;

use crate::app_config::ProvenanceConfig;
use crate::file_utils::FileManager;
use crate::html::scanner::{find_open, Node, NodeKind, Scanner};
use crate::html::{escape_attr, escape_text, splice};
use crate::localize::UrlMapping;

/// Marker class of the provenance block
pub const SENTINEL: &str = "translation-info";

/// Where the block goes: right after the opening tag of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Byte offset just after the container's opening tag
    pub offset: usize,
    /// Name of the container element
    pub container: String,
}

impl InsertionPoint {
    fn inside(node: &Node) -> Self {
        Self {
            offset: node.span.end,
            container: node.name.clone(),
        }
    }
}

/// Finds the container that receives the provenance block
pub trait InsertionStrategy: Send + Sync {
    /// Short description for logs
    fn name(&self) -> String;

    /// First matching container of `html`, if any
    fn locate(&self, html: &str) -> Option<InsertionPoint>;
}

/// Element whose class attribute is exactly a given string
#[derive(Debug, Clone)]
pub struct ExactClass {
    tag: String,
    class: String,
}

impl ExactClass {
    pub fn new(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: class.into(),
        }
    }
}

impl InsertionStrategy for ExactClass {
    fn name(&self) -> String {
        format!("<{} class=\"{}\">", self.tag, self.class)
    }

    fn locate(&self, html: &str) -> Option<InsertionPoint> {
        Scanner::new(html)
            .find(|n| {
                n.is_open(&self.tag)
                    && n.attr(html, "class")
                        .and_then(|a| a.value)
                        .is_some_and(|v| v.trim() == self.class)
            })
            .map(|n| InsertionPoint::inside(&n))
    }
}

/// Element whose class list contains every given token
#[derive(Debug, Clone)]
pub struct ClassTokens {
    tag: String,
    tokens: Vec<String>,
}

impl ClassTokens {
    pub fn new(tag: impl Into<String>, tokens: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl InsertionStrategy for ClassTokens {
    fn name(&self) -> String {
        format!("<{}> with classes {}", self.tag, self.tokens.join(", "))
    }

    fn locate(&self, html: &str) -> Option<InsertionPoint> {
        Scanner::new(html)
            .find(|n| {
                if !n.is_open(&self.tag) {
                    return false;
                }
                let classes = n.class_list(html);
                self.tokens.iter().all(|t| classes.contains(t))
            })
            .map(|n| InsertionPoint::inside(&n))
    }
}

/// Parent element of the first element with a given name.
///
/// A child with no open ancestor belongs to the document itself; the block
/// then goes inside `<body>`, or at the very start when there is none.
#[derive(Debug, Clone)]
pub struct ParentOf {
    child: String,
}

impl ParentOf {
    pub fn new(child: impl Into<String>) -> Self {
        Self { child: child.into() }
    }
}

impl InsertionStrategy for ParentOf {
    fn name(&self) -> String {
        format!("parent of <{}>", self.child)
    }

    fn locate(&self, html: &str) -> Option<InsertionPoint> {
        let mut open: Vec<Node> = Vec::new();

        for node in Scanner::new(html) {
            match node.kind {
                NodeKind::Open => {
                    if node.name == self.child {
                        return Some(open.last().map_or_else(|| document_root(html), InsertionPoint::inside));
                    }
                    if !node.is_void() {
                        open.push(node);
                    }
                }
                NodeKind::Close => {
                    // Unmatched closing tags are ignored
                    if let Some(pos) = open.iter().rposition(|n| n.name == node.name) {
                        open.truncate(pos);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

fn document_root(html: &str) -> InsertionPoint {
    match find_open(html, 0, "body") {
        Some(body) => InsertionPoint::inside(&body),
        None => InsertionPoint {
            offset: 0,
            container: "document".to_string(),
        },
    }
}

/// Strategies in the order they are tried
pub fn default_strategies() -> Vec<Box<dyn InsertionStrategy>> {
    vec![
        Box::new(ExactClass::new("div", "post distill")),
        Box::new(ClassTokens::new("div", &["post", "distill"])),
        Box::new(ParentOf::new("d-title")),
    ]
}

/// Result of annotating one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotateOutcome {
    /// The block was inserted
    Annotated {
        /// Annotated document
        html: String,
        /// Strategy that found the container
        strategy: String,
    },
    /// The page already carries the block
    AlreadyAnnotated,
    /// The page has no known source URL
    NoSourceUrl,
    /// No strategy found a container
    NoInsertionPoint,
}

/// Counts of an annotation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Pages examined
    pub files_processed: usize,
    /// Pages that received the block
    pub annotated: usize,
    /// Pages already annotated or without a source URL
    pub skipped: usize,
    /// Pages without an insertion point or that could not be read or written
    pub failed: usize,
}

/// Inserts provenance blocks into translated pages
pub struct ProvenanceAnnotator {
    config: ProvenanceConfig,
    strategies: Vec<Box<dyn InsertionStrategy>>,
}

impl ProvenanceAnnotator {
    pub fn new(config: &ProvenanceConfig) -> Self {
        Self {
            config: config.clone(),
            strategies: default_strategies(),
        }
    }

    /// Replace the insertion strategies
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn InsertionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// The provenance block for a source URL
    pub fn header_html(&self, source_url: &str) -> String {
        let mut block = format!(
            r#"<div class="{sentinel} base-grid" style="margin-bottom: 20px;"><div style="grid-column: text; display: flex; align-items: center; justify-content: space-between; padding: 16px 0; border-bottom: 1px solid rgba(0,0,0,0.15); line-height: 1.5;"><div style="display: flex; flex-direction: column; gap: 8px;"><div><span style="font-weight: 600;">{source_label}</span> <a href="{href}" target="_blank" rel="noopener noreferrer">{url_text}</a></div><div><span style="font-weight: 600;">{translator_label}</span> <span>{translator}</span></div></div>"#,
            sentinel = SENTINEL,
            source_label = escape_text(&self.config.source_label),
            href = escape_attr(source_url),
            url_text = escape_text(source_url),
            translator_label = escape_text(&self.config.translator_label),
            translator = escape_text(&self.config.translator_name),
        );

        if let Some(image) = self.config.qr_image_url.as_deref().filter(|u| !u.is_empty()) {
            let caption = self.config.qr_caption.as_deref().unwrap_or_default();
            block.push_str(&format!(
                r#"<div style="flex-shrink: 0; display: flex; flex-direction: column; align-items: center; gap: 6px; margin-left: 20px;"><img src="{}" alt="{}" style="width: 80px; height: 80px; border-radius: 6px;" loading="lazy"><span style="font-size: 12px;">{}</span></div>"#,
                escape_attr(image),
                escape_attr(caption),
                escape_text(caption),
            ));
        }

        block.push_str("</div></div>");
        block
    }

    /// Annotate a document in memory
    pub fn annotate(&self, html: &str, source_url: &str) -> AnnotateOutcome {
        if html.contains(SENTINEL) {
            return AnnotateOutcome::AlreadyAnnotated;
        }

        for strategy in &self.strategies {
            if let Some(point) = strategy.locate(html) {
                debug!("Inserting provenance into <{}> found by {}", point.container, strategy.name());
                let header = self.header_html(source_url);
                return AnnotateOutcome::Annotated {
                    html: splice(html, vec![(point.offset..point.offset, header)]),
                    strategy: strategy.name(),
                };
            }
        }

        AnnotateOutcome::NoInsertionPoint
    }

    /// Annotate one file in place, looking up its source URL in `mapping`
    pub fn annotate_file<P: AsRef<Path>>(&self, path: P, mapping: &UrlMapping) -> Result<AnnotateOutcome> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Path has no file name: {:?}", path))?;

        let html = FileManager::read_to_string(path)?;
        if html.contains(SENTINEL) {
            info!("{}: already annotated, skipping", filename);
            return Ok(AnnotateOutcome::AlreadyAnnotated);
        }

        let Some(source_url) = mapping.source_url(&filename) else {
            warn!("{}: no source URL in the manifest, skipping", filename);
            return Ok(AnnotateOutcome::NoSourceUrl);
        };

        let outcome = self.annotate(&html, source_url);
        match &outcome {
            AnnotateOutcome::Annotated { html, strategy } => {
                FileManager::write_atomic(path, html)?;
                info!("{}: provenance added ({})", filename, strategy);
            }
            AnnotateOutcome::NoInsertionPoint => {
                error!("{}: no insertion point found", filename);
            }
            _ => {}
        }

        Ok(outcome)
    }

    /// Annotate every page of a directory
    pub fn process_directory<P: AsRef<Path>>(&self, dir: P, mapping: &UrlMapping) -> Result<AnnotateStats> {
        let mut stats = AnnotateStats::default();

        for file in FileManager::find_files(dir, "html")? {
            stats.files_processed += 1;
            match self.annotate_file(&file, mapping) {
                Ok(AnnotateOutcome::Annotated { .. }) => stats.annotated += 1,
                Ok(AnnotateOutcome::AlreadyAnnotated) | Ok(AnnotateOutcome::NoSourceUrl) => {
                    stats.skipped += 1
                }
                Ok(AnnotateOutcome::NoInsertionPoint) => stats.failed += 1,
                Err(e) => {
                    error!("Error annotating {:?}: {:#}", file, e);
                    stats.failed += 1;
                }
            }
        }

        info!(
            "Annotation completed: {} pages, {} annotated, {} skipped, {} failed",
            stats.files_processed, stats.annotated, stats.skipped, stats.failed
        );
        Ok(stats)
    }
}
