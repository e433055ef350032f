/*!
 * Rewrites absolute links to mirrored pages into local file links.
 *
 * Only `href` attribute values are replaced, in place, so the rest of the
 * document keeps its exact bytes and quoting. Links inside the provenance
 * block keep pointing at the source site.
 */

use anyhow::Result;
use log::{debug, error, info};
use std::path::Path;

use crate::file_utils::FileManager;
use crate::html::scanner::{element_end, NodeKind, Scanner};
use crate::html::splice;
use crate::provenance::SENTINEL;

use super::url_mapper::UrlMapping;

/// Link schemes that never point at a page
const NON_PAGE_SCHEMES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

/// Result of rewriting one document
#[derive(Debug, Clone, Default)]
pub struct RewriteResult {
    /// Rewritten document
    pub html: String,
    /// Links replaced by a local filename
    pub converted: usize,
    /// Site links without a local page
    pub skipped: usize,
}

/// Counts of a localization run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizeStats {
    /// Pages examined
    pub files_processed: usize,
    /// Pages written back
    pub files_modified: usize,
    /// Links converted
    pub links_converted: usize,
    /// Site links left unchanged
    pub links_skipped: usize,
    /// Pages that could not be read or written
    pub files_failed: usize,
}

/// Rewrites site links using a `UrlMapping`
pub struct LinkRewriter<'a> {
    mapping: &'a UrlMapping,
    base_domain: String,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(mapping: &'a UrlMapping, base_domain: impl Into<String>) -> Self {
        Self {
            mapping,
            base_domain: base_domain.into(),
        }
    }

    /// Whether `href` points into the mirrored site
    pub fn is_site_link(&self, href: &str) -> bool {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return false;
        }
        let lower = href.to_ascii_lowercase();
        if NON_PAGE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
            return false;
        }
        href.starts_with(&self.base_domain)
    }

    /// Rewrite the site links of a document
    pub fn rewrite(&self, html: &str) -> RewriteResult {
        let mut edits = Vec::new();
        let mut skipped = 0;
        let mut skip_until = 0;

        for node in Scanner::new(html).filter(|n| n.kind == NodeKind::Open) {
            if node.span.start < skip_until {
                continue;
            }
            // Provenance links keep pointing at the source page
            if node.class_list(html).iter().any(|c| c == SENTINEL) {
                skip_until = element_end(html, &node).unwrap_or(html.len());
                continue;
            }
            for attr in node.attributes(html) {
                if attr.name != "href" {
                    continue;
                }
                let (Some(value), Some(span)) = (attr.value, attr.value_span) else {
                    continue;
                };
                if !self.is_site_link(&value) {
                    continue;
                }

                match self.mapping.resolve(value.trim()) {
                    Some(filename) => {
                        debug!("Converting link {} -> {}", value, filename);
                        edits.push((span, filename.to_string()));
                    }
                    None => {
                        debug!("No local page for link {}", value);
                        skipped += 1;
                    }
                }
            }
        }

        let converted = edits.len();
        let html = if converted > 0 {
            splice(html, edits)
        } else {
            html.to_string()
        };

        RewriteResult {
            html,
            converted,
            skipped,
        }
    }

    /// Rewrite one file in place; it is written only when a link changed
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<RewriteResult> {
        let path = path.as_ref();
        let original = FileManager::read_to_string(path)?;
        let result = self.rewrite(&original);

        if result.converted > 0 {
            FileManager::write_atomic(path, &result.html)?;
            info!(
                "{:?}: converted {} links ({} left unchanged)",
                path.file_name().unwrap_or_default(),
                result.converted,
                result.skipped
            );
        }

        Ok(result)
    }

    /// Rewrite every page of a directory
    pub fn process_directory<P: AsRef<Path>>(&self, dir: P) -> Result<LocalizeStats> {
        let mut stats = LocalizeStats::default();

        for file in FileManager::find_files(dir, "html")? {
            stats.files_processed += 1;
            match self.process_file(&file) {
                Ok(result) => {
                    if result.converted > 0 {
                        stats.files_modified += 1;
                    }
                    stats.links_converted += result.converted;
                    stats.links_skipped += result.skipped;
                }
                Err(e) => {
                    error!("Error localizing {:?}: {:#}", file, e);
                    stats.files_failed += 1;
                }
            }
        }

        info!(
            "Localization completed: {} pages, {} modified, {} links converted, {} skipped",
            stats.files_processed, stats.files_modified, stats.links_converted, stats.links_skipped
        );
        Ok(stats)
    }
}
