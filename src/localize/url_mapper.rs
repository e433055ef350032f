/*!
 * Mapping between source URLs and local page files.
 *
 * A URL maps to the last segment of its path plus `.html`; the site root
 * maps to the configured root file. Only URLs whose file exists in the
 * output directory are mapped.
 */

use anyhow::{anyhow, Result};
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use url::Url;

use crate::app_config::SiteConfig;
use crate::file_utils::FileManager;

use super::manifest::Manifest;

/// Local filename for a source URL
pub fn url_to_filename(url: &str, site: &SiteConfig) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() || trimmed == site.root_segment {
        return site.root_filename();
    }

    let last = trimmed
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(trimmed);
    format!("{}.html", last)
}

/// The other trailing-slash form of a URL
fn toggle_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.trim_end_matches('/').to_string()
    } else {
        format!("{}/", url)
    }
}

/// Source URL ↔ local file lookups, restricted to files that exist
#[derive(Debug, Clone, Default)]
pub struct UrlMapping {
    url_to_file: BTreeMap<String, String>,
    file_to_url: BTreeMap<String, String>,
}

impl UrlMapping {
    /// Build the mapping for the manifest URLs whose file is in `existing`
    pub fn build(manifest: &Manifest, existing: &HashSet<String>, site: &SiteConfig) -> Self {
        let mut mapping = Self::default();

        for url in manifest.urls() {
            let filename = url_to_filename(url, site);
            if !existing.contains(&filename) {
                debug!("No local file {} for {}", filename, url);
                continue;
            }

            mapping.insert(url.clone(), &filename);
            mapping.insert(toggle_slash(url), &filename);
            mapping
                .file_to_url
                .entry(filename)
                .or_insert_with(|| url.clone());
        }

        let root_file = site.root_filename();
        if existing.contains(&root_file) {
            let base = site.base();
            mapping.insert(base.to_string(), &root_file);
            mapping.insert(format!("{}/", base), &root_file);
        }

        info!(
            "Mapped {} URL forms onto {} local pages",
            mapping.url_to_file.len(),
            mapping.file_to_url.len()
        );
        mapping
    }

    /// Build the mapping from a manifest file and the pages of `output_dir`
    pub fn from_dir<P: AsRef<Path>, Q: AsRef<Path>>(manifest_path: P, output_dir: Q, site: &SiteConfig) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        if !FileManager::dir_exists(output_dir) {
            return Err(anyhow!("Output directory does not exist: {:?}", output_dir));
        }

        let manifest = Manifest::load(manifest_path)?;
        let existing = FileManager::list_file_names(output_dir, "html")?;
        Ok(Self::build(&manifest, &existing, site))
    }

    // First registration of a URL form wins
    fn insert(&mut self, url: String, filename: &str) {
        self.url_to_file
            .entry(url)
            .or_insert_with(|| filename.to_string());
    }

    /// Exact lookup of a URL
    pub fn get(&self, url: &str) -> Option<&str> {
        self.url_to_file.get(url).map(String::as_str)
    }

    /// Lookup of a link target: verbatim, then without trailing slashes
    pub fn resolve(&self, href: &str) -> Option<&str> {
        self.get(href)
            .or_else(|| self.get(href.trim_end_matches('/')))
    }

    /// Source URL of a local page
    pub fn source_url(&self, filename: &str) -> Option<&str> {
        self.file_to_url.get(filename).map(String::as_str)
    }

    /// Number of mapped URL forms
    pub fn len(&self) -> usize {
        self.url_to_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.url_to_file.is_empty()
    }

    /// Mapped URL forms and their files, sorted by URL
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.url_to_file
            .iter()
            .map(|(url, file)| (url.as_str(), file.as_str()))
    }
}
