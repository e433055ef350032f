use anyhow::{anyhow, Result};
use std::path::Path;

use crate::file_utils::FileManager;

/// Ordered list of the source URLs of a mirrored site, one per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    urls: Vec<String>,
}

impl Manifest {
    /// Parse manifest text; lines are trimmed, blank lines and `#` comments ignored
    pub fn parse(text: &str) -> Self {
        Self {
            urls: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect(),
        }
    }

    /// Load a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(anyhow!("URL manifest not found: {:?}", path));
        }
        Ok(Self::parse(&FileManager::read_to_string(path)?))
    }

    /// URLs in manifest order
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
