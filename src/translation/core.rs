/*!
 * Core document translation.
 *
 * `DocumentTranslator` drives one page through the pipeline:
 * decompose, shield math, translate metadata and body through a structured
 * provider, then restore and reassemble. Metadata failures only keep the
 * original title and description; body failures fail the page.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::html::reassemble::clean_translated_body;
use crate::html::scanner::find_open;
use crate::html::{decompose, shield, PlaceholderMap, Reassembler};
use crate::providers::StructuredProvider;

use super::prompts::{TranslatedBody, TranslatedMetadata, TranslationPromptBuilder};

/// Figures collected while translating one page
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentStats {
    /// Characters of the original body
    pub body_chars: usize,
    /// Characters sent to the provider after shielding
    pub shielded_chars: usize,
    /// Math containers replaced by placeholders
    pub placeholders: usize,
    /// Placeholders restored after translation
    pub restored: usize,
    /// Placeholders missing, duplicated or unknown after translation
    pub placeholder_issues: usize,
    /// Whether title and description were translated
    pub metadata_translated: bool,
    /// Time spent on the page
    #[serde(skip)]
    pub elapsed: Duration,
}

/// A translated page
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    /// The reassembled page
    pub html: String,
    /// Figures for the page
    pub stats: DocumentStats,
}

/// Result of translating one file
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// The page was translated and written
    Translated {
        /// Written file
        output: PathBuf,
        /// Figures for the page
        stats: DocumentStats,
    },
    /// The output already existed and overwriting was not requested
    Skipped {
        /// Existing file
        output: PathBuf,
    },
}

/// Translates whole HTML pages through a structured provider
#[derive(Debug)]
pub struct DocumentTranslator {
    provider: Box<dyn StructuredProvider>,
    prompts: TranslationPromptBuilder,
    reassembler: Reassembler,
}

impl DocumentTranslator {
    /// Create a translator from its parts
    pub fn new(
        provider: Box<dyn StructuredProvider>,
        prompts: TranslationPromptBuilder,
        reassembler: Reassembler,
    ) -> Self {
        Self {
            provider,
            prompts,
            reassembler,
        }
    }

    /// Create a translator for the configured languages and terminology
    pub fn from_config(config: &Config, provider: Box<dyn StructuredProvider>) -> Self {
        let prompts = TranslationPromptBuilder::new(&config.source_language, &config.target_language)
            .with_terminology(&config.translation.terminology);
        Self::new(provider, prompts, Reassembler::new(config.target_language.clone()))
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> String {
        self.provider.name()
    }

    /// Translate a complete page
    pub async fn translate_html(&self, raw: &str) -> Result<TranslatedDocument, TranslationError> {
        let start = Instant::now();
        let parts = decompose(raw);

        let metadata = self.translate_metadata(&parts.title, &parts.description).await;

        let mut map = PlaceholderMap::new();
        let shielded = shield(&parts.body, &mut map);
        debug!(
            "Body shielded: {} chars -> {} chars, {} placeholders",
            parts.body.len(),
            shielded.len(),
            map.len()
        );

        let translated_body = self.translate_body(&shielded).await?;

        let (title, description) = match &metadata {
            Some(m) => (Some(m.title.as_str()), Some(m.description.as_str())),
            None => (None, None),
        };
        let reassembled = self
            .reassembler
            .reassemble(&parts, &translated_body, &map, title, description);

        let restoration = &reassembled.restoration;
        let stats = DocumentStats {
            body_chars: parts.body.chars().count(),
            shielded_chars: shielded.chars().count(),
            placeholders: map.len(),
            restored: restoration.restored,
            placeholder_issues: restoration.unknown.len()
                + restoration.missing.len()
                + restoration.duplicated.len(),
            metadata_translated: metadata.is_some(),
            elapsed: start.elapsed(),
        };

        Ok(TranslatedDocument {
            html: reassembled.html,
            stats,
        })
    }

    /// Translate title and description; `None` keeps the originals
    async fn translate_metadata(&self, title: &str, description: &str) -> Option<TranslatedMetadata> {
        if title.trim().is_empty() && description.trim().is_empty() {
            debug!("No title or description to translate");
            return None;
        }

        let prompt = self.prompts.build_metadata_prompt(title, description);
        let schema = TranslationPromptBuilder::metadata_schema();

        let value = match self.provider.generate_structured(&prompt, &schema).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Metadata translation failed, keeping original title and description: {}", e);
                return None;
            }
        };

        match serde_json::from_value::<TranslatedMetadata>(value) {
            Ok(metadata) => {
                info!("Translated title: {}", metadata.title);
                Some(metadata)
            }
            Err(e) => {
                warn!("Unusable metadata translation, keeping originals: {}", e);
                None
            }
        }
    }

    async fn translate_body(&self, shielded: &str) -> Result<String, TranslationError> {
        let prompt = self.prompts.build_body_prompt(shielded);
        let schema = TranslationPromptBuilder::body_schema();

        info!(
            "Translating body ({} chars) with {}",
            shielded.chars().count(),
            self.provider.name()
        );
        let value: Value = self.provider.generate_structured(&prompt, &schema).await?;

        let body: TranslatedBody = serde_json::from_value(value)
            .map_err(|e| TranslationError::InvalidResult(format!("Missing html field: {}", e)))?;

        if body.html.trim().is_empty() {
            return Err(TranslationError::InvalidResult(
                "Translated body is empty".to_string(),
            ));
        }

        let cleaned = clean_translated_body(&body.html);
        if find_open(&cleaned, 0, "body").is_none() {
            return Err(TranslationError::InvalidResult(
                "Translated body has no <body> element".to_string(),
            ));
        }

        Ok(cleaned)
    }

    /// Translate `input` into `output_dir` under the same file name.
    ///
    /// An existing output is kept unless `force` is set.
    pub async fn translate_file(&self, input: &Path, output_dir: &Path, force: bool) -> Result<FileOutcome> {
        let file_name = input
            .file_name()
            .with_context(|| format!("Input has no file name: {:?}", input))?;
        let output = output_dir.join(file_name);

        if FileManager::file_exists(&output) && !force {
            info!("Skipping {:?}, translation already exists (use --force to overwrite)", file_name);
            return Ok(FileOutcome::Skipped { output });
        }

        let raw = FileManager::read_to_string(input)?;
        let document = self
            .translate_html(&raw)
            .await
            .with_context(|| format!("Failed to translate {:?}", input))?;

        FileManager::write_atomic(&output, &document.html)?;
        info!(
            "Wrote {:?} ({} placeholders restored, {:.1}s)",
            output,
            document.stats.restored,
            document.stats.elapsed.as_secs_f64()
        );

        Ok(FileOutcome::Translated {
            output,
            stats: document.stats,
        })
    }
}
