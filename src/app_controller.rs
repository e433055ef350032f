use log::{info, warn};
use std::path::Path;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::localize::{LinkRewriter, LocalizeStats, UrlMapping};
use crate::provenance::{AnnotateStats, ProvenanceAnnotator};
use crate::providers::{self, StructuredProvider};
use crate::translation::batch::format_duration;
use crate::translation::{BatchStats, BatchTranslator, DocumentTranslator, FileOutcome};

// @module: Application controller for the mirroring pipeline

/// Statistics of a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    // @field: Translation stage
    pub translation: BatchStats,
    // @field: Localization stage
    pub localization: LocalizeStats,
    // @field: Annotation stage
    pub annotation: AnnotateStats,
}

/// Main application controller running the pipeline stages
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translator with an explicit provider, built from config when absent
    translator: Option<DocumentTranslator>,
    // @field: Draw progress bars
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            translator: None,
            show_progress: true,
        }
    }

    /// Use `provider` instead of the configured one
    pub fn with_provider(mut self, provider: Box<dyn StructuredProvider>) -> Self {
        self.translator = Some(DocumentTranslator::from_config(&self.config, provider));
        self
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate one page, or every page of the origin directory
    pub async fn translate(&self, file: Option<&Path>, force: bool) -> Result<BatchStats, AppError> {
        let built;
        let translator = match &self.translator {
            Some(translator) => translator,
            None => {
                let provider = providers::build_provider(&self.config.translation)?;
                built = DocumentTranslator::from_config(&self.config, provider);
                &built
            }
        };

        let output_dir = &self.config.paths.output_dir;
        FileManager::ensure_dir(output_dir)?;

        match file {
            Some(file) => {
                if !FileManager::file_exists(file) {
                    return Err(AppError::File(format!("Input file does not exist: {:?}", file)));
                }
                let mut stats = BatchStats::default();
                match translator.translate_file(file, output_dir, force).await? {
                    FileOutcome::Translated { .. } => stats.translated += 1,
                    FileOutcome::Skipped { .. } => stats.skipped += 1,
                }
                Ok(stats)
            }
            None => {
                let origin_dir = &self.config.paths.origin_dir;
                if !FileManager::dir_exists(origin_dir) {
                    return Err(AppError::File(format!(
                        "Origin directory does not exist: {:?}",
                        origin_dir
                    )));
                }
                let batch = BatchTranslator::new(translator).with_progress(self.show_progress);
                Ok(batch.translate_directory(origin_dir, output_dir, force).await?)
            }
        }
    }

    /// Rewrite site links in the output directory to local files
    pub fn localize(&self) -> Result<LocalizeStats, AppError> {
        let mapping = self.url_mapping()?;
        if mapping.is_empty() {
            warn!("No manifest URL has a local page; links stay unchanged");
        }

        let rewriter = LinkRewriter::new(&mapping, self.config.site.base());
        Ok(rewriter.process_directory(&self.config.paths.output_dir)?)
    }

    /// Add the provenance block to every page of the output directory
    pub fn annotate(&self) -> Result<AnnotateStats, AppError> {
        let mapping = self.url_mapping()?;
        let annotator = ProvenanceAnnotator::new(&self.config.provenance);
        Ok(annotator.process_directory(&self.config.paths.output_dir, &mapping)?)
    }

    /// Translate, localize and annotate in sequence
    pub async fn run(&self, force: bool) -> Result<PipelineStats, AppError> {
        let start_time = Instant::now();

        info!("Stage 1/3: translation");
        let translation = self.translate(None, force).await?;
        info!("Stage 2/3: link localization");
        let localization = self.localize()?;
        info!("Stage 3/3: provenance");
        let annotation = self.annotate()?;

        info!("Pipeline completed in {}", format_duration(start_time.elapsed()));
        Ok(PipelineStats {
            translation,
            localization,
            annotation,
        })
    }

    fn url_mapping(&self) -> Result<UrlMapping, AppError> {
        let paths = &self.config.paths;
        if !FileManager::file_exists(&paths.manifest) {
            return Err(AppError::File(format!("URL manifest not found: {:?}", paths.manifest)));
        }
        if !FileManager::dir_exists(&paths.output_dir) {
            return Err(AppError::File(format!(
                "Output directory does not exist: {:?}",
                paths.output_dir
            )));
        }
        Ok(UrlMapping::from_dir(&paths.manifest, &paths.output_dir, &self.config.site)?)
    }
}
