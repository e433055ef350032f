use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target locale written to translated pages (e.g. "zh-CN")
    pub target_language: String,

    /// Input/output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// The mirrored site
    #[serde(default)]
    pub site: SiteConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Provenance header settings
    #[serde(default)]
    pub provenance: ProvenanceConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Gemini => Self {
                provider_type: "gemini".to_string(),
                model: default_gemini_model(),
                api_key: String::new(),
                endpoint: default_gemini_endpoint(),
                timeout_secs: default_gemini_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Where pages are read from and written to
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Directory holding the fetched, untranslated pages
    #[serde(default = "default_origin_dir")]
    pub origin_dir: PathBuf,

    /// Directory receiving translated pages
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// URL manifest, one source URL per line
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            origin_dir: default_origin_dir(),
            output_dir: default_output_dir(),
            manifest: default_manifest(),
        }
    }
}

/// The site being mirrored
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SiteConfig {
    /// URL prefix shared by every page of the site, without trailing slash
    #[serde(default = "default_base_domain")]
    pub base_domain: String,

    /// Path segment of the site root (e.g. "scaling-book")
    #[serde(default = "default_root_segment")]
    pub root_segment: String,

    /// Local file for the site root; defaults to `<root_segment>.html`
    #[serde(default)]
    pub root_filename: Option<String>,
}

impl SiteConfig {
    /// Create a site config from a base URL and root segment
    pub fn new(base_domain: impl Into<String>, root_segment: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into().trim_end_matches('/').to_string(),
            root_segment: root_segment.into(),
            root_filename: None,
        }
    }

    /// Local filename of the site root page
    pub fn root_filename(&self) -> String {
        match &self.root_filename {
            Some(name) if !name.is_empty() => name.clone(),
            _ if self.root_segment.is_empty() => "index.html".to_string(),
            _ => format!("{}.html", self.root_segment),
        }
    }

    /// Base domain without a trailing slash
    pub fn base(&self) -> &str {
        self.base_domain.trim_end_matches('/')
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new(default_base_domain(), default_root_segment())
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,

    /// Terminology glossary, source term → target term
    #[serde(default = "default_terminology")]
    pub terminology: BTreeMap<String, String>,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Settings of the provenance header added to translated pages
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProvenanceConfig {
    /// Name shown as the translator
    #[serde(default = "default_translator_name")]
    pub translator_name: String,

    /// Label in front of the source link
    #[serde(default = "default_source_label")]
    pub source_label: String,

    /// Label in front of the translator name
    #[serde(default = "default_translator_label")]
    pub translator_label: String,

    /// Optional image (e.g. a QR code) shown next to the attribution
    #[serde(default)]
    pub qr_image_url: Option<String>,

    /// Caption under the image
    #[serde(default)]
    pub qr_caption: Option<String>,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            translator_name: default_translator_name(),
            source_label: default_source_label(),
            translator_label: default_translator_label(),
            qr_image_url: None,
            qr_caption: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_gemini_timeout_secs() -> u64 {
    // Whole-page translations stream for a long time
    2400
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    2000 // doubled on each retry
}

fn default_temperature() -> f32 {
    0.7
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_ollama_model() -> String {
    "qwen2.5:14b".to_string()
}

fn default_origin_dir() -> PathBuf {
    PathBuf::from("output/origin")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output/trans")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("urls.txt")
}

fn default_base_domain() -> String {
    "https://jax-ml.github.io/scaling-book".to_string()
}

fn default_root_segment() -> String {
    "scaling-book".to_string()
}

fn default_translator_name() -> String {
    "transmirror".to_string()
}

fn default_source_label() -> String {
    "Original article:".to_string()
}

fn default_translator_label() -> String {
    "Translated by:".to_string()
}

/// Technical terms kept consistent across every page
pub fn default_terminology() -> BTreeMap<String, String> {
    [
        ("TPU", "TPU"),
        ("TensorCore", "TensorCore"),
        ("systolic array", "脉动阵列"),
        ("matrix multiplication", "矩阵乘法"),
        ("HBM", "HBM"),
        ("bandwidth", "带宽"),
        ("FLOPs", "FLOPs"),
        ("bfloat16", "bfloat16"),
        ("roofline", "屋顶线"),
        ("sharding", "分片"),
        ("JAX", "JAX"),
        ("inference", "推理"),
        ("training", "训练"),
        ("transformer", "Transformer"),
        ("attention", "注意力"),
        ("parallelism", "并行性"),
        ("Footnotes", "脚注"),
        ("References", "参考文献"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.translation.provider == TranslationProvider::Gemini
            && self.translation.get_api_key().is_empty()
        {
            return Err(anyhow!(
                "Translation API key is required for Gemini provider (config or {})",
                GEMINI_API_KEY_ENV
            ));
        }

        let base = Url::parse(&self.site.base_domain)
            .with_context(|| format!("Invalid site base domain: {}", self.site.base_domain))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(anyhow!("Site base domain must be an http(s) URL: {}", base));
        }

        Ok(())
    }
}

/// Environment variable consulted when no Gemini key is configured
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "zh-CN".to_string(),
            paths: PathsConfig::default(),
            site: SiteConfig::default(),
            translation: TranslationConfig::default(),
            provenance: ProvenanceConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_model(),
            TranslationProvider::Ollama => default_ollama_model(),
        }
    }

    /// Get the API key for the active provider, falling back to the environment
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        match self.provider {
            TranslationProvider::Gemini => std::env::var(GEMINI_API_KEY_ENV).unwrap_or_default(),
            // Ollama doesn't use API keys
            TranslationProvider::Ollama => String::new(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => {
                provider_config.timeout_secs
            }
            _ => match self.provider {
                TranslationProvider::Gemini => default_gemini_timeout_secs(),
                TranslationProvider::Ollama => default_timeout_secs(),
            },
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Gemini),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            common: TranslationCommonConfig::default(),
            terminology: default_terminology(),
        }
    }
}
