/*!
 * Common test utilities for the transmirror test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use transmirror::app_config::{Config, SiteConfig};

/// Base URL of the fixture site
pub const BASE_DOMAIN: &str = "https://example.org/book";

/// Root segment of the fixture site
pub const ROOT_SEGMENT: &str = "book";

/// Rendered math used in the fixture pages
pub const MATH: &str = r#"<mjx-container class="MathJax" jax="CHTML"><mjx-math><mjx-mi>x</mjx-mi><mjx-container>y</mjx-container></mjx-math></mjx-container>"#;

/// A distill-style article page
pub fn sample_page(title: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en" class="no-js">
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="description" content="How TPUs work &amp; why">
</head>
<body>
<div class="post distill">
<d-title><h1>{title}</h1></d-title>
<p>A TPU is {math} fast.</p>
<p>See <a href="https://example.org/book/gpus">GPUs</a> and <a href='https://example.org/book/tpus/'>TPUs</a>, <a href="#sec">below</a>, <a href="https://other.org/x">elsewhere</a>.</p>
<img src="https://example.org/book/gpus/fig.png">
<script>if (a < b) {{ document.write("</p>"); }}</script>
</div>
</body>
</html>
"##,
        title = title,
        math = MATH
    )
}

/// Initialize logging for tests, once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A configuration whose paths all live under `root`
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.target_language = "zh-CN".to_string();
    config.paths.origin_dir = root.join("origin");
    config.paths.output_dir = root.join("trans");
    config.paths.manifest = root.join("urls.txt");
    config.site = SiteConfig::new(BASE_DOMAIN, ROOT_SEGMENT);
    config.translation.common.retry_backoff_ms = 1;
    config
}

/// Swap a few English words for Chinese ones, as a fake translator would
pub fn fake_translate(text: &str) -> String {
    text.replace("See", "参见")
        .replace("fast", "很快")
        .replace("All About", "关于")
        .replace("How TPUs work", "TPU 的工作原理")
}
