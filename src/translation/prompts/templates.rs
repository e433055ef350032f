/*!
 * Prompt templates for HTML page translation.
 *
 * Every prompt carries the same contract: translate human-readable text
 * only, keep markup and placeholders untouched, and answer with JSON that
 * matches the requested schema.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::language_utils;
use crate::providers::ResponseSchema;

/// Opens the source block of a prompt
pub const SOURCE_BEGIN: &str = "<<<SOURCE";

/// Closes the source block of a prompt
pub const SOURCE_END: &str = "SOURCE>>>";

/// Instruction template for a translation prompt.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Instructions for translating a page body.
    pub const HTML_TRANSLATOR: &'static str = r##"You are an expert technical translator specializing in {source_language} to {target_language} translation of HTML documents.

## Rules
- Translate only human-readable text content into {target_language}
- Keep every HTML tag, attribute name and attribute value exactly as given, including class and id
- Keep every MATH_PLACEHOLDER_NNN token and every element carrying data-math-placeholder exactly as given, in place
- Do not translate or alter comments, <script>, <style> or <code> content
- Do not change URLs, "#" anchors or mathematical formulas
- Do not add, remove or reorder elements

## Output Requirements
- Return ONLY valid JSON matching the requested schema
- Put the complete translated HTML fragment in the "html" field
- Do not wrap the HTML in markdown code fences and do not add any commentary"##;

    /// Instructions for translating page metadata.
    pub const METADATA_TRANSLATOR: &'static str = r#"You are an expert technical translator specializing in {source_language} to {target_language} translation.

## Task
Translate the page title and description given as JSON in the source block into {target_language}.

## Rules
- Keep MATH_PLACEHOLDER_NNN tokens and formulas unchanged
- Keep product names and acronyms unchanged unless the terminology says otherwise
- If a value is empty, return an empty string for it

## Output Requirements
- Return ONLY valid JSON with the fields "title" and "description"
- Do not add any commentary"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Template for page bodies.
    pub fn html_translator() -> Self {
        Self::new(Self::HTML_TRANSLATOR)
    }

    /// Template for title and description.
    pub fn metadata_translator() -> Self {
        Self::new(Self::METADATA_TRANSLATOR)
    }

    /// Render the template with the given variables.
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::html_translator()
    }
}

/// Builder for translation prompts.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    source_language: String,
    target_language: String,
    terminology: BTreeMap<String, String>,
}

impl TranslationPromptBuilder {
    /// Create a new prompt builder from language codes.
    ///
    /// Codes are rendered as English language names when known
    /// ("zh-CN" becomes "Chinese (zh-CN)").
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: describe_language(source_language),
            target_language: describe_language(target_language),
            terminology: BTreeMap::new(),
        }
    }

    /// Set the terminology glossary.
    pub fn with_terminology(mut self, terminology: &BTreeMap<String, String>) -> Self {
        self.terminology = terminology.clone();
        self
    }

    /// Rendered source language
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Rendered target language
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Prompt for a shielded page body.
    pub fn build_body_prompt(&self, html: &str) -> String {
        let instructions =
            PromptTemplate::html_translator().render(&self.source_language, &self.target_language);
        self.assemble(&instructions, html)
    }

    /// Prompt for the page title and description.
    pub fn build_metadata_prompt(&self, title: &str, description: &str) -> String {
        let payload = MetadataPayload {
            title: title.to_string(),
            description: description.to_string(),
        };
        let payload = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string());

        let instructions = PromptTemplate::metadata_translator()
            .render(&self.source_language, &self.target_language);
        self.assemble(&instructions, &payload)
    }

    /// Schema of the body answer.
    pub fn body_schema() -> ResponseSchema {
        ResponseSchema::new("body").field(
            "html",
            "The translated HTML fragment with all markup and placeholders preserved",
        )
    }

    /// Schema of the metadata answer.
    pub fn metadata_schema() -> ResponseSchema {
        ResponseSchema::new("metadata")
            .field("title", "The translated page title")
            .field("description", "The translated page description")
    }

    fn assemble(&self, instructions: &str, payload: &str) -> String {
        let mut prompt = String::with_capacity(instructions.len() + payload.len() + 512);
        prompt.push_str(instructions);

        if !self.terminology.is_empty() {
            prompt.push_str("\n\n## Terminology\nUse these translations consistently:\n");
            for (source, target) in &self.terminology {
                prompt.push_str(&format!("- {} → {}\n", source, target));
            }
        }

        prompt.push_str("\n\n## Source\n");
        prompt.push_str(SOURCE_BEGIN);
        prompt.push('\n');
        prompt.push_str(payload);
        prompt.push('\n');
        prompt.push_str(SOURCE_END);
        prompt.push('\n');
        prompt
    }
}

/// The source block of a prompt built by `TranslationPromptBuilder`
pub fn extract_source(prompt: &str) -> Option<&str> {
    let start = prompt.find(SOURCE_BEGIN)? + SOURCE_BEGIN.len();
    let end = prompt.rfind(SOURCE_END)?;
    if end < start {
        return None;
    }
    let block = &prompt[start..end];
    let block = block.strip_prefix('\n').unwrap_or(block);
    Some(block.strip_suffix('\n').unwrap_or(block))
}

fn describe_language(code: &str) -> String {
    match language_utils::get_language_name(code) {
        Ok(name) if name.eq_ignore_ascii_case(code) => name,
        Ok(name) if code.contains(['-', '_']) => format!("{} ({})", name, code),
        Ok(name) => name,
        Err(_) => code.to_string(),
    }
}

/// Metadata sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataPayload {
    /// Page title
    pub title: String,
    /// Page description
    pub description: String,
}

/// Expected metadata answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatedMetadata {
    /// Translated title
    #[serde(default)]
    pub title: String,
    /// Translated description
    #[serde(default)]
    pub description: String,
}

/// Expected body answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedBody {
    /// Translated HTML fragment
    pub html: String,
}
