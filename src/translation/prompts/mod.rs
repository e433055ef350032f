/*!
 * Prompt engineering for page translation.
 *
 * This module provides:
 * - Instruction templates for page bodies and metadata
 * - Prompt construction with terminology and a delimited source block
 * - Response schemas and the matching answer types
 */

pub mod templates;

// Re-export main types
pub use templates::{
    extract_source, MetadataPayload, PromptTemplate, TranslatedBody, TranslatedMetadata,
    TranslationPromptBuilder, SOURCE_BEGIN, SOURCE_END,
};
