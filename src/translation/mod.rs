/*!
 * Page translation through structured AI providers.
 *
 * - `core`: translation of one page, end to end
 * - `batch`: translation of a directory of pages with progress reporting
 * - `prompts`: prompt templates, response schemas and answer types
 */

// Re-export main types for easier usage
pub use self::batch::{BatchStats, BatchTranslator};
pub use self::core::{DocumentStats, DocumentTranslator, FileOutcome, TranslatedDocument};

// Re-export prompt types
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder};

// Submodules
pub mod batch;
pub mod core;
pub mod prompts;
