/*!
 * Link localization for mirrored pages.
 *
 * - `manifest`: the list of source URLs
 * - `url_mapper`: source URL ↔ local file lookups
 * - `link_rewriter`: replaces site links with local filenames
 */

pub mod link_rewriter;
pub mod manifest;
pub mod url_mapper;

pub use link_rewriter::{LinkRewriter, LocalizeStats, RewriteResult};
pub use manifest::Manifest;
pub use url_mapper::{url_to_filename, UrlMapping};
