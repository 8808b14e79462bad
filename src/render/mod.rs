//! Rendering module for turning analysed documents into annotated Markdown.

mod cleanup;
mod frontmatter;
mod json;
mod markdown;
mod options;
mod result;

pub use cleanup::{
    defragment_text, merge_hyphenated_words, normalize_markdown, CleanupOptions, CleanupPipeline,
    CleanupPreset,
};
pub use frontmatter::{
    document_id_from_bytes, extraction_timestamp, parse_pdf_date, render_frontmatter,
};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{NoiseHandling, RenderOptions};
pub use result::{ExtractionStats, RenderResult};
