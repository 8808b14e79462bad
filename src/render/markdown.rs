//! Annotated Markdown rendering.
//!
//! Output layout per page:
//!
//! ```text
//! <!-- page:1 -->
//!
//! <!-- reading-order:1 -->
//! <!-- role:heading level:1 -->
//! # Title
//!
//! <!-- reading-order:2 -->
//! <!-- role:paragraph -->
//! <!-- confidence:0.55 -->
//! [uncertain: Blurry text]
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::model::{Document, Element, Page, SemanticRole, Table};

use super::frontmatter::render_frontmatter;
use super::{CleanupPipeline, ExtractionStats, NoiseHandling, RenderOptions, RenderResult};

static RE_BULLET_GLYPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•◦▪▫●○■□‣⁃∙·\-*+]\s+").unwrap());

static RE_ORDERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s").unwrap());

/// Convert an analysed document to annotated Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    options.validate()?;
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    options.validate()?;
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ExtractionStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ExtractionStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document to Markdown with extraction statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        let content = self.render_internal(doc)?;
        Ok(RenderResult::new(content, doc.info.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&render_frontmatter(&doc.info, doc.page_count()));
            output.push('\n');
        }

        for page in &doc.pages {
            self.render_page(&mut output, page);
        }

        if let Some(ref cleanup_options) = self.options.cleanup {
            let pipeline = CleanupPipeline::new(cleanup_options.clone());
            output = pipeline.process(&output);
        }

        let trimmed = output.trim_end();
        let mut content = String::with_capacity(trimmed.len() + 1);
        content.push_str(trimmed);
        if !content.is_empty() {
            content.push('\n');
        }
        Ok(content)
    }

    fn render_page(&mut self, output: &mut String, page: &Page) {
        self.stats.add_page();
        if self.options.page_markers {
            output.push_str(&format!("<!-- page:{} -->\n\n", page.number));
        }

        let mut order = 0u32;
        for element in &page.elements {
            if element.noise_type.is_some() && self.options.noise_handling == NoiseHandling::Omit
            {
                continue;
            }
            let Some(body) = self.render_body(element) else {
                continue;
            };

            order += 1;
            let role = effective_role(element);
            self.stats.add_role(role);
            self.stats.count_text(&element.text);

            if self.options.reading_order_markers {
                output.push_str(&format!("<!-- reading-order:{} -->\n", order));
            }
            if self.options.role_annotations {
                match (role, element.heading_level) {
                    (SemanticRole::Heading, Some(level)) => output.push_str(&format!(
                        "<!-- role:heading level:{} -->\n",
                        self.heading_level(level)
                    )),
                    _ => output.push_str(&format!("<!-- role:{} -->\n", role)),
                }
            }
            output.push_str(&body);
            output.push_str("\n\n");
        }
    }

    /// Markdown for one element, `None` when there is nothing to show.
    fn render_body(&mut self, element: &Element) -> Option<String> {
        if let Some(table) = element.table.as_ref().filter(|t| !t.is_empty()) {
            return Some(render_table(table));
        }

        let text = element.stripped_text();
        if text.is_empty() {
            return None;
        }

        let role = effective_role(element);
        let uncertain = self.options.mark_uncertain && element.uncertain;
        let mut prefix = String::new();
        if uncertain {
            self.stats.add_uncertain();
            if let Some(confidence) = element.confidence {
                prefix.push_str(&format!("<!-- confidence:{:.2} -->\n", confidence));
            }
        }

        // Markup stays outside the uncertainty wrapper.
        let mark = |s: String| {
            if uncertain {
                format!("[uncertain: {}]", s)
            } else {
                s
            }
        };
        let content = match role {
            SemanticRole::Heading => {
                let level = self.heading_level(element.heading_level.unwrap_or(1));
                format!("{} {}", "#".repeat(level as usize), mark(single_line(text)))
            }
            SemanticRole::ListItem => {
                let (marker, rest) = split_list_marker(&single_line(text));
                format!("{} {}", marker, mark(rest))
            }
            _ if uncertain => mark(single_line(text)),
            _ => text.to_string(),
        };

        prefix.push_str(&content);
        Some(prefix)
    }

    fn heading_level(&self, level: u8) -> u8 {
        level.max(1).min(self.options.max_heading_level.clamp(1, 6))
    }
}

/// The role an element is rendered with: its noise tag wins, otherwise its
/// classified role, otherwise paragraph (or table).
fn effective_role(element: &Element) -> SemanticRole {
    if let Some(noise) = element.noise_type {
        return noise.role();
    }
    element.semantic_role.unwrap_or(if element.is_table() {
        SemanticRole::Table
    } else {
        SemanticRole::Paragraph
    })
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `"• Item"` becomes `"- Item"`; ordered markers are kept as-is.
#[cfg(test)]
fn list_item(text: &str) -> String {
    let (marker, rest) = split_list_marker(text);
    format!("{} {}", marker, rest)
}

/// Split a list item into its Markdown marker and the item text.
fn split_list_marker(text: &str) -> (String, String) {
    if let Some(m) = RE_ORDERED_MARKER.find(text) {
        return (
            text[..m.end()].trim_end().to_string(),
            text[m.end()..].to_string(),
        );
    }
    ("-".to_string(), RE_BULLET_GLYPH.replace(text, "").into_owned())
}

/// GitHub-flavoured pipe table; the first row is the header.
fn render_table(table: &Table) -> String {
    let col_count = table.column_count();
    let mut lines = Vec::with_capacity(table.row_count() + 1);

    for (i, row) in table.rows.iter().enumerate() {
        let mut line = String::from("|");
        for idx in 0..col_count {
            let cell = row.cells.get(idx).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {} |", escape_cell(cell)));
        }
        lines.push(line);

        if i == 0 {
            lines.push(format!("|{}", "---|".repeat(col_count)));
        }
    }

    lines.join("\n")
}

fn escape_cell(cell: &str) -> String {
    single_line(cell).replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, NoiseType, TableRow};

    fn el(text: &str, role: SemanticRole) -> Element {
        let mut e = Element::text(BBox::new(0.0, 0.0, 100.0, 10.0), text);
        e.semantic_role = Some(role);
        e
    }

    fn doc_with(elements: Vec<Element>) -> Document {
        let mut page = Page::new(1);
        page.elements = elements;
        Document::from_pages(vec![page])
    }

    fn bare() -> RenderOptions {
        RenderOptions::new()
            .with_frontmatter(false)
            .with_reading_order(false)
    }

    #[test]
    fn test_render_heading_and_paragraph() {
        let mut heading = el("Annual Report", SemanticRole::Heading);
        heading.heading_level = Some(1);
        let doc = doc_with(vec![heading, el("Revenue grew.", SemanticRole::Paragraph)]);

        let md = to_markdown(&doc, &bare()).unwrap();
        assert_eq!(
            md,
            "<!-- page:1 -->\n\n<!-- role:heading level:1 -->\n# Annual Report\n\n<!-- role:paragraph -->\nRevenue grew.\n"
        );
    }

    #[test]
    fn test_reading_order_markers_count_rendered_elements() {
        let mut footer = el("ACME", SemanticRole::Footer);
        footer.noise_type = Some(NoiseType::Footer);
        let doc = doc_with(vec![
            el("One", SemanticRole::Paragraph),
            footer,
            el("Two", SemanticRole::Paragraph),
        ]);
        let options = RenderOptions::new()
            .with_frontmatter(false)
            .with_noise_handling(NoiseHandling::Omit);
        let md = to_markdown(&doc, &options).unwrap();
        assert!(md.contains("<!-- reading-order:1 -->\n<!-- role:paragraph -->\nOne"));
        assert!(md.contains("<!-- reading-order:2 -->\n<!-- role:paragraph -->\nTwo"));
        assert!(!md.contains("ACME"));
    }

    #[test]
    fn test_noise_is_annotated_by_default() {
        let mut header = el("CONFIDENTIAL", SemanticRole::Paragraph);
        header.noise_type = Some(NoiseType::Header);
        let md = to_markdown(&doc_with(vec![header]), &bare()).unwrap();
        assert!(md.contains("<!-- role:header -->\nCONFIDENTIAL"));
    }

    #[test]
    fn test_uncertain_element() {
        let mut e = el("Blurry  text", SemanticRole::Paragraph).with_confidence(0.654);
        e.uncertain = true;
        let md = to_markdown(&doc_with(vec![e]), &bare()).unwrap();
        assert!(md.contains("<!-- role:paragraph -->\n<!-- confidence:0.65 -->\n[uncertain: Blurry text]"));
    }

    #[test]
    fn test_uncertain_heading_and_list_keep_markup() {
        let mut heading = el("Quarterly Report", SemanticRole::Heading).with_confidence(0.3);
        heading.heading_level = Some(1);
        heading.uncertain = true;
        let mut bullet = el("• first point", SemanticRole::ListItem).with_confidence(0.4);
        bullet.uncertain = true;
        let mut numbered = el("2. second point", SemanticRole::ListItem).with_confidence(0.4);
        numbered.uncertain = true;

        let md = to_markdown(&doc_with(vec![heading, bullet, numbered]), &bare()).unwrap();
        assert!(md.contains("<!-- confidence:0.30 -->\n# [uncertain: Quarterly Report]"));
        assert!(md.contains("- [uncertain: first point]"));
        assert!(md.contains("2. [uncertain: second point]"));
    }

    #[test]
    fn test_invalid_heading_limit_is_rejected() {
        let mut heading = el("Title", SemanticRole::Heading);
        heading.heading_level = Some(1);
        let doc = doc_with(vec![heading]);
        let options = RenderOptions {
            max_heading_level: 0,
            ..bare()
        };
        assert!(matches!(
            to_markdown(&doc, &options),
            Err(crate::error::Error::InvalidOption(_))
        ));
        assert!(to_markdown_with_stats(&doc, &options).is_err());
    }

    #[test]
    fn test_heading_level_is_capped() {
        let mut heading = el("Deep", SemanticRole::Heading);
        heading.heading_level = Some(9);
        let md = to_markdown(&doc_with(vec![heading]), &bare().with_max_heading(3)).unwrap();
        assert!(md.contains("\n### Deep"));
    }

    #[test]
    fn test_list_items() {
        assert_eq!(list_item("• First point"), "- First point");
        assert_eq!(list_item("- dash"), "- dash");
        assert_eq!(list_item("2. Second"), "2. Second");
        assert_eq!(list_item("a) lettered"), "- a) lettered");
    }

    #[test]
    fn test_render_table() {
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["Quarter", "Revenue"]));
        table.add_row(TableRow::from_strings(["Q1", "10|5"]));
        table.add_row(TableRow::from_strings(["Q2"]));
        assert_eq!(
            render_table(&table),
            "| Quarter | Revenue |\n|---|---|\n| Q1 | 10\\|5 |\n| Q2 |  |"
        );
    }

    #[test]
    fn test_table_element_renders_as_table() {
        let table = Table::from_cells(vec![
            vec!["A".into(), "B".into()],
            vec!["1".into(), "2".into()],
        ]);
        let mut e = Element::table(BBox::new(0.0, 0.0, 100.0, 100.0), table);
        e.semantic_role = Some(SemanticRole::Table);
        let result = to_markdown_with_stats(&doc_with(vec![e]), &bare()).unwrap();
        assert!(result.content.contains("<!-- role:table -->\n| A | B |\n|---|---|\n| 1 | 2 |"));
        assert_eq!(result.stats.table_count, 1);
    }

    #[test]
    fn test_empty_elements_are_skipped() {
        let doc = doc_with(vec![el("   ", SemanticRole::Paragraph)]);
        let md = to_markdown(&doc, &bare()).unwrap();
        assert_eq!(md, "<!-- page:1 -->\n");
    }

    #[test]
    fn test_frontmatter_is_prepended() {
        let mut doc = doc_with(vec![el("Body", SemanticRole::Paragraph)]);
        doc.info.source_file = Some("a.pdf".into());
        let md = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert!(md.starts_with("---\ndocument:\n  source_file: \"a.pdf\"\n  pages: 1\n"));
        assert!(md.contains("---\n\n<!-- page:1 -->"));
    }
}
