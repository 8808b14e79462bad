//! Text cleanup for extracted Markdown.
//!
//! The three core transforms are pure `&str -> String` functions meant to be
//! applied in this order: [`merge_hyphenated_words`], [`defragment_text`],
//! [`normalize_markdown`]. [`CleanupPipeline`] wraps them with Unicode
//! normalization, ligature repair and frontmatter preservation.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

static RE_HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{L}+)-[ \t]*\n[ \t]*(\p{Ll})").unwrap());

static RE_EMPTY_ROLE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*role:[^>]*-->\s*<!--\s*/role\s*-->[ \t]*\n?").unwrap());

static RE_STAR_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)\* ").unwrap());

static RE_LIST_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]\s|\d+[.)]\s)").unwrap());

static RE_HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}(?:\s|$)").unwrap());

static RE_MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ]{3,}").unwrap());

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

/// Rejoin words split by a hyphen at a line break.
///
/// `"bro- \n ken"` becomes `"broken"`. Only a lowercase continuation is
/// joined, so compounds such as `"Mac-\nBook"` keep their hyphen.
pub fn merge_hyphenated_words(text: &str) -> String {
    RE_HYPHEN_BREAK.replace_all(text, "$1$2").into_owned()
}

fn is_block_line(line: &str) -> bool {
    line.starts_with('|')
        || line.starts_with("<!--")
        || RE_HEADING_LINE.is_match(line)
        || RE_LIST_LINE.is_match(line)
}

fn ends_sentence(line: &str) -> bool {
    line.ends_with(['.', '?', '!', ':'])
}

/// Merge consecutive prose lines that belong to the same paragraph.
///
/// A line is appended to the previous one unless the previous line ends in
/// `.`, `?`, `!` or `:`. Blank lines are kept as paragraph breaks. Markdown
/// block lines (headings, list items, table rows, HTML comments, code fences
/// and their content, frontmatter) are never merged.
pub fn defragment_text(text: &str) -> String {
    let mut merged: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_fence = false;
    let mut in_frontmatter = false;

    fn flush(current: &mut String, merged: &mut Vec<String>) {
        if !current.is_empty() {
            merged.push(std::mem::take(current));
        }
    }

    for (idx, raw) in text.split('\n').enumerate() {
        let line = raw.trim();

        if idx == 0 && line == "---" {
            in_frontmatter = true;
            merged.push(line.to_string());
            continue;
        }
        if in_frontmatter {
            merged.push(raw.to_string());
            if line == "---" {
                in_frontmatter = false;
            }
            continue;
        }
        if line.starts_with("```") {
            flush(&mut current, &mut merged);
            merged.push(raw.trim_end().to_string());
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            merged.push(raw.to_string());
            continue;
        }
        if line.is_empty() {
            flush(&mut current, &mut merged);
            merged.push(String::new());
            continue;
        }
        if is_block_line(line) {
            flush(&mut current, &mut merged);
            merged.push(raw.trim_end().to_string());
            continue;
        }

        if current.is_empty() {
            current = line.to_string();
        } else if ends_sentence(&current) {
            merged.push(std::mem::replace(&mut current, line.to_string()));
        } else {
            current.push(' ');
            current.push_str(line);
        }
    }
    flush(&mut current, &mut merged);

    merged.join("\n")
}

/// Normalize Markdown formatting. Idempotent.
///
/// In order: CRLF to LF, removal of empty `<!-- role:... -->`/`<!-- /role -->`
/// pairs (repeated until none remain), `* ` bullets to `- `, a blank line
/// before every heading not already preceded by a blank line or an annotation
/// comment, and runs of blank lines collapsed to one. Frontmatter and fenced
/// code are left alone.
pub fn normalize_markdown(text: &str) -> String {
    let mut text = text.replace("\r\n", "\n");

    while RE_EMPTY_ROLE_PAIR.is_match(&text) {
        text = RE_EMPTY_ROLE_PAIR.replace_all(&text, "").into_owned();
    }

    let mut out: Vec<Cow<'_, str>> = Vec::new();
    let mut in_fence = false;
    let mut in_frontmatter = false;

    for (idx, line) in text.split('\n').enumerate() {
        let trimmed = line.trim();

        if idx == 0 && trimmed == "---" {
            in_frontmatter = true;
            out.push(Cow::Borrowed(line));
            continue;
        }
        if in_frontmatter {
            if trimmed == "---" {
                in_frontmatter = false;
            }
            out.push(Cow::Borrowed(line));
            continue;
        }
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            out.push(Cow::Borrowed(line));
            continue;
        }
        if in_fence {
            out.push(Cow::Borrowed(line));
            continue;
        }

        if trimmed.is_empty() {
            let previous_blank = out.last().is_some_and(|l| l.trim().is_empty());
            if !previous_blank {
                out.push(Cow::Borrowed(""));
            }
            continue;
        }

        if RE_HEADING_LINE.is_match(line) {
            let needs_gap = out.last().is_some_and(|prev| {
                let prev = prev.trim();
                !prev.is_empty() && !prev.starts_with("<!--")
            });
            if needs_gap {
                out.push(Cow::Borrowed(""));
            }
        }

        out.push(RE_STAR_BULLET.replace(line, "${1}- "));
    }

    out.join("\n")
}

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPreset {
    /// Unicode NFC and Markdown normalization only
    Minimal,
    /// Adds ligature repair, hyphenation repair and defragmentation
    #[default]
    Standard,
    /// Adds removal of private-use characters and runs of spaces
    Aggressive,
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove Private Use Area (PUA) characters
    pub remove_pua: bool,

    /// Rejoin words hyphenated at line breaks
    pub fix_hyphenation: bool,

    /// Merge prose lines into paragraphs
    pub defragment: bool,

    /// Collapse runs of three or more spaces
    pub collapse_spaces: bool,

    /// Apply [`normalize_markdown`]
    pub normalize_markdown: bool,

    /// Preserve YAML frontmatter during cleanup
    pub preserve_frontmatter: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_replacement_char: false,
            remove_pua: false,
            fix_hyphenation: false,
            defragment: false,
            collapse_spaces: false,
            normalize_markdown: true,
            preserve_frontmatter: true,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            fix_ligatures: true,
            remove_replacement_char: true,
            fix_hyphenation: true,
            defragment: true,
            ..Self::minimal()
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            remove_pua: true,
            collapse_spaces: true,
            ..Self::standard()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
#[derive(Debug, Clone, Default)]
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n");

        let frontmatter = if self.options.preserve_frontmatter {
            split_frontmatter(&text)
        } else {
            None
        };

        let mut result = match frontmatter {
            Some((fm, body)) => {
                let body = self.process_content(body);
                if body.is_empty() {
                    fm.to_string()
                } else {
                    format!("{}\n{}", fm, body)
                }
            }
            None => self.process_content(&text),
        };

        if !result.is_empty() && !result.ends_with('\n') {
            result.push('\n');
        }
        result
    }

    fn process_content(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Stage 1: character-level repair
        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }
        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }
        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }
        if self.options.remove_pua {
            result = remove_pua_chars(&result);
        }

        // Stage 2: line structure
        if self.options.fix_hyphenation {
            result = merge_hyphenated_words(&result);
        }
        if self.options.defragment {
            result = defragment_text(&result);
        }
        if self.options.collapse_spaces {
            result = RE_MULTI_SPACE.replace_all(&result, "  ").into_owned();
        }

        // Stage 3: Markdown formatting
        if self.options.normalize_markdown {
            result = normalize_markdown(&result);
        }

        result.trim().to_string()
    }
}

/// Split `---\n...\n---\n` frontmatter from the body.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let stripped = text.strip_prefix("---\n")?;
    let end = match stripped.find("\n---\n") {
        Some(pos) => pos + 5,
        None if stripped.ends_with("\n---") => stripped.len(),
        None => return None,
    };
    Some(text.split_at(4 + end))
}

fn remove_pua_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !(0xE000..=0xF8FF).contains(&code)
                && !(0xF0000..=0xFFFFD).contains(&code)
                && !(0x100000..=0x10FFFD).contains(&code)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_hyphenated_words() {
        assert_eq!(
            merge_hyphenated_words("This is a bro- \n ken sentence."),
            "This is a broken sentence."
        );
        assert_eq!(merge_hyphenated_words("infor-\nmation"), "information");
        assert_eq!(merge_hyphenated_words("Mac-\nBook"), "Mac-\nBook");
        assert_eq!(merge_hyphenated_words("well-known fact"), "well-known fact");
    }

    #[test]
    fn test_defragment_merges_prose() {
        let text = "This line continues\nonto the next one.\nA new sentence starts";
        assert_eq!(
            defragment_text(text),
            "This line continues onto the next one.\nA new sentence starts"
        );
    }

    #[test]
    fn test_defragment_keeps_paragraph_breaks() {
        let text = "First para\nstill first\n\nSecond para";
        assert_eq!(defragment_text(text), "First para still first\n\nSecond para");
    }

    #[test]
    fn test_defragment_respects_markdown_blocks() {
        let text = "<!-- role:heading level:1 -->\n# Title\nIntro text\nwraps here\n- item one\n- item two\n| a | b |\n|---|---|";
        assert_eq!(
            defragment_text(text),
            "<!-- role:heading level:1 -->\n# Title\nIntro text wraps here\n- item one\n- item two\n| a | b |\n|---|---|"
        );
    }

    #[test]
    fn test_defragment_leaves_fences_and_frontmatter() {
        let text = "---\ndocument:\n  pages: 1\n---\ncode follows\n```\nlet a = 1\nlet b = 2\n```";
        assert_eq!(
            defragment_text(text),
            "---\ndocument:\n  pages: 1\n---\ncode follows\n```\nlet a = 1\nlet b = 2\n```"
        );
    }

    #[test]
    fn test_normalize_markdown() {
        let messy = "# Title\r\n* Item 1\n* Item 2\n\n\n\n# Section 2\nSome text.\n<!-- role:artifact -->\n<!-- /role -->\nFinal line.";
        let normalized = normalize_markdown(messy);
        assert_eq!(
            normalized,
            "# Title\n- Item 1\n- Item 2\n\n# Section 2\nSome text.\nFinal line."
        );
    }

    #[test]
    fn test_normalize_heading_spacing() {
        assert_eq!(normalize_markdown("Text\n## Next"), "Text\n\n## Next");
        assert_eq!(
            normalize_markdown("<!-- role:heading level:2 -->\n## Next"),
            "<!-- role:heading level:2 -->\n## Next"
        );
        assert_eq!(normalize_markdown("#hashtag\ntext"), "#hashtag\ntext");
    }

    #[test]
    fn test_normalize_nested_empty_pairs() {
        let text = "A\n<!-- role:table -->\n<!-- role:caption -->\n<!-- /role -->\n<!-- /role -->\nB";
        assert_eq!(normalize_markdown(text), "A\nB");
    }

    #[test]
    fn test_normalize_keeps_code_and_frontmatter() {
        let text = "---\ntitle: x\n---\n```\n* not a bullet\n\n\n\n```";
        assert_eq!(normalize_markdown(text), text);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "# Title\n* a\n\n\n\n## B\ntext\n<!-- role:artifact -->  \n<!-- /role -->\n",
            "<!-- page:1 -->\n<!-- role:heading level:1 -->\n# H\n   \n\n\nbody\n# Again",
            "\n\n\n# Leading\n",
        ];
        for input in inputs {
            let once = normalize_markdown(input);
            assert_eq!(normalize_markdown(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_ligature_fix() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        assert_eq!(pipeline.process("ﬁnding ﬂowers"), "finding flowers\n");
    }

    #[test]
    fn test_remove_replacement_char() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        assert_eq!(pipeline.process("Hello\u{FFFD}World"), "HelloWorld\n");
    }

    #[test]
    fn test_unicode_normalization() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Minimal);
        let result = pipeline.process("cafe\u{0301}");
        assert_eq!(result, "caf\u{e9}\n");
    }

    #[test]
    fn test_frontmatter_preservation() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Aggressive);
        let text = "---\ndocument:\n  source_file: \"a.pdf\"\n---\n\nContent with   extra   spaces\nand a wrapped line.";
        let result = pipeline.process(text);
        assert_eq!(
            result,
            "---\ndocument:\n  source_file: \"a.pdf\"\n---\n\nContent with  extra  spaces and a wrapped line.\n"
        );
    }

    #[test]
    fn test_minimal_does_not_merge_lines() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Minimal);
        assert_eq!(pipeline.process("one\ntwo"), "one\ntwo\n");
    }
}
