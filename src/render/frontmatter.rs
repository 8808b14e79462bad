//! YAML frontmatter carrying document provenance.

use chrono::{Local, NaiveDate};
use sha2::{Digest, Sha256};

use crate::model::DocumentInfo;

/// Deterministic document identifier: the first 16 hex characters of the
/// SHA-256 digest of the source bytes.
pub fn document_id_from_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

/// Current local time as an ISO 8601 timestamp without offset.
pub fn extraction_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS`, trailing parts optional)
/// into ISO 8601. Returns `None` for anything that is not a real date.
pub fn parse_pdf_date(date: &str) -> Option<String> {
    let date = date.trim();
    let date = date.strip_prefix("D:").unwrap_or(date);
    let digits: String = date.chars().take_while(|c| c.is_ascii_digit()).take(14).collect();
    if digits.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        match digits.get(range) {
            Some(s) if !s.is_empty() => s.parse().ok(),
            _ => Some(default),
        }
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let month = field(4..6, 1)?;
    let day = field(6..8, 1)?;
    let hour = field(8..10, 0)?;
    let minute = field(10..12, 0)?;
    let second = field(12..14, 0)?;

    let datetime = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Render the frontmatter block for a document of `page_count` pages.
///
/// Image sources (with [`DocumentInfo::image`] set) get `dimensions` and
/// `format` instead of `pages`. The block ends with `---\n`.
pub fn render_frontmatter(info: &DocumentInfo, page_count: u32) -> String {
    let mut lines = vec!["---".to_string(), "document:".to_string()];

    lines.push(format!(
        "  source_file: \"{}\"",
        escape_yaml(info.source_file.as_deref().unwrap_or(""))
    ));

    match &info.image {
        Some(image) => {
            lines.push(format!("  dimensions: \"{}x{}\"", image.width, image.height));
            lines.push(format!("  format: \"{}\"", escape_yaml(&image.format)));
        }
        None => lines.push(format!("  pages: {}", page_count)),
    }

    if let Some(method) = info.extraction_method.as_deref().filter(|m| !m.is_empty()) {
        lines.push(format!("  extraction_method: \"{}\"", escape_yaml(method)));
    }
    lines.push(format!(
        "  extraction_date: \"{}\"",
        escape_yaml(info.extraction_date.as_deref().unwrap_or(""))
    ));
    if let Some(score) = info.confidence_score {
        lines.push(format!("  confidence_score: {:.2}", score));
    }
    lines.push(format!("  language: \"{}\"", escape_yaml(&info.language)));
    lines.push(format!(
        "  document_id: \"{}\"",
        escape_yaml(info.document_id.as_deref().unwrap_or(""))
    ));

    lines.push(String::new());
    lines.push("metadata:".to_string());
    let meta = &info.metadata;
    let fields = [
        ("title", &meta.title),
        ("author", &meta.author),
        ("subject", &meta.subject),
        ("creator", &meta.creator),
        ("creation_date", &meta.creation_date),
    ];
    for (key, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            lines.push(format!("  {}: \"{}\"", key, escape_yaml(value)));
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());

    lines.join("\n")
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
