//! Rendering options and configuration.

use serde::{Deserialize, Serialize};

use super::CleanupOptions;
use crate::error::{Error, Result};

/// Options for rendering annotated Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Include YAML frontmatter with provenance
    pub include_frontmatter: bool,

    /// Emit `<!-- page:N -->` markers
    pub page_markers: bool,

    /// Emit `<!-- role:ROLE -->` markers
    pub role_annotations: bool,

    /// Emit `<!-- reading-order:N -->` markers
    pub reading_order_markers: bool,

    /// Emit `<!-- confidence:0.NN -->` and `[uncertain: ...]` for flagged elements
    pub mark_uncertain: bool,

    /// What to do with elements tagged as headers, footers or page numbers
    pub noise_handling: NoiseHandling,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Text cleanup applied to the rendered output
    pub cleanup: Option<CleanupOptions>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable page markers.
    pub fn with_page_markers(mut self, enabled: bool) -> Self {
        self.page_markers = enabled;
        self
    }

    /// Enable or disable role annotations.
    pub fn with_role_annotations(mut self, enabled: bool) -> Self {
        self.role_annotations = enabled;
        self
    }

    /// Enable or disable reading-order markers.
    pub fn with_reading_order(mut self, enabled: bool) -> Self {
        self.reading_order_markers = enabled;
        self
    }

    /// Enable or disable uncertainty marking.
    pub fn with_uncertainty(mut self, enabled: bool) -> Self {
        self.mark_uncertain = enabled;
        self
    }

    /// Set how tagged noise is rendered.
    pub fn with_noise_handling(mut self, handling: NoiseHandling) -> Self {
        self.noise_handling = handling;
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: super::CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Validate options.
    pub fn validate(&self) -> Result<()> {
        if !(1..=6).contains(&self.max_heading_level) {
            return Err(Error::InvalidOption(format!(
                "max_heading_level must be in 1..=6, got {}",
                self.max_heading_level
            )));
        }
        Ok(())
    }

    /// Plain Markdown: no frontmatter and no annotation comments.
    pub fn plain() -> Self {
        Self {
            include_frontmatter: false,
            page_markers: false,
            role_annotations: false,
            reading_order_markers: false,
            mark_uncertain: false,
            noise_handling: NoiseHandling::Omit,
            ..Self::default()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: true,
            page_markers: true,
            role_annotations: true,
            reading_order_markers: true,
            mark_uncertain: true,
            noise_handling: NoiseHandling::Annotate,
            max_heading_level: 6,
            cleanup: None,
        }
    }
}

/// How elements tagged as noise are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseHandling {
    /// Keep them, annotated with their `header`/`footer`/`page_number` role
    #[default]
    Annotate,
    /// Leave them out of the output
    Omit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_frontmatter(false)
            .with_max_heading(9)
            .with_noise_handling(NoiseHandling::Omit);

        assert!(!options.include_frontmatter);
        assert_eq!(options.max_heading_level, 6);
        assert_eq!(options.noise_handling, NoiseHandling::Omit);
        assert!(options.role_annotations);
    }

    #[test]
    fn test_plain_disables_annotations() {
        let options = RenderOptions::plain();
        assert!(!options.page_markers);
        assert!(!options.role_annotations);
        assert_eq!(options.noise_handling, NoiseHandling::Omit);
    }

    #[test]
    fn test_validate_heading_level_range() {
        assert!(RenderOptions::default().validate().is_ok());

        for level in [0, 7] {
            let options = RenderOptions {
                max_heading_level: level,
                ..Default::default()
            };
            assert!(matches!(options.validate(), Err(Error::InvalidOption(_))));
        }
    }

    #[test]
    fn test_noise_handling_serde() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"noise_handling": "omit"}"#).unwrap();
        assert_eq!(options.noise_handling, NoiseHandling::Omit);
        assert!(options.page_markers);
    }
}
