//! Handwritten-style notes as standalone SVG documents

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::info;

use crate::domain::study::NoteRenderer;
use crate::domain::DomainError;

const FONT_FAMILY: &str = "NoteHand";
const AVG_CHAR_WIDTH_FACTOR: f32 = 0.55;
const MIN_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 100;

/// Page and font settings for rendered notes
#[derive(Debug, Clone)]
pub struct NoteStyle {
    pub font_path: PathBuf,
    pub font_size: u32,
    pub text_color: String,
    pub background_color: String,
    pub max_width_pixels: u32,
    pub padding: u32,
    pub line_spacing_factor: f32,
}

impl Default for NoteStyle {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from("./fonts/MyFont.ttf"),
            font_size: 35,
            text_color: "#000080".to_string(),
            background_color: "#FFFFF0".to_string(),
            max_width_pixels: 700,
            padding: 50,
            line_spacing_factor: 1.3,
        }
    }
}

impl NoteStyle {
    fn chars_per_line(&self) -> usize {
        let estimate = self.max_width_pixels as f32 / (self.font_size as f32 * AVG_CHAR_WIDTH_FACTOR);
        (estimate as i64 - 5).max(1) as usize
    }

    fn line_height(&self) -> u32 {
        (self.font_size as f32 * self.line_spacing_factor) as u32
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap_paragraph(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let len = word.chars().count();
        if current_len > 0 && current_len + 1 + len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap every paragraph, keeping blank lines as empty entries
fn layout_lines(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|paragraph| {
            if paragraph.trim().is_empty() {
                vec![String::new()]
            } else {
                wrap_paragraph(paragraph, width)
            }
        })
        .collect()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn font_format(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("otf") => "opentype",
        Some("woff") => "woff",
        Some("woff2") => "woff2",
        _ => "truetype",
    }
}

/// Renders notes as SVG text in an embedded custom font
#[derive(Debug, Clone, Default)]
pub struct SvgNoteRenderer {
    style: NoteStyle,
}

impl SvgNoteRenderer {
    pub fn new(style: NoteStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &NoteStyle {
        &self.style
    }

    async fn load_font(&self) -> Result<Vec<u8>, DomainError> {
        let path = &self.style.font_path;
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(DomainError::configuration(format!(
                "Custom font file not found at '{}'",
                path.display()
            )));
        }

        tokio::fs::read(path).await.map_err(|e| {
            DomainError::configuration(format!("Could not load font from '{}': {}", path.display(), e))
        })
    }

    fn build_svg(&self, lines: &[String], font: &[u8]) -> String {
        let style = &self.style;
        let line_height = style.line_height();
        let width = (style.max_width_pixels + 2 * style.padding).max(MIN_WIDTH);
        let height = (lines.len() as u32 * line_height + 2 * style.padding).max(MIN_HEIGHT);
        let mime = mime_guess::from_path(&style.font_path)
            .first_raw()
            .unwrap_or("font/ttf");

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        let _ = writeln!(
            svg,
            "<defs><style>@font-face {{ font-family: '{}'; src: url(data:{};base64,{}) format('{}'); }}</style></defs>",
            FONT_FAMILY,
            mime,
            STANDARD.encode(font),
            font_format(&style.font_path)
        );
        let _ = writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape_xml(&style.background_color)
        );
        let _ = writeln!(
            svg,
            r#"<text font-family="{}" font-size="{}" fill="{}" xml:space="preserve">"#,
            FONT_FAMILY,
            style.font_size,
            escape_xml(&style.text_color)
        );

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            // y is the baseline; lines are laid out from the top padding
            let y = style.padding + i as u32 * line_height + style.font_size;
            let _ = writeln!(
                svg,
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                style.padding,
                y,
                escape_xml(line)
            );
        }

        svg.push_str("</text>\n</svg>\n");
        svg
    }
}

#[async_trait]
impl NoteRenderer for SvgNoteRenderer {
    async fn render(&self, text: &str, output: &Path) -> Result<(), DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::validation("No text to render"));
        }

        let font = self.load_font().await?;
        let lines = layout_lines(text, self.style.chars_per_line());
        let svg = self.build_svg(&lines, &font);

        tokio::fs::write(output, svg).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", output.display(), e))
        })?;

        info!(path = %output.display(), lines = lines.len(), "Rendered handwriting note");
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "svg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer_in(dir: &Path) -> SvgNoteRenderer {
        let font_path = dir.join("hand.ttf");
        std::fs::write(&font_path, b"fake-font-bytes").unwrap();
        SvgNoteRenderer::new(NoteStyle {
            font_path,
            ..NoteStyle::default()
        })
    }

    #[test]
    fn test_chars_per_line() {
        // 700 / (35 * 0.55) = 36.36 -> 36 - 5
        assert_eq!(NoteStyle::default().chars_per_line(), 31);
        assert_eq!(NoteStyle::default().line_height(), 45);
    }

    #[test]
    fn test_wrap_keeps_words_whole() {
        let lines = wrap_paragraph("stress strain modulus elasticity", 14);
        assert_eq!(lines, vec!["stress strain", "modulus", "elasticity"]);

        let lines = wrap_paragraph("supercalifragilistic ok", 5);
        assert_eq!(lines, vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_layout_keeps_blank_lines() {
        let lines = layout_lines("First point\n\nSecond point", 40);
        assert_eq!(lines, vec!["First point", "", "Second point"]);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_font_format() {
        assert_eq!(font_format(Path::new("x.TTF")), "truetype");
        assert_eq!(font_format(Path::new("x.otf")), "opentype");
        assert_eq!(font_format(Path::new("x.woff2")), "woff2");
    }

    #[tokio::test]
    async fn test_render_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());
        let output = dir.path().join("note.svg");

        renderer
            .render("Stress < strain?\n\nE = σ / ε", &output)
            .await
            .unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(&STANDARD.encode(b"fake-font-bytes")));
        assert!(svg.contains("format('truetype')"));
        assert!(svg.contains(r##"fill="#FFFFF0""##));
        assert!(svg.contains(r#"<tspan x="50" y="85">Stress &lt; strain?</tspan>"#));
        assert!(svg.contains(r#"<tspan x="50" y="175">E = σ / ε</tspan>"#));
        assert_eq!(svg.matches("<tspan").count(), 2);
    }

    #[tokio::test]
    async fn test_small_canvas_has_minimum_size() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("hand.ttf");
        std::fs::write(&font_path, b"f").unwrap();
        let renderer = SvgNoteRenderer::new(NoteStyle {
            font_path,
            font_size: 10,
            max_width_pixels: 50,
            padding: 5,
            ..NoteStyle::default()
        });
        let output = dir.path().join("tiny.svg");

        renderer.render("hi", &output).await.unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains(r#"width="200" height="100""#));
    }

    #[tokio::test]
    async fn test_missing_font_fails() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = SvgNoteRenderer::new(NoteStyle {
            font_path: dir.path().join("missing.ttf"),
            ..NoteStyle::default()
        });

        let err = renderer
            .render("text", &dir.path().join("out.svg"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(!dir.path().join("out.svg").exists());
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());

        assert!(renderer.render("  \n ", &dir.path().join("x.svg")).await.is_err());
    }
}
