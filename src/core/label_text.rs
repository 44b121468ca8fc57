use serde::{Deserialize, Serialize};

use crate::core::types::Size;

const ELLIPSIS: &str = "...";
const LINE_BREAK: &str = "<br>";

/// Approximate text metrics derived from font size.
///
/// Glyph widths are estimated as a fixed fraction of the font size; callers
/// needing exact shaping measure text in the rendering layer instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub font_size_px: f64,
    pub char_width_ratio: f64,
    pub line_height_ratio: f64,
}

impl TextMetrics {
    #[must_use]
    pub fn new(font_size_px: f64) -> Self {
        Self {
            font_size_px,
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }

    #[must_use]
    pub fn line_height(self) -> f64 {
        self.font_size_px * self.line_height_ratio
    }

    #[must_use]
    pub fn text_width(self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size_px * self.char_width_ratio
    }

    /// Size of a block of lines stacked vertically.
    #[must_use]
    pub fn measure_lines<S: AsRef<str>>(self, lines: &[S]) -> Size {
        let width = lines
            .iter()
            .map(|line| self.text_width(line.as_ref()))
            .fold(0.0, f64::max);
        Size::new(width, lines.len() as f64 * self.line_height())
    }
}

/// Shrinks `text` one character at a time, appending `...`, until it fits.
///
/// Returns the text unchanged when it already fits. When nothing but the
/// ellipsis fits, the ellipsis alone is returned.
#[must_use]
pub fn trim_text(text: &str, max_width: f64, metrics: TextMetrics) -> String {
    if metrics.text_width(text) <= max_width {
        return text.to_owned();
    }
    let chars: Vec<char> = text.chars().collect();
    for keep in (0..chars.len()).rev() {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push_str(ELLIPSIS);
        if metrics.text_width(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_owned()
}

/// Greedy word wrap; words wider than `max_width` on their own are trimmed.
#[must_use]
pub fn wrap_text(text: &str, max_width: f64, metrics: TextMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if metrics.text_width(&candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if metrics.text_width(word) <= max_width {
            current = word.to_owned();
        } else {
            lines.push(trim_text(word, max_width, metrics));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits explicit `<br>` line breaks.
#[must_use]
pub fn split_line_breaks(text: &str) -> Vec<String> {
    text.split(LINE_BREAK).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::{split_line_breaks, trim_text, wrap_text, TextMetrics};

    fn metrics() -> TextMetrics {
        // 10 px per character keeps the arithmetic readable.
        TextMetrics {
            font_size_px: 10.0,
            char_width_ratio: 1.0,
            line_height_ratio: 1.5,
        }
    }

    #[test]
    fn trim_keeps_fitting_text() {
        assert_eq!(trim_text("abc", 30.0, metrics()), "abc");
    }

    #[test]
    fn trim_shrinks_until_ellipsis_fits() {
        assert_eq!(trim_text("abcdefgh", 60.0, metrics()), "abc...");
        assert_eq!(trim_text("abcdefgh", 10.0, metrics()), "...");
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("north east south", 100.0, metrics());
        assert_eq!(lines, vec!["north east".to_owned(), "south".to_owned()]);
    }

    #[test]
    fn explicit_breaks_are_split() {
        assert_eq!(split_line_breaks("a<br>b"), vec!["a", "b"]);
    }

    #[test]
    fn measured_block_uses_widest_line() {
        let size = metrics().measure_lines(&["ab", "abcd"]);
        assert_eq!(size.width, 40.0);
        assert_eq!(size.height, 30.0);
    }
}
