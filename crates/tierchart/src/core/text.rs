//! Shared text utilities for box measurement and rendering
//!
//! The cell measurer and the ASCII preview must agree on how a label flows
//! inside a box, so both wrap through [`wrap_label`].

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `text` in terminal columns
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Wrap text to fit within a maximum width, breaking on word boundaries.
///
/// Words wider than `max_width` are split across lines so every returned
/// line fits, except when a single glyph is itself wider than `max_width`.
/// If `max_width` is 0, returns the label unchanged as a single line.
///
/// # Example
/// ```
/// use tierchart::core::wrap_label;
///
/// let lines = wrap_label("Head of Platform Engineering", 12);
/// assert_eq!(lines, vec!["Head of", "Platform", "Engineering"]);
/// ```
pub fn wrap_label(label: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || display_width(label) <= max_width {
        return vec![label.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in label.split_whitespace() {
        let word_width = display_width(word);

        if word_width > max_width {
            if current_width > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            for piece in break_word(word, max_width) {
                current_width = display_width(&piece);
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                }
                current_line = piece;
            }
        } else if current_width == 0 {
            current_line = word.to_string();
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_width = word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Split one word into chunks no wider than `max_width` columns
fn break_word(word: &str, max_width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0;

    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
