use unicode_width::UnicodeWidthStr;

/// Font metrics used to size text rows inside an entity card.
#[derive(Debug, Clone)]
pub struct TextMetrics {
    /// Advance of one narrow glyph, as a fraction of the font size.
    pub char_width_ratio: f64,
    /// Row height as a fraction of the font size.
    pub line_height_ratio: f64,
    pub title_font_size: f64,
    pub field_font_size: f64,
    /// Gap between stacked rows and the left inset of text rows.
    pub inner_padding: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.16,
            title_font_size: 24.0,
            field_font_size: 18.0,
            inner_padding: 5.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * font_size * self.char_width_ratio
    }

    pub fn text_height(&self, font_size: f64) -> f64 {
        font_size * self.line_height_ratio
    }

    /// Width and height of a single line of text.
    pub fn text_size(&self, text: &str, font_size: f64) -> (f64, f64) {
        (self.text_width(text, font_size), self.text_height(font_size))
    }
}
