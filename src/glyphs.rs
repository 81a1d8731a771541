use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Cell;

use crate::model::LabelRecord;

/// Glyphs drawn in the check column.
#[derive(Clone, Copy, Debug)]
pub struct CheckGlyphs<'a> {
    pub checked: &'a str,
    pub unchecked: &'a str,
}

impl CheckGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            checked: "☑",
            unchecked: "☐",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            checked: "[x]",
            unchecked: "[ ]",
        }
    }
}

impl<'a> CheckGlyphs<'a> {
    #[inline]
    pub const fn glyph(&self, checked: bool) -> &'a str {
        if checked { self.checked } else { self.unchecked }
    }

    /// Display width of the widest glyph, used as the check column width.
    pub fn width(&self) -> u16 {
        let widest = Span::raw(self.checked)
            .width()
            .max(Span::raw(self.unchecked).width());
        u16::try_from(widest).unwrap_or(u16::MAX)
    }
}

pub fn check_cell<'a>(checked: bool, glyphs: &CheckGlyphs<'a>) -> Cell<'a> {
    Cell::from(glyphs.glyph(checked))
}

/// Name cell; `unchecked_style` applies when the record is unchecked.
pub fn name_cell<S>(record: &LabelRecord<S>, unchecked_style: Style) -> Cell<'_> {
    let line = if record.checked {
        Line::raw(record.name.as_str())
    } else {
        Line::styled(record.name.as_str(), unchecked_style)
    };
    Cell::from(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_covers_both_glyphs() {
        assert_eq!(CheckGlyphs::ascii().width(), 3);
        let uneven = CheckGlyphs {
            checked: "yes",
            unchecked: "-",
        };
        assert_eq!(uneven.width(), 3);
    }

    #[test]
    fn glyph_follows_check_state() {
        let glyphs = CheckGlyphs::ascii();
        assert_eq!(glyphs.glyph(true), "[x]");
        assert_eq!(glyphs.glyph(false), "[ ]");
    }
}
