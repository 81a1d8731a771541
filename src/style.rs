use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Политика скролла при перемещении курсора.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableScrollPolicy {
    KeepInView,
    CenterOnSelect,
}

/// Визуальные настройки таблицы меток.
#[derive(Clone)]
pub struct LabelTableStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    /// Стиль строки под курсором.
    pub highlight_style: Style,
    /// Стиль выделенных строк.
    pub selection_style: Style,
    /// Стиль имени для снятых флажков.
    pub unchecked_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub virtualize_rows: bool,
    pub scroll_policy: TableScrollPolicy,
}

impl Default for LabelTableStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            selection_style: Style::default().add_modifier(Modifier::BOLD),
            unchecked_style: Style::default().add_modifier(Modifier::DIM),
            highlight_symbol: "> ",
            borders: Borders::ALL,
            virtualize_rows: false,
            scroll_policy: TableScrollPolicy::KeepInView,
        }
    }
}
