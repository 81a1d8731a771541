use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Range;

use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Table,
    TableState,
};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::glyphs::{CheckGlyphs, check_cell, name_cell};
use crate::state::LabelTableState;
use crate::store::LabelStore;
use crate::style::LabelTableStyle;

/// Виджет таблицы меток (колонка флажков + колонка имён, stateful).
pub struct LabelTableView<'a, S> {
    style: LabelTableStyle<'a>,
    glyphs: CheckGlyphs<'a>,
    _shape: PhantomData<fn() -> S>,
}

impl<'a, S> LabelTableView<'a, S> {
    pub const fn new(style: LabelTableStyle<'a>) -> Self {
        Self {
            style,
            glyphs: CheckGlyphs::unicode(),
            _shape: PhantomData,
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: CheckGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }
}

impl<'a, S: Copy + Eq + Hash> LabelTableView<'a, S> {
    #[inline]
    fn build_rows<'r>(
        &self,
        store: &'r LabelStore<S>,
        rows: &[usize],
        selected: &FxHashSet<usize>,
    ) -> Vec<Row<'r>>
    where
        'a: 'r,
    {
        let mut built = Vec::with_capacity(rows.len());
        for &source in rows {
            let Some(record) = store.get(source) else {
                continue;
            };
            let mut cells = SmallVec::<[_; 2]>::new();
            cells.push(check_cell(record.checked, &self.glyphs));
            cells.push(name_cell(record, self.style.unchecked_style));
            let mut row = Row::new(cells);
            if selected.contains(&source) {
                row = row.style(self.style.selection_style);
            }
            built.push(row);
        }
        built
    }

    #[inline]
    fn build_table<'r>(&self, rows: Vec<Row<'r>>, block: Block<'r>) -> Table<'r>
    where
        'a: 'r,
    {
        let constraints = [Constraint::Length(self.glyphs.width()), Constraint::Fill(1)];
        Table::new(rows, constraints)
            .style(self.style.block_style)
            .block(block)
            .row_highlight_style(self.style.highlight_style)
            .highlight_symbol(self.style.highlight_symbol)
    }

    #[inline]
    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        offset: usize,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = offset.min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }

    fn visible_range(&self, offset: usize, total_rows: usize, inner_height: usize) -> Range<usize> {
        if self.style.virtualize_rows {
            let start = offset.min(total_rows);
            start..(start + inner_height).min(total_rows)
        } else {
            0..total_rows
        }
    }
}

impl<S: Copy + Eq + Hash> StatefulWidget for LabelTableView<'_, S> {
    type State = LabelTableState<S>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = block.inner(area).height as usize;
        state.prepare_render(inner_height, self.style.scroll_policy);

        let parts = state.render_parts();
        let total_rows = parts.rows.len();
        let range = self.visible_range(parts.table_state.offset(), total_rows, inner_height);
        let rows = self.build_rows(parts.store, &parts.rows[range.clone()], parts.selected);
        let scroll_rows = total_rows.saturating_sub(inner_height);

        // Virtualized rows start at 0, so the table gets a shifted copy of the state.
        let mut local_state = self.style.virtualize_rows.then(|| {
            let mut local = *parts.table_state;
            *local.offset_mut() = 0;
            local.select(
                local
                    .selected()
                    .filter(|selected| range.contains(selected))
                    .map(|selected| selected - range.start),
            );
            local
        });
        let table_state: &mut TableState = match local_state.as_mut() {
            Some(local) => local,
            None => &mut *parts.table_state,
        };

        let (table_area, table_block, scrollbar_area) = if scroll_rows > 0 {
            let table_area = Rect {
                width: area.width.saturating_sub(1),
                ..area
            };
            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y,
                width: 1,
                height: area.height,
            };
            let mut table_borders = self.style.borders;
            table_borders.remove(Borders::RIGHT);
            (table_area, block.borders(table_borders), Some(scrollbar_area))
        } else {
            (area, block, None)
        };

        let table = self.build_table(rows, table_block);
        table.render(table_area, buf, table_state);

        if let Some(scrollbar_area) = scrollbar_area {
            let offset = parts.table_state.offset();
            Self::render_scrollbar(scrollbar_area, buf, offset, inner_height, scroll_rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LabelRecord;

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn state_of(count: usize) -> LabelTableState<usize> {
        LabelTableState::from_records(
            (0..count)
                .map(|idx| LabelRecord::new(idx, format!("label-{idx}")))
                .collect(),
        )
    }

    #[test]
    fn renders_visible_rows_with_check_glyphs() {
        let mut state = state_of(3);
        state.toggle_checked(1).unwrap();
        state.set_filter("label-1");

        let widget = LabelTableView::<usize>::new(LabelTableStyle::default())
            .glyphs(CheckGlyphs::ascii());
        let area = Rect::new(0, 0, 24, 5);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer, &mut state);

        let text = buffer_text(&buffer);
        assert!(text.contains("[ ]"));
        assert!(text.contains("label-1"));
        assert!(!text.contains("label-0"));
        assert!(!text.contains("[x]"));
    }

    #[test]
    fn render_smoke_with_scrollbar() {
        let mut state = state_of(12);
        state.select_row(11);

        let widget = LabelTableView::<usize>::new(LabelTableStyle::default());
        let area = Rect::new(0, 0, 20, 6);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer, &mut state);

        assert_eq!(state.offset(), 8);
        assert!(buffer_text(&buffer).contains("label-11"));
    }

    #[test]
    fn virtualized_render_keeps_cursor_row() {
        let mut state = state_of(30);
        state.select_row(20);

        let style = LabelTableStyle {
            virtualize_rows: true,
            ..LabelTableStyle::default()
        };
        let widget = LabelTableView::<usize>::new(style).glyphs(CheckGlyphs::ascii());
        let area = Rect::new(0, 0, 24, 6);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer, &mut state);

        let text = buffer_text(&buffer);
        assert!(text.contains("label-20"));
        assert!(!text.contains("label-0"));
        assert_eq!(state.cursor_row(), Some(20));
    }
}
