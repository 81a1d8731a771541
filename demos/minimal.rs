// Minimal example: a few labels, ascending sort, rendered into a buffer.
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::StatefulWidget;

use tui_labeltable::{LabelRecord, LabelTableState, LabelTableStyle, LabelTableView, SortMode};

fn main() {
    // Shape handles are plain ids owned by the host application.
    let mut state = LabelTableState::from_records(vec![
        LabelRecord::new(10_u32, "cat"),
        LabelRecord::new(11, "dog"),
        LabelRecord::new(12, "bird").with_checked(false),
    ]);
    state.set_sort(SortMode::Ascending);
    state.select_by_shape(11);

    let widget = LabelTableView::<u32>::new(LabelTableStyle::default());

    // Render into an in-memory buffer (no terminal required for the example).
    let area = Rect::new(0, 0, 30, 6);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer, &mut state);
}
