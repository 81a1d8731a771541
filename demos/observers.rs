// Observer example: print every notification raised while editing labels.
use tui_labeltable::{Column, LabelNotification, LabelRecord, LabelTableState, SelectModifiers};

fn main() {
    let mut state = LabelTableState::from_records(vec![
        LabelRecord::new(1_u32, "person"),
        LabelRecord::new(2, "car"),
        LabelRecord::new(3, "person"),
    ]);

    state.subscribe(|notification| match notification {
        LabelNotification::Model(change) => println!("model: {change:?}"),
        LabelNotification::RecordChanged { row, record } => {
            println!("record {row}: {} (checked: {})", record.name, record.checked);
        }
        LabelNotification::SelectionChanged { rows } => println!("selection: {rows:?}"),
        LabelNotification::RowActivated { row, record, .. } => {
            println!("activated row {row}: shape {}", record.shape);
        }
    });

    // Click the checkbox of the second row, then double click it.
    state.handle_click(1, Column::Check, SelectModifiers::NONE);
    state.handle_double_click(1, Column::Name);

    // Filter hides the selected "car" label and drops it from the selection.
    state.set_filter("per");
    state.toggle_all_checked();

    if let Err(err) = state.rename_row(5, "truck") {
        println!("rename failed: {err}");
    }
}
