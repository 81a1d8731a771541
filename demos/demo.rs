// Interactive demo: keyboard-driven label table with a live filter line.
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};

use tui_labeltable::{
    ActionOutcome, LabelAction, LabelRecord, LabelTableState, LabelTableStyle, LabelTableView,
};

const NAMES: [&str; 12] = [
    "person", "car", "dog", "bicycle", "person", "traffic light", "cat", "bus", "truck",
    "person", "stop sign", "bird",
];

struct App {
    state: LabelTableState<u32>,
    filter: String,
    filtering: bool,
    renames: u32,
    status: String,
}

impl App {
    fn new() -> Self {
        let records = NAMES
            .iter()
            .zip(0..)
            .map(|(name, shape)| LabelRecord::new(shape, *name))
            .collect();
        Self {
            state: LabelTableState::from_records(records),
            filter: String::new(),
            filtering: false,
            renames: 0,
            status: "/ filter  space check  a all  s sort  e rename  d delete  q quit".into(),
        }
    }

    fn handle_outcome(&mut self, outcome: ActionOutcome) {
        let ActionOutcome::Action(action) = outcome else {
            return;
        };
        match action {
            LabelAction::EditName => {
                if let Some(row) = self.state.cursor_row() {
                    self.renames += 1;
                    let name = format!("renamed-{}", self.renames);
                    if let Err(err) = self.state.rename_row(row, name) {
                        self.status = err.to_string();
                    }
                }
            }
            LabelAction::RemoveLabel => {
                for shape in self.state.selected_shapes() {
                    self.state.remove_by_shape(shape);
                }
            }
            _ => {}
        }
    }
}

fn render(frame: &mut Frame, app: &mut App, style: &LabelTableStyle<'_>) {
    let [table_area, filter_area, status_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let widget = LabelTableView::<u32>::new(style.clone());
    frame.render_stateful_widget(widget, table_area, &mut app.state);

    let cursor = if app.filtering { "_" } else { "" };
    frame.render_widget(
        Paragraph::new(format!("filter: {}{cursor}  sort: {:?}", app.filter, app.state.sort())),
        filter_area,
    );
    frame.render_widget(Paragraph::new(app.status.as_str()), status_area);
}

fn run_app(
    mut terminal: DefaultTerminal,
    mut app: App,
    style: LabelTableStyle<'_>,
) -> io::Result<()> {
    app.state.select_row(0);

    loop {
        terminal.draw(|frame| render(frame, &mut app, &style))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.filtering {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => app.filtering = false,
                KeyCode::Backspace => {
                    app.filter.pop();
                    app.state.set_filter(app.filter.clone());
                }
                KeyCode::Char(ch) => {
                    app.filter.push(ch);
                    app.state.set_filter(app.filter.clone());
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('/') => app.filtering = true,
            _ => {
                let outcome = app.state.handle_key(key);
                app.handle_outcome(outcome);
            }
        }
    }

    Ok(())
}

fn main() -> io::Result<()> {
    let mut style = LabelTableStyle::default();
    style.block_style = Style::default()
        .fg(Color::Rgb(221, 227, 235))
        .bg(Color::Rgb(24, 28, 36));
    style.border_style = Style::default().fg(Color::Rgb(92, 110, 140));
    style.selection_style = Style::default()
        .fg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    style.highlight_style = Style::default()
        .fg(Color::Rgb(255, 255, 255))
        .bg(Color::Rgb(52, 66, 96))
        .add_modifier(Modifier::BOLD);
    style.title = Some(Line::from("Labels"));

    let terminal = ratatui::init();
    let result = run_app(terminal, App::new(), style);
    ratatui::restore();
    result
}
