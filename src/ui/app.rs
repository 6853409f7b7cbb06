use std::mem;
use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::models::RecordId;
use crate::store::{FocusRequest, RecordStore, SubmitOutcome};

use super::forms::{accepts_char, build_line, field_prefix, field_value, FormField};
use super::helpers::format_thousands;

/// Title bar plus notification badge.
const HEADER_HEIGHT: u16 = 3;
const SEARCH_HEIGHT: u16 = 3;
/// Four field rows plus borders.
const FORM_HEIGHT: u16 = 6;
/// Footer space reserved for key instructions.
const FOOTER_HEIGHT: u16 = 3;
const PAGE_STEP: isize = 5;
const TABLE_HEADERS: [&str; 7] = [
    "Plate_Number",
    "Yuk_bilan",
    "Sana (Date)",
    "Yuksiz",
    "Sof_Vazin",
    "Price",
    "Check",
];
const NO_MATCHES: &str = "No entries match the search.";

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Table,
    Form(FormField),
    Searching,
}

/// Central application state: the record store plus what only the terminal
/// needs (focus, table cursor, deferred focus).
pub struct App {
    store: RecordStore,
    mode: Mode,
    cursor: usize,
    deferred_focus: Option<FormField>,
}

impl App {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            mode: Mode::Table,
            cursor: 0,
            deferred_focus: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Process one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Table);

        self.mode = match mode {
            Mode::Table => self.handle_table_key(code, &mut exit),
            Mode::Form(field) => self.handle_form_key(code, field),
            Mode::Searching => self.handle_search_key(code),
        };

        self.apply_focus_request();
        self.ensure_in_bounds();
        exit
    }

    /// Ctrl+U: wipe the search query while searching.
    pub(crate) fn handle_ctrl_u(&mut self) {
        if self.mode == Mode::Searching {
            self.store.set_search_query(String::new());
            self.ensure_in_bounds();
        }
    }

    /// Advance notification timers.
    pub(crate) fn tick(&mut self, now: Instant) {
        if self.store.tick(now) {
            debug!("notification dismissed");
        }
    }

    /// Called once a frame has been drawn; honours focus moves that were
    /// scheduled for after the paint.
    pub(crate) fn after_draw(&mut self) {
        if let Some(field) = self.deferred_focus.take() {
            self.mode = Mode::Form(field);
        }
    }

    fn handle_table_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE_STEP),
            KeyCode::PageDown => self.move_cursor(PAGE_STEP),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.visible_len().saturating_sub(1),
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    self.store.select(&id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.cursor_id() {
                    self.store.begin_edit(&id);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.cursor_id() {
                    self.store.delete(&id);
                }
            }
            KeyCode::Char('+') => self.store.begin_new(),
            KeyCode::Char('e') | KeyCode::Char('E') => {
                self.store.edit_selected();
            }
            KeyCode::Char('-') => self.store.delete_selected(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.store.reload_seed();
                self.cursor = 0;
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.relay(Instant::now());
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.store.reset_form(),
            KeyCode::Char('f') | KeyCode::Char('/') => return Mode::Searching,
            KeyCode::Tab | KeyCode::Char('i') => return Mode::Form(FormField::default()),
            _ => {}
        }
        Mode::Table
    }

    fn handle_form_key(&mut self, code: KeyCode, field: FormField) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Table,
            KeyCode::Tab | KeyCode::Down => return Mode::Form(field.next()),
            KeyCode::BackTab | KeyCode::Up => return Mode::Form(field.previous()),
            KeyCode::Backspace => {
                if let Some(draft_field) = field.draft_field() {
                    let mut value = self.store.draft().field(draft_field).to_string();
                    value.pop();
                    self.store.set_field(draft_field, value);
                }
            }
            KeyCode::Enter => match self.store.submit() {
                Ok(SubmitOutcome::Created(_)) => {
                    self.cursor = 0;
                    return Mode::Table;
                }
                Ok(SubmitOutcome::Updated(_)) => return Mode::Table,
                // Focus request already points at the offending field.
                Err(_) => {}
            },
            KeyCode::Char(ch) => {
                if let Some(draft_field) = field.draft_field() {
                    let current = self.store.draft().field(draft_field);
                    if accepts_char(draft_field, current, ch) {
                        let mut value = current.to_string();
                        value.push(ch);
                        self.store.set_field(draft_field, value);
                    }
                }
            }
            _ => {}
        }
        Mode::Form(field)
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter => return Mode::Table,
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Backspace => {
                let mut query = self.store.search_query().to_string();
                query.pop();
                self.store.set_search_query(query);
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                let mut query = self.store.search_query().to_string();
                query.push(ch);
                self.store.set_search_query(query);
                self.cursor = 0;
            }
            _ => {}
        }
        Mode::Searching
    }

    fn apply_focus_request(&mut self) {
        match self.store.take_focus_request() {
            Some(FocusRequest::Immediate(field)) => self.mode = Mode::Form(field.into()),
            Some(FocusRequest::AfterPaint(field)) => self.deferred_focus = Some(field.into()),
            None => {}
        }
    }

    fn visible_len(&self) -> usize {
        self.store.filtered().len()
    }

    fn cursor_id(&self) -> Option<RecordId> {
        self.store
            .filtered()
            .get(self.cursor)
            .map(|row| row.record.id.clone())
    }

    fn move_cursor(&mut self, offset: isize) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let new = (self.cursor as isize + offset).clamp(0, len as isize - 1);
        self.cursor = new as usize;
    }

    fn ensure_in_bounds(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_search_bar(frame, chunks[1]);
        self.draw_form(frame, chunks[2]);
        self.draw_table(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                "Caravan Weigh",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
        ];
        if let Some(message) = self.store.notification() {
            spans.push(Span::styled(
                format!(" {message} "),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ));
        }
        let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let searching = self.mode == Mode::Searching;
        let query = self.store.search_query();
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(focus_style(searching));
        let text = if query.is_empty() && !searching {
            Span::styled("Search caravan records...", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(query.to_string())
        };
        let paragraph = Paragraph::new(Line::from(text)).block(block.clone());
        frame.render_widget(paragraph, area);

        if searching {
            let inner = block.inner(area);
            let cursor_x = inner.x + query.chars().count() as u16;
            frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let active = match self.mode {
            Mode::Form(field) => Some(field),
            _ => None,
        };
        let title = match self.store.editing().and_then(|id| self.store.record(id)) {
            Some(record) => format!("Edit Entry - {}", record.plate_number),
            None => "New Entry".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(focus_style(active.is_some()));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        let draft = self.store.draft();
        let left: Vec<Line> = FormField::LEFT
            .iter()
            .map(|field| build_line(draft, *field, active == Some(*field)))
            .collect();
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let submit_label = if self.store.is_editing() {
            "Save Changes"
        } else {
            "Add Entry"
        };
        let mut right: Vec<Line> = FormField::RIGHT
            .iter()
            .map(|field| build_line(draft, *field, active == Some(*field)))
            .collect();
        right.push(Line::from(vec![
            Span::styled("[Enter]", key_style),
            Span::raw(format!(" {submit_label}   ")),
            Span::styled("[c]", key_style),
            Span::raw(" Clear"),
        ]));

        frame.render_widget(Paragraph::new(left), columns[0]);
        frame.render_widget(Paragraph::new(right), columns[1]);

        if let Some(field) = active {
            let (row, column) = field.grid_position();
            let rect = columns[column as usize];
            let offset = field_prefix(field).chars().count() + field_value(draft, field).chars().count();
            let cursor_x = (rect.x + offset as u16).min(rect.right().saturating_sub(1));
            frame.set_cursor_position((cursor_x, rect.y + row));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Records ({})", self.store.records().len()))
            .border_style(focus_style(matches!(self.mode, Mode::Table)));
        let header = Row::new(TABLE_HEADERS.iter().map(|h| Cell::from(*h)))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(14),
            Constraint::Length(11),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Min(10),
        ];

        let filtered = self.store.filtered();
        if filtered.is_empty() {
            let placeholder = Paragraph::new(NO_MATCHES)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            let table = Table::new(Vec::<Row>::new(), widths).header(header).block(block.clone());
            frame.render_widget(table, area);
            let inner = block.inner(area);
            if inner.height > 2 {
                let row_area = Rect {
                    y: inner.y + 2,
                    height: 1,
                    ..inner
                };
                frame.render_widget(placeholder, row_area);
            }
            return;
        }

        let selected = self.store.selected();
        let rows = filtered.iter().map(|row| {
            let record = row.record;
            let mut style = Style::default();
            if row.highlighted {
                style = style.fg(Color::Yellow);
            }
            if selected == Some(&record.id) {
                style = style.bg(Color::Blue).add_modifier(Modifier::BOLD);
            }
            Row::new(vec![
                Cell::from(record.plate_number.clone()),
                Cell::from(format_thousands(record.yuk_bilan)),
                Cell::from(record.date.clone()),
                Cell::from(format_thousands(record.yuksiz)),
                Cell::from(format_thousands(record.sof_vazin)),
                Cell::from(format_thousands(record.summa)),
                Cell::from(record.check_number.clone()),
            ])
            .style(style)
        });

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = TableState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        let paragraph = Paragraph::new(self.footer_instructions()).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match self.mode {
            Mode::Form(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back to Table"),
            ]),
            Mode::Searching => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Ctrl+U]", key_style),
                Span::raw(" Clear Search   "),
                Span::styled("[Enter/Esc]", key_style),
                Span::raw(" Done"),
            ]),
            Mode::Table => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Edit Row   "),
                Span::styled("[x]", key_style),
                Span::raw(" Delete Row   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reload   "),
                Span::styled("[y]", key_style),
                Span::raw(" Relay   "),
                Span::styled("[f]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Form   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::store::{FixedClock, SequentialIds, MSG_NEW_ENTRY};

    fn app() -> App {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        App::new(RecordStore::new(
            Box::new(SequentialIds::default()),
            Box::new(FixedClock(today)),
        ))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn quit_from_table() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn add_entry_through_the_form() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.mode, Mode::Form(FormField::PlateNumber));

        type_text(&mut app, "TJ 01 C777");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "30000x");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "12000");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.mode, Mode::Table);
        let first = &app.store().records()[0];
        assert_eq!(first.plate_number, "TJ 01 C777");
        assert_eq!(first.yuk_bilan, 30000.0);
        assert_eq!(first.sof_vazin, 18000.0);
        assert_eq!(first.check_number, "CHK-000001");
    }

    #[test]
    fn blank_plate_keeps_focus_on_plate_field() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "500");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form(FormField::PlateNumber));
        assert_eq!(app.store().records().len(), 3);
        assert_eq!(app.store().notification(), None);
    }

    #[test]
    fn enter_on_row_starts_edit_in_form() {
        let mut app = app();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form(FormField::PlateNumber));
        assert_eq!(app.store().editing().map(|id| id.as_str()), Some("rec-002"));
        assert_eq!(app.store().notification(), Some("Editing KZ 90 B456"));

        app.handle_key(KeyCode::Backspace);
        type_text(&mut app, "9");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.store().records()[1].plate_number, "KZ 90 B459");
        assert!(!app.store().is_editing());
    }

    #[test]
    fn add_focuses_plate_after_next_paint() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.mode, Mode::Table);
        assert_eq!(app.store().notification(), Some(MSG_NEW_ENTRY));

        render(&app);
        app.after_draw();
        assert_eq!(app.mode, Mode::Form(FormField::PlateNumber));
    }

    #[test]
    fn space_selects_and_minus_deletes_selected() {
        let mut app = app();
        app.handle_key(KeyCode::End);
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.store().selected().map(|id| id.as_str()), Some("rec-003"));

        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.store().records().len(), 2);
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn search_filters_and_shows_placeholder() {
        let mut app = app();
        app.handle_key(KeyCode::Char('f'));
        type_text(&mut app, "zzz");
        assert!(app.store().filtered().is_empty());
        assert!(render(&app).contains(NO_MATCHES));

        app.handle_ctrl_u();
        assert_eq!(app.store().search_query(), "");
        type_text(&mut app, "kz");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.mode, Mode::Table);
        assert_eq!(app.store().filtered().len(), 1);
    }

    #[test]
    fn reload_restores_deleted_rows() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.store().records().len(), 1);

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.store().records().len(), 3);
    }

    #[test]
    fn render_shows_rows_and_derived_weight() {
        let mut app = app();
        let screen = render(&app);
        assert!(screen.contains("UZ 45 A123"));
        assert!(screen.contains("42,000"));
        assert!(screen.contains("Add Entry"));

        app.handle_key(KeyCode::Enter);
        let screen = render(&app);
        assert!(screen.contains("Save Changes"));
        assert!(screen.contains("Sof Vazin (Kg): 26000"));
    }
}
