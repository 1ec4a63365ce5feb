// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use notepick_app::{Catalog, PickerPhase, Selector, SelectorCommand, SelectorEvent};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const MIN_COLS: u16 = 40;
const MIN_ROWS: u16 = 10;
const SELECTED_MARK: &str = "●";
const CURSOR_MARK: &str = "▸";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEntry {
    Group {
        display_name: String,
        description: String,
    },
    Collection {
        key: String,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    OpenPicker,
    ClosePicker,
    CursorUp,
    CursorDown,
    Confirm,
    RandomPick,
    ToggleDetails,
    ClearSelection,
    ToggleHelp,
}

/// The one binding set the picker uses. Resolution is phase-sensitive:
/// most keys mean something different while the picker overlay is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyBindings;

impl KeyBindings {
    pub fn resolve(&self, phase: PickerPhase, key: KeyEvent) -> Option<KeyAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(KeyAction::Quit);
        }
        match phase {
            PickerPhase::Closed => match key.code {
                KeyCode::Char('q') => Some(KeyAction::Quit),
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => {
                    Some(KeyAction::OpenPicker)
                }
                KeyCode::Char('r') => Some(KeyAction::RandomPick),
                KeyCode::Char('i') => Some(KeyAction::ToggleDetails),
                KeyCode::Char('x') => Some(KeyAction::ClearSelection),
                KeyCode::Char('?') => Some(KeyAction::ToggleHelp),
                _ => None,
            },
            PickerPhase::Open => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(KeyAction::ClosePicker),
                KeyCode::Up | KeyCode::Char('k') => Some(KeyAction::CursorUp),
                KeyCode::Down | KeyCode::Char('j') => Some(KeyAction::CursorDown),
                KeyCode::Enter => Some(KeyAction::Confirm),
                KeyCode::Char('r') => Some(KeyAction::RandomPick),
                KeyCode::Char('i') => Some(KeyAction::ToggleDetails),
                _ => None,
            },
        }
    }
}

/// Tracks which binding set is live. Installing a new set replaces the
/// previous one, so stale bindings cannot accumulate across picker
/// sessions; a fresh set is installed on every [`run_app`] entry and
/// revoked on every exit path.
#[derive(Debug, Default)]
pub struct InputRegistry {
    active: Option<KeyBindings>,
}

impl InputRegistry {
    pub fn install(&mut self, bindings: KeyBindings) {
        self.active = Some(bindings);
    }

    pub fn revoke(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn resolve(&self, phase: PickerPhase, key: KeyEvent) -> Option<KeyAction> {
        self.active.as_ref().and_then(|b| b.resolve(phase, key))
    }
}

#[derive(Debug, Default)]
struct ViewData {
    picker_cursor: usize,
    status_line: Option<String>,
    status_token: u64,
    help_visible: bool,
    registry: InputRegistry,
}

pub fn run_app(selector: &mut Selector<'_>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    view_data.registry.install(KeyBindings);
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = terminal
        .size()
        .context("query terminal size")
        .and_then(|size| check_dimensions(size.width, size.height));

    while result.is_ok() {
        process_internal_events(&mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, selector, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)) {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error).context("poll event");
                break;
            }
        };
        if has_event {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if handle_key_event(selector, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(Event::Resize(width, height)) => {
                    if let Err(error) = check_dimensions(width, height) {
                        result = Err(error);
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error).context("read event");
                    break;
                }
            }
        }
    }

    view_data.registry.revoke();
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Rendering needs room for the title bar, the detail body, and the
/// status line; refuse to start (or continue) below the floor instead of
/// drawing garbage.
fn check_dimensions(width: u16, height: u16) -> Result<()> {
    if width < MIN_COLS || height < MIN_ROWS {
        bail!("terminal too small ({width}x{height}); need at least {MIN_COLS}x{MIN_ROWS}");
    }
    Ok(())
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event(
    selector: &mut Selector<'_>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    let Some(action) = view_data.registry.resolve(selector.phase(), key) else {
        return false;
    };

    match action {
        KeyAction::Quit => return true,
        KeyAction::OpenPicker => {
            view_data.picker_cursor = initial_cursor(selector);
            let events = selector.dispatch(SelectorCommand::OpenPicker);
            apply_selector_events(selector.catalog(), view_data, internal_tx, &events);
        }
        KeyAction::ClosePicker => {
            let events = selector.dispatch(SelectorCommand::ClosePicker);
            apply_selector_events(selector.catalog(), view_data, internal_tx, &events);
        }
        KeyAction::CursorUp => move_cursor(selector.catalog(), view_data, -1),
        KeyAction::CursorDown => move_cursor(selector.catalog(), view_data, 1),
        KeyAction::Confirm => {
            if let Some(key) = key_at_cursor(selector.catalog(), view_data.picker_cursor) {
                let mut events = selector.dispatch(SelectorCommand::PickKey(key));
                events.extend(selector.dispatch(SelectorCommand::ClosePicker));
                apply_selector_events(selector.catalog(), view_data, internal_tx, &events);
            }
        }
        KeyAction::RandomPick => {
            let events = selector.dispatch(SelectorCommand::PickRandom);
            if events.is_empty() {
                emit_status(view_data, internal_tx, "nothing else to pick");
            } else {
                apply_selector_events(selector.catalog(), view_data, internal_tx, &events);
            }
        }
        KeyAction::ToggleDetails => {
            let events = selector.dispatch(SelectorCommand::ToggleDetails);
            apply_selector_events(selector.catalog(), view_data, internal_tx, &events);
        }
        KeyAction::ClearSelection => {
            let events = selector.dispatch(SelectorCommand::SetSelectedKey(None));
            if events.is_empty() {
                emit_status(view_data, internal_tx, "nothing selected");
            } else {
                apply_selector_events(selector.catalog(), view_data, internal_tx, &events);
            }
        }
        KeyAction::ToggleHelp => view_data.help_visible = true,
    }
    false
}

/// Map selection events to one status line. An unknown-key rejection is
/// the most informative outcome, so it wins over the clearing it caused.
fn status_for_events(catalog: &Catalog, events: &[SelectorEvent]) -> Option<String> {
    if let Some(SelectorEvent::UnknownKeyCleared(key)) = events
        .iter()
        .find(|event| matches!(event, SelectorEvent::UnknownKeyCleared(_)))
    {
        return Some(format!("unknown key {key:?}; selection cleared"));
    }

    events.iter().rev().find_map(|event| match event {
        SelectorEvent::SelectionChanged(change) => match change.key.as_deref() {
            Some(key) => {
                let name = catalog
                    .get(key)
                    .map(|c| c.primary_name.as_str())
                    .unwrap_or(key);
                Some(format!("selected {name}"))
            }
            None => Some("selection cleared".to_owned()),
        },
        SelectorEvent::DetailsToggled(true) => Some("details shown".to_owned()),
        SelectorEvent::DetailsToggled(false) => Some("details hidden".to_owned()),
        SelectorEvent::PhaseChanged(_) | SelectorEvent::UnknownKeyCleared(_) => None,
    })
}

fn apply_selector_events(
    catalog: &Catalog,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: &[SelectorEvent],
) {
    if let Some(status) = status_for_events(catalog, events) {
        emit_status(view_data, internal_tx, status);
    }
}

fn initial_cursor(selector: &Selector<'_>) -> usize {
    selector
        .selected_key()
        .and_then(|selected| {
            selector
                .catalog()
                .keys()
                .position(|key| key == selected)
        })
        .unwrap_or(0)
}

fn move_cursor(catalog: &Catalog, view_data: &mut ViewData, delta: isize) {
    let len = catalog.len();
    if len == 0 {
        return;
    }
    let current = view_data.picker_cursor as isize;
    view_data.picker_cursor = (current + delta).rem_euclid(len as isize) as usize;
}

fn key_at_cursor(catalog: &Catalog, cursor: usize) -> Option<String> {
    catalog.keys().nth(cursor).map(str::to_owned)
}

/// Flattened picker rows in display order: a header per group, then its
/// collections.
pub fn picker_entries(catalog: &Catalog) -> Vec<PickerEntry> {
    let mut entries = Vec::new();
    for group in catalog.groups() {
        entries.push(PickerEntry::Group {
            display_name: group.display_name.clone(),
            description: group.description.clone(),
        });
        for collection in &group.collections {
            entries.push(PickerEntry::Collection {
                key: collection.key.clone(),
                label: collection.primary_name.clone(),
            });
        }
    }
    entries
}

fn render(frame: &mut ratatui::Frame<'_>, selector: &Selector<'_>, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let title = Paragraph::new(title_text(selector))
        .block(Block::default().title("notepick").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    frame.render_widget(title, layout[0]);

    let body = Paragraph::new(body_text(selector))
        .block(Block::default().title("collection").borders(Borders::ALL));
    frame.render_widget(body, layout[1]);

    let status = Paragraph::new(status_text(selector, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if selector.phase() == PickerPhase::Open {
        let area = centered_rect(60, 72, frame.area());
        frame.render_widget(Clear, area);
        let picker = Paragraph::new(render_picker_overlay_text(
            selector.catalog(),
            view_data.picker_cursor,
            selector.selected_key(),
            selector.show_details(),
        ))
        .block(
            Block::default()
                .title("pick a collection")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(picker, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn title_text(selector: &Selector<'_>) -> String {
    match selector.selected_collection() {
        Some(collection) => collection.primary_name.clone(),
        None => "no collection selected".to_owned(),
    }
}

/// Main-screen body: the mirrored attribute value above the detail view.
pub fn body_text(selector: &Selector<'_>) -> String {
    let attribute = match selector.attribute_value() {
        Some(value) => format!("selected-note-collection-key: {value}"),
        None => "selected-note-collection-key: (unset)".to_owned(),
    };
    format!("{attribute}\n\n{}", render_detail_text(selector))
}

/// Detail body for the current selection. Field order matches what the
/// picker has always shown: names, intervals, kind, characteristics,
/// steps, semitones.
pub fn render_detail_text(selector: &Selector<'_>) -> String {
    let Some(collection) = selector.selected_collection() else {
        return "press enter to pick a note collection".to_owned();
    };
    if !selector.show_details() {
        return collection.primary_name.clone();
    }

    let mut lines = vec![
        format!("names: {}", collection.names.join(", ")),
        format!("intervals: {}", collection.intervals.join(" ")),
        format!("type: {}", collection.kind.join(", ")),
    ];
    if !collection.characteristics.is_empty() {
        lines.push(format!(
            "characteristics: {}",
            collection.characteristics.join(", ")
        ));
    }
    lines.push(format!(
        "steps: {}",
        collection
            .pattern_short
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join("-")
    ));
    lines.push(format!(
        "semitones: {}",
        collection
            .pattern
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.join("\n")
}

/// Picker overlay rows. The selected marker is recomputed from the live
/// selection on every render, never cached in the rows. Group
/// descriptions follow the same detail flag as the collection details,
/// so one toggle affects every block.
pub fn render_picker_overlay_text(
    catalog: &Catalog,
    cursor: usize,
    selected_key: Option<&str>,
    show_details: bool,
) -> String {
    let mut lines = Vec::new();
    let mut position = 0usize;
    for entry in picker_entries(catalog) {
        match entry {
            PickerEntry::Group {
                display_name,
                description,
            } => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(format!("{display_name}:"));
                if show_details && !description.is_empty() {
                    lines.push(format!("    {description}"));
                }
            }
            PickerEntry::Collection { key, label } => {
                let cursor_mark = if position == cursor { CURSOR_MARK } else { " " };
                let selected_mark = if Some(key.as_str()) == selected_key {
                    SELECTED_MARK
                } else {
                    " "
                };
                lines.push(format!("{cursor_mark} {selected_mark} {label}"));
                position += 1;
            }
        }
    }
    lines.push(String::new());
    lines.push("enter: select  j/k: move  r: random  i: details  esc: close".to_owned());
    lines.join("\n")
}

fn status_text(selector: &Selector<'_>, view_data: &ViewData) -> String {
    if let Some(status) = &view_data.status_line {
        return status.clone();
    }
    match selector.phase() {
        PickerPhase::Closed => {
            "enter: picker  r: random  i: details  x: clear  ?: help  q: quit".to_owned()
        }
        PickerPhase::Open => "enter: select  esc: close".to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "notepick\n\
     \n\
     enter / space / o   open the collection picker\n\
     r                   pick a random collection\n\
     i                   toggle the detail view\n\
     x                   clear the selection\n\
     q                   quit\n\
     \n\
     picker keys\n\
     j / down            move down\n\
     k / up              move up\n\
     enter               select the highlighted collection\n\
     i                   toggle the detail view\n\
     esc / q             close the picker\n\
     \n\
     esc or ? closes this help"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
