//! TUI module - weekly plan, day logging and profile with ratatui

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{stdout, Stdout};
use tracing::debug;

use crate::fields::{format_number, format_target, EditBuffer};
use crate::profile::{self, UserProfile};
use crate::workout::{blocks, DaySession, EditOutcome, Exertion, WeekPlan};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ActualAmount,
    ActualIntensity,
}

#[derive(Debug)]
struct Editing {
    field: Field,
    buffer: EditBuffer,
}

/// Open day: the session lives exactly as long as this view
#[derive(Debug)]
struct DayView {
    session: DaySession,
    /// Set index
    cursor: usize,
    editing: Option<Editing>,
    /// Selected block while reordering
    reorder: Option<usize>,
}

impl DayView {
    fn new(session: DaySession) -> Self {
        Self {
            session,
            cursor: 0,
            editing: None,
            reorder: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileRow {
    Name,
    Age,
    Gender,
    ActivityLevel,
    RangeStart,
    RangeEnd,
    Favorite(usize),
    AddFavorite,
}

#[derive(Debug, Default)]
struct ProfileView {
    selected: usize,
    /// Text being typed for the name or a new favorite
    input: Option<String>,
}

#[derive(Debug)]
enum Screen {
    Week,
    Day(DayView),
    Profile(ProfileView),
}

/// App state for TUI
pub struct App {
    week: WeekPlan,
    profile: UserProfile,
    screen: Screen,
    week_selected: usize,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(week: WeekPlan, profile: UserProfile) -> Self {
        Self {
            week,
            profile,
            screen: Screen::Week,
            week_selected: 0,
            status: None,
            should_quit: false,
        }
    }

    /// Start with a day already open
    pub fn with_day(mut self, index: usize) -> Self {
        if let Some(day) = self.week.days.get(index) {
            self.week_selected = index;
            self.screen = Screen::Day(DayView::new(DaySession::new(day)));
        }
        self
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        let result = self.event_loop(&mut terminal);

        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code);
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        self.status = None;
        let screen = std::mem::replace(&mut self.screen, Screen::Week);
        self.screen = match screen {
            Screen::Week => self.week_key(code),
            Screen::Day(view) => self.day_key(view, code),
            Screen::Profile(view) => self.profile_key(view, code),
        };
    }

    // ---- key handling ----

    fn week_key(&mut self, code: KeyCode) -> Screen {
        let last = self.week.days.len().saturating_sub(1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.week_selected = self.week_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.week_selected = (self.week_selected + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(day) = self.week.days.get(self.week_selected) {
                    return Screen::Day(DayView::new(DaySession::new(day)));
                }
            }
            KeyCode::Char('p') => return Screen::Profile(ProfileView::default()),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        Screen::Week
    }

    fn day_key(&mut self, mut view: DayView, code: KeyCode) -> Screen {
        if let Some(mut editing) = view.editing.take() {
            match code {
                KeyCode::Char(c) => editing.buffer.push(c),
                KeyCode::Backspace => editing.buffer.backspace(),
                KeyCode::Enter => self.commit_edit(&mut view, &editing),
                KeyCode::Esc => return Screen::Day(view),
                _ => {}
            }
            if code != KeyCode::Enter {
                view.editing = Some(editing);
            }
            return Screen::Day(view);
        }

        if let Some(selected) = view.reorder {
            self.reorder_key(&mut view, selected, code);
            return Screen::Day(view);
        }

        let last = view.session.len().saturating_sub(1);
        match code {
            KeyCode::Up | KeyCode::Char('k') => view.cursor = view.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => view.cursor = (view.cursor + 1).min(last),
            KeyCode::Char('a') => {
                if let Some(set) = view.session.get(view.cursor) {
                    view.editing = Some(Editing {
                        field: Field::ActualAmount,
                        buffer: EditBuffer::new(set.actual_amount),
                    });
                }
            }
            KeyCode::Char('i') => match view.session.get(view.cursor) {
                Some(set) if set.has_intensity() => {
                    view.editing = Some(Editing {
                        field: Field::ActualIntensity,
                        buffer: EditBuffer::new(set.actual_intensity),
                    });
                }
                Some(_) => self.status = Some("No intensity for this set".into()),
                None => {}
            },
            KeyCode::Char('e') | KeyCode::Char('x') => {
                if let Some(set) = view.session.get(view.cursor) {
                    let next = if code == KeyCode::Char('e') {
                        Exertion::cycle(set.perceived_exertion)
                    } else {
                        None
                    };
                    if let Err(e) = view.session.set_exertion(view.cursor, next) {
                        self.status = Some(e.to_string());
                    }
                }
            }
            KeyCode::Char(' ') => {
                if let Err(e) = view.session.toggle_done(view.cursor) {
                    self.status = Some(e.to_string());
                } else if view.session.is_complete() {
                    self.status = Some("Workout complete!".into());
                }
            }
            KeyCode::Char('r') => {
                view.reorder = blocks::block_of(view.session.sets(), view.cursor);
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                debug!(day = %view.session.day_name(), "day session discarded");
                return Screen::Week;
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        Screen::Day(view)
    }

    fn commit_edit(&mut self, view: &mut DayView, editing: &Editing) {
        let index = view.cursor;
        let text = editing.buffer.text();
        let outcome = match editing.field {
            Field::ActualAmount => view.session.edit_actual_amount(index, text),
            Field::ActualIntensity => view.session.edit_actual_intensity(index, text),
        };
        match outcome {
            Ok(EditOutcome::Applied(_)) => {}
            Ok(EditOutcome::Ignored) => {
                self.status = Some(format!("Not a number: {:?}, value kept", text));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn reorder_key(&mut self, view: &mut DayView, selected: usize, code: KeyCode) {
        let count = view.session.blocks().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => view.reorder = Some(selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => {
                view.reorder = Some((selected + 1).min(count.saturating_sub(1)));
            }
            KeyCode::Char('K') | KeyCode::Char('J') => {
                let destination = if code == KeyCode::Char('K') {
                    selected.checked_sub(1)
                } else {
                    Some(selected + 1)
                };
                let Some(destination) = destination else {
                    self.status = Some("Block is already first".into());
                    return;
                };
                let moved = view
                    .session
                    .blocks()
                    .get(selected)
                    .and_then(|b| b.members.first().copied())
                    .and_then(|i| view.session.get(i))
                    .map(|s| s.id);

                match view.session.move_block(selected, destination) {
                    Ok(()) => {
                        // Follow the moved run, it may have joined a neighbour
                        view.reorder = moved
                            .and_then(|id| view.session.position_of(id))
                            .and_then(|i| blocks::block_of(view.session.sets(), i))
                            .or(Some(destination));
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('r') => {
                view.cursor = view
                    .session
                    .blocks()
                    .get(selected)
                    .and_then(|b| b.members.first().copied())
                    .unwrap_or(0);
                view.reorder = None;
            }
            _ => {}
        }
    }

    fn profile_rows(&self) -> Vec<ProfileRow> {
        let mut rows = vec![
            ProfileRow::Name,
            ProfileRow::Age,
            ProfileRow::Gender,
            ProfileRow::ActivityLevel,
            ProfileRow::RangeStart,
            ProfileRow::RangeEnd,
        ];
        rows.extend((0..self.profile.favorite_exercises.len()).map(ProfileRow::Favorite));
        rows.push(ProfileRow::AddFavorite);
        rows
    }

    fn profile_key(&mut self, mut view: ProfileView, code: KeyCode) -> Screen {
        let rows = self.profile_rows();
        let row = rows.get(view.selected).copied().unwrap_or(ProfileRow::Name);

        if let Some(mut input) = view.input.take() {
            match code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    self.commit_profile_input(row, &input);
                    return Screen::Profile(view);
                }
                KeyCode::Esc => return Screen::Profile(view),
                _ => {}
            }
            view.input = Some(input);
            return Screen::Profile(view);
        }

        match code {
            KeyCode::Up | KeyCode::Char('k') => view.selected = view.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                view.selected = (view.selected + 1).min(rows.len() - 1);
            }
            KeyCode::Left | KeyCode::Char('-') => self.adjust_profile(row, -1),
            KeyCode::Right | KeyCode::Char('+') => self.adjust_profile(row, 1),
            KeyCode::Enter => match row {
                ProfileRow::Name => view.input = Some(self.profile.name.clone()),
                ProfileRow::AddFavorite => view.input = Some(String::new()),
                _ => {}
            },
            KeyCode::Char('d') => {
                if let ProfileRow::Favorite(i) = row {
                    if let Err(e) = self.profile.remove_favorite(i) {
                        self.status = Some(e.to_string());
                    }
                    let last = self.profile_rows().len() - 1;
                    view.selected = view.selected.min(last);
                }
            }
            KeyCode::Esc | KeyCode::Char('b') => return Screen::Week,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        Screen::Profile(view)
    }

    fn commit_profile_input(&mut self, row: ProfileRow, input: &str) {
        match row {
            ProfileRow::Name => self.profile.set_name(input),
            ProfileRow::AddFavorite => {
                if let Err(e) = self.profile.add_favorite(input) {
                    self.status = Some(e.to_string());
                }
            }
            _ => {}
        }
    }

    fn adjust_profile(&mut self, row: ProfileRow, delta: i8) {
        let p = &mut self.profile;
        let result = match row {
            ProfileRow::Age => {
                let age = p.age.saturating_add_signed(delta);
                p.set_age(age)
            }
            ProfileRow::Gender => {
                let next = step_choice(profile::GENDERS, &p.gender, delta);
                p.set_gender(next)
            }
            ProfileRow::ActivityLevel => {
                let next = step_choice(profile::ACTIVITY_LEVELS, &p.activity_level, delta);
                p.set_activity_level(next)
            }
            ProfileRow::RangeStart => p.step_range_start(delta),
            ProfileRow::RangeEnd => p.step_range_end(delta),
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.status = Some(e.to_string());
        }
    }

    // ---- rendering ----

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new(self.title())
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        match &self.screen {
            Screen::Week => self.render_week(frame, chunks[1]),
            Screen::Day(view) if view.reorder.is_some() => render_reorder(frame, chunks[1], view),
            Screen::Day(view) => render_day(frame, chunks[1], view),
            Screen::Profile(view) => self.render_profile(frame, chunks[1], view),
        }

        // Footer
        let footer = match &self.status {
            Some(status) => Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow)),
            None => Paragraph::new(self.help()).style(Style::default().fg(Color::DarkGray)),
        }
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn title(&self) -> String {
        match &self.screen {
            Screen::Week => "groove - Weekly Plan".to_string(),
            Screen::Day(view) => {
                let (done, total) = view.session.progress();
                format!("groove - {} ({}/{} done)", view.session.day_name(), done, total)
            }
            Screen::Profile(_) => "groove - Your Profile".to_string(),
        }
    }

    fn help(&self) -> &'static str {
        match &self.screen {
            Screen::Week => "j/k: select | enter: open day | p: profile | q: quit",
            Screen::Day(view) if view.editing.is_some() => "type value | enter: save | esc: cancel",
            Screen::Day(view) if view.reorder.is_some() => {
                "j/k: select block | J/K: move block down/up | enter: done"
            }
            Screen::Day(_) => {
                "a: amount | i: intensity | e: exertion | x: clear | space: done | r: reorder | esc: back"
            }
            Screen::Profile(view) if view.input.is_some() => "type | enter: save | esc: cancel",
            Screen::Profile(_) => "j/k: select | ←/→: change | enter: edit/add | d: delete | esc: back",
        }
    }

    fn render_week(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .week
            .days
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let names = blocks::block_names(&day.workout);
                let row = Row::new(vec![
                    Cell::from(day.day.clone()),
                    Cell::from(day.workout.len().to_string()),
                    Cell::from(names.len().to_string()),
                    Cell::from(names.join(", ")),
                ]);
                if i == self.week_selected {
                    row.style(Style::default().reversed())
                } else {
                    row
                }
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Min(20),
            ],
        )
        .header(Row::new(vec!["Day", "Sets", "Blocks", "Exercises"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Weekly Plan"));

        frame.render_widget(table, area);
    }

    fn render_profile(&self, frame: &mut Frame, area: Rect, view: &ProfileView) {
        let p = &self.profile;
        let range = &p.desired_workouts_per_week;

        let mut rows: Vec<Row> = self
            .profile_rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let (label, value) = match row {
                    ProfileRow::Name => ("Name", p.name.clone()),
                    ProfileRow::Age => ("Age", p.age.to_string()),
                    ProfileRow::Gender => ("Gender", p.gender.clone()),
                    ProfileRow::ActivityLevel => ("Activity Level", p.activity_level.clone()),
                    ProfileRow::RangeStart => ("Workouts/Week from", range.start.to_string()),
                    ProfileRow::RangeEnd => ("Workouts/Week to", range.end.to_string()),
                    ProfileRow::Favorite(n) => ("Favorite", p.favorite_exercises[n].clone()),
                    ProfileRow::AddFavorite => ("Add Exercise", String::new()),
                };
                let selected = i == view.selected;
                let value = match &view.input {
                    Some(input) if selected => format!("{}_", input),
                    _ => value,
                };
                let row = Row::new(vec![Cell::from(label), Cell::from(value)]);
                if selected {
                    row.style(Style::default().reversed())
                } else {
                    row
                }
            })
            .collect();

        rows.extend(p.interests.iter().map(|interest| {
            Row::new(vec![
                Cell::from("Interest"),
                Cell::from(format!("{} ({})", interest.name, interest.skill)),
            ])
            .style(Style::default().fg(Color::Gray))
        }));

        let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(20)])
            .block(Block::default().borders(Borders::ALL).title("Profile"));

        frame.render_widget(table, area);
    }
}

fn step_choice(options: &'static [&'static str], current: &str, delta: i8) -> &'static str {
    if delta < 0 {
        profile::prev_choice(options, current)
    } else {
        profile::next_choice(options, current)
    }
}

fn render_day(frame: &mut Frame, area: Rect, view: &DayView) {
    let sets = view.session.sets();
    let mut rows: Vec<Row> = Vec::new();

    for block in view.session.blocks() {
        rows.push(
            Row::new(vec![Cell::from(block.exercise.to_string())])
                .style(Style::default().fg(Color::Cyan).bold()),
        );

        for index in block.members {
            let set = &sets[index];
            let editing = view.editing.as_ref().filter(|_| index == view.cursor);
            let shown = |field: Field, value: f64| match editing {
                Some(e) if e.field == field => format!("{}_", e.buffer.text()),
                _ => format_number(value),
            };

            let actual_intensity = if set.has_intensity() {
                shown(Field::ActualIntensity, set.actual_intensity)
            } else {
                "-".to_string()
            };

            let row = Row::new(vec![
                Cell::from(""),
                Cell::from(format_target(set.amount, &set.amount_unit)),
                Cell::from(shown(Field::ActualAmount, set.actual_amount)),
                Cell::from(format_target(set.intensity, &set.intensity_unit)),
                Cell::from(actual_intensity),
                Cell::from(Exertion::display(set.perceived_exertion))
                    .style(Style::default().fg(exertion_color(set.perceived_exertion))),
                Cell::from(if set.done { "[x]" } else { "[ ]" }),
            ]);

            rows.push(if index == view.cursor {
                row.style(Style::default().reversed())
            } else {
                row
            });
        }
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(5),
        ],
    )
    .header(
        Row::new(vec!["", "Amount", "Actual", "Intensity", "Actual", "Exertion", "Done"])
            .style(Style::default().bold()),
    )
    .block(Block::default().borders(Borders::ALL).title(view.session.day_name().to_string()));

    frame.render_widget(table, area);
}

fn render_reorder(frame: &mut Frame, area: Rect, view: &DayView) {
    let rows: Vec<Row> = view
        .session
        .blocks()
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let row = Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(block.exercise.to_string()),
                Cell::from(format!("{} sets", block.len())),
            ]);
            if Some(i) == view.reorder {
                row.style(Style::default().reversed())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(4), Constraint::Min(20), Constraint::Length(10)],
    )
    .block(Block::default().borders(Borders::ALL).title("Reorder Exercises"));

    frame.render_widget(table, area);
}

fn exertion_color(exertion: Option<Exertion>) -> Color {
    match exertion {
        Some(Exertion::Easy) => Color::Green,
        Some(Exertion::Medium) => Color::Yellow,
        Some(Exertion::Hard) => Color::Red,
        None => Color::Gray,
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
