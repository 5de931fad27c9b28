pub mod picker;

use crate::core::config::Settings;
use crate::core::error::Result;
use crate::indexing::index::{IndexStatus, LoadedIndex};
use crate::search::ranker::RelevanceRanker;
use crate::ui::clipboard::Clipboard;
use picker::{suggestion_position, Pick, PickerState, Row};
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::cursor;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::io;
use std::time::{Duration, Instant};
use tracing::warn;

// Redraw interval while no action is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Interactive symbol picker
pub struct SymbolTui {
    state: PickerState,
    loaded: LoadedIndex,
    ranker: RelevanceRanker,
    clipboard: Clipboard,

    // Short-lived message shown above the footer (clipboard failures etc.)
    status_message: Option<String>,
}

impl SymbolTui {
    pub fn new(
        loaded: LoadedIndex,
        ranker: RelevanceRanker,
        clipboard: Clipboard,
        settings: &Settings,
    ) -> Self {
        Self {
            state: PickerState::new(
                settings.quit_on_select,
                Duration::from_millis(settings.select_delay_ms),
            ),
            loaded,
            ranker,
            clipboard,
            status_message: None,
        }
    }

    /// Pre-fill the search field
    pub fn with_query(mut self, query: &str) -> Self {
        self.state
            .set_query(query.to_string(), &self.ranker, &self.loaded.index);
        self
    }

    /// Run until the user quits; returns every symbol picked in the session
    pub fn run(mut self) -> Result<Vec<Pick>> {
        // Draw on stderr so picked identifiers can go to stdout.
        enable_raw_mode()?;
        let mut output = io::stderr();
        execute!(output, EnterAlternateScreen, cursor::Hide)?;

        // Always restore terminal, even if we early-return with an error.
        struct TerminalRestore;
        impl Drop for TerminalRestore {
            fn drop(&mut self) {
                let _ = disable_raw_mode();
                let mut output = io::stderr();
                let _ = execute!(output, LeaveAlternateScreen, cursor::Show);
            }
        }
        let _restore = TerminalRestore;

        let backend = CrosstermBackend::new(output);
        let mut terminal = ratatui::Terminal::new(backend)?;

        let mut should_quit = false;

        while !should_quit {
            terminal.draw(|f| self.render_ui(f))?;

            let timeout = self.state.time_until_due(Instant::now()).unwrap_or(IDLE_POLL);
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        should_quit = self.handle_key(key);
                    }
                }
            }

            if self.state.tick(Instant::now()) {
                should_quit = true;
            }
        }

        Ok(self.state.into_picks())
    }

    /// Apply one key press. Returns true when the picker should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let index = &self.loaded.index;
        let ranker = &self.ranker;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('u') if ctrl => {
                self.state.set_query(String::new(), ranker, index);
            }
            KeyCode::Char(c) if alt && c.is_ascii_digit() => {
                if let Some(position) = suggestion_position(c) {
                    self.state.apply_suggestion(position, ranker, index);
                }
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                self.status_message = None;
                self.state.push_char(c, ranker, index);
            }
            KeyCode::Backspace => {
                self.state.pop_char(ranker, index);
            }
            KeyCode::Tab => {
                self.state.toggle_quit_on_select();
            }
            KeyCode::Up => self.state.move_up(),
            KeyCode::Down => self.state.move_down(),
            KeyCode::Right | KeyCode::Left => {
                let target = match self.state.rows().get(self.state.cursor()) {
                    Some(Row::Group { stem, expanded, .. }) => {
                        let wants_open = key.code == KeyCode::Right;
                        (wants_open != *expanded).then(|| stem.clone())
                    }
                    Some(Row::Symbol { stem, .. }) if key.code == KeyCode::Left => {
                        Some(stem.clone())
                    }
                    _ => None,
                };
                if let Some(stem) = target {
                    self.state.toggle_group(&stem, ranker, index);
                }
            }
            KeyCode::Enter => {
                if let Some(pick) = self.state.activate(ranker, index, Instant::now()) {
                    self.status_message = match self.clipboard.copy(&pick.identifier) {
                        Ok(()) if self.clipboard.has_command() => {
                            Some(format!("Copied {}", pick.identifier))
                        }
                        Ok(()) => Some(format!("Picked {}", pick.identifier)),
                        Err(e) => {
                            warn!("Copy failed: {}", e);
                            Some(e.to_string())
                        }
                    };
                }
            }
            _ => {}
        }
        false
    }

    fn render_ui(&self, f: &mut Frame) {
        let size = f.size();
        let background = Block::default().style(Style::default().bg(Color::Rgb(35, 35, 35)));
        f.render_widget(background, size);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Search bar
                Constraint::Length(1), // Suggestions
                Constraint::Min(0),    // Groups
                Constraint::Length(2), // Footer
            ])
            .split(size);

        let mode = if self.state.quit_on_select() {
            "pick one"
        } else {
            "pick many"
        };
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "symbolpick",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  [{}]", mode), Style::default().fg(Color::Cyan)),
        ]))
        .alignment(Alignment::Left);
        f.render_widget(title, chunks[0]);

        self.render_search_bar(f, chunks[1]);
        self.render_suggestions(f, chunks[2]);
        self.render_groups(f, chunks[3]);
        self.render_footer(f, chunks[4]);
    }

    fn render_search_bar(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let search_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                "Symbol",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));

        let text = if self.state.query().is_empty() {
            Span::styled("Type a word, e.g. \"text\"...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.state.query(), Style::default().fg(Color::White))
        };

        f.render_widget(Paragraph::new(Line::from(text)).block(search_block), area);
    }

    fn render_suggestions(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let mut spans = Vec::new();
        for (i, word) in self.state.suggestions().iter().enumerate() {
            spans.push(Span::styled(
                format!("{}:", (i + 1) % 10),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::styled(word.as_str(), Style::default().fg(Color::Blue)));
            spans.push(Span::raw("  "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_groups(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(vec![
                Span::styled("Symbols", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw(format!(" ({} groups)", self.state.stems().len())),
            ]);

        if let IndexStatus::Unavailable { path, .. } = &self.loaded.status {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Symbol data unavailable",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("Missing {}", path.display()),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            f.render_widget(
                Paragraph::new(lines).block(block).alignment(Alignment::Center),
                area,
            );
            return;
        }

        if self.state.rows().is_empty() {
            let message = if self.state.query().is_empty() {
                "Start typing to find symbols"
            } else {
                "No matching symbols. Try a different word."
            };
            f.render_widget(
                Paragraph::new(vec![Line::from(""), Line::from(message)])
                    .block(block)
                    .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .rows()
            .iter()
            .map(|row| match row {
                Row::Group {
                    title,
                    icon,
                    expanded,
                    ..
                } => {
                    let marker = if *expanded { "▾ " } else { "▸ " };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Cyan)),
                        Span::styled(
                            title.clone(),
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            icon.as_ref().map(|i| format!("  {}", i)).unwrap_or_default(),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                }
                Row::Symbol { name, .. } => {
                    let style = if self.state.selected() == Some(name.as_str()) {
                        Style::default().fg(Color::Black).bg(Color::Blue)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    ListItem::new(Line::from(Span::styled(format!("    {}", name), style)))
                }
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.cursor()));
        f.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_footer(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let line = match &self.status_message {
            Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(Color::Green))),
            None => Line::from(vec![
                Span::styled("↑↓", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(": Navigate  "),
                Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw(": Open/Pick  "),
                Span::styled("Alt+1..0", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
                Span::raw(": Suggestion  "),
                Span::styled("Tab", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(": Mode  "),
                Span::styled("Esc", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(": Quit"),
            ]),
        };

        let footer = Paragraph::new(line)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(footer, area);
    }
}
