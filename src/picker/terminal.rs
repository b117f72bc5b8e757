//! Terminal session for the picker.

use std::io::{self, IsTerminal, Stdout};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};

use super::{LABEL, PAGE_SIZE, Picker, PickerEvent};
use crate::discovery::DirectoryEntry;
use crate::error::{Result, RjError};

const POINTER: &str = "\u{279E} ";

/// Let the user choose one of `entries`. Returns its index.
pub fn pick(entries: &[DirectoryEntry]) -> Result<usize> {
    let mut picker = Picker::new(entries)?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(RjError::Terminal(
            "interactive selection needs a terminal (use --list or --robot)".to_string(),
        ));
    }

    let outcome = {
        let mut session = TerminalSession::enter()?;
        session.run(&mut picker)?
    };

    match outcome {
        PickerEvent::Selected(index) => {
            let entry = &entries[index];
            println!(
                "{POINTER}{} ({})",
                entry.path.display(),
                console::style(&entry.branch).green()
            );
            Ok(index)
        }
        PickerEvent::Cancelled | PickerEvent::Pending => Err(RjError::Cancelled),
    }
}

/// Raw mode plus alternate screen, undone on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            restore_terminal();
            return Err(err.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                restore_terminal();
                return Err(err.into());
            }
        };
        Ok(Self { terminal })
    }

    fn run(&mut self, picker: &mut Picker<'_>) -> Result<PickerEvent> {
        loop {
            self.terminal.draw(|frame| render(frame, picker))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match picker.handle_key(key) {
                    PickerEvent::Pending => {}
                    done => return Ok(done),
                }
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

fn render(frame: &mut Frame, picker: &mut Picker<'_>) {
    let rows = u16::try_from(picker.entries().len().min(PAGE_SIZE)).unwrap_or(1);
    let [header, body, footer, _] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(rows),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("? ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{LABEL}?")),
        ])),
        header,
    );

    let items: Vec<ListItem<'_>> = picker
        .entries()
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(entry.path.display().to_string()),
                Span::raw(" ("),
                Span::styled(entry.branch.clone(), Style::default().fg(Color::Green)),
                Span::raw(")"),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_symbol(POINTER)
        .highlight_spacing(ratatui::widgets::HighlightSpacing::Always)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        );
    frame.render_stateful_widget(list, body, picker.state_mut());

    let position = format!(
        "{}/{}  \u{2191}/\u{2193} move  enter select  esc quit",
        picker.selected() + 1,
        picker.entries().len()
    );
    frame.render_widget(
        Paragraph::new(Span::styled(position, Style::default().fg(Color::DarkGray))),
        footer,
    );
}
