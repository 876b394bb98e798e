mod clipboard;
mod confetti;
mod help;
mod state;

use crate::cli::Cli;
use crate::model::{DrawPhase, RaffleEvent};
use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{key_hint, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<RaffleEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // Preloaded names go through the controller like typed ones.
    if let Some(names) = crate::cli::read_names_file(&args)? {
        let _ = cmd_tx.send(UiCommand::AddAudience(names));
    }

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let res = orchestrator::run_controller(crate::cli::build_config(&args), event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// What a key press asks the loop to do.
enum KeyAction {
    None,
    Send(UiCommand),
    Quit,
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    mut event_rx: UnboundedReceiver<RaffleEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::default();

    // 20 fps for the confetti.
    let tick_rate = Duration::from_millis(50);
    let spinner_rate = Duration::from_millis(120);
    let mut last_tick = Instant::now();
    let mut last_spin = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            let dt = last_tick.elapsed();
            if let Ok(size) = terminal.size() {
                state.confetti.update(dt, size.width, size.height);
            }
            if state.phase == DrawPhase::Drawing && last_spin.elapsed() >= spinner_rate {
                state.advance_spinner();
                last_spin = Instant::now();
            }
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut state, k) {
                    KeyAction::None => {}
                    KeyAction::Send(cmd) => {
                        if cmd_tx.send(cmd).is_err() {
                            break Err(anyhow::anyhow!("raffle controller stopped"));
                        }
                    }
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn handle_key(state: &mut UiState, k: KeyEvent) -> KeyAction {
    match (k.modifiers, k.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => KeyAction::Quit,
        (_, KeyCode::Tab) => {
            state.tab = (state.tab + 1) % 2;
            KeyAction::None
        }
        (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            // Blank input still goes to the controller so the validation message shows.
            state.awaiting_add = true;
            KeyAction::Send(UiCommand::AddAudience(state.input.clone()))
        }
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => KeyAction::Send(UiCommand::Draw),
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
            if state.can_reset() {
                KeyAction::Send(UiCommand::Reset)
            } else {
                KeyAction::None
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            state.clear_input();
            KeyAction::None
        }
        (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
            match state.winner.as_ref() {
                Some(w) => match clipboard::copy_to_clipboard(&w.name) {
                    Ok(()) => state.info = format!("✓ Copied to clipboard: {}", w.name),
                    Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
                },
                None => state.info = "No winner to copy yet.".into(),
            }
            KeyAction::None
        }
        (_, KeyCode::Up) => {
            state.scroll_audience(-1);
            KeyAction::None
        }
        (_, KeyCode::Down) => {
            state.scroll_audience(1);
            KeyAction::None
        }
        _ if state.tab != 0 => KeyAction::None,
        (_, KeyCode::Enter) => {
            state.newline();
            KeyAction::None
        }
        (_, KeyCode::Backspace) => {
            state.backspace();
            KeyAction::None
        }
        (m, KeyCode::Char(c)) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
            state.push_char(c);
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Raffle"), Line::from("Help")])
        .select(state.tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Raffle Winner Picker"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_raffle(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }

    // The celebration overlays everything, whatever tab is shown.
    if state.confetti.is_active() {
        f.render_widget(&state.confetti, area);
    }
}

fn draw_raffle(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let winner_height = if state.winner.is_some() { 5 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(9),
                Constraint::Min(6),
                Constraint::Length(winner_height),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    draw_input(rows[0], f, state);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[1]);
    draw_audience(middle[0], f, state);
    draw_controls(middle[1], f, state);

    if state.winner.is_some() {
        draw_winner(rows[2], f, state);
    }

    let status = Paragraph::new(Line::from(vec![
        Span::styled("Info: ", Style::default().fg(Color::Gray)),
        Span::raw(&state.info),
    ]));
    f.render_widget(status, rows[3]);
}

fn draw_input(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let inner_height = area.height.saturating_sub(3) as usize;
    let mut lines: Vec<Line> = if state.input.is_empty() {
        vec![Line::from(Span::styled(
            "Alice Johnson / Bob Smith / Charlie Brown…",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        // split('\n') keeps the trailing empty line so the cursor row shows.
        let all: Vec<&str> = state.input.split('\n').collect();
        let skip = all.len().saturating_sub(inner_height);
        all[skip..]
            .iter()
            .map(|l| Line::from(l.to_string()))
            .collect()
    };
    if let Some(last) = lines.last_mut() {
        if !state.input.is_empty() {
            last.spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }
    }
    while lines.len() < inner_height {
        lines.push(Line::from(""));
    }
    lines.push(match state.error.as_deref() {
        Some(err) => Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))),
        None => Line::from(""),
    });

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Enter Audience Names (one per line)"),
    );
    f.render_widget(p, area);
}

fn draw_audience(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let lines: Vec<Line> = if state.entrants.is_empty() {
        vec![Line::from(Span::styled(
            "No audience members added yet.",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        state
            .entrants
            .iter()
            .enumerate()
            .skip(state.audience_scroll)
            .map(|(i, name)| {
                let is_winner = state.winner.as_ref().is_some_and(|w| w.index == i);
                let style = if is_winner {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(Color::Gray)),
                    Span::styled(name.clone(), style),
                ])
            })
            .collect()
    };

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Current Audience ({})", state.entrants.len())),
    );
    f.render_widget(p, area);
}

fn draw_controls(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let draw_label = if state.phase == DrawPhase::Drawing {
        format!("Drawing... {}", state.spinner())
    } else {
        "Draw Winner!".to_string()
    };

    let lines = vec![
        key_hint("Ctrl-A", "Add Audience", state.can_add()),
        key_hint("Ctrl-D", &draw_label, state.can_draw()),
        key_hint("Ctrl-R", "Reset", state.can_reset()),
        key_hint("Ctrl-Y", "Copy winner", state.winner.is_some()),
        Line::from(""),
        Line::from(vec![
            Span::styled("State: ", Style::default().fg(Color::Gray)),
            Span::raw(format!("{:?}", state.phase)),
            Span::raw("   "),
            Span::styled("Confetti: ", Style::default().fg(Color::Gray)),
            Span::raw(if state.celebrating { "on" } else { "off" }),
        ]),
        Line::from("Keys: Tab switch | Esc quit"),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(p, area);
}

fn draw_winner(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let Some(winner) = state.winner.as_ref() else {
        return;
    };
    let p = Paragraph::new(vec![
        Line::from("🎉 Congratulations! 🎉"),
        Line::from(Span::styled(
            winner.name.clone(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("is the lucky winner!"),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(p, area);
}
