mod export;
mod help;
mod state;

use crate::cli::{build_config, build_input, Cli};
use crate::engine::{AnalysisTransport, HttpAnalyzer};
use crate::error::AnalyzeError;
use crate::input::Field;
use crate::model::SessionEvent;
use crate::orchestrator::{self, UiCommand};
use crate::session::SessionState;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{UiState, TAB_ANALYZE, TAB_HELP};
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

pub async fn run(args: Cli) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let analyzer = HttpAnalyzer::new(&build_config(&args))?;
    let endpoint = analyzer.endpoint().to_string();
    let transport: Arc<dyn AnalysisTransport> = Arc::new(analyzer);
    info!(%endpoint, "starting TUI");

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_args = args.clone();
    let ui_handle =
        std::thread::spawn(move || run_threaded(ui_args, endpoint, event_rx, cmd_tx));

    let res = orchestrator::run_controller(transport, event_tx, cmd_rx).await;

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

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    args: Cli,
    endpoint: String,
    mut event_rx: UnboundedReceiver<SessionEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState {
        input: build_input(&args),
        endpoint,
        ..Default::default()
    };
    if args.submit_on_launch {
        submit(&mut state, &cmd_tx);
    }

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&args, &mut state, ev);
        }

        if last_tick.elapsed() >= tick_rate {
            state.spinner = state.spinner.wrapping_add(1);
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    (_, KeyCode::F(1)) => {
                        state.tab = if state.tab == TAB_HELP {
                            TAB_ANALYZE
                        } else {
                            TAB_HELP
                        };
                    }
                    _ if state.tab != TAB_ANALYZE => {}
                    (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                        export::save_and_show_path(&mut state);
                    }
                    (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
                        export::copy_profile_url(&mut state);
                    }
                    (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                        state.input.clear_focused();
                    }
                    (_, KeyCode::Tab) | (_, KeyCode::BackTab) => state.input.focus_next(),
                    (_, KeyCode::Enter) => submit(&mut state, &cmd_tx),
                    (_, KeyCode::Backspace) => state.input.pop_char(),
                    (_, KeyCode::Up) => state.scroll_up(1),
                    (_, KeyCode::Down) => state.scroll_down(1),
                    (_, KeyCode::PageUp) => state.scroll_up(10),
                    (_, KeyCode::PageDown) => state.scroll_down(10),
                    (m, KeyCode::Char(c))
                        if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                    {
                        state.input.push_char(c);
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

/// Begin an attempt from the form and hand it to the controller.
fn submit(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>) {
    match state.session.begin(&state.input) {
        Some(request) => {
            state.info = format!("Analyzing \"{}\"…", request.query);
            if cmd_tx.send(UiCommand::Submit(request)).is_err() {
                state
                    .session
                    .resolve(Err(AnalyzeError::transport("analysis controller stopped")));
            }
        }
        None if state.session.is_in_flight() => {
            state.info = "An analysis is already running.".into();
        }
        None => {
            state.info = "Enter a query to analyze.".into();
        }
    }
}

fn apply_event(args: &Cli, state: &mut UiState, ev: SessionEvent) {
    match ev {
        SessionEvent::Dispatched { query } => {
            debug!(%query, "request dispatched");
            state.info = format!("Request sent to {} for \"{query}\"", state.endpoint);
        }
        SessionEvent::Resolved { outcome } => {
            state.session.resolve(outcome);
            match (state.session.state(), state.session.last_request()) {
                (SessionState::Succeeded(result), Some(request)) => {
                    let processed = orchestrator::process_success(args, request, result);
                    state.last_record = Some(processed.record);
                    state.result_scroll = 0;
                    state.info = if processed.export_messages.is_empty() {
                        "Analysis complete.".into()
                    } else {
                        processed.export_messages.join("; ")
                    };
                }
                (SessionState::Failed(_), _) => {
                    state.info = "Analysis failed. Press Enter to try again.".into();
                }
                _ => {}
            }
        }
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Analyze"), Line::from("Help")])
        .select(state.tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("profile-analyzer"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_ANALYZE => draw_analyze(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_input(
    f: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let inner_width = area.width.saturating_sub(2);
    // Leave a column for the cursor.
    let shown = state::visible_tail(value, inner_width.saturating_sub(1));
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let text = if value.is_empty() && !focused {
        Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(shown.to_string())
    };
    let p = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title.to_string()),
    );
    f.render_widget(p, area);

    if focused {
        let x = area.x + 1 + shown.chars().count() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_analyze(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let error = state.session.error();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Query
                Constraint::Length(3), // Context
                Constraint::Length(1), // Submit control
                Constraint::Length(if error.is_some() { 3 } else { 0 }),
                Constraint::Min(0),    // Result
                Constraint::Length(3), // Status
            ]
            .as_ref(),
        )
        .split(area);

    let focus = state.input.focus();
    draw_input(
        f,
        rows[0],
        "Query",
        state.input.query(),
        "Enter name, company, position...",
        focus == Field::Query,
    );
    draw_input(
        f,
        rows[1],
        "About you (optional)",
        state.input.user_context(),
        "Share something about yourself to find common ground",
        focus == Field::Context,
    );

    let enabled = state.input.can_submit(state.session.state());
    let button_style = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(format!(" {} ", state.submit_label()), button_style),
        Span::styled(
            "  Enter submit · Tab switch field · F1 help",
            Style::default().fg(Color::Gray),
        ),
    ]));
    f.render_widget(button, rows[2]);

    if let Some(message) = error {
        let banner = Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        );
        f.render_widget(banner, rows[3]);
    }

    let result_block = Block::default().borders(Borders::ALL).title("Result");
    let result = match state.session.displayed_result() {
        Some(r) => Paragraph::new(state::result_lines(r))
            .wrap(Wrap { trim: false })
            .scroll((state.result_scroll, 0)),
        None => Paragraph::new(Line::from(Span::styled(
            "No analysis yet. Type a query and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))),
    };
    f.render_widget(result.block(result_block), rows[4]);

    let status = Paragraph::new(vec![Line::from(vec![
        Span::styled("Info: ", Style::default().fg(Color::Gray)),
        Span::raw(state.info.clone()),
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Service: {}", state.endpoint)),
    );
    f.render_widget(status, rows[5]);
}
