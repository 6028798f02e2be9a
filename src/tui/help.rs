use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &'static str, pad: usize, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(action),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        key_line("Enter", 10, "Analyze (disabled while a request is running)"),
        key_line("Tab", 12, "Switch between Query and Context"),
        key_line("Ctrl-U", 9, "Clear focused field"),
        key_line("Ctrl-S", 9, "Save shown result as JSON"),
        key_line("Ctrl-Y", 9, "Copy profile URL to clipboard"),
        key_line("↑/↓", 12, "Scroll result"),
        key_line("PgUp/PgDn", 6, "Scroll result by page"),
        key_line("F1", 13, "Toggle this help"),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  Query    Name, company, position... of the person to analyze."),
        Line::from("  Context  Optional notes about yourself; enables Common Ground."),
        Line::from(""),
        Line::from("Service:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "--base-url or PROFILE_ANALYZER_URL (default http://localhost:8000)",
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
