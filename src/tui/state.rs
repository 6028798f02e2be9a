use crate::input::InputController;
use crate::model::AnalysisResult;
use crate::session::AnalysisSession;
use crate::storage::ExportRecord;
use crate::text_summary::{result_sections, SectionBody};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub const TAB_ANALYZE: usize = 0;
pub const TAB_HELP: usize = 1;

pub struct UiState {
    pub tab: usize,
    pub input: InputController,
    // Owned by the UI thread only; the controller reports outcomes through events.
    pub session: AnalysisSession,
    pub info: String,
    pub endpoint: String,
    pub result_scroll: u16,
    pub spinner: usize,
    // Export record for the result currently on screen.
    pub last_record: Option<ExportRecord>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TAB_ANALYZE,
            input: InputController::new(),
            session: AnalysisSession::new(),
            info: String::new(),
            endpoint: String::new(),
            result_scroll: 0,
            spinner: 0,
            last_record: None,
        }
    }
}

impl UiState {
    /// Label for the submit control: busy while in flight.
    pub fn submit_label(&self) -> String {
        const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
        if self.session.is_in_flight() {
            format!("Analyzing... {}", FRAMES[self.spinner % FRAMES.len()])
        } else {
            "Analyze".into()
        }
    }

    pub fn scroll_up(&mut self, by: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(by);
    }

    pub fn scroll_down(&mut self, by: u16) {
        self.result_scroll = self.result_scroll.saturating_add(by);
    }
}

/// Styled lines for a result panel.
pub fn result_lines(result: &AnalysisResult) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    for (i, section) in result_sections(result).into_iter().enumerate() {
        if i > 0 {
            out.push(Line::from(""));
        }
        out.push(Line::from(Span::styled(
            section.title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        match section.body {
            SectionBody::Paragraph(text) => out.push(Line::from(text.to_string())),
            SectionBody::Bullets(items) => {
                for item in items {
                    out.push(Line::from(vec![
                        Span::styled("  • ", Style::default().fg(Color::Magenta)),
                        Span::raw(item.clone()),
                    ]));
                }
            }
            SectionBody::Link(url) => out.push(Line::from(Span::styled(
                url.to_string(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ))),
        }
    }
    out
}

/// Visible tail of an input value that fits `width` columns.
pub fn visible_tail(value: &str, width: u16) -> &str {
    let width = width as usize;
    let count = value.chars().count();
    if count <= width {
        return value;
    }
    let skip = count - width;
    match value.char_indices().nth(skip) {
        Some((idx, _)) => &value[idx..],
        None => "",
    }
}
