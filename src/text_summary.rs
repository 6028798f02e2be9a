//! Result rendering shared by text mode and the TUI.
//!
//! Sections are computed once here so both surfaces agree on what is shown;
//! in particular Common Ground only appears when the service returned text for it.

use crate::model::AnalysisResult;

pub(crate) enum SectionBody<'a> {
    Paragraph(&'a str),
    Bullets(&'a [String]),
    Link(&'a str),
}

pub(crate) struct Section<'a> {
    pub title: &'static str,
    pub body: SectionBody<'a>,
}

/// Ordered sections to display for a result.
pub(crate) fn result_sections(result: &AnalysisResult) -> Vec<Section<'_>> {
    let mut sections = vec![
        Section {
            title: "Professional Summary",
            body: SectionBody::Paragraph(&result.insights.professional_summary),
        },
        Section {
            title: "Personal Background",
            body: SectionBody::Paragraph(&result.insights.personal_background),
        },
        Section {
            title: "Interesting Facts",
            body: SectionBody::Bullets(&result.insights.interesting_facts),
        },
    ];
    if let Some(common) = result.common_ground() {
        sections.push(Section {
            title: "Common Ground",
            body: SectionBody::Paragraph(common),
        });
    }
    sections.push(Section {
        title: "Profile",
        body: SectionBody::Link(&result.profile_url),
    });
    sections
}

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) fn build_text_summary(result: &AnalysisResult) -> TextSummary {
    let mut lines = Vec::new();
    for (i, section) in result_sections(result).into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("== {} ==", section.title));
        match section.body {
            SectionBody::Paragraph(text) => lines.push(text.to_string()),
            SectionBody::Bullets(items) => {
                lines.extend(items.iter().map(|item| format!("  - {item}")));
            }
            SectionBody::Link(url) => lines.push(url.to_string()),
        }
    }
    TextSummary { lines }
}
