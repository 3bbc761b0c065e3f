//! "N of M shown" footer with the load-more hint

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::Theme;
use crate::format::format_int;

/// Key that loads the next page
pub const LOAD_MORE_KEY: char = 'm';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFooter {
    pub count: usize,
    pub total: usize,
}

impl ListFooter {
    pub fn new(count: usize, total: usize) -> Self {
        Self { count, total }
    }

    pub fn has_more(&self) -> bool {
        self.count < self.total
    }

    pub fn line(&self, theme: &Theme) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(
                "{} of {} shown",
                format_int(&self.count.to_string()),
                format_int(&self.total.to_string())
            ),
            Style::default().fg(theme.subtext0),
        )];
        if self.has_more() {
            spans.push(Span::styled("  ·  ", Style::default().fg(theme.surface1)));
            spans.push(Span::styled(
                format!("{LOAD_MORE_KEY}: show more"),
                Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let paragraph = Paragraph::new(self.line(theme)).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}
