//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::app::App;
use super::footer::LOAD_MORE_KEY;
use super::list_view::SCOPE;
use super::theme::Theme;

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let theme = app.theme();

    // Main layout: header, body, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumbs and component details
            Constraint::Min(0),    // Components
            Constraint::Length(1), // Status line
        ])
        .split(area);

    render_header(frame, app, &theme, chunks[0]);
    app.render_list(frame, chunks[1]);
    render_footer(frame, app, &theme, chunks[2]);
}

fn breadcrumb_line(app: &App, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    let last = app.breadcrumbs.len().saturating_sub(1);
    for (i, crumb) in app.breadcrumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(theme.surface1)));
        }
        let style = if i == last {
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.subtext0)
        };
        spans.push(Span::styled(crumb.name.clone(), style));
    }

    if let Some(info) = &app.browser.info {
        spans.push(Span::styled("  │  ", Style::default().fg(theme.surface1)));
        spans.push(Span::styled(info.summary(), Style::default().fg(theme.subtext0)));
    }
    Line::from(spans)
}

fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut title = vec![Span::styled(
        " measures ",
        Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
    )];
    title.push(Span::styled(
        format!("· {} ", app.browser.metric.name),
        Style::default().fg(theme.blue),
    ));
    if let Some(branch) = &app.browser.branch_like {
        title.push(Span::styled(
            format!("⎇ {} ", branch.label()),
            Style::default().fg(theme.peach),
        ));
    }

    let header = Paragraph::new(breadcrumb_line(app, theme)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.surface1))
            .title(Line::from(title)),
    );
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    // Show status message if present (takes priority)
    if let Some(status) = &app.status_message {
        let color = if status.is_error {
            theme.red
        } else {
            theme.green
        };
        let footer = Paragraph::new(Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(status.text.clone(), Style::default().fg(color)),
        ]))
        .style(Style::default().bg(theme.surface0));

        frame.render_widget(footer, area);
        return;
    }

    let hint = |key: String, label: &str| {
        [
            Span::styled(format!(" {key}"), Style::default().fg(theme.blue)),
            Span::styled(format!(" {label} "), Style::default().fg(theme.subtext0)),
        ]
    };
    let mut spans = Vec::new();
    for (chord, action) in app.input.bindings(SCOPE) {
        spans.extend(hint(chord.to_string(), action.label()));
    }
    spans.extend(hint("←".to_string(), "back"));
    if app.browser.has_more() {
        spans.extend(hint(LOAD_MORE_KEY.to_string(), "more"));
    }
    spans.extend(hint("t".to_string(), "theme"));
    spans.extend(hint("q".to_string(), "quit"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeasuresConfig;
    use crate::source::tests::{query, source};
    use crate::tui::list_view::ListHost;
    use crate::tui::test_utils::render_to_string;

    fn app(component: &str, page_size: usize) -> App {
        App::new(
            Box::new(source()),
            query(component, page_size),
            "coverage",
            &MeasuresConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_header_and_list() {
        let mut app = app("acme:app", 10);
        let screen = render_to_string(100, 16, |frame| render(frame, &mut app));

        assert!(screen.contains("measures"));
        assert!(screen.contains("Coverage"));
        assert!(screen.contains("App [TRK]"));
        assert!(screen.contains("README.md"));
        assert!(screen.contains("q quit"));
        assert!(screen.contains("→ open"));
    }

    #[test]
    fn test_render_breadcrumbs_after_drilldown() {
        let mut app = app("acme:app", 10);
        app.handle_open("acme:app:src");
        let screen = render_to_string(100, 16, |frame| render(frame, &mut app));
        assert!(screen.contains("App › src"));
        assert!(screen.contains("src/a.rs"));
    }

    #[test]
    fn test_render_status_replaces_hints() {
        let mut app = app("acme:app", 10);
        app.set_status("Failed to load", true);
        let screen = render_to_string(100, 16, |frame| render(frame, &mut app));
        assert!(screen.contains("Failed to load"));
        assert!(!screen.contains("q quit"));
    }

    #[test]
    fn test_more_hint_only_with_more_pages() {
        let mut paged = app("acme:app:src", 2);
        let screen = render_to_string(100, 16, |frame| render(frame, &mut paged));
        assert!(screen.contains("m more"));
        assert!(screen.contains("2 of 4 shown"));

        let mut complete = app("acme:app", 10);
        let screen = render_to_string(100, 16, |frame| render(frame, &mut complete));
        assert!(!screen.contains("m more"));
    }
}
