//! Components table
//!
//! One row per measured component: the main metric first, then any other
//! metric the loaded components carry a value for.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::theme::Theme;
use crate::format::format_measure;
use crate::models::{BranchLike, ComponentMeasure, Measure, Metric, MetricsMap};

const NAME_MIN_WIDTH: u16 = 20;
const VALUE_WIDTH: u16 = 12;
const NO_VALUE: &str = "-";

/// Rows above the first data row: top border and the header
pub const HEADER_ROWS: u16 = 2;
/// Rows below the last data row: bottom border
pub const TRAILER_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy)]
pub struct ComponentsList<'a> {
    pub best_value: Option<&'a str>,
    pub branch_like: Option<&'a BranchLike>,
    pub components: &'a [ComponentMeasure],
    pub metric: &'a Metric,
    pub metrics: &'a MetricsMap,
    pub root_component: &'a ComponentMeasure,
    pub selected_component: Option<&'a str>,
}

impl<'a> ComponentsList<'a> {
    /// Secondary metrics shown as extra columns, in key order
    pub fn extra_metrics(&self) -> Vec<&'a Metric> {
        self.metrics
            .values()
            .filter(|m| m.key != self.metric.key && !m.hidden)
            .filter(|m| self.components.iter().any(|c| c.value(&m.key).is_some()))
            .collect()
    }

    /// Row index of the selected component
    pub fn selected_position(&self) -> Option<usize> {
        let key = self.selected_component?;
        self.components.iter().position(|c| c.key == key)
    }

    fn is_best(&self, measure: &Measure) -> bool {
        measure.best_value
            || (self.best_value.is_some() && measure.value.as_deref() == self.best_value)
    }

    fn value_cell(&self, component: &ComponentMeasure, metric: &Metric, theme: &Theme) -> Cell<'a> {
        let Some(measure) = component.measure(&metric.key) else {
            return Cell::from(Span::styled(NO_VALUE, Style::default().fg(theme.surface1)));
        };
        let Some(value) = measure.value.as_deref() else {
            return Cell::from(Span::styled(NO_VALUE, Style::default().fg(theme.surface1)));
        };
        let style = if self.is_best(measure) {
            Style::default().fg(theme.subtext0).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(theme.measure_color(value, metric.metric_type))
        };
        let text = Line::from(format_measure(value, metric.metric_type)).alignment(Alignment::Right);
        Cell::from(text).style(style)
    }

    pub fn title(&self, theme: &Theme) -> Line<'a> {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.root_component.name),
                Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("· {} ", self.metric.name),
                Style::default().fg(theme.text),
            ),
        ];
        if let Some(branch) = self.branch_like {
            spans.push(Span::styled(
                format!("⎇ {} ", branch.label()),
                Style::default().fg(theme.peach),
            ));
        }
        Line::from(spans)
    }

    fn rows(&self, extras: &[&Metric], theme: &Theme) -> Vec<Row<'a>> {
        let selected = self.selected_component;
        self.components
            .iter()
            .map(|component| {
                let mut cells = vec![
                    Cell::from(Line::from(vec![
                        Span::raw(format!("{} ", component.qualifier.icon())),
                        Span::styled(
                            component.display_name().to_string(),
                            Style::default().fg(theme.text),
                        ),
                    ])),
                    self.value_cell(component, self.metric, theme),
                ];
                cells.extend(extras.iter().map(|m| self.value_cell(component, m, theme)));

                let row = Row::new(cells);
                if Some(component.key.as_str()) == selected {
                    row.style(Style::default().bg(theme.surface0).add_modifier(Modifier::BOLD))
                } else {
                    row
                }
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut TableState, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.surface1))
            .title(self.title(theme));

        if self.components.is_empty() {
            let paragraph = Paragraph::new("No components")
                .style(Style::default().fg(theme.subtext0))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let extras = self.extra_metrics();
        let mut widths = vec![Constraint::Min(NAME_MIN_WIDTH), Constraint::Length(VALUE_WIDTH)];
        widths.extend(extras.iter().map(|_| Constraint::Length(VALUE_WIDTH)));

        let header_style = Style::default().fg(theme.blue).add_modifier(Modifier::BOLD);
        let mut header = vec![
            Cell::from("Name"),
            Cell::from(Line::from(self.metric.name.clone()).alignment(Alignment::Right)),
        ];
        header.extend(
            extras
                .iter()
                .map(|m| Cell::from(Line::from(m.name.clone()).alignment(Alignment::Right))),
        );

        let table = Table::new(self.rows(&extras, theme), widths)
            .header(Row::new(header).style(header_style))
            .block(block)
            .column_spacing(1);

        state.select(self.selected_position());
        frame.render_stateful_widget(table, area, state);
    }
}
