//! Keyboard-driven list of measured components
//!
//! [`ListView`] is a view over state it does not own. The container passes
//! the components, the selection and the paging cursor in as [`ListProps`]
//! and receives navigation requests through [`ListHost`]. The view itself
//! keeps only what a view needs: its key scope, two rate limiters and the
//! table scroll position.
//!
//! Lifecycle is explicit:
//!
//! - [`ListView::initialize`] binds ↑/↓/→ in the `measures-files` scope and
//!   queues a scroll to the current selection, if any.
//! - [`ListView::on_props_changed`] queues a scroll when the selected key
//!   changed.
//! - [`ListView::dispose`] unbinds the scope. Dropping the view does the same.
//!
//! Navigation wraps: moving up from the first row (or with nothing selected)
//! selects the last row, moving down from the last row (or with nothing
//! selected) selects the first.

use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::TableState,
};

use super::components_list::{ComponentsList, HEADER_ROWS, TRAILER_ROWS};
use super::footer::ListFooter;
use super::keymap::{InputContext, KeyChord, ScopeGuard};
use super::theme::Theme;
use super::throttle::Throttle;
use crate::config::NavigationConfig;
use crate::error::Result;
use crate::models::{BranchLike, ComponentMeasure, Metric, MetricsMap, Paging};

/// Key scope owned by the list view
pub const SCOPE: &str = "measures-files";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    SelectPrevious,
    SelectNext,
    OpenSelected,
}

impl ListAction {
    /// Short label for key hints
    pub fn label(self) -> &'static str {
        match self {
            ListAction::SelectPrevious => "up",
            ListAction::SelectNext => "down",
            ListAction::OpenSelected => "open",
        }
    }
}

/// Bindings registered by [`ListView::initialize`]
pub fn bindings() -> Vec<(KeyChord, ListAction)> {
    vec![
        (KeyChord::plain(KeyCode::Up), ListAction::SelectPrevious),
        (KeyChord::plain(KeyCode::Down), ListAction::SelectNext),
        (KeyChord::plain(KeyCode::Right), ListAction::OpenSelected),
    ]
}

/// Callbacks into the container that owns the list state
pub trait ListHost {
    /// Load the next page of components
    fn fetch_more(&mut self);
    /// Make `key` the selected component
    fn handle_select(&mut self, key: &str);
    /// Navigate into `key`
    fn handle_open(&mut self, key: &str);
}

/// Read-only inputs of the view
#[derive(Debug, Clone, Copy)]
pub struct ListProps<'a> {
    pub best_value: Option<&'a str>,
    pub branch_like: Option<&'a BranchLike>,
    pub components: &'a [ComponentMeasure],
    pub metric: &'a Metric,
    pub metrics: &'a MetricsMap,
    pub paging: Option<&'a Paging>,
    pub root_component: &'a ComponentMeasure,
    pub selected_key: Option<&'a str>,
    pub selected_idx: Option<usize>,
}

impl<'a> ListProps<'a> {
    /// The footer, present only with a paging cursor and at least one component
    pub fn footer(&self) -> Option<ListFooter> {
        match self.paging {
            Some(paging) if !self.components.is_empty() => {
                Some(ListFooter::new(self.components.len(), paging.total))
            }
            _ => None,
        }
    }

    fn components_list(&self) -> ComponentsList<'a> {
        ComponentsList {
            best_value: self.best_value,
            branch_like: self.branch_like,
            components: self.components,
            metric: self.metric,
            metrics: self.metrics,
            root_component: self.root_component,
            selected_component: self.selected_key,
        }
    }
}

/// Rows kept visible around the selection when scrolling it into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOffsets {
    pub top: u16,
    pub bottom: u16,
}

impl From<&NavigationConfig> for ScrollOffsets {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            top: config.scroll_top_offset,
            bottom: config.scroll_bottom_offset,
        }
    }
}

/// New scroll offset that shows row `index` of `len` in a window of `height` rows
///
/// The row keeps `offsets.top` rows above it and `offsets.bottom` rows below
/// it where the list allows. Offsets are shrunk to fit small windows. An
/// already visible row leaves the offset unchanged.
pub fn scroll_into_view(
    offset: usize,
    index: usize,
    len: usize,
    height: usize,
    offsets: ScrollOffsets,
) -> usize {
    if height == 0 || len == 0 {
        return offset;
    }
    let slack = (height - 1) / 2;
    let top = usize::from(offsets.top).min(slack);
    let bottom = usize::from(offsets.bottom).min(slack);

    let next = if index < offset + top {
        index.saturating_sub(top)
    } else if index + bottom >= offset + height {
        index + bottom + 1 - height
    } else {
        offset
    };
    next.min(len.saturating_sub(height))
}

/// Keyboard-driven list of component measures with a movable selection
#[derive(Debug)]
pub struct ListView {
    bindings: Option<ScopeGuard<ListAction>>,
    select_previous_throttle: Throttle,
    select_next_throttle: Throttle,
    offsets: ScrollOffsets,
    table_state: TableState,
    scroll_pending: bool,
}

impl ListView {
    /// Bind the list keys and queue a scroll to the current selection
    pub fn initialize(
        props: &ListProps<'_>,
        input: &InputContext<ListAction>,
        config: &NavigationConfig,
    ) -> Result<Self> {
        let guard = input.bind_scope(SCOPE, bindings())?;
        let interval = config.throttle_interval();
        let view = Self {
            bindings: Some(guard),
            select_previous_throttle: Throttle::new(interval),
            select_next_throttle: Throttle::new(interval),
            offsets: ScrollOffsets::from(config),
            table_state: TableState::default(),
            scroll_pending: props.selected_key.is_some(),
        };
        tracing::debug!(
            components = props.components.len(),
            selected = ?props.selected_key,
            "list view initialized"
        );
        Ok(view)
    }

    pub fn on_props_changed(&mut self, prev: &ListProps<'_>, next: &ListProps<'_>) {
        if next.selected_key.is_some() && prev.selected_key != next.selected_key {
            self.scroll_pending = true;
        }
    }

    /// Unbind the list keys, returning how many bindings were removed
    pub fn dispose(&mut self) -> usize {
        let removed = self.bindings.take().map(ScopeGuard::release).unwrap_or(0);
        tracing::debug!(removed, "list view disposed");
        removed
    }

    pub fn is_bound(&self) -> bool {
        self.bindings.is_some()
    }

    pub fn scroll_offset(&self) -> usize {
        self.table_state.offset()
    }

    pub fn scroll_pending(&self) -> bool {
        self.scroll_pending
    }

    /// Back to the top, for when the list is replaced
    pub fn reset_scroll(&mut self) {
        self.table_state = TableState::default();
        self.scroll_pending = false;
    }

    /// Run a dispatched action. `now` is the time of the key event.
    pub fn perform(
        &mut self,
        action: ListAction,
        props: &ListProps<'_>,
        host: &mut impl ListHost,
        now: Instant,
    ) {
        match action {
            ListAction::SelectPrevious => self.select_previous(props, host, now),
            ListAction::SelectNext => self.select_next(props, host, now),
            ListAction::OpenSelected => self.open_selected(props, host),
        }
    }

    pub fn select_previous(&mut self, props: &ListProps<'_>, host: &mut impl ListHost, now: Instant) {
        let len = props.components.len();
        if len == 0 || !self.select_previous_throttle.try_fire(now) {
            return;
        }
        let target = match props.selected_idx {
            Some(idx) if idx > 0 => (idx - 1).min(len - 1),
            _ => len - 1,
        };
        host.handle_select(&props.components[target].key);
    }

    pub fn select_next(&mut self, props: &ListProps<'_>, host: &mut impl ListHost, now: Instant) {
        let len = props.components.len();
        if len == 0 || !self.select_next_throttle.try_fire(now) {
            return;
        }
        let target = match props.selected_idx {
            Some(idx) if idx + 1 < len => idx + 1,
            _ => 0,
        };
        host.handle_select(&props.components[target].key);
    }

    pub fn open_selected(&self, props: &ListProps<'_>, host: &mut impl ListHost) {
        if let Some(key) = props.selected_key {
            host.handle_open(key);
        }
    }

    /// Ask the host for the next page, if the footer offers one
    pub fn load_more(&self, props: &ListProps<'_>, host: &mut impl ListHost) {
        if props.footer().is_some_and(|footer| footer.has_more()) {
            host.fetch_more();
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, props: &ListProps<'_>, theme: &Theme) {
        let footer = props.footer();
        let (list_area, footer_area) = if footer.is_some() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        let list = props.components_list();
        if self.scroll_pending {
            if let Some(index) = list.selected_position() {
                let height = list_area.height.saturating_sub(HEADER_ROWS + TRAILER_ROWS);
                let offset = scroll_into_view(
                    self.table_state.offset(),
                    index,
                    props.components.len(),
                    usize::from(height),
                    self.offsets,
                );
                *self.table_state.offset_mut() = offset;
            }
            self.scroll_pending = false;
        }
        list.render(frame, list_area, &mut self.table_state, theme);

        if let (Some(footer), Some(footer_area)) = (footer, footer_area) {
            footer.render(frame, footer_area, theme);
        }
    }
}
