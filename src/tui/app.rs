//! Application state for the TUI
//!
//! [`Browser`] holds what the list shows: the loaded children of the current
//! component, the selection and the paging cursor. [`App`] wraps it with the
//! list view, the key bindings and the drilldown breadcrumbs, and answers the
//! view's requests as its [`ListHost`].

use std::time::Instant;

use anyhow::Result;
use crossterm::event::KeyEvent;

use super::keymap::InputContext;
use super::list_view::{ListAction, ListHost, ListProps, ListView};
use super::theme::Theme;
use crate::component::ComponentInfo;
use crate::config::{MeasuresConfig, TuiTheme};
use crate::format::format_measure;
use crate::models::{BranchLike, ComponentMeasure, Metric, MetricType, MetricsMap, Paging};
use crate::source::{MeasureSource, TreePage, TreeQuery};

/// Message shown in the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// One level of the drilldown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub key: String,
    pub name: String,
    /// Selection to restore when coming back up
    pub selected: Option<String>,
}

/// Request made by the list view while the browser is borrowed for its props
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostRequest {
    FetchMore,
    Select(String),
    Open(String),
}

/// Collects view callbacks so they can be applied once the props borrow ends
#[derive(Debug, Default)]
struct Deferred(Vec<HostRequest>);

impl ListHost for Deferred {
    fn fetch_more(&mut self) {
        self.0.push(HostRequest::FetchMore);
    }

    fn handle_select(&mut self, key: &str) {
        self.0.push(HostRequest::Select(key.to_string()));
    }

    fn handle_open(&mut self, key: &str) {
        self.0.push(HostRequest::Open(key.to_string()));
    }
}

impl Deferred {
    fn replay(self, host: &mut impl ListHost) {
        for request in self.0 {
            match request {
                HostRequest::FetchMore => host.fetch_more(),
                HostRequest::Select(key) => host.handle_select(&key),
                HostRequest::Open(key) => host.handle_open(&key),
            }
        }
    }
}

/// Loaded children of the current component
#[derive(Debug, Clone)]
pub struct Browser {
    pub root: ComponentMeasure,
    pub components: Vec<ComponentMeasure>,
    pub metrics: MetricsMap,
    pub metric: Metric,
    pub paging: Option<Paging>,
    pub info: Option<ComponentInfo>,
    pub branch_like: Option<BranchLike>,
    pub selected_key: Option<String>,
}

impl Browser {
    fn from_page(page: TreePage, metric_key: &str, branch_like: Option<BranchLike>) -> Self {
        let metric = page
            .metrics
            .get(metric_key)
            .cloned()
            .unwrap_or_else(|| Metric::new(metric_key, metric_key, MetricType::String));
        Self {
            root: page.base_component,
            components: page.components,
            metrics: page.metrics,
            metric,
            paging: Some(page.paging),
            info: page.info,
            branch_like,
            selected_key: None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.components.iter().any(|c| c.key == key)
    }

    pub fn selected_idx(&self) -> Option<usize> {
        let key = self.selected_key.as_deref()?;
        self.components.iter().position(|c| c.key == key)
    }

    /// Value the server flagged as best for the main metric, if any row carries it
    pub fn best_value(&self) -> Option<&str> {
        self.components
            .iter()
            .filter_map(|c| c.measure(&self.metric.key))
            .find(|m| m.best_value)
            .and_then(|m| m.value.as_deref())
    }

    pub fn props(&self) -> ListProps<'_> {
        ListProps {
            best_value: self.best_value(),
            branch_like: self.branch_like.as_ref(),
            components: &self.components,
            metric: &self.metric,
            metrics: &self.metrics,
            paging: self.paging.as_ref(),
            root_component: &self.root,
            selected_key: self.selected_key.as_deref(),
            selected_idx: self.selected_idx(),
        }
    }

    pub fn has_more(&self) -> bool {
        self.paging.is_some_and(|p| p.has_more(self.components.len()))
    }
}

/// Main application state
pub struct App {
    pub running: bool,
    pub browser: Browser,
    pub breadcrumbs: Vec<Crumb>,
    pub status_message: Option<StatusMessage>,
    pub theme_variant: TuiTheme,
    pub input: InputContext<ListAction>,
    source: Box<dyn MeasureSource>,
    query: TreeQuery,
    view: ListView,
}

impl App {
    /// Load the first page of `query.component` and bind the list keys
    pub fn new(
        source: Box<dyn MeasureSource>,
        query: TreeQuery,
        metric_key: &str,
        config: &MeasuresConfig,
    ) -> Result<Self> {
        let page = source.fetch_page(&query, 1)?;
        let browser = Browser::from_page(page, metric_key, query.branch_like.clone());
        let input = InputContext::new();
        let view = ListView::initialize(&browser.props(), &input, &config.navigation)?;

        let breadcrumbs = vec![Crumb {
            key: browser.root.key.clone(),
            name: browser.root.name.clone(),
            selected: None,
        }];

        Ok(Self {
            running: true,
            browser,
            breadcrumbs,
            status_message: None,
            theme_variant: config.tui.theme,
            input,
            source,
            query,
            view,
        })
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Release the list bindings
    pub fn shutdown(&mut self) {
        self.view.dispose();
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    pub fn theme(&self) -> Theme {
        Theme::for_config(self.theme_variant)
    }

    pub fn cycle_theme(&mut self) {
        self.theme_variant = self.theme_variant.next();
        let name = self.theme().name;
        self.set_status(format!("Theme: {name}"), false);
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error,
        });
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    /// Route a key through the list scope. Returns false when no binding took it.
    pub fn dispatch_list_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        let Some(action) = self.input.dispatch(key) else {
            return false;
        };
        let mut deferred = Deferred::default();
        self.view.perform(action, &self.browser.props(), &mut deferred, now);
        deferred.replay(self);
        true
    }

    /// Load the next page through the view's footer
    pub fn load_more(&mut self) {
        let mut deferred = Deferred::default();
        self.view.load_more(&self.browser.props(), &mut deferred);
        if deferred.0.is_empty() {
            self.set_status("All components shown", false);
        }
        deferred.replay(self);
    }

    pub fn render_list(&mut self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let theme = self.theme();
        self.view.render(frame, area, &self.browser.props(), &theme);
    }

    /// Go back to the parent of the current component
    pub fn go_up(&mut self) {
        let Some(parent) = self.breadcrumbs.iter().rev().nth(1).cloned() else {
            self.set_status("Already at the top", false);
            return;
        };
        if self.load(&parent.key) {
            self.breadcrumbs.pop();
            self.restore_selection(parent.selected);
        }
    }

    /// Select `key` again after a reload, fetching further pages until it shows up.
    /// A key that is no longer there clears the selection.
    fn restore_selection(&mut self, key: Option<String>) {
        if let Some(wanted) = key.as_deref() {
            while !self.browser.contains(wanted) && self.browser.has_more() {
                let before = self.browser.components.len();
                self.fetch_more();
                if self.browser.components.len() == before {
                    break;
                }
            }
        }
        let key = key.filter(|k| self.browser.contains(k));
        self.select_key(key);
    }

    /// Replace the list with page 1 of `key`'s children. Errors go to the status line.
    fn load(&mut self, key: &str) -> bool {
        let query = self.query.for_component(key);
        match self.source.fetch_page(&query, 1) {
            Ok(page) => {
                tracing::info!(
                    component = key,
                    count = page.components.len(),
                    total = page.paging.total,
                    "loaded components"
                );
                let metric_key = self.browser.metric.key.clone();
                self.browser = Browser::from_page(page, &metric_key, self.query.branch_like.clone());
                self.query = query;
                self.view.reset_scroll();
                true
            }
            Err(e) => {
                tracing::warn!(component = key, error = %e, "failed to load components");
                self.set_status(format!("Failed to load {key}: {e}"), true);
                false
            }
        }
    }

    fn select_key(&mut self, key: Option<String>) {
        let prev_key = self.browser.selected_key.take();
        let prev_idx = prev_key
            .as_deref()
            .and_then(|k| self.browser.components.iter().position(|c| c.key == k));
        self.browser.selected_key = key;

        let next = self.browser.props();
        let prev = ListProps {
            selected_key: prev_key.as_deref(),
            selected_idx: prev_idx,
            ..next
        };
        self.view.on_props_changed(&prev, &next);
    }

    fn show_measures(&mut self, component: &ComponentMeasure) {
        let values: Vec<String> = self
            .browser
            .metrics
            .values()
            .filter_map(|metric| {
                let value = component.value(&metric.key)?;
                Some(format!(
                    "{}: {}",
                    metric.name,
                    format_measure(value, metric.metric_type)
                ))
            })
            .collect();
        let text = if values.is_empty() {
            format!("{}: no measures", component.display_name())
        } else {
            format!("{}: {}", component.display_name(), values.join(", "))
        };
        self.set_status(text, false);
    }
}

impl ListHost for App {
    fn fetch_more(&mut self) {
        if !self.browser.has_more() {
            return;
        }
        let Some(page_index) = self.browser.paging.map(|p| p.next_page()) else {
            return;
        };
        match self.source.fetch_page(&self.query, page_index) {
            Ok(page) => {
                tracing::info!(
                    component = %self.query.component,
                    page = page_index,
                    count = page.components.len(),
                    "loaded more components"
                );
                self.browser.components.extend(page.components);
                self.browser.metrics.extend(page.metrics);
                self.browser.paging = Some(page.paging);
            }
            Err(e) => {
                tracing::warn!(page = page_index, error = %e, "failed to load more components");
                self.set_status(format!("Failed to load more: {e}"), true);
            }
        }
    }

    fn handle_select(&mut self, key: &str) {
        self.select_key(Some(key.to_string()));
    }

    fn handle_open(&mut self, key: &str) {
        let Some(component) = self
            .browser
            .components
            .iter()
            .find(|c| c.key == key)
            .cloned()
        else {
            return;
        };

        if !component.qualifier.has_children() {
            self.show_measures(&component);
            return;
        }

        if let Some(top) = self.breadcrumbs.last_mut() {
            top.selected = Some(key.to_string());
        }
        if self.load(key) {
            self.breadcrumbs.push(Crumb {
                key: component.key.clone(),
                name: component.name.clone(),
                selected: None,
            });
            self.select_key(None);
        }
    }
}
