//! Application state and the per-tick orchestration.
//!
//! `App` owns the persisted [`DashboardState`], the row source, and the
//! operator-event queue. Every timer tick runs one full cycle:
//! drain events → reconcile → poll/ingest → rebuild the frame. Operator
//! input between ticks triggers the same cycle minus the fetch, so toggles
//! feel immediate without hammering the feed.

use std::time::Instant;

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::{
    build_frame, DashboardFrame, DashboardState, Ingester, NodeId, OperatorEvent, Record,
    ThresholdKind, ThresholdPair,
};
use crate::source::RowSource;
use crate::ui::Theme;

/// Which value a numeric input prompt is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// Desired node count.
    NodeCount,
    /// High threshold of the cursor node.
    High,
    /// Over threshold of the cursor node.
    Over,
}

impl InputField {
    pub fn label(&self) -> &'static str {
        match self {
            InputField::NodeCount => "node count",
            InputField::High => "high threshold",
            InputField::Over => "over threshold",
        }
    }
}

/// An in-progress numeric entry.
#[derive(Debug, Clone)]
pub struct InputPrompt {
    pub field: InputField,
    /// Node the prompt applies to (threshold fields only).
    pub target: Option<NodeId>,
    pub buffer: String,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data
    source: Box<dyn RowSource>,
    pub config: DashboardConfig,
    ingester: Ingester,
    pub state: DashboardState,
    /// Last successfully ingested records; kept across failed fetches.
    records: Vec<Record>,
    pub frame: DashboardFrame,
    pub load_error: Option<String>,

    // Operator events queued since the last cycle
    pending: Vec<OperatorEvent>,

    // Navigation / input
    pub cursor: usize,
    pub scroll: usize,
    pub input: Option<InputPrompt>,

    // UI
    pub theme: Theme,
    status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given row source and configuration.
    pub fn new(source: Box<dyn RowSource>, config: DashboardConfig) -> Self {
        let state = DashboardState::with_threshold_defaults(
            config.node_count,
            ThresholdPair {
                high: config.high,
                over: config.over,
            },
        );
        let ingester = Ingester {
            timestamp_candidates: config.timestamp_candidates.clone(),
            date_order: config.date_order,
            scale_divisor: config.scale_divisor,
        };
        Self {
            running: true,
            show_help: false,
            source,
            config,
            ingester,
            state,
            records: Vec::new(),
            frame: DashboardFrame::empty(),
            load_error: None,
            pending: Vec::new(),
            cursor: 0,
            scroll: 0,
            input: None,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current row source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Queue an operator event for the next cycle.
    pub fn push_event(&mut self, event: OperatorEvent) {
        self.pending.push(event);
    }

    /// Run one cycle without fetching: reducer, reconcile, recompute.
    ///
    /// Called after operator input so the UI reflects it immediately.
    pub fn apply_pending(&mut self) {
        self.drain_events();
        self.state.reconcile();
        self.rebuild_frame();
    }

    /// Run one full cycle: reducer, reconcile, fetch, ingest, recompute.
    ///
    /// A failed fetch or a schema error leaves the previous records (and so
    /// the previous readings) in place; the error is surfaced and the next
    /// tick retries the whole chain.
    pub fn refresh(&mut self) {
        self.drain_events();
        self.state.reconcile();

        // Poll first: a fetch failure must show up this cycle, not the next.
        let polled = self.source.poll();
        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
        }

        if let Some(rows) = polled {
            match self.ingester.ingest(rows) {
                Ok(records) => {
                    self.records = records;
                    self.load_error = None;
                }
                Err(e) => {
                    self.load_error = Some(e.to_string());
                }
            }
        }

        self.rebuild_frame();
    }

    fn drain_events(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            if let Err(e) = self.state.apply(event) {
                self.set_status_message(e.to_string());
            }
        }
    }

    fn rebuild_frame(&mut self) {
        self.frame = build_frame(&self.state, &self.records, self.config.downsample_target);
        if self.cursor >= self.frame.nodes.len() {
            self.cursor = self.frame.nodes.len().saturating_sub(1);
        }
    }

    /// Node id under the cursor.
    pub fn cursor_node(&self) -> Option<NodeId> {
        self.frame.nodes.get(self.cursor).map(|n| n.id)
    }

    // --- navigation ---------------------------------------------------

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_next_n(&mut self, n: usize) {
        let max = self.frame.nodes.len().saturating_sub(1);
        self.cursor = (self.cursor + n).min(max);
    }

    pub fn select_prev_n(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.frame.nodes.len().saturating_sub(1);
    }

    // --- operator actions ---------------------------------------------

    /// Toggle the chart of the cursor node.
    pub fn toggle_expand_cursor(&mut self) {
        if let Some(id) = self.cursor_node() {
            self.push_event(OperatorEvent::ToggleExpanded(id));
        }
    }

    /// Toggle display selection of the cursor node.
    pub fn toggle_select_cursor(&mut self) {
        if let Some(id) = self.cursor_node() {
            let selected = self.state.view.is_selected(id);
            self.push_event(OperatorEvent::SetSelected(id, !selected));
        }
    }

    /// Remove the cursor node (it returns on the next reconcile cycle).
    pub fn remove_cursor(&mut self) {
        if let Some(id) = self.cursor_node() {
            self.push_event(OperatorEvent::RemoveNodes(vec![id]));
            self.set_status_message(format!("{} removed until next cycle", id.label()));
        }
    }

    /// Nudge the desired node count.
    pub fn adjust_count(&mut self, delta: i32) {
        let next = (self.state.desired_count as i32 + delta).clamp(1, 60) as u16;
        self.push_event(OperatorEvent::SetDesiredCount(next));
    }

    /// Step the displayed day backwards or forwards through the days that
    /// actually carry data. Steps past either end stay on the edge day.
    pub fn step_day(&mut self, delta: i32) {
        let days = &self.frame.available_days;
        if days.is_empty() {
            return;
        }
        let current = self
            .frame
            .day
            .and_then(|day| days.iter().position(|d| *d >= day))
            .unwrap_or(days.len() - 1);
        let next = current
            .saturating_add_signed(delta as isize)
            .min(days.len() - 1);
        self.push_event(OperatorEvent::SelectDay(days[next]));
    }

    /// The day currently shown.
    pub fn current_day(&self) -> Option<NaiveDate> {
        self.frame.day
    }

    // --- numeric input prompt -----------------------------------------

    /// Open a numeric prompt for the given field.
    pub fn start_input(&mut self, field: InputField) {
        let target = match field {
            InputField::NodeCount => None,
            InputField::High | InputField::Over => {
                let Some(id) = self.cursor_node() else {
                    return;
                };
                Some(id)
            }
        };
        self.input = Some(InputPrompt {
            field,
            target,
            buffer: String::new(),
        });
    }

    pub fn input_push(&mut self, c: char) {
        if let Some(prompt) = &mut self.input {
            if c.is_ascii_digit() || c == '.' {
                prompt.buffer.push(c);
            }
        }
    }

    pub fn input_pop(&mut self) {
        if let Some(prompt) = &mut self.input {
            prompt.buffer.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Parse the buffer and queue the matching event.
    pub fn commit_input(&mut self) {
        let Some(prompt) = self.input.take() else {
            return;
        };
        match prompt.field {
            InputField::NodeCount => match prompt.buffer.parse::<u16>() {
                Ok(count) => self.push_event(OperatorEvent::SetDesiredCount(count)),
                Err(_) => self.set_status_message("Invalid node count".to_string()),
            },
            InputField::High | InputField::Over => {
                let Some(id) = prompt.target else { return };
                match prompt.buffer.parse::<f64>() {
                    Ok(value) => {
                        let kind = if prompt.field == InputField::High {
                            ThresholdKind::High
                        } else {
                            ThresholdKind::Over
                        };
                        self.push_event(OperatorEvent::SetThreshold(id, kind, value));
                    }
                    Err(_) => self.set_status_message("Invalid threshold".to_string()),
                }
            }
        }
    }

    // --- status -------------------------------------------------------

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AlertLevel, AlertStatus};
    use crate::source::{ChannelSource, RawRow};

    fn row(time: &str, values: &[(&str, &str)]) -> RawRow {
        let mut row: RawRow = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        row.insert("Time".to_string(), time.to_string());
        row
    }

    fn test_app() -> (tokio::sync::watch::Sender<Vec<RawRow>>, App) {
        let (tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), DashboardConfig::default());
        (tx, app)
    }

    #[test]
    fn test_initial_refresh_builds_nodes() {
        let (tx, mut app) = test_app();
        tx.send(vec![row(
            "2024-05-01 10:00:00",
            &[("Node1A", "420"), ("Node2A", "850")],
        )])
        .unwrap();

        // The watch channel hands the latest batch to the first poll.
        app.refresh();

        assert_eq!(app.frame.nodes.len(), 2);
        assert_eq!(app.frame.nodes[0].label, "Node 01");
        assert_eq!(
            app.frame.nodes[0].alert,
            AlertStatus::Reading(AlertLevel::Normal)
        );
        assert_eq!(
            app.frame.nodes[1].alert,
            AlertStatus::Reading(AlertLevel::Over)
        );
    }

    #[test]
    fn test_failed_ingest_keeps_previous_readings() {
        let (tx, mut app) = test_app();
        tx.send(vec![row("2024-05-01 10:00:00", &[("Node1A", "420")])])
            .unwrap();
        app.refresh();
        assert_eq!(app.frame.nodes[0].phases[0], Some(42.0));
        assert!(app.load_error.is_none());

        // A batch with no timestamp column is a schema error; readings stay.
        tx.send(vec![[("Node1A".to_string(), "999".to_string())]
            .into_iter()
            .collect()])
            .unwrap();
        app.refresh();
        assert!(app.load_error.is_some());
        assert_eq!(app.frame.nodes[0].phases[0], Some(42.0));

        // A good batch on the next tick restores normal operation.
        tx.send(vec![row("2024-05-01 10:00:10", &[("Node1A", "500")])])
            .unwrap();
        app.refresh();
        assert!(app.load_error.is_none());
        assert_eq!(app.frame.nodes[0].phases[0], Some(50.0));
    }

    #[test]
    fn test_source_failure_surfaces_same_cycle() {
        let source = crate::source::CsvFileSource::new("/nonexistent/phasewatch.csv");
        let mut app = App::new(Box::new(source), DashboardConfig::default());

        // The very first refresh hits the read error and must report it
        // immediately, not one tick late.
        app.refresh();
        assert!(app.load_error.as_deref().unwrap().contains("Read error"));
    }

    #[test]
    fn test_operator_events_apply_between_ticks() {
        let (_tx, mut app) = test_app();
        app.refresh();
        assert_eq!(app.frame.nodes.len(), 2);

        app.adjust_count(1);
        app.apply_pending();
        assert_eq!(app.frame.nodes.len(), 3);
        assert_eq!(app.state.desired_count, 3);

        app.toggle_expand_cursor();
        app.apply_pending();
        assert!(app.frame.nodes[0].expanded);
    }

    #[test]
    fn test_cursor_clamped_when_count_shrinks() {
        let (_tx, mut app) = test_app();
        app.refresh();
        app.select_last();
        assert_eq!(app.cursor, 1);

        app.push_event(OperatorEvent::SetDesiredCount(1));
        app.apply_pending();
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_commit_threshold_input() {
        let (_tx, mut app) = test_app();
        app.refresh();

        app.start_input(InputField::Over);
        for c in "72.5".chars() {
            app.input_push(c);
        }
        app.commit_input();
        app.apply_pending();

        let id = app.cursor_node().unwrap();
        assert_eq!(app.state.thresholds.get(id).unwrap().over, 72.5);
    }

    #[test]
    fn test_invalid_input_sets_status() {
        let (_tx, mut app) = test_app();
        app.refresh();

        app.start_input(InputField::NodeCount);
        app.input_push('.');
        app.commit_input();
        assert!(app.get_status_message().is_some());
    }
}
