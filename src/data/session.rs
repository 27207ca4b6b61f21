//! Session state and the per-cycle recompute.
//!
//! Two update paths are kept strictly apart:
//!
//! - [`DashboardState`] holds everything that persists across refresh
//!   cycles and changes only through discrete [`OperatorEvent`]s applied by
//!   the reducer, followed by one [`DashboardState::reconcile`] per cycle.
//! - [`build_frame`] is a pure recompute from the persisted state plus the
//!   freshly ingested records, producing the [`DashboardFrame`] view model
//!   handed to the renderer. Nothing in the frame is ever stored back.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};

use crate::data::alert::{self, AlertStatus};
use crate::data::downsample::downsample;
use crate::data::ingest::{available_days, filter_day, Record};
use crate::data::registry::{NodeId, NodeRegistry};
use crate::data::thresholds::{ThresholdKind, ThresholdPair, ThresholdStore};
use crate::data::view_state::ViewStateController;
use crate::error::Result;

/// A discrete operator action, queued by the UI and consumed once per cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorEvent {
    SetDesiredCount(u16),
    SetSelected(NodeId, bool),
    RemoveNodes(Vec<NodeId>),
    SetThreshold(NodeId, ThresholdKind, f64),
    ToggleExpanded(NodeId),
    SelectDay(NaiveDate),
}

/// Everything that survives across refresh cycles.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub registry: NodeRegistry,
    pub thresholds: ThresholdStore,
    pub view: ViewStateController,
    pub desired_count: u16,
    /// Operator-chosen day; None means "most recent day with data".
    pub selected_day: Option<NaiveDate>,
    /// Ids removed by an event this cycle; the same cycle's reconcile must
    /// not re-add them, the next cycle's will.
    pending_removals: BTreeSet<NodeId>,
}

impl DashboardState {
    /// Fresh state: no nodes until the first reconcile.
    pub fn new(desired_count: u16) -> Self {
        Self {
            registry: NodeRegistry::new(),
            thresholds: ThresholdStore::new(),
            view: ViewStateController::new(),
            desired_count: NodeRegistry::clamp_count(desired_count),
            selected_day: None,
            pending_removals: BTreeSet::new(),
        }
    }

    /// Same, but newly created nodes start from the given threshold pair.
    pub fn with_threshold_defaults(desired_count: u16, defaults: ThresholdPair) -> Self {
        Self {
            thresholds: ThresholdStore::with_defaults(defaults),
            ..Self::new(desired_count)
        }
    }

    /// Apply one operator event.
    ///
    /// Threshold and view-state events against an absent node return the
    /// store's NodeNotFound error; the caller surfaces it as a status
    /// message rather than failing the cycle.
    pub fn apply(&mut self, event: OperatorEvent) -> Result<()> {
        match event {
            OperatorEvent::SetDesiredCount(count) => {
                self.desired_count = NodeRegistry::clamp_count(count);
            }
            OperatorEvent::SetSelected(id, selected) => {
                self.view.set_selected(id, selected)?;
            }
            OperatorEvent::RemoveNodes(ids) => {
                for id in ids {
                    if self.registry.remove(id) {
                        self.pending_removals.insert(id);
                    }
                }
            }
            OperatorEvent::SetThreshold(id, kind, value) => {
                self.thresholds.set(id, kind, value)?;
            }
            OperatorEvent::ToggleExpanded(id) => {
                self.view.toggle_expanded(id)?;
            }
            OperatorEvent::SelectDay(day) => {
                self.selected_day = Some(day);
            }
        }
        Ok(())
    }

    /// Bring the registry in line with the desired count, then sync the
    /// satellite stores so their key sets match the present ids exactly.
    ///
    /// Runs once per cycle, after the reducer and before evaluation.
    pub fn reconcile(&mut self) {
        self.registry.reconcile(self.desired_count);
        for id in std::mem::take(&mut self.pending_removals) {
            self.registry.remove(id);
        }

        let present = self.registry.present_ids();
        self.thresholds.sync_with(&present);
        self.view.sync_with(&present);
    }
}

/// One time-series point for an expanded node's chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub phases: [Option<f64>; 3],
}

/// Per-node view model for one rendered cycle.
#[derive(Debug, Clone)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub alert: AlertStatus,
    pub phases: [Option<f64>; 3],
    pub thresholds: ThresholdPair,
    pub selected: bool,
    pub expanded: bool,
    /// Chart points; present only for expanded nodes.
    pub series: Option<Vec<SeriesPoint>>,
}

/// The complete view model for one cycle.
#[derive(Debug, Clone)]
pub struct DashboardFrame {
    pub nodes: Vec<NodeView>,
    /// The day actually shown (operator choice clamped to the data range).
    pub day: Option<NaiveDate>,
    pub available_days: Vec<NaiveDate>,
    /// Number of records in the day's window after downsampling.
    pub sample_count: usize,
    pub last_updated: Instant,
}

impl DashboardFrame {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            day: None,
            available_days: Vec::new(),
            sample_count: 0,
            last_updated: Instant::now(),
        }
    }
}

/// Clamp the operator's day choice to the range of days with data.
///
/// None (no choice yet) resolves to the most recent day. A choice inside the
/// range is honored even if that exact day has no rows; the frame then shows
/// no data, mirroring an empty day in the feed.
fn resolve_day(selected: Option<NaiveDate>, days: &[NaiveDate]) -> Option<NaiveDate> {
    let (&min, &max) = (days.first()?, days.last()?);
    match selected {
        None => Some(max),
        Some(day) => Some(day.clamp(min, max)),
    }
}

/// Pure per-cycle recompute: day filter, downsample, evaluate.
///
/// `target` bounds the day's window handed to charts (see
/// [`downsample`](crate::data::downsample::downsample)).
pub fn build_frame(state: &DashboardState, records: &[Record], target: usize) -> DashboardFrame {
    let days = available_days(records);
    let day = resolve_day(state.selected_day, &days);

    let window: Vec<Record> = match day {
        Some(day) => downsample(&filter_day(records, day), target),
        None => Vec::new(),
    };

    let latest = window.iter().max_by_key(|r| r.timestamp);

    let nodes = state
        .registry
        .nodes()
        .map(|node| {
            let thresholds = state
                .thresholds
                .get(node.id)
                .copied()
                .unwrap_or_default();
            let expanded = state.view.is_expanded(node.id);

            let (alert, phases) = match latest {
                Some(latest) => (
                    alert::evaluate(node, latest, &thresholds),
                    alert::phase_values(node, latest),
                ),
                None => (AlertStatus::NoData, [None; 3]),
            };

            let series = expanded.then(|| {
                window
                    .iter()
                    .map(|record| SeriesPoint {
                        timestamp: record.timestamp,
                        phases: alert::phase_values(node, record),
                    })
                    .filter(|point| point.phases.iter().any(Option::is_some))
                    .collect()
            });

            NodeView {
                id: node.id,
                label: node.id.label(),
                alert,
                phases,
                thresholds,
                selected: state.view.is_selected(node.id),
                expanded,
                series,
            }
        })
        .collect();

    DashboardFrame {
        nodes,
        day,
        available_days: days,
        sample_count: window.len(),
        last_updated: Instant::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::alert::AlertLevel;
    use crate::data::thresholds::{DEFAULT_HIGH, DEFAULT_OVER};

    use std::collections::BTreeMap;

    fn record(day: u32, secs: u32, values: &[(&str, f64)]) -> Record {
        Record {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
                + chrono::Duration::seconds(secs as i64),
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn reconciled(count: u16) -> DashboardState {
        let mut state = DashboardState::new(count);
        state.reconcile();
        state
    }

    #[test]
    fn test_satellites_lock_step_after_reconcile() {
        for count in [1, 2, 17, 60] {
            let state = reconciled(count);
            let present = state.registry.present_ids();
            assert_eq!(present.len(), count as usize);
            assert_eq!(state.thresholds.ids(), present);
            assert_eq!(state.view.ids(), present);
        }
    }

    #[test]
    fn test_count_change_scenario() {
        let mut state = reconciled(2);
        assert_eq!(
            state.registry.get(NodeId(1)).unwrap().bindings,
            ["Node1A".to_string(), "Node1B".into(), "Node1C".into()]
        );
        assert_eq!(
            state.registry.get(NodeId(2)).unwrap().bindings,
            ["Node2A".to_string(), "Node2B".into(), "Node2C".into()]
        );

        state.thresholds.set(NodeId(2), ThresholdKind::High, 45.0).unwrap();

        state.apply(OperatorEvent::SetDesiredCount(1)).unwrap();
        state.reconcile();
        assert!(!state.registry.contains(NodeId(2)));
        assert!(state.thresholds.get(NodeId(2)).is_none());
        assert!(state.view.get(NodeId(2)).is_none());

        state.apply(OperatorEvent::SetDesiredCount(2)).unwrap();
        state.reconcile();
        let pair = state.thresholds.get(NodeId(2)).unwrap();
        assert_eq!((pair.high, pair.over), (DEFAULT_HIGH, DEFAULT_OVER));
    }

    #[test]
    fn test_explicit_removal_holds_for_one_cycle() {
        let mut state = reconciled(2);

        state
            .apply(OperatorEvent::RemoveNodes(vec![NodeId(2)]))
            .unwrap();
        state.reconcile();
        assert_eq!(state.registry.present_ids(), vec![NodeId(1)]);
        assert_eq!(state.thresholds.ids(), vec![NodeId(1)]);

        // Next cycle's reconcile brings it back with defaults.
        state.reconcile();
        assert_eq!(state.registry.present_ids(), vec![NodeId(1), NodeId(2)]);
        assert_eq!(state.thresholds.ids(), vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn test_event_on_absent_node_is_not_found() {
        let mut state = reconciled(1);
        assert!(state
            .apply(OperatorEvent::ToggleExpanded(NodeId(5)))
            .is_err());
        assert!(state
            .apply(OperatorEvent::SetThreshold(NodeId(5), ThresholdKind::High, 1.0))
            .is_err());
    }

    #[test]
    fn test_frame_uses_latest_record_of_day() {
        let mut state = reconciled(1);
        state.reconcile();

        let records = vec![
            record(1, 0, &[("Node1A", 85.0)]),
            record(1, 10, &[("Node1A", 30.0)]),
        ];
        let frame = build_frame(&state, &records, 4500);
        let node = &frame.nodes[0];
        // The later record wins: 30.0 is normal.
        assert_eq!(node.alert, AlertStatus::Reading(AlertLevel::Normal));
        assert_eq!(node.phases[0], Some(30.0));
    }

    #[test]
    fn test_frame_defaults_to_most_recent_day() {
        let state = reconciled(1);
        let records = vec![
            record(1, 0, &[("Node1A", 20.0)]),
            record(2, 0, &[("Node1A", 90.0)]),
        ];
        let frame = build_frame(&state, &records, 4500);
        assert_eq!(frame.day, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(
            frame.nodes[0].alert,
            AlertStatus::Reading(AlertLevel::Over)
        );
    }

    #[test]
    fn test_day_selection_clamped_to_range() {
        let mut state = reconciled(1);
        state
            .apply(OperatorEvent::SelectDay(
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            ))
            .unwrap();
        let records = vec![record(1, 0, &[("Node1A", 20.0)])];
        let frame = build_frame(&state, &records, 4500);
        assert_eq!(frame.day, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(frame.sample_count, 1);
    }

    #[test]
    fn test_empty_records_yield_no_data() {
        let state = reconciled(2);
        let frame = build_frame(&state, &[], 4500);
        assert_eq!(frame.day, None);
        assert_eq!(frame.sample_count, 0);
        assert!(frame.nodes.iter().all(|n| n.alert == AlertStatus::NoData));
    }

    #[test]
    fn test_series_only_for_expanded_nodes() {
        let mut state = reconciled(2);
        state.apply(OperatorEvent::ToggleExpanded(NodeId(1))).unwrap();

        let records = vec![
            record(1, 0, &[("Node1A", 20.0)]),
            record(1, 5, &[("Node1A", 25.0)]),
            record(1, 9, &[("Humidity", 50.0)]),
        ];
        let frame = build_frame(&state, &records, 4500);

        let series = frame.nodes[0].series.as_ref().unwrap();
        // The humidity-only record carries no phase data and is skipped.
        assert_eq!(series.len(), 2);
        assert!(series[0].timestamp < series[1].timestamp);
        assert!(frame.nodes[1].series.is_none());
    }

    #[test]
    fn test_toggle_persists_across_cycles() {
        let mut state = reconciled(1);
        state.apply(OperatorEvent::ToggleExpanded(NodeId(1))).unwrap();

        // Repeated reconciles (refresh ticks) do not reset the flag.
        state.reconcile();
        state.reconcile();
        assert!(state.view.is_expanded(NodeId(1)));
    }
}
