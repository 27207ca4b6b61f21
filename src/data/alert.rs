//! Alert evaluation from the latest phase readings.

use crate::data::ingest::Record;
use crate::data::registry::Node;
use crate::data::thresholds::ThresholdPair;

/// Alert severity, ordered NORMAL < HIGH < OVER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertLevel {
    Normal,
    High,
    Over,
}

impl AlertLevel {
    /// Short badge text for display.
    pub fn badge(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "OK",
            AlertLevel::High => "HIGH",
            AlertLevel::Over => "OVER",
        }
    }
}

/// Result of evaluating a node.
///
/// A node whose three bindings all carry no value in the latest record is
/// `NoData`, which renders differently from a genuine normal reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    NoData,
    Reading(AlertLevel),
}

impl AlertStatus {
    pub fn badge(&self) -> &'static str {
        match self {
            AlertStatus::NoData => "NO DATA",
            AlertStatus::Reading(level) => level.badge(),
        }
    }

    pub fn level(&self) -> Option<AlertLevel> {
        match self {
            AlertStatus::NoData => None,
            AlertStatus::Reading(level) => Some(*level),
        }
    }
}

/// The up-to-three phase values a node binds in a record, in phase order.
pub fn phase_values(node: &Node, record: &Record) -> [Option<f64>; 3] {
    let mut values = [None; 3];
    for (slot, binding) in values.iter_mut().zip(node.bindings.iter()) {
        *slot = record.value(binding);
    }
    values
}

/// Evaluate a node against its thresholds using the latest record.
///
/// Absent values are excluded from the comparison, never treated as zero.
/// `Over` dominates `High` regardless of which phase trips which bound.
pub fn evaluate(node: &Node, latest: &Record, thresholds: &ThresholdPair) -> AlertStatus {
    let values = phase_values(node, latest);
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return AlertStatus::NoData;
    }

    let level = if present.iter().any(|v| *v >= thresholds.over) {
        AlertLevel::Over
    } else if present.iter().any(|v| *v >= thresholds.high) {
        AlertLevel::High
    } else {
        AlertLevel::Normal
    };
    AlertStatus::Reading(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::registry::NodeId;

    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn node() -> Node {
        Node {
            id: NodeId(1),
            bindings: NodeId(1).phase_columns(),
        }
    }

    fn record(values: &[(&str, f64)]) -> Record {
        Record {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn thresholds() -> ThresholdPair {
        ThresholdPair {
            high: 60.0,
            over: 80.0,
        }
    }

    #[test]
    fn test_over_dominates_ignoring_absent_phase() {
        let latest = record(&[("Node1A", 85.0), ("Node1B", 40.0)]);
        let status = evaluate(&node(), &latest, &thresholds());
        assert_eq!(status, AlertStatus::Reading(AlertLevel::Over));
    }

    #[test]
    fn test_high_when_between_bounds() {
        let latest = record(&[("Node1A", 61.0), ("Node1B", 40.0), ("Node1C", 30.0)]);
        let status = evaluate(&node(), &latest, &thresholds());
        assert_eq!(status, AlertStatus::Reading(AlertLevel::High));
    }

    #[test]
    fn test_normal_below_both() {
        let latest = record(&[("Node1A", 59.9), ("Node1B", 40.0), ("Node1C", 30.0)]);
        let status = evaluate(&node(), &latest, &thresholds());
        assert_eq!(status, AlertStatus::Reading(AlertLevel::Normal));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let latest = record(&[("Node1A", 60.0)]);
        assert_eq!(
            evaluate(&node(), &latest, &thresholds()),
            AlertStatus::Reading(AlertLevel::High)
        );
        let latest = record(&[("Node1A", 80.0)]);
        assert_eq!(
            evaluate(&node(), &latest, &thresholds()),
            AlertStatus::Reading(AlertLevel::Over)
        );
    }

    #[test]
    fn test_all_absent_is_no_data() {
        let latest = record(&[("Node2A", 99.0)]);
        assert_eq!(evaluate(&node(), &latest, &thresholds()), AlertStatus::NoData);
    }

    #[test]
    fn test_monotonic_in_each_phase() {
        // Raising any single phase value never lowers the severity.
        let steps = [30.0, 59.9, 60.0, 79.9, 80.0, 120.0];
        for binding in ["Node1A", "Node1B", "Node1C"] {
            let mut previous: Option<AlertLevel> = None;
            for value in steps {
                let latest = record(&[(binding, value)]);
                let level = evaluate(&node(), &latest, &thresholds()).level().unwrap();
                if let Some(prev) = previous {
                    assert!(level >= prev, "{binding} at {value} regressed");
                }
                previous = Some(level);
            }
        }
    }

    #[test]
    fn test_inverted_pair_makes_high_unreachable() {
        let inverted = ThresholdPair {
            high: 90.0,
            over: 70.0,
        };
        let latest = record(&[("Node1A", 80.0)]);
        assert_eq!(
            evaluate(&node(), &latest, &inverted),
            AlertStatus::Reading(AlertLevel::Over)
        );
    }
}
