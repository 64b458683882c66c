//! Label frequency breakdown for the workbench label browser.

use std::{cmp::Reverse, collections::HashSet};

use config::{BreakdownConfig, DEFAULT_INTERNAL_LABELS, Limit};
use indexmap::IndexMap;
use serde::Serialize;

use crate::frame::{ALERT_STATE, AlertState};

/// Labels of one active alert instance, in their original order.
pub type LabelSet = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelValueCount {
    pub value: String,
    pub count: u64,
    pub firing: u64,
    pub pending: u64,
}

/// A label key together with its most frequent values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLabel {
    pub key: String,
    /// Number of records carrying the key, whatever the value.
    pub count: u64,
    pub firing: u64,
    pub pending: u64,
    /// Sorted by descending count; ties keep first-seen order.
    pub values: Vec<LabelValueCount>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u64,
    firing: u64,
    pending: u64,
}

impl Tally {
    fn record(&mut self, state: Option<AlertState>) {
        self.count += 1;

        match state {
            Some(AlertState::Firing) => self.firing += 1,
            Some(AlertState::Pending) => self.pending += 1,
            None => (),
        }
    }
}

#[derive(Default)]
struct KeyTally<'a> {
    total: Tally,
    values: IndexMap<&'a str, Tally>,
}

/// Ranks label keys and their values by how many alert instances carry them.
#[derive(Debug, Clone)]
pub struct LabelBreakdown {
    max_keys: Limit,
    max_values: Limit,
    internal_labels: HashSet<String>,
}

impl Default for LabelBreakdown {
    fn default() -> Self {
        Self::new(Limit::DEFAULT_KEYS, Limit::DEFAULT_VALUES)
    }
}

impl LabelBreakdown {
    /// A breakdown that hides the default set of internal labels.
    pub fn new(max_keys: Limit, max_values: Limit) -> Self {
        Self {
            max_keys,
            max_values,
            internal_labels: DEFAULT_INTERNAL_LABELS.iter().map(|label| label.to_string()).collect(),
        }
    }

    pub fn from_config(config: &BreakdownConfig) -> Self {
        Self::new(config.max_keys, config.max_values).with_internal_labels(&config.internal_labels)
    }

    /// Replaces the set of label keys left out of the breakdown.
    pub fn with_internal_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.internal_labels = labels.into_iter().map(|label| label.as_ref().to_string()).collect();
        self
    }

    pub fn compute(&self, records: &[LabelSet]) -> Vec<TopLabel> {
        let mut keys: IndexMap<&str, KeyTally<'_>> = IndexMap::new();

        for record in records {
            let state = record.get(ALERT_STATE).and_then(|state| AlertState::parse(state));

            for (key, value) in record {
                if self.internal_labels.contains(key) {
                    continue;
                }

                let tally = keys.entry(key.as_str()).or_default();
                tally.total.record(state);
                tally.values.entry(value.as_str()).or_default().record(state);
            }
        }

        let mut ranked: Vec<_> = keys.into_iter().collect();
        ranked.sort_by_key(|(_, tally)| Reverse(tally.total.count));
        self.max_keys.truncate(&mut ranked);

        ranked
            .into_iter()
            .map(|(key, tally)| {
                let mut values: Vec<LabelValueCount> = tally
                    .values
                    .into_iter()
                    .map(|(value, tally)| LabelValueCount {
                        value: value.to_string(),
                        count: tally.count,
                        firing: tally.firing,
                        pending: tally.pending,
                    })
                    .collect();

                values.sort_by_key(|value| Reverse(value.count));
                self.max_values.truncate(&mut values);

                TopLabel {
                    key: key.to_string(),
                    count: tally.total.count,
                    firing: tally.total.firing,
                    pending: tally.total.pending,
                    values,
                }
            })
            .collect()
    }
}

/// Top labels of `records` with the default internal labels hidden.
pub fn compute_top_labels(records: &[LabelSet], max_keys: Limit, max_values: Limit) -> Vec<TopLabel> {
    LabelBreakdown::new(max_keys, max_values).compute(records)
}

#[cfg(test)]
mod tests {
    use config::{BreakdownConfig, Limit};
    use insta::assert_json_snapshot;

    use super::{LabelBreakdown, LabelSet, compute_top_labels};

    fn record(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn defaults(records: &[LabelSet]) -> Vec<super::TopLabel> {
        LabelBreakdown::default().compute(records)
    }

    fn limit(value: usize) -> Limit {
        Limit::try_from(value).unwrap()
    }

    #[test]
    fn empty_input() {
        assert!(defaults(&[]).is_empty());
    }

    #[test]
    fn most_common_key_ranks_first() {
        let records = vec![
            record(&[("team", "a"), ("env", "prod"), ("region", "eu"), ("zone", "1"), ("host", "h1")]),
            record(&[("team", "b"), ("env", "dev"), ("region", "us"), ("zone", "2")]),
            record(&[("team", "c"), ("service", "api")]),
            record(&[("team", "d"), ("owner", "x")]),
            record(&[("team", "e")]),
        ];

        let labels = defaults(&records);

        assert_eq!(labels[0].key, "team");
        assert_eq!(labels[0].count, 5);
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn values_ranked_by_count() {
        let records: Vec<_> = ["backend", "infra", "platform", "infra", "platform", "infra"]
            .into_iter()
            .map(|team| record(&[("team", team)]))
            .collect();

        let labels = defaults(&records);

        assert_json_snapshot!(labels, @r#"
        [
          {
            "key": "team",
            "count": 6,
            "firing": 0,
            "pending": 0,
            "values": [
              {
                "value": "infra",
                "count": 3,
                "firing": 0,
                "pending": 0
              },
              {
                "value": "platform",
                "count": 2,
                "firing": 0,
                "pending": 0
              },
              {
                "value": "backend",
                "count": 1,
                "firing": 0,
                "pending": 0
              }
            ]
          }
        ]
        "#);
    }

    #[test]
    fn firing_and_pending_counters() {
        let records = vec![
            record(&[("alertstate", "firing"), ("team", "infra")]),
            record(&[("alertstate", "firing"), ("team", "infra")]),
            record(&[("alertstate", "pending"), ("team", "infra")]),
            record(&[("alertstate", "Firing"), ("team", "core")]),
            record(&[("team", "core")]),
        ];

        let labels = defaults(&records);
        let team = &labels[0];

        assert_eq!((team.count, team.firing, team.pending), (5, 2, 1));
        assert_eq!(team.values[0].value, "infra");
        assert_eq!((team.values[0].count, team.values[0].firing, team.values[0].pending), (3, 2, 1));
        assert_eq!(team.values[1].value, "core");
        assert_eq!((team.values[1].count, team.values[1].firing, team.values[1].pending), (2, 0, 0));
    }

    #[test]
    fn internal_labels_are_hidden() {
        let records = vec![
            record(&[("__name__", "ALERTS"), ("alertname", "HighCPU"), ("alertstate", "firing")]),
            record(&[("grafana_folder", "Infra"), ("grafana_rule_uid", "abc"), ("orgID", "1")]),
        ];

        assert!(defaults(&records).is_empty());
    }

    #[test]
    fn empty_string_is_a_value() {
        let records = vec![record(&[("team", "")]), record(&[("team", "")]), record(&[("team", "a")])];

        let labels = defaults(&records);

        assert_eq!(labels[0].values[0].value, "");
        assert_eq!(labels[0].values[0].count, 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let records = vec![
            record(&[("zone", "z1"), ("app", "web")]),
            record(&[("zone", "z2"), ("app", "db")]),
        ];

        let labels = defaults(&records);

        let keys: Vec<_> = labels.iter().map(|label| label.key.as_str()).collect();
        assert_eq!(keys, vec!["zone", "app"]);

        let values: Vec<_> = labels[1].values.iter().map(|value| value.value.as_str()).collect();
        assert_eq!(values, vec!["web", "db"]);
    }

    #[test]
    fn limits_truncate_keys_and_values() {
        let records: Vec<_> = (0..12)
            .map(|i| {
                let value = format!("v{i}");
                let key = format!("k{i}");
                record(&[("team", value.as_str()), (key.as_str(), "x")])
            })
            .collect();

        let bounded = compute_top_labels(&records, limit(2), limit(3));

        assert_eq!(bounded.len(), 2);
        assert_eq!(bounded[0].key, "team");
        assert_eq!(bounded[0].values.len(), 3);

        let defaults = defaults(&records);

        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[0].values.len(), 10);

        let unbounded = compute_top_labels(&records, Limit::Unbounded, Limit::Unbounded);

        assert_eq!(unbounded.len(), 13);
        assert_eq!(unbounded[0].values.len(), 12);
    }

    #[test]
    fn custom_internal_labels() {
        let records = vec![record(&[("alertname", "HighCPU"), ("team", "infra")])];

        let config = BreakdownConfig {
            internal_labels: vec!["team".to_string()],
            ..Default::default()
        };

        let labels = LabelBreakdown::from_config(&config).compute(&records);

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].key, "alertname");
    }

    #[test]
    fn computing_twice_is_deterministic() {
        let records = vec![
            record(&[("alertstate", "firing"), ("team", "infra"), ("env", "prod")]),
            record(&[("alertstate", "pending"), ("team", "core")]),
        ];

        assert_eq!(defaults(&records), defaults(&records));
    }
}
