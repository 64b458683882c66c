//! Conversion of alert-instance tables into the grouped workbench tree.
//!
//! Every table row is one observation of an alert rule, carrying the rule's
//! uid, title and folder, its alert state, an instance count and any number of
//! extra label columns. The builder deduplicates observations per rule and
//! nests the rules under one group level per grouping key:
//!
//! ```text
//! team=backend
//! ├── severity=critical
//! │   └── Alert1
//! └── severity=<empty>
//!     └── Alert3
//! team=<empty>
//! └── ...
//! ```
//!
//! The tree depth always equals the number of grouping keys. Groups without a
//! value for their key come after their siblings.

use std::borrow::Cow;
use std::ops::AddAssign;

use config::{RowOrder, WorkbenchConfig};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    frame::{AlertFrame, AlertState},
    label::LabelValue,
    table::{Column, Table},
};

/// Firing and pending alert instances below a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstanceCounts {
    pub firing: u64,
    pub pending: u64,
}

impl AddAssign for InstanceCounts {
    fn add_assign(&mut self, other: Self) {
        self.firing += other.firing;
        self.pending += other.pending;
    }
}

/// A node of the workbench tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkbenchRow {
    AlertRule(AlertRuleRow),
    Group(GenericGroupedRow),
}

impl WorkbenchRow {
    pub fn instance_counts(&self) -> InstanceCounts {
        match self {
            WorkbenchRow::AlertRule(row) => row.instance_counts,
            WorkbenchRow::Group(row) => row.instance_counts,
        }
    }

    pub fn as_alert_rule(&self) -> Option<&AlertRuleRow> {
        match self {
            WorkbenchRow::AlertRule(row) => Some(row),
            WorkbenchRow::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GenericGroupedRow> {
        match self {
            WorkbenchRow::Group(row) => Some(row),
            WorkbenchRow::AlertRule(_) => None,
        }
    }
}

/// One distinct alert rule. Title and folder come from the rule's first row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRuleRow {
    pub title: String,
    pub folder: String,
    #[serde(rename = "ruleUID")]
    pub rule_uid: String,
    pub instance_counts: InstanceCounts,
}

/// All rows sharing one value of a grouping label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericGroupedRow {
    /// Name of the grouping label.
    pub label: String,
    pub value: LabelValue,
    pub rows: Vec<WorkbenchRow>,
    pub instance_counts: InstanceCounts,
}

/// Builds [`WorkbenchRow`] trees from alert-instance tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowTreeBuilder {
    order: RowOrder,
}

impl RowTreeBuilder {
    pub fn new(order: RowOrder) -> Self {
        Self { order }
    }

    pub fn from_config(config: &WorkbenchConfig) -> Self {
        Self::new(config.order)
    }

    /// Converts `table` into a tree grouped by `group_by`, outermost key first.
    ///
    /// Tables that are empty or lack a required column produce no rows. A key
    /// naming no column puts every row into that level's empty-value group.
    pub fn build<S: AsRef<str>>(&self, table: &Table, group_by: &[S]) -> Vec<WorkbenchRow> {
        let Ok(frame) = AlertFrame::try_from(table) else {
            return Vec::new();
        };

        let keys: Vec<&str> = group_by.iter().map(AsRef::as_ref).collect();
        let columns: Vec<Option<&Column>> = keys.iter().map(|key| frame.column(key)).collect();

        let rule_counts = count_rule_instances(&frame);

        let mut root = GroupNode::default();

        for row in 0..frame.len() {
            let mut node = &mut root;

            for column in &columns {
                let value = column.and_then(|column| column.label_at(row)).filter(|value| !value.is_empty());
                node = node.children.entry(value).or_default();
            }

            node.rows.push(row);
        }

        let tree = Tree {
            frame: &frame,
            keys: &keys,
            rule_counts: &rule_counts,
            order: self.order,
        };

        tree.convert(root, 0)
    }
}

/// Builds the tree with first-seen ordering.
pub fn build_rows<S: AsRef<str>>(table: &Table, group_by: &[S]) -> Vec<WorkbenchRow> {
    RowTreeBuilder::default().build(table, group_by)
}

/// Builds the tree from the first table of a query response.
pub fn build_rows_from_series<S: AsRef<str>>(series: &[Table], group_by: &[S]) -> Vec<WorkbenchRow> {
    match series.first() {
        Some(table) => build_rows(table, group_by),
        None => Vec::new(),
    }
}

/// Intermediate grouping level. `None` keys hold rows without a value; only
/// nodes at the deepest level collect row indices.
#[derive(Default)]
struct GroupNode<'a> {
    children: IndexMap<Option<Cow<'a, str>>, GroupNode<'a>>,
    rows: Vec<usize>,
}

struct Tree<'f, 'a> {
    frame: &'f AlertFrame<'a>,
    keys: &'f [&'f str],
    rule_counts: &'f IndexMap<&'a str, InstanceCounts>,
    order: RowOrder,
}

impl Tree<'_, '_> {
    fn convert(&self, node: GroupNode<'_>, depth: usize) -> Vec<WorkbenchRow> {
        let Some(label) = self.keys.get(depth) else {
            return self.rule_rows(&node.rows);
        };

        let mut known = Vec::new();
        let mut empty = Vec::new();

        for (value, child) in node.children {
            let rows = self.convert(child, depth + 1);
            let instance_counts = sum_counts(&rows);

            let group = GenericGroupedRow {
                label: label.to_string(),
                value: LabelValue::from_cell(value.as_deref()),
                rows,
                instance_counts,
            };

            if group.value.is_empty() {
                empty.push(group);
            } else {
                known.push(group);
            }
        }

        if self.order == RowOrder::Alphabetical {
            known = known
                .into_iter()
                .sorted_by_cached_key(|group| group.value.as_known().map(str::to_lowercase))
                .collect();
        }

        known.into_iter().chain(empty).map(WorkbenchRow::Group).collect()
    }

    /// One row per distinct rule uid; the first row seen for a uid names it.
    fn rule_rows(&self, rows: &[usize]) -> Vec<WorkbenchRow> {
        let mut rules: IndexMap<&str, AlertRuleRow> = IndexMap::new();

        for &row in rows {
            let rule_uid = self.frame.rule_uid(row);

            rules.entry(rule_uid).or_insert_with(|| AlertRuleRow {
                title: self.frame.title(row).to_string(),
                folder: self.frame.folder(row).to_string(),
                rule_uid: rule_uid.to_string(),
                instance_counts: self.rule_counts.get(rule_uid).copied().unwrap_or_default(),
            });
        }

        let rules = rules.into_values();

        match self.order {
            RowOrder::FirstSeen => rules.map(WorkbenchRow::AlertRule).collect(),
            RowOrder::Alphabetical => rules
                .sorted_by_cached_key(|rule| rule.title.to_lowercase())
                .map(WorkbenchRow::AlertRule)
                .collect(),
        }
    }
}

/// Sums instance counts per rule over the whole table, independent of grouping.
fn count_rule_instances<'a>(frame: &AlertFrame<'a>) -> IndexMap<&'a str, InstanceCounts> {
    let mut sums: IndexMap<&'a str, (f64, f64)> = IndexMap::new();

    for row in 0..frame.len() {
        let entry = sums.entry(frame.rule_uid(row)).or_default();

        match frame.state(row) {
            Some(AlertState::Firing) => entry.0 += frame.instances(row),
            Some(AlertState::Pending) => entry.1 += frame.instances(row),
            None => (),
        }
    }

    sums.into_iter()
        .map(|(rule_uid, (firing, pending))| {
            let counts = InstanceCounts {
                firing: firing.round() as u64,
                pending: pending.round() as u64,
            };

            (rule_uid, counts)
        })
        .collect()
}

fn sum_counts(rows: &[WorkbenchRow]) -> InstanceCounts {
    rows.iter().fold(InstanceCounts::default(), |mut total, row| {
        total += row.instance_counts();
        total
    })
}
