use serde::Deserialize;

/// Settings for the grouped alert-rule tree of the triage workbench.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkbenchConfig {
    /// Label columns to group by, outermost first. Empty means a flat rule list.
    pub group_by: Vec<String>,
    /// Ordering of sibling rows within each level.
    pub order: RowOrder,
}

/// Ordering applied to sibling rows of the workbench tree.
///
/// The group holding rows without a value for the grouping label is always
/// placed after its siblings, whatever the ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum::EnumString, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RowOrder {
    /// Rows and groups appear in the order they were first seen in the table.
    #[default]
    FirstSeen,
    /// Rules sorted by title and groups by value, ignoring case.
    Alphabetical,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::RowOrder;

    #[test]
    fn row_order_from_str() {
        assert_eq!(RowOrder::from_str("first-seen").unwrap(), RowOrder::FirstSeen);
        assert_eq!(RowOrder::from_str("alphabetical").unwrap(), RowOrder::Alphabetical);
        assert!(RowOrder::from_str("random").is_err());
    }

    #[test]
    fn row_order_display() {
        assert_eq!(RowOrder::FirstSeen.to_string(), "first-seen");
        assert_eq!(RowOrder::Alphabetical.to_string(), "alphabetical");
    }
}
