use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::Deserialize;

/// Number of label keys returned by default.
pub const DEFAULT_MAX_KEYS: usize = 5;

/// Number of values returned per label key by default.
pub const DEFAULT_MAX_VALUES: usize = 10;

/// Structural labels that never show up in the label breakdown.
pub const DEFAULT_INTERNAL_LABELS: &[&str] = &[
    "__name__",
    "alertname",
    "alertstate",
    "grafana_alertstate",
    "grafana_folder_uid",
    "grafana_folder",
    "grafana_rule_uid",
    "__alert_rule_uid__",
    "orgID",
    "from",
];

/// Settings for the label breakdown of active alert instances.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakdownConfig {
    /// How many label keys to keep, ranked by frequency.
    pub max_keys: Limit,
    /// How many values to keep per label key, ranked by frequency.
    pub max_values: Limit,
    /// Label keys excluded from the breakdown.
    pub internal_labels: Vec<String>,
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            max_keys: Limit::DEFAULT_KEYS,
            max_values: Limit::DEFAULT_VALUES,
            internal_labels: DEFAULT_INTERNAL_LABELS.iter().map(|label| label.to_string()).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LimitError {
    #[error("limit must be a positive integer or \"unbounded\", got 0")]
    Zero,
    #[error("limit must be a positive integer or \"unbounded\", got \"{0}\"")]
    Invalid(String),
}

/// Upper bound on the number of entries kept after ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLimit")]
pub enum Limit {
    Bounded(NonZeroUsize),
    Unbounded,
}

impl Limit {
    pub const DEFAULT_KEYS: Limit = Limit::Bounded(NonZeroUsize::MIN.saturating_add(DEFAULT_MAX_KEYS - 1));
    pub const DEFAULT_VALUES: Limit = Limit::Bounded(NonZeroUsize::MIN.saturating_add(DEFAULT_MAX_VALUES - 1));

    /// The maximum number of entries, or `None` when unbounded.
    pub fn get(self) -> Option<usize> {
        match self {
            Limit::Bounded(limit) => Some(limit.get()),
            Limit::Unbounded => None,
        }
    }

    /// Drops everything past the limit.
    pub fn truncate<T>(self, items: &mut Vec<T>) {
        if let Some(limit) = self.get() {
            items.truncate(limit);
        }
    }
}

impl TryFrom<usize> for Limit {
    type Error = LimitError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value).map(Limit::Bounded).ok_or(LimitError::Zero)
    }
}

impl FromStr for Limit {
    type Err = LimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unbounded") {
            return Ok(Limit::Unbounded);
        }

        match s.parse::<usize>() {
            Ok(value) => Limit::try_from(value),
            Err(_) => Err(LimitError::Invalid(s.to_string())),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Bounded(limit) => write!(f, "{limit}"),
            Limit::Unbounded => f.write_str("unbounded"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Count(usize),
    Keyword(String),
}

impl TryFrom<RawLimit> for Limit {
    type Error = LimitError;

    fn try_from(raw: RawLimit) -> Result<Self, Self::Error> {
        match raw {
            RawLimit::Count(value) => Limit::try_from(value),
            RawLimit::Keyword(keyword) => keyword.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde::Deserialize;

    use super::{BreakdownConfig, Limit, LimitError};

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        breakdown: BreakdownConfig,
    }

    #[test]
    fn limit_accepts_integers_and_unbounded() {
        let config = indoc! {r#"
            [breakdown]
            max_keys = "unbounded"
            max_values = 25
        "#};

        let config: Wrapper = toml::from_str(config).unwrap();

        assert_eq!(config.breakdown.max_keys, Limit::Unbounded);
        assert_eq!(config.breakdown.max_values.get(), Some(25));
        assert_eq!(config.breakdown.internal_labels.len(), 10);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config = indoc! {r#"
            [breakdown]
            max_keys = 0
        "#};

        let error = toml::from_str::<Wrapper>(config).unwrap_err();

        assert!(error.to_string().contains("positive integer"), "{error}");
    }

    #[test]
    fn limit_from_str() {
        assert_eq!("unbounded".parse::<Limit>(), Ok(Limit::Unbounded));
        assert_eq!("7".parse::<Limit>().map(Limit::get), Ok(Some(7)));
        assert_eq!("0".parse::<Limit>(), Err(LimitError::Zero));
        assert_eq!("many".parse::<Limit>(), Err(LimitError::Invalid("many".to_string())));
    }

    #[test]
    fn truncate_respects_bounds() {
        let mut items = vec![1, 2, 3, 4];
        Limit::try_from(2usize).unwrap().truncate(&mut items);
        assert_eq!(items, vec![1, 2]);

        let mut items = vec![1, 2, 3, 4];
        Limit::Unbounded.truncate(&mut items);
        assert_eq!(items, vec![1, 2, 3, 4]);
    }
}
