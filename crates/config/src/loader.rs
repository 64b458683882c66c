use std::{collections::HashSet, path::Path};

use anyhow::{Context, bail};
use indoc::indoc;

use crate::Config;

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open configuration file {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

    validate_group_by(&config)?;

    for warning in collect_warnings(&config) {
        log::warn!("{warning}");
    }

    Ok(config)
}

pub(crate) fn validate_group_by(config: &Config) -> anyhow::Result<()> {
    let mut seen = HashSet::new();

    for key in &config.workbench.group_by {
        if key.trim().is_empty() {
            bail!(indoc! {r#"
                Empty label name in workbench.group_by. Every grouping key must name a label column, for example:

                  [workbench]
                  group_by = ["team", "severity"]
            "#});
        }

        if !seen.insert(key.as_str()) {
            bail!("Duplicate label '{key}' in workbench.group_by: each label can only be grouped by once");
        }
    }

    Ok(())
}

/// Non-fatal oddities worth surfacing to the operator.
pub(crate) fn collect_warnings(config: &Config) -> Vec<String> {
    let internal: HashSet<&str> = config.breakdown.internal_labels.iter().map(String::as_str).collect();

    config
        .workbench
        .group_by
        .iter()
        .filter(|key| internal.contains(key.as_str()))
        .map(|key| {
            format!("Grouping by '{key}', which is listed in breakdown.internal_labels and hidden from the label breakdown")
        })
        .collect()
}
