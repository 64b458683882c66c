//! Logger initialization for the workbench

use jiff::{Zoned, tz::TimeZone};
use logforth::{append::Stderr, filter::EnvFilter, layout::Layout};
use std::{fmt::Write, io::IsTerminal, str::FromStr, sync::Once};

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "info";

/// Stderr layout with UTC timestamps and, on terminals, coloured levels
#[derive(Debug)]
struct UtcLayout {
    color: bool,
}

impl Layout for UtcLayout {
    fn format(
        &self,
        record: &log::Record<'_>,
        _diagnostics: &[Box<dyn logforth::diagnostic::Diagnostic>],
    ) -> anyhow::Result<Vec<u8>> {
        let mut output = String::new();
        let now = Zoned::now().with_time_zone(TimeZone::UTC);

        write!(output, "{} ", now.strftime("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = record.level();

        if self.color {
            let code = match level {
                log::Level::Error => 31,
                log::Level::Warn => 33,
                log::Level::Info => 32,
                log::Level::Debug => 34,
                log::Level::Trace => 35,
            };

            write!(output, "\x1b[{code}m{level:>5}\x1b[0m  ")?;
        } else {
            write!(output, "{level:>5}  ")?;
        }

        write!(output, "{}", record.args())?;

        Ok(output.into_bytes())
    }
}

/// Initialize the stderr logger once.
/// The log_filter should be a string like "info" or "workbench=debug,triage=debug";
/// an invalid filter falls back to "info".
pub fn init(log_filter: &str) {
    let log_filter = log_filter.to_owned();
    INIT.call_once(move || apply_logger(log_filter));
}

fn apply_logger(log_filter: String) {
    logforth::builder()
        .dispatch(move |d| {
            let layout = UtcLayout {
                color: std::io::stderr().is_terminal(),
            };

            let appender = Stderr::default().with_layout(layout);

            match env_filter(&log_filter) {
                Some(filter) => d.filter(filter).append(appender),
                None => d.append(appender),
            }
        })
        .apply();
}

fn env_filter(log_filter: &str) -> Option<EnvFilter> {
    EnvFilter::from_str(log_filter)
        .or_else(|_| EnvFilter::from_str(DEFAULT_FILTER))
        .ok()
}
