use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use log::LevelFilter;
use route_opt_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    Error, Result, SolverConfig, algo::solver::DEFAULT_TIME_BUDGET,
    geocode::DEFAULT_NOMINATIM_URL,
};

/// Runtime options for a route-opt run.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Depot address placed ahead of the addresses read from input.
    #[cli(long = "origin", value = "<address>")]
    #[kv(fmt = "opt")]
    pub origin: Option<String>,
    /// Address table used before falling back to inline `lat,lng` addresses.
    #[cli(long = "gazetteer", value = "<path>")]
    #[kv(fmt = "opt_path")]
    pub gazetteer: Option<PathBuf>,
    /// Ask a Nominatim server for addresses no local source resolves.
    #[cli(long = "nominatim", flag)]
    pub nominatim: bool,
    /// Nominatim base URL used with `--nominatim`.
    #[cli(long = "nominatim-url", value = "<url>")]
    pub nominatim_url: String,
    /// Refinement budget in seconds. Zero means no limit.
    #[cli(long = "time-limit", value = "<secs>")]
    pub time_limit: f64,
    /// Presentation of the planned route.
    #[cli(long = "format", value = "<text|overlay>", parse_with = "OutputFormat::parse")]
    pub format: OutputFormat,
    /// Structured logging level.
    #[cli(
        long = "log-level",
        value = "<error|warn|info|debug|trace|off>",
        parse_with = "LogLevel::parse"
    )]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", value = "<compact|pretty>", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp", flag)]
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output", value = "<path>")]
    pub log_output: String,
    /// Optional input file path for addresses. Empty means stdin.
    #[cli(long = "input", value = "<path>")]
    pub input: String,
    /// Optional output file path for the route. Empty means stdout.
    #[cli(long = "output", value = "<path>")]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning", default)]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    #[cli(default)]
    Compact,
    Pretty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "format")]
pub enum OutputFormat {
    /// Numbered stop list with per-leg and total distance.
    #[cli(default)]
    Text,
    /// Marker and segment records for drawing the route on a map.
    #[cli(alias = "map")]
    Overlay,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            origin: None,
            gazetteer: None,
            nominatim: false,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            time_limit: DEFAULT_TIME_BUDGET.as_secs_f64(),
            format: OutputFormat::default(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        if !options.time_limit.is_finite() || options.time_limit < 0.0 {
            return Err(Error::invalid_input(format!(
                "--time-limit must be a non-negative number of seconds, got {}",
                options.time_limit
            )));
        }

        Ok(options)
    }

    pub fn usage() -> String {
        format!(
            "Usage:\n  \
             route-opt [options] [--input addresses.txt]\n  \
             route-opt [options] < addresses.txt\n\n\
             One address per line; the first line (or --origin) is the starting point.\n\
             Addresses are looked up in --gazetteer, then read as literal 'lat,lng',\n\
             then (with --nominatim) searched online.\n\n\
             Options:\n{}  --help\n\n\
             Examples:\n  \
             route-opt --origin \"52.5200,13.4050\" < customers.txt\n  \
             route-opt --gazetteer places.txt --input stops.txt --time-limit 5\n  \
             route-opt --nominatim --origin \"Alexanderplatz, Berlin\" < stops.txt\n  \
             route-opt --format overlay --output route.tsv --log-level info < stops.txt\n",
            Self::CLI_USAGE
        )
    }

    /// Refinement budget; `None` when `--time-limit 0` asked for no limit.
    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_limit > 0.0).then(|| Duration::from_secs_f64(self.time_limit))
    }

    pub fn solver_config(&self) -> SolverConfig {
        match self.time_budget() {
            Some(budget) => SolverConfig::new().with_time_budget(budget),
            None => SolverConfig::unbounded(),
        }
    }

    pub fn gazetteer_path(&self) -> Option<&Path> {
        self.gazetteer.as_deref()
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }
}

/// Empty and `-` select the standard stream.
fn non_stdio_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, time::Duration};

    use log::LevelFilter;

    use super::{LogFormat, LogLevel, OutputFormat, SolverOptions};

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Info.to_filter(), LevelFilter::Info);
        assert_eq!(LogLevel::Debug.to_filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::Trace.to_filter(), LevelFilter::Trace);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
    }

    #[test]
    fn cli_values_parse_aliases_and_report_expected_values() {
        assert_eq!(LogLevel::parse("WARNING").expect("alias"), LogLevel::Warn);
        assert_eq!(OutputFormat::parse("map").expect("alias"), OutputFormat::Overlay);
        assert_eq!(OutputFormat::Overlay.to_string(), "overlay");

        let err = OutputFormat::parse("pdf").expect_err("unknown format");
        assert!(
            err.to_string()
                .contains("Invalid value for --format: pdf (expected text|overlay)")
        );
    }

    #[test]
    fn defaults_match_documented_values() {
        let options = SolverOptions::default();
        assert_eq!(options.time_budget(), Some(Duration::from_secs(30)));
        assert_eq!(options.format, OutputFormat::Text);
        assert_eq!(options.log_level, LogLevel::Warn);
        assert_eq!(options.log_format, LogFormat::Compact);
        assert!(options.log_timestamp);
        assert!(options.origin.is_none());
        assert!(options.gazetteer_path().is_none());
        assert!(!options.nominatim);
        assert_eq!(options.nominatim_url, "https://nominatim.openstreetmap.org");
    }

    #[test]
    fn nominatim_is_opt_in_with_a_custom_url() {
        let options = SolverOptions::parse_from_iter([
            "--nominatim",
            "--nominatim-url",
            "http://localhost:8080",
        ])
        .expect("parse");
        assert!(options.nominatim);
        assert_eq!(options.nominatim_url, "http://localhost:8080");
    }

    #[test]
    fn parse_from_iter_applies_known_cli_options() {
        let options = SolverOptions::parse_from_iter([
            "--origin",
            "Main Street 1",
            "--gazetteer=places.txt",
            "--time-limit=2.5",
            "--format=overlay",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp=false",
            "--log-output=run.log",
            "--input=stops.txt",
            "--output=route.txt",
        ])
        .expect("parse options");

        assert_eq!(options.origin.as_deref(), Some("Main Street 1"));
        assert_eq!(options.gazetteer_path(), Some(Path::new("places.txt")));
        assert_eq!(options.time_budget(), Some(Duration::from_millis(2_500)));
        assert_eq!(options.format, OutputFormat::Overlay);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(!options.log_timestamp);
        assert_eq!(options.log_output_path(), Some(Path::new("run.log")));
        assert_eq!(options.input_path(), Some(Path::new("stops.txt")));
        assert_eq!(options.output_path(), Some(Path::new("route.txt")));
    }

    #[test]
    fn zero_time_limit_means_unbounded() {
        let options = SolverOptions::parse_from_iter(["--time-limit", "0"]).expect("parse");
        assert!(options.time_budget().is_none());
        assert!(options.solver_config().time_budget.is_none());
    }

    #[test]
    fn negative_time_limit_is_rejected() {
        let err = SolverOptions::parse_from_iter(["--time-limit=-1"]).expect_err("negative");
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn parse_from_iter_accepts_no_log_timestamp_flag() {
        let options = SolverOptions::parse_from_iter(["--no-log-timestamp"]).expect("parse");
        assert!(!options.log_timestamp);
    }

    #[test]
    fn parse_from_iter_rejects_no_log_timestamp_with_value() {
        let err = SolverOptions::parse_from_iter(["--no-log-timestamp=true"])
            .expect_err("expected flag value rejection");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn parse_from_iter_rejects_invalid_boolean() {
        let err = SolverOptions::parse_from_iter(["--log-timestamp=maybe"])
            .expect_err("invalid bool should fail");
        assert!(
            err.to_string()
                .contains("Invalid boolean for --log-timestamp: maybe")
        );
    }

    #[test]
    fn parse_from_iter_rejects_unknown_option() {
        let err = SolverOptions::parse_from_iter(["--unknown-opt=1"])
            .expect_err("expected unknown option error");
        assert!(err.to_string().contains("Unknown option: --unknown-opt"));
    }

    #[test]
    fn parse_from_iter_rejects_unexpected_positional_argument() {
        let err =
            SolverOptions::parse_from_iter(["stops.txt"]).expect_err("expected positional error");
        assert!(err.to_string().contains("Unexpected argument: stops.txt"));
    }

    #[test]
    fn parse_from_iter_requires_value_for_time_limit() {
        let err =
            SolverOptions::parse_from_iter(["--time-limit"]).expect_err("missing value should fail");
        assert!(err.to_string().contains("Missing value for --time-limit"));
    }

    #[test]
    fn parse_from_iter_rejects_non_numeric_time_limit() {
        let err = SolverOptions::parse_from_iter(["--time-limit=soon"]).expect_err("not a number");
        assert!(err.to_string().contains("Invalid value for --time-limit: soon"));
    }

    #[test]
    fn help_lists_every_option() {
        let err = SolverOptions::parse_from_iter(["--help"]).expect_err("help should short-circuit");
        let text = err.to_string();
        assert!(text.contains("Usage:"));
        for option in [
            "--origin <address>",
            "--gazetteer <path>",
            "--nominatim[=<bool>]",
            "--nominatim-url <url>",
            "--time-limit <secs>",
            "--format <text|overlay>",
            "--log-timestamp[=<bool>]",
            "--no-log-timestamp",
        ] {
            assert!(text.contains(option), "usage is missing {option}");
        }
    }

    #[test]
    fn stdio_paths_treat_empty_and_dash_as_streams() {
        let options = SolverOptions {
            output: "-".to_string(),
            ..SolverOptions::default()
        };
        assert!(options.output_path().is_none());
        assert!(options.input_path().is_none());
        assert!(options.log_output_path().is_none());
    }

    #[test]
    fn display_renders_optional_fields() {
        let options = SolverOptions {
            origin: Some("Home".to_string()),
            ..SolverOptions::default()
        };
        let text = options.to_string();
        assert!(text.contains("origin"));
        assert!(text.contains("= Home"));
        assert!(text.contains("= -"));
    }
}
