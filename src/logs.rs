use std::str::FromStr;

use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

const DEFAULT_STDERR_LEVEL: LevelFilter = LevelFilter::Info;
const DEFAULT_FILE_LEVEL: LevelFilter = LevelFilter::Debug;

/// Where race-server logs go and how verbose each sink is.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub file_path: String,
    pub archive_pattern: String,
    pub stderr_level: LevelFilter,
    pub file_level: LevelFilter,
}

impl LogSettings {
    /// Reads `LOG_FILE_PATH`, `LOG_ARCHIVE_PATTERN` and the optional
    /// `RACE_LOG_LEVEL` / `RACE_LOG_FILE_LEVEL` overrides.
    pub fn from_env() -> Self {
        let file_path = std::env::var("LOG_FILE_PATH").expect("LOG_FILE_PATH must be set");
        let archive_pattern =
            std::env::var("LOG_ARCHIVE_PATTERN").expect("LOG_ARCHIVE_PATTERN must be set");
        let stderr_level = std::env::var("RACE_LOG_LEVEL").ok();
        let file_level = std::env::var("RACE_LOG_FILE_LEVEL").ok();

        Self {
            file_path,
            archive_pattern,
            stderr_level: parse_level(stderr_level.as_deref(), DEFAULT_STDERR_LEVEL),
            file_level: parse_level(file_level.as_deref(), DEFAULT_FILE_LEVEL),
        }
    }
}

/// Unset, blank or unrecognised values fall back to `default`.
fn parse_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => LevelFilter::from_str(v).unwrap_or_else(|_| {
            eprintln!("Ignoring unknown log level {:?}, using {}", v, default);
            default
        }),
        None => default,
    }
}

fn build_config(settings: &LogSettings) -> Result<Config, Box<dyn std::error::Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();

    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let roller = FixedWindowRoller::builder().build(&settings.archive_pattern, LOG_FILE_COUNT)?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}\n")))
        .build(&settings.file_path, Box::new(policy))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(settings.file_level)))
                .build("logfile", Box::new(logfile)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(settings.stderr_level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(
            Root::builder()
                .appender("logfile")
                .appender("stderr")
                .build(settings.stderr_level.max(settings.file_level)),
        )?;
    Ok(config)
}

pub fn init_logger() {
    let settings = LogSettings::from_env();
    let config = build_config(&settings).expect("Invalid logger configuration");
    let _handle = log4rs::init_config(config).expect("Failed to initialize logger");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(None, LevelFilter::Info), LevelFilter::Info);
        assert_eq!(parse_level(Some("  "), LevelFilter::Info), LevelFilter::Info);
        assert_eq!(parse_level(Some("warn"), LevelFilter::Info), LevelFilter::Warn);
        assert_eq!(parse_level(Some(" TRACE "), LevelFilter::Info), LevelFilter::Trace);
        assert_eq!(parse_level(Some("off"), LevelFilter::Debug), LevelFilter::Off);
        assert_eq!(parse_level(Some("loud"), LevelFilter::Debug), LevelFilter::Debug);
    }

    #[test]
    fn test_build_config_root_level() {
        let dir = std::env::temp_dir().join(format!("race-server-logs-{}", std::process::id()));
        let settings = LogSettings {
            file_path: dir.join("race-server.log").to_string_lossy().into_owned(),
            archive_pattern: dir.join("race-server.{}.log").to_string_lossy().into_owned(),
            stderr_level: LevelFilter::Warn,
            file_level: LevelFilter::Debug,
        };

        let config = build_config(&settings).unwrap();
        assert_eq!(config.root().level(), LevelFilter::Debug);
        assert_eq!(config.appenders().len(), 2);

        let _ = std::fs::remove_dir_all(dir);
    }
}
