//! Control over propmodel's internal logging. The crate reports what it does with entities
//! through the `log` facade, grouped into [`LogTopic`]s:
//!
//! - [`LogTopic::Declarations`]: a `trace!` per declared property, a `debug!` per installed schema,
//! - [`LogTopic::Records`]: a `trace!` per raw attribute key that resolves to no property, and a
//!   `warn!` per value that cannot be snapshotted,
//! - [`LogTopic::Coercion`]: a `warn!` per raw input a value type cannot coerce,
//! - [`LogTopic::Config`]: a `warn!` per configured entity name missing from the catalog.
//!
//! Logging is _disabled_ by default. [`set_log_level`] sets the global level, and
//! [`enable_logging`] / [`disable_logging`] are shorthands for `Trace` and `Off`. A topic level
//! only ever quiets a topic below the global level. Records are capped at `Debug` unless told
//! otherwise, because loading wide payloads traces every unknown key:
//!
//! ```rust
//! use propmodel::log::{set_log_level, set_topic_level, topic_level, LevelFilter, LogTopic};
//!
//! set_log_level(LevelFilter::Trace);
//! assert_eq!(topic_level(LogTopic::Records), LevelFilter::Debug);
//!
//! // Show every skipped attribute key, and silence coercion warnings.
//! set_topic_level(LogTopic::Records, LevelFilter::Trace);
//! set_topic_level(LogTopic::Coercion, LevelFilter::Off);
//! ```
//!
//! The five logging macros are re-exported so applications can log through the same facade.
//!
//! With the default `logging` feature the messages go to a `log4rs` console appender on stderr.
//! Without it only `log::max_level` is adjusted, and whatever logger the application installed
//! receives the messages.
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};

use std::sync::{LazyLock, Mutex, MutexGuard};

#[cfg(feature = "logging")]
use log4rs::Handle;

use crate::HashMap;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// The parts of propmodel that log, each tied to the module it logs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTopic {
    Declarations,
    Records,
    Coercion,
    Config,
}

impl LogTopic {
    pub const ALL: [LogTopic; 4] = [
        LogTopic::Declarations,
        LogTopic::Records,
        LogTopic::Coercion,
        LogTopic::Config,
    ];

    /// The `log` target of the topic's messages.
    #[must_use]
    pub fn target(self) -> &'static str {
        match self {
            LogTopic::Declarations => "propmodel::entity::schema",
            LogTopic::Records => "propmodel::entity::record",
            LogTopic::Coercion => "propmodel::value",
            LogTopic::Config => "propmodel::config",
        }
    }

    fn default_cap(self) -> Option<LevelFilter> {
        match self {
            LogTopic::Records => Some(LevelFilter::Debug),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct LogConfiguration {
    global_log_level: LevelFilter,
    /// Caps set through `set_topic_level`, replacing the topic's default cap.
    topic_caps: HashMap<LogTopic, LevelFilter>,

    #[cfg(feature = "logging")]
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            topic_caps: HashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    fn effective_level(&self, topic: LogTopic) -> LevelFilter {
        match self
            .topic_caps
            .get(&topic)
            .copied()
            .or_else(|| topic.default_cap())
        {
            Some(cap) => cap.min(self.global_log_level),
            None => self.global_log_level,
        }
    }
}

/// Enables all log messages. Equivalent to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. Topic caps above it have no effect.
pub fn set_log_level(level: LevelFilter) {
    let mut log_configuration = get_log_configuration();
    if log_configuration.global_log_level != level {
        log_configuration.global_log_level = level;
        log_configuration.apply();
    }
}

#[must_use]
pub fn log_level() -> LevelFilter {
    get_log_configuration().global_log_level
}

/// Caps the level of one topic's messages.
pub fn set_topic_level(topic: LogTopic, level: LevelFilter) {
    let mut log_configuration = get_log_configuration();
    if log_configuration.topic_caps.insert(topic, level) != Some(level) {
        log_configuration.apply();
    }
}

/// Restores the topic's default cap.
pub fn reset_topic_level(topic: LogTopic) {
    let mut log_configuration = get_log_configuration();
    if log_configuration.topic_caps.remove(&topic).is_some() {
        log_configuration.apply();
    }
}

/// The level a topic's messages currently pass at.
#[must_use]
pub fn topic_level(topic: LogTopic) -> LevelFilter {
    get_log_configuration().effective_level(topic)
}

fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}
