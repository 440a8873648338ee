use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::{LogConfiguration, LogTopic};

const APPENDER: &str = "stderr";

const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l:<5})} {t} - {m}{n}";

impl LogConfiguration {
    /// Installs or reconfigures the `log4rs` logger: the root at the global level and one logger
    /// per topic at its effective level.
    pub(in crate::log) fn apply(&mut self) {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        let topics = LogTopic::ALL.map(|topic| {
            Logger::builder().build(topic.target(), self.effective_level(topic))
        });
        let config = Config::builder()
            .appender(Appender::builder().build(APPENDER, Box::new(stderr)))
            .loggers(topics)
            .build(Root::builder().appender(APPENDER).build(self.global_log_level));
        let config = match config {
            Ok(config) => config,
            Err(errors) => panic!("invalid log4rs configuration: {errors}"),
        };

        match self.root_handle {
            Some(ref handle) => handle.set_config(config),
            None => match log4rs::init_config(config) {
                Ok(handle) => self.root_handle = Some(handle),
                // Another logger owns the facade. Honor the level through it.
                Err(_) => log::set_max_level(self.global_log_level),
            },
        }
    }
}
