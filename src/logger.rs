use crate::models::record::LogRecord;
use crate::sink::Sink;
use log::{LevelFilter, Log, Metadata, Record};

/// `log` facade adapter that fans records out to a chain of sinks.
///
/// Level filtering against the facade's metadata happens here; each sink
/// then decides via `accepts` whether it wants the record, and a sink with
/// `bubble() == false` stops the chain after handling one. Delivery is
/// synchronous on the calling thread.
pub struct SinkLogger {
    level: LevelFilter,
    sinks: Vec<Box<dyn Sink>>,
}

impl SinkLogger {
    pub fn new(level: LevelFilter) -> Self {
        SinkLogger {
            level,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Hand one record to the chain. Write failures are reported on stderr
    /// rather than through the `log` facade, which would re-enter this
    /// logger.
    pub fn dispatch(&self, record: &LogRecord) {
        for sink in &self.sinks {
            if !sink.accepts(record) {
                continue;
            }
            if let Err(err) = sink.write(record) {
                eprintln!("logsink: dropped record: {}", err);
            }
            if !sink.bubble() {
                break;
            }
        }
    }

    /// Install this logger as the global `log` backend.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }
}

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let record = LogRecord::now(
            record.target(),
            record.level().into(),
            record.args().to_string(),
        );
        self.dispatch(&record);
    }

    fn flush(&self) {}
}
