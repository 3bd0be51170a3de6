use std::collections::VecDeque;
use log::*;
use std::sync::Arc;
use std::sync::Mutex;

/// Rolling buffer of the most recent serial traffic, shown at the
/// bottom of the panel.
pub struct Monitor {
    lines :VecDeque<String>,
    capacity :usize,
}

impl Monitor {
    pub fn new(capacity :usize) -> Self {
        Monitor { lines: VecDeque::with_capacity(capacity), capacity: capacity }
    }

    pub fn push(&mut self, line :String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize { self.lines.len() }
}

/// `HH:MM:SS` wall-clock prefix (UTC) for monitor lines.
pub fn timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs()).unwrap_or(0);
    let s = secs % 86_400;
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

pub type LogStore = Arc<Mutex<VecDeque<u8>>>;

/// Global logger writing into an in-memory byte buffer, so the panel
/// shell can display the log without a console attached.
pub struct StringLogger {
    level :LevelFilter,
    log :Arc<Mutex<VecDeque<u8>>>,
}

impl StringLogger {
    pub fn init(log_level :LevelFilter) -> Result<LogStore, SetLoggerError> {
        let log = Arc::new(Mutex::new(VecDeque::new()));
        set_max_level(log_level.clone());
        set_boxed_logger(Box::new(Self::new(log_level,log.clone())))?;
        Ok(log)
    }

    pub fn new(log_level :LevelFilter, log :Arc<Mutex<VecDeque<u8>>>) -> Self {
        StringLogger {
            level: log_level,
            log: log,
        }
    }
}

impl Log for StringLogger {
    fn flush(&self) {}
    fn enabled(&self, metadata :&Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record :&Record<'_>) {
        if self.enabled(record.metadata()) {
            let mut buf = self.log.lock().unwrap();
            let max_len = 100_000;
            let target = if record.target().len() > 0 {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };
            let statement = format!("{:<5} [{}] {}\n",
                                    record.level().to_string(),
                                    target,
                                    record.args());

            let trim = ((buf.len() as isize + statement.len() as isize) - max_len).max(0) as usize;
            drop(buf.drain(0..trim));
            buf.extend(statement.bytes());
        }
    }
}
