use log::*;

use crate::config::Config;
use crate::draw::{self, Draw};
use crate::link::{self, Link, SerialLink};
use crate::monitor::{self, Monitor};
use crate::panel::{bowmont, Input, Layout};

/// Worker pool for jobs that must not block the frame loop (the serial
/// reader).
#[derive(Clone)]
pub struct BackgroundJobs(threadpool::ThreadPool);

impl BackgroundJobs {
    pub fn new() -> Self { BackgroundJobs(threadpool::ThreadPool::new(2)) }

    pub fn execute(&mut self, job: impl FnOnce() + Send + 'static) {
        self.0.execute(job)
    }
}

/// Aggregate of the whole panel application: config, layout, hardware
/// link and serial monitor. The embedding shell samples input once per
/// rendered frame and hands it to `frame`, consuming the returned draw
/// list.
pub struct App {
    pub layout :Layout,
    pub config :Config,
    pub link :Link,
    pub monitor :Monitor,
    pub background_jobs :BackgroundJobs,
}

impl App {
    /// Opens the serial link from the configured settings, or falls
    /// back to an offline dummy so the panel keeps working without
    /// hardware.
    pub fn new() -> App {
        let config = Config::load();
        let mut background_jobs = BackgroundJobs::new();
        let link = match SerialLink::open(&config.connection, &mut background_jobs) {
            Ok(l) => Link::Serial(l),
            Err(e) => {
                error!("Unable to open serial port {}: {}", config.connection.port, e);
                Link::dummy()
            },
        };
        App::with_link(config, link, background_jobs)
    }

    pub fn with_link(config :Config, link :Link, background_jobs :BackgroundJobs) -> App {
        let layout = bowmont::bowmont_town();
        for issue in layout.check_wiring() {
            warn!("Layout wiring: {}", issue);
        }
        App {
            layout: layout,
            config: config,
            link: link,
            monitor: Monitor::new(5),
            background_jobs: background_jobs,
        }
    }

    pub fn connected(&self) -> bool { self.link.connected() }

    pub fn window_title(&self) -> String {
        format!("{} Layout PC Control ({})", self.layout.name, self.config.connection.port)
    }

    /// SYNC button hook: asks the hardware to re-send the point-state
    /// vector.
    pub fn request_sync(&mut self) {
        info!("Requesting point state sync.");
        self.link.write(link::SYNC_COMMAND);
    }

    /// One tick: drain inbound feedback, update the layout, emit the
    /// frame's draw list.
    pub fn frame(&mut self, input :&Input) -> Draw {
        for line in self.link.poll_lines() {
            self.monitor.push(format!("{}: {}", monitor::timestamp(), line));
            if line.starts_with('S') {
                match link::decode_feedback(&line) {
                    Ok(states) => self.layout.apply_feedback(&states),
                    Err(e) => error!("Discarding feedback line {:?}: {}", line, e),
                }
            }
            // lines starting with '<' are hardware status chatter,
            // shown in the monitor only
        }

        self.layout.update(input, &mut self.link);

        let mut draw = draw::panel(&self.layout, &self.config, input.mouse);
        draw::monitor_text(&mut draw, &self.monitor, &self.config);
        draw
    }
}
