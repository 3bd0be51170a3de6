use std::io::{Read, Write};
use std::sync::mpsc::{channel, Receiver};
use log::*;

use crate::app::BackgroundJobs;
use crate::config::ConnectionSettings;

/// Number of raw binary digits in an `S` feedback line.
pub const FEEDBACK_RAW_LEN :usize = 13;

pub fn point_command(servo :usize) -> String { format!("p{}\n", servo) }
pub const SYNC_COMMAND :&str = "r\n";

#[derive(Debug, PartialEq, Eq)]
pub enum FeedbackError {
    BadLength(usize),
    NonBinary(char),
}

impl std::fmt::Display for FeedbackError {
    fn fmt(&self, f :&mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackError::BadLength(n) => write!(f, "wrong line length {}", n),
            FeedbackError::NonBinary(c) => write!(f, "non-binary digit {:?}", c),
        }
    }
}

/// Decode an `S` feedback line into the logical point-state vector.
///
/// The hardware reports one binary digit per servo. Double-servo units
/// (the crossovers) report the same value twice, and the goods yard
/// triple reports its road as two bits. Those raw positions are
/// collapsed here, so the result has one entry per logical point, in
/// `Layout::points_order`.
pub fn decode_feedback(line :&str) -> Result<Vec<u8>, FeedbackError> {
    let digits = line.as_bytes();
    if digits.len() != FEEDBACK_RAW_LEN + 1 || digits[0] != b'S' {
        return Err(FeedbackError::BadLength(digits.len()));
    }
    let mut states :Vec<u8> = Vec::with_capacity(FEEDBACK_RAW_LEN);
    for d in &digits[1..] {
        match d {
            b'0' => states.push(0),
            b'1' => states.push(1),
            other => { return Err(FeedbackError::NonBinary(*other as char)); },
        }
    }
    // The two sidings bits become a single road number.
    states[7] = states[6] * 2 + states[7];
    // Remove the consumed bit and the second halves of the double-servo pairs.
    states.remove(8);
    states.remove(6);
    states.remove(3);
    Ok(states)
}

/// Splits an incoming byte stream into complete lines, keeping any
/// unterminated tail for the next poll. Carriage returns are dropped.
pub struct LineBuffer {
    partial :String,
}

impl LineBuffer {
    pub fn new() -> Self { LineBuffer { partial: String::new() } }

    pub fn push_bytes(&mut self, bytes :&[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for b in bytes {
            match b {
                b'\n' => { lines.push(std::mem::replace(&mut self.partial, String::new())); },
                b'\r' => {},
                other => { self.partial.push(*other as char); },
            }
        }
        lines
    }
}

/// Serial connection to the layout hardware. A background job owns the
/// reading half and feeds raw chunks through a channel; `poll_lines`
/// drains the channel without ever blocking the frame loop.
pub struct SerialLink {
    port :Box<dyn serialport::SerialPort>,
    rx :Receiver<Vec<u8>>,
    buffer :LineBuffer,
}

impl SerialLink {
    pub fn open(settings :&ConnectionSettings, bg :&mut BackgroundJobs) -> Result<SerialLink, serialport::Error> {
        let mut port_settings = serialport::SerialPortSettings::default();
        port_settings.baud_rate = settings.baud;
        port_settings.timeout = std::time::Duration::from_millis(100);
        let port = serialport::open_with_settings(&settings.port, &port_settings)?;
        let mut reader = port.try_clone()?;
        let (tx, rx) = channel();
        bg.execute(move || {
            let mut chunk = [0u8; 256];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) => {},
                    Ok(n) => {
                        if tx.send(chunk[..n].to_vec()).is_err() { break; }
                    },
                    Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {},
                    Err(e) => {
                        error!("Serial read failed: {}", e);
                        break;
                    },
                }
            }
        });
        Ok(SerialLink { port: port, rx: rx, buffer: LineBuffer::new() })
    }
}

/// Stand-in used when no hardware is connected: accepts and records
/// writes, never produces input.
pub struct DummyLink {
    pub sent :Vec<String>,
}

pub enum Link {
    Serial(SerialLink),
    Dummy(DummyLink),
}

impl Link {
    pub fn dummy() -> Link { Link::Dummy(DummyLink { sent: Vec::new() }) }

    pub fn connected(&self) -> bool {
        match self {
            Link::Serial(_) => true,
            Link::Dummy(_) => false,
        }
    }

    /// Best-effort write, failures are logged and dropped.
    pub fn write(&mut self, cmd :&str) {
        match self {
            Link::Serial(l) => {
                if let Err(e) = l.port.write_all(cmd.as_bytes()).and_then(|_| l.port.flush()) {
                    warn!("Serial write failed: {}", e);
                }
            },
            Link::Dummy(l) => {
                debug!("Dropping command (not connected): {:?}", cmd);
                l.sent.push(cmd.to_string());
            },
        }
    }

    /// Drain any complete inbound lines without blocking.
    pub fn poll_lines(&mut self) -> Vec<String> {
        match self {
            Link::Serial(l) => {
                let mut lines = Vec::new();
                while let Ok(chunk) = l.rx.try_recv() {
                    lines.extend(l.buffer.push_bytes(&chunk));
                }
                lines
            },
            Link::Dummy(_) => Vec::new(),
        }
    }

    /// Commands recorded by a dummy link (for offline inspection).
    pub fn sent(&self) -> &[String] {
        match self {
            Link::Serial(_) => &[],
            Link::Dummy(l) => &l.sent,
        }
    }
}
