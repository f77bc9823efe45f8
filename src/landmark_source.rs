//! Landmark sources: where detection results come from.
//!
//! The pose model itself runs elsewhere (typically a MediaPipe hand landmarker
//! in a helper process) and writes one JSON object per detection to a stream:
//!
//! ```json
//! {"timestamp": 1532, "hands": [{"handedness": "Left", "landmarks": [{"x": 0.4, "y": 0.6, "z": -0.02}, ...]}]}
//! ```
//!
//! `timestamp` (ms, may be fractional) is optional; without it, time since the
//! source was opened is used.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    process::{Child, ChildStdout, Command, Stdio},
    sync::{Arc, Mutex},
    time::Instant,
};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::landmarks::{Handedness, Landmark, LandmarkFrame};

pub trait LandmarkSource {
    /// Block until the next detection result arrives. Each result holds zero or
    /// more hands. `Ok(None)` means the source has ended.
    fn next_detection(&mut self) -> Result<Option<Vec<LandmarkFrame>>>;
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: Handedness,
    landmarks: Vec<Landmark>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    timestamp: Option<f64>,
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Reads newline-delimited JSON detections from any reader
pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    started: Instant,
    line: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        JsonLinesSource {
            reader,
            started: Instant::now(),
            line: String::new(),
        }
    }

    fn parse_line(&self, line: &str) -> Option<Vec<LandmarkFrame>> {
        let detection = match serde_json::from_str::<DetectionJson>(line) {
            Ok(d) => d,
            Err(e) => {
                warn!("Skipping unparsable detection line ({}): {:?}", e, line);
                return None;
            }
        };
        if let Some(error) = detection.error {
            warn!("Detector error: {}", error);
            return None;
        }

        let timestamp = detection
            .timestamp
            .filter(|t| t.is_finite() && *t >= 0.)
            .map(|t| t.round() as u64)
            .unwrap_or_else(|| self.started.elapsed().as_millis() as u64);

        let frames = detection
            .hands
            .into_iter()
            .filter_map(|hand| {
                match LandmarkFrame::new(&hand.landmarks, hand.handedness, timestamp) {
                    Ok(frame) => Some(frame),
                    Err(e) => {
                        warn!("Dropping {:?} hand: {}", hand.handedness, e);
                        None
                    }
                }
            })
            .collect();
        Some(frames)
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_detection(&mut self) -> Result<Option<Vec<LandmarkFrame>>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .context("Failed to read from landmark source")?;
            if read == 0 {
                return Ok(None);
            }
            let line = self.line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(frames) = self.parse_line(line) {
                return Ok(Some(frames));
            }
        }
    }
}

pub fn open_stdin() -> JsonLinesSource<BufReader<io::Stdin>> {
    info!("Reading landmark detections from stdin");
    JsonLinesSource::new(BufReader::new(io::stdin()))
}

pub fn open_file(path: &str) -> Result<JsonLinesSource<BufReader<File>>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open landmark file {}", path))?;
    info!("Reading landmark detections from {}", path);
    Ok(JsonLinesSource::new(BufReader::new(file)))
}

/// Runs an external detector and reads detections from its stdout. The
/// process is killed when this is dropped, or earlier through a
/// [`DetectorHandle`].
pub struct DetectorProcess {
    handle: DetectorHandle,
    source: JsonLinesSource<BufReader<ChildStdout>>,
}

impl DetectorProcess {
    pub fn spawn(program: &str, args: &[String]) -> Result<Self> {
        info!("Starting detector subprocess: {} {:?}", program, args);
        let mut process = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start detector \"{}\"", program))?;
        let stdout = process
            .stdout
            .take()
            .context("Failed to get detector stdout")?;
        Ok(DetectorProcess {
            handle: DetectorHandle {
                process: Arc::new(Mutex::new(process)),
            },
            source: JsonLinesSource::new(BufReader::new(stdout)),
        })
    }

    /// A handle that can stop the detector while another thread is blocked
    /// reading from it
    pub fn handle(&self) -> DetectorHandle {
        self.handle.clone()
    }
}

impl LandmarkSource for DetectorProcess {
    fn next_detection(&mut self) -> Result<Option<Vec<LandmarkFrame>>> {
        self.source.next_detection()
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        self.handle.stop();
    }
}

/// Shared control over a running detector. Stopping closes its stdout, so a
/// reader blocked in `next_detection` sees the end of the source.
#[derive(Clone)]
pub struct DetectorHandle {
    process: Arc<Mutex<Child>>,
}

impl DetectorHandle {
    /// Kill and reap the detector. Safe to call more than once.
    pub fn stop(&self) {
        let Ok(mut process) = self.process.lock() else {
            warn!("Detector handle poisoned; cannot stop subprocess");
            return;
        };
        if matches!(process.try_wait(), Ok(Some(_))) {
            return;
        }
        debug!("Stopping detector subprocess");
        if let Err(e) = process.kill() {
            warn!("Failed to kill detector subprocess: {}", e);
        }
        let _ = process.wait();
    }

    pub fn is_running(&self) -> bool {
        self.process
            .lock()
            .map(|mut p| matches!(p.try_wait(), Ok(None)))
            .unwrap_or(false)
    }
}
