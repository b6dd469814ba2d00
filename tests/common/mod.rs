//! Shared integration-test harness: an in-memory serial backend whose
//! transports record every write, plus helpers for spawning the binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use telemu::config::SerialSettings;
use telemu::error::TransportError;
use telemu::transport::{DeviceInfo, Result, SerialBackend, Transport};
use tokio::time::Instant;

/// One frame as seen by the fake device.
#[derive(Debug, Clone)]
pub struct SentFrame {
    pub at: Instant,
    pub bytes: Vec<u8>,
}

impl SentFrame {
    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.clone()).expect("frame is not UTF-8")
    }

    pub fn fields(&self) -> Vec<String> {
        self.text().split(',').map(str::to_owned).collect()
    }

    pub fn phase(&self) -> char {
        char::from(self.bytes[0])
    }
}

/// Everything the fake device observed, shared with the test body.
#[derive(Debug, Default)]
pub struct Recording {
    pub opened: Vec<(DeviceInfo, SerialSettings)>,
    pub writes: Vec<SentFrame>,
    pub closes: usize,
}

/// A [`SerialBackend`] serving a fixed device list.
#[derive(Clone)]
pub struct MockBackend {
    devices: Vec<DeviceInfo>,
    refuse_open: bool,
    fail_after: Option<usize>,
    pub recording: Arc<Mutex<Recording>>,
}

impl MockBackend {
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        Self {
            devices,
            refuse_open: false,
            fail_after: None,
            recording: Arc::new(Mutex::new(Recording::default())),
        }
    }

    /// A single Arduino on `/dev/ttyACM0`.
    pub fn arduino() -> Self {
        Self::new(vec![DeviceInfo::new(
            "/dev/ttyACM0",
            "Arduino Uno (ttyACM0)",
        )])
    }

    /// Every `open` fails as if the port were already claimed.
    pub fn refusing_open(mut self) -> Self {
        self.refuse_open = true;
        self
    }

    /// Writes after the first `n` fail with a broken pipe.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn recording(&self) -> std::sync::MutexGuard<'_, Recording> {
        self.recording.lock().unwrap()
    }
}

impl SerialBackend for MockBackend {
    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }

    fn open(&self, device: &DeviceInfo, settings: &SerialSettings) -> Result<Box<dyn Transport>> {
        if self.refuse_open {
            return Err(TransportError::OpenFailed {
                description: device.description.clone(),
                source: std::io::Error::from(std::io::ErrorKind::ResourceBusy),
            });
        }
        self.recording
            .lock()
            .unwrap()
            .opened
            .push((device.clone(), *settings));
        Ok(Box::new(RecordingTransport {
            port_name: device.port_name.clone(),
            fail_after: self.fail_after,
            recording: Arc::clone(&self.recording),
        }))
    }
}

/// Transport that appends every write to the shared [`Recording`].
pub struct RecordingTransport {
    port_name: String,
    fail_after: Option<usize>,
    recording: Arc<Mutex<Recording>>,
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send_frame(&mut self, bytes: &[u8]) -> Result<()> {
        let mut recording = self.recording.lock().unwrap();
        if self.fail_after.is_some_and(|n| recording.writes.len() >= n) {
            return Err(TransportError::WriteFailed {
                port: self.port_name.clone(),
                source: std::io::Error::from(std::io::ErrorKind::BrokenPipe),
            });
        }
        recording.writes.push(SentFrame {
            at: Instant::now(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.recording.lock().unwrap().closes += 1;
        Ok(())
    }

    fn port_name(&self) -> &str {
        &self.port_name
    }
}

/// Returns `true` if `field` is digits, a dot, then exactly two digits.
pub fn is_two_decimal(field: &str) -> bool {
    match field.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.len() == 2
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the built binary to completion and returns its output.
pub fn spawn_command(args: &[&str]) -> std::process::Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_telemu"))
        .args(args)
        .env_remove("TELEMU_PROFILE")
        .env_remove("TELEMU_PORT")
        .env_remove("TELEMU_FRAME_DELAY")
        .env_remove("TELEMU_DEVICE_MATCH")
        .env_remove("TELEMU_LOG_LEVEL")
        .env_remove("TELEMU_LOG_FORMAT")
        .output()
        .expect("failed to run telemu")
}
