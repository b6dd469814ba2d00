mod common;

use std::time::Duration;

use common::{MockBackend, is_two_decimal};
use telemu::config::{EmulatorConfig, SerialSettings};
use telemu::emulator::{Emulator, RunOutcome};
use telemu::error::{EmulatorError, TransportError};
use telemu::frame::FIELD_COUNT;
use telemu::observability::EventEmitter;
use telemu::phase::{Phase, PhaseTable};
use telemu::transport::DeviceInfo;

fn emulator(backend: &MockBackend, config: EmulatorConfig) -> Emulator {
    Emulator::new(config, Box::new(backend.clone()), EventEmitter::noop())
}

#[tokio::test(start_paused = true)]
async fn full_flight_transmits_110_frames_in_order() {
    let backend = MockBackend::arduino();
    let mut console = Vec::new();

    let outcome = emulator(&backend, EmulatorConfig::default())
        .run(&mut console)
        .await
        .expect("run should succeed");

    let summary = match outcome {
        RunOutcome::Completed(summary) => summary,
        other => panic!("expected completed run, got {other:?}"),
    };
    assert_eq!(summary.frames_sent, 110);
    assert_eq!(summary.phases, 11);

    let recording = backend.recording();
    assert_eq!(recording.opened.len(), 1);
    assert_eq!(recording.opened[0].0.port_name, "/dev/ttyACM0");
    assert_eq!(recording.opened[0].1, SerialSettings::default());
    assert_eq!(recording.closes, 1, "transport must be closed exactly once");

    let phases: String = recording.writes.iter().map(common::SentFrame::phase).collect();
    let expected: String = "@ABCDEFGHIJ"
        .chars()
        .flat_map(|c| std::iter::repeat_n(c, 10))
        .collect();
    assert_eq!(phases, expected);

    for write in &recording.writes {
        let fields = write.fields();
        assert_eq!(fields.len(), FIELD_COUNT, "bad frame: {}", write.text());
        assert_eq!(fields[0].chars().next(), Some(write.phase()));
        assert!(is_two_decimal(&fields[1]), "bad timestamp: {}", fields[1]);
        assert!(write.bytes.is_ascii());
        assert!(!write.text().ends_with('\n'));
    }

    for pair in recording.writes.windows(2) {
        assert!(
            pair[1].at - pair[0].at >= Duration::from_millis(100),
            "frames closer than the frame delay"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn full_flight_console_output() {
    let backend = MockBackend::arduino();
    let mut console = Vec::new();

    emulator(&backend, EmulatorConfig::default())
        .run(&mut console)
        .await
        .unwrap();

    let output = String::from_utf8(console).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "transmitting to Arduino Uno (ttyACM0)");
    assert_eq!(lines[1], "[@] No flight state reached");
    assert_eq!(lines[2], "[A] Liftoff");
    assert_eq!(lines[11], "[J] Simulation Finished");
    assert_eq!(lines.len(), 13);

    let elapsed: f64 = lines[12]
        .strip_suffix(" seconds elapsed")
        .expect("elapsed report")
        .parse()
        .unwrap();
    assert!(elapsed >= 11.0, "elapsed {elapsed} < 11.0");
}

#[tokio::test(start_paused = true)]
async fn empty_device_list_prints_only_no_devices() {
    let backend = MockBackend::new(Vec::new());
    let mut console = Vec::new();

    let outcome = emulator(&backend, EmulatorConfig::default())
        .run(&mut console)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NoDevices);
    assert_eq!(String::from_utf8(console).unwrap(), "no serial devices found\n");
    assert!(backend.recording().opened.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unmatched_devices_print_only_no_arduino() {
    let backend = MockBackend::new(vec![
        DeviceInfo::new("/dev/ttyS0", "ttyS0"),
        DeviceInfo::new("/dev/ttyUSB0", "FT232R USB UART (ttyUSB0)"),
    ]);
    let mut console = Vec::new();

    let outcome = emulator(&backend, EmulatorConfig::default())
        .run(&mut console)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NoMatch);
    assert_eq!(String::from_utf8(console).unwrap(), "No Arduino connected\n");
    assert!(backend.recording().opened.is_empty());
}

#[tokio::test(start_paused = true)]
async fn open_failure_names_device() {
    let backend = MockBackend::arduino().refusing_open();
    let mut console = Vec::new();

    let err = emulator(&backend, EmulatorConfig::default())
        .run(&mut console)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmulatorError::Transport(TransportError::OpenFailed { .. })
    ));
    assert_eq!(
        err.to_string(),
        "error connecting to Arduino Uno (ttyACM0), perhaps it is already in use?"
    );
    assert!(console.is_empty(), "nothing transmitted, nothing announced");
    assert!(backend.recording().writes.is_empty());
}

#[tokio::test(start_paused = true)]
async fn write_failure_still_closes_transport_once() {
    let backend = MockBackend::arduino().failing_after(25);
    let mut console = Vec::new();

    let err = emulator(&backend, EmulatorConfig::default())
        .run(&mut console)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmulatorError::Transport(TransportError::WriteFailed { .. })
    ));
    let recording = backend.recording();
    assert_eq!(recording.writes.len(), 25);
    assert_eq!(recording.closes, 1);

    let output = String::from_utf8(console).unwrap();
    assert!(!output.contains("seconds elapsed"));
    assert!(output.contains("[B] Meco"));
    assert!(!output.contains("[C] Separation"));
}

#[tokio::test(start_paused = true)]
async fn explicit_port_skips_discovery() {
    let backend = MockBackend::new(Vec::new());
    let config = EmulatorConfig {
        port: Some("/dev/pts/7".to_owned()),
        profile: PhaseTable::new(vec![Phase::new('A', "Liftoff", 2)]),
        ..EmulatorConfig::default()
    };
    let mut console = Vec::new();

    let outcome = emulator(&backend, config).run(&mut console).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    let recording = backend.recording();
    assert_eq!(recording.opened[0].0.port_name, "/dev/pts/7");
    assert_eq!(recording.writes.len(), 2);
    assert!(
        String::from_utf8(console)
            .unwrap()
            .starts_with("transmitting to /dev/pts/7\n")
    );
}

#[tokio::test(start_paused = true)]
async fn custom_match_and_delay() {
    let backend = MockBackend::new(vec![
        DeviceInfo::new("/dev/ttyACM0", "Arduino Uno (ttyACM0)"),
        DeviceInfo::new("/dev/ttyUSB0", "Ground Feather (ttyUSB0)"),
    ]);
    let config = EmulatorConfig {
        device_match: "Feather".to_owned(),
        frame_delay: Duration::from_millis(250),
        profile: PhaseTable::new(vec![Phase::new('@', "Pad", 3)]),
        ..EmulatorConfig::default()
    };
    let mut console = Vec::new();

    emulator(&backend, config).run(&mut console).await.unwrap();

    let recording = backend.recording();
    assert_eq!(recording.opened[0].0.port_name, "/dev/ttyUSB0");
    for pair in recording.writes.windows(2) {
        assert!(pair[1].at - pair[0].at >= Duration::from_millis(250));
    }
}

/// Console whose every write fails.
struct BrokenConsole;

impl std::io::Write for BrokenConsole {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn console_failure_after_open_still_closes_once() {
    let backend = MockBackend::arduino();

    let err = emulator(&backend, EmulatorConfig::default())
        .run(&mut BrokenConsole)
        .await
        .unwrap_err();

    assert!(matches!(err, EmulatorError::Io(_)));
    let recording = backend.recording();
    assert_eq!(recording.opened.len(), 1);
    assert!(recording.writes.is_empty(), "no frames before the announcement");
    assert_eq!(recording.closes, 1);
}
