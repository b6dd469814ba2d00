//! Telemetry frame wire format.
//!
//! A frame is one ASCII record of exactly [`FIELD_COUNT`] comma-separated
//! fields with no line terminator:
//!
//! | Field | Content |
//! |-------|---------|
//! | 0 | phase code (single ASCII character) |
//! | 1 | seconds since the Unix epoch, two decimal digits |
//! | 2–20 | [`PLACEHOLDER_FIELDS`], sent verbatim |

use std::fmt;

use chrono::{DateTime, Utc};

/// Number of comma-separated fields in every frame.
pub const FIELD_COUNT: usize = 21;

/// Field separator on the wire.
pub const FIELD_SEPARATOR: char = ',';

/// Constant sensor/state values occupying fields 2 through 20.
///
/// The emulator does not model flight dynamics; every frame carries this
/// same snapshot.
pub const PLACEHOLDER_FIELDS: [&str; FIELD_COUNT - 2] = [
    "9697.791016",
    "-216.117355",
    "0.239193",
    "-0.373560",
    "32.779297",
    "0.000000",
    "0.000000",
    "-0.272123",
    "-0.004113",
    "0.000209",
    "-0.001000",
    "0.000000",
    "0.000000",
    "0",
    "0",
    "0",
    "1",
    "0",
    "0",
];

/// One telemetry record, ready to be rendered onto the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    phase: char,
    timestamp: DateTime<Utc>,
}

impl TelemetryFrame {
    /// Creates a frame for `phase` stamped with `timestamp`.
    #[must_use]
    pub const fn new(phase: char, timestamp: DateTime<Utc>) -> Self {
        Self { phase, timestamp }
    }

    /// Creates a frame for `phase` stamped with the current wall-clock time.
    #[must_use]
    pub fn now(phase: char) -> Self {
        Self::new(phase, Utc::now())
    }

    /// Returns the phase code carried in field 0.
    #[must_use]
    pub const fn phase(&self) -> char {
        self.phase
    }

    /// Returns the timestamp as fractional seconds since the Unix epoch.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn epoch_seconds(&self) -> f64 {
        self.timestamp.timestamp_micros() as f64 / 1_000_000.0
    }

    /// Encodes the frame as the ASCII bytes written to the transport.
    #[must_use]
    pub fn to_wire(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for TelemetryFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{FIELD_SEPARATOR}{:.2}", self.phase, self.epoch_seconds())?;
        for value in PLACEHOLDER_FIELDS {
            write!(f, "{FIELD_SEPARATOR}{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-02-04T10:15:30.126Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn frame_has_twenty_one_fields() {
        let frame = TelemetryFrame::new('A', fixed_time());
        let rendered = frame.to_string();
        assert_eq!(rendered.split(FIELD_SEPARATOR).count(), FIELD_COUNT);
    }

    #[test]
    fn frame_renders_exact_wire_text() {
        let frame = TelemetryFrame::new('A', fixed_time());
        assert_eq!(
            frame.to_string(),
            "A,1738664130.13,9697.791016,-216.117355,0.239193,-0.373560,32.779297,\
             0.000000,0.000000,-0.272123,-0.004113,0.000209,-0.001000,0.000000,\
             0.000000,0,0,0,1,0,0"
        );
    }

    #[test]
    fn timestamp_has_two_decimals() {
        let ts = DateTime::parse_from_rfc3339("2025-02-04T10:15:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let rendered = TelemetryFrame::new('@', ts).to_string();
        let field = rendered.split(FIELD_SEPARATOR).nth(1).unwrap();
        assert_eq!(field, "1738664130.00");
    }

    #[test]
    fn wire_bytes_are_ascii_without_terminator() {
        let bytes = TelemetryFrame::new('J', fixed_time()).to_wire();
        assert!(bytes.is_ascii());
        assert_ne!(bytes.last(), Some(&b'\n'));
        assert_eq!(bytes.first(), Some(&b'J'));
    }

    #[test]
    fn phase_accessor_returns_code() {
        assert_eq!(TelemetryFrame::now('E').phase(), 'E');
    }
}
