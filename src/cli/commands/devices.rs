//! `devices` command handler
//!
//! Lists the serial devices the host reports, with the description used for
//! matching, and marks the one `run` would select.

use std::io::Write;

use serde::Serialize;

use crate::cli::args::{DevicesArgs, OutputFormat};
use crate::error::EmulatorError;
use crate::transport::{
    DeviceInfo, NO_DEVICES_MESSAGE, SerialBackend, Selection, SystemSerial, select_device,
};

#[derive(Serialize)]
struct DeviceRow<'a> {
    #[serde(flatten)]
    device: &'a DeviceInfo,
    selected: bool,
}

/// List serial devices.
///
/// # Errors
///
/// Returns a transport error if enumeration fails.
pub fn run(args: &DevicesArgs) -> Result<(), EmulatorError> {
    let devices = SystemSerial.list_devices()?;
    let mut stdout = std::io::stdout();
    render(&devices, &args.device_match, args.format, &mut stdout)
}

/// Renders `devices` to `out`, marking the selected one.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn render<W: Write>(
    devices: &[DeviceInfo],
    device_match: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), EmulatorError> {
    let selected = match select_device(devices, device_match) {
        Selection::Found(device) => Some(device.port_name),
        Selection::NoDevices | Selection::NoMatch => None,
    };
    let is_selected = |d: &DeviceInfo| selected.as_deref() == Some(d.port_name.as_str());

    match format {
        OutputFormat::Human => {
            if devices.is_empty() {
                writeln!(out, "{NO_DEVICES_MESSAGE}")?;
            }
            for device in devices {
                let marker = if is_selected(device) { '*' } else { ' ' };
                writeln!(out, "{marker} {}\t{}", device.port_name, device.description)?;
            }
        }
        OutputFormat::Json => {
            let rows: Vec<DeviceRow<'_>> = devices
                .iter()
                .map(|device| DeviceRow {
                    device,
                    selected: is_selected(device),
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<DeviceInfo> {
        vec![
            DeviceInfo::new("/dev/ttyS0", "ttyS0"),
            DeviceInfo::new("/dev/ttyACM0", "Arduino Uno (ttyACM0)"),
        ]
    }

    #[test]
    fn human_marks_selected_device() {
        let mut out = Vec::new();
        render(&devices(), "ttyACM0", OutputFormat::Human, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  /dev/ttyS0\tttyS0");
        assert_eq!(lines[1], "* /dev/ttyACM0\tArduino Uno (ttyACM0)");
    }

    #[test]
    fn human_empty_list() {
        let mut out = Vec::new();
        render(&[], "ttyACM0", OutputFormat::Human, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "no serial devices found\n");
    }

    #[test]
    fn json_output() {
        let mut out = Vec::new();
        render(&devices(), "nothing", OutputFormat::Json, &mut out).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["port_name"], "/dev/ttyACM0");
        assert_eq!(rows[1]["selected"], false);
    }
}
