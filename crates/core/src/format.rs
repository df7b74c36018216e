use std::time::Duration;

use crate::types::RemoteFile;

/// Format a byte count with binary units, e.g. `12.5 MiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// `12.3s` under a minute, `2m 5s` above. Rounds before splitting.
pub fn format_duration(d: Duration) -> String {
    let tenths = (d.as_secs_f64() * 10.0).round() as u64;
    if tenths < 600 {
        format!("{}.{}s", tenths / 10, tenths % 10)
    } else {
        let secs = (tenths + 5) / 10;
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One line of the uploaded files listing
pub fn format_file_row(file: &RemoteFile) -> String {
    let size = file
        .size()
        .map(format_bytes)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<24} {:<28} {:<10} {:>10}  expires {}",
        file.name,
        file.display_name.as_deref().unwrap_or("-"),
        file.state.name(),
        size,
        file.expiration_time.as_deref().unwrap_or("-"),
    )
}
