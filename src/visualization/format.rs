/// Format a device-relative time as `HH:MM:SS.mmm`.
///
/// Negative and non-finite inputs render as zero.
pub fn format_elapsed(elapsed_ms: f64) -> String {
    let total_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
        elapsed_ms.round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(3_725_000.0), "01:02:05.000");
        assert_eq!(format_elapsed(500.0), "00:00:00.500");
        assert_eq!(format_elapsed(0.0), "00:00:00.000");
        assert_eq!(format_elapsed(59_999.4), "00:00:59.999");
    }

    #[test]
    fn test_format_elapsed_large_and_invalid() {
        assert_eq!(format_elapsed(100.0 * 3_600_000.0), "100:00:00.000");
        assert_eq!(format_elapsed(-20.0), "00:00:00.000");
        assert_eq!(format_elapsed(f64::NAN), "00:00:00.000");
    }
}
