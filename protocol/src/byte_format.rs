//! Human-readable byte counts for user-facing size-limit messages.

const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];

/// Format `bytes` with decimal (power-of-1000) units: `8_000_000` becomes
/// "8.00 MB". Bytes and kilobytes are shown without a fractional part.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 bytes".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1000.0 && unit + 1 < UNITS.len() {
        size /= 1000.0;
        unit += 1;
    }
    if unit <= 1 {
        format!("{size:.0} {}", UNITS[unit])
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_each_unit() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(500), "500 bytes");
        assert_eq!(format_bytes(94_680), "95 KB");
        assert_eq!(format_bytes(8_000_000), "8.00 MB");
        assert_eq!(format_bytes(1_500_000_000), "1.50 GB");
    }
}
