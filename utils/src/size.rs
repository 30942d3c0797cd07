//! Byte size formatting helpers.

/// Format a byte count as a human-readable string (binary units).
pub fn format_bytes(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;

    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_unit() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(60 * 1024), "60.0 KiB");
        assert_eq!(format_bytes(9 * 1024 * 1024), "9.0 MiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
    }
}
