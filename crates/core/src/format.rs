const UNITS: [(u64, &str); 4] = [
    (1024 * 1024 * 1024, "GB"),
    (1024 * 1024, "MB"),
    (1024, "KB"),
    (1, "B"),
];

/// Human readable byte count: largest fitting binary unit, two decimals at most.
pub fn format_bytes(bytes: u64) -> String {
    for (unit, name) in UNITS {
        if bytes >= unit {
            let value = format!("{:.2}", bytes as f64 / unit as f64);
            let value = value.trim_end_matches('0').trim_end_matches('.');
            return format!("{} {}", value, name);
        }
    }
    "0 B".to_string()
}
