pub fn format_count(value: f64) -> String {
    const UNITS: [&str; 4] = ["", "k", "M", "B"];

    let mut scaled = value;
    let mut unit = 0usize;
    while scaled.abs() >= 1000.0 && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        if scaled.fract() == 0.0 {
            format!("{scaled:.0}")
        } else {
            format!("{scaled:.2}")
        }
    } else {
        format!("{scaled:.1}{}", UNITS[unit])
    }
}

/// Repository part of an `owner/repo` name.
pub fn short_name(full_name: &str) -> &str {
    full_name
        .rsplit_once('/')
        .map(|(_, rest)| rest)
        .unwrap_or(full_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_use_metric_suffixes() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1500.0), "1.5k");
        assert_eq!(format_count(2_340_000.0), "2.3M");
        assert_eq!(format_count(2.5), "2.50");
    }

    #[test]
    fn short_name_strips_owner() {
        assert_eq!(short_name("rust-lang/rust"), "rust");
        assert_eq!(short_name("standalone"), "standalone");
    }
}
