/// Render a non-negative number as a short label: `1.5 M`, `45 K`.
///
/// Millions keep one decimal unless the value is a whole number of
/// millions. Everything below a million is truncated to whole thousands,
/// so values under 1,000 read as `0 K`.
pub fn format_number(value: f64) -> String {
    const MILLION: f64 = 1_000_000.0;
    if value >= MILLION {
        if value % MILLION == 0.0 {
            return format!("{} M", (value / MILLION) as u64);
        }
        return format!("{:.1} M", value / MILLION);
    }
    format!("{} K", (value / 1000.0).trunc() as u64)
}

/// Salary range as shown in the KPI tile: `90 K - 150 K`.
pub fn format_range(min: f64, max: f64) -> String {
    format!("{} - {}", format_number(min), format_number(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millions() {
        assert_eq!(format_number(1_000_000.0), "1 M");
        assert_eq!(format_number(1_500_000.0), "1.5 M");
        assert_eq!(format_number(12_000_000.0), "12 M");
        assert_eq!(format_number(2_340_000.0), "2.3 M");
    }

    #[test]
    fn thousands_truncate() {
        assert_eq!(format_number(45_000.0), "45 K");
        assert_eq!(format_number(45_999.0), "45 K");
        assert_eq!(format_number(999_999.0), "999 K");
    }

    #[test]
    fn below_one_thousand_reads_zero() {
        assert_eq!(format_number(0.0), "0 K");
        assert_eq!(format_number(999.0), "0 K");
    }

    #[test]
    fn range_joins_both_ends() {
        assert_eq!(format_range(90_000.0, 150_000.0), "90 K - 150 K");
        assert_eq!(format_range(0.0, 0.0), "0 K - 0 K");
    }
}
