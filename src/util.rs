use std::time::Duration;

/// Readout format used everywhere a reaction time is shown: `SS:mmm`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    format!("{:02}:{:03}", total_ms / 1000, total_ms % 1000)
}

pub fn mean_ms(data: &[u64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<u64>() as f64 / count as f64),
    }
}

pub fn std_dev_ms(data: &[u64]) -> Option<f64> {
    let data_mean = mean_ms(data)?;
    let variance = data
        .iter()
        .map(|&value| {
            let diff = data_mean - value as f64;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Trim the raw name and cap it at `max` characters
pub fn normalize_name(raw: &str, max: usize) -> String {
    raw.trim().chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:000");
        assert_eq!(format_elapsed(Duration::from_millis(250)), "00:250");
        assert_eq!(format_elapsed(Duration::from_millis(4007)), "04:007");
        assert_eq!(format_elapsed(Duration::from_millis(61_999)), "61:999");
    }

    #[test]
    fn test_format_elapsed_drops_sub_millis() {
        assert_eq!(format_elapsed(Duration::from_micros(1999)), "00:001");
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean_ms(&[200, 300, 400]), Some(300.0));
        assert_eq!(mean_ms(&[42]), Some(42.0));
        assert_eq!(mean_ms(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev_ms(&[5, 5, 5, 5]), Some(0.0));
        assert_eq!(std_dev_ms(&[]), None);
        let sd = std_dev_ms(&[100, 200]).unwrap();
        assert!((sd - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Ana  ", 20), "Ana");
        assert_eq!(normalize_name("   ", 20), "");
        assert_eq!(
            normalize_name("abcdefghijklmnopqrstuvwxyz", 20),
            "abcdefghijklmnopqrst"
        );
        // counts characters, not bytes
        assert_eq!(normalize_name("ééééé", 3), "ééé");
    }
}
