use crate::models::Unit;

/// Format a stored kg value in the display unit, e.g. "82.4 kg".
pub fn format_weight(kg: f64, unit: Unit) -> String {
    format!("{:.1} {}", unit.from_kg(kg), unit.as_str())
}

/// Signed change, e.g. "-1.5 kg" / "+0.3 kg". Zero renders as "±0.0".
pub fn format_delta(kg: f64, unit: Unit) -> String {
    let v = unit.from_kg(kg);
    if v.abs() < 0.05 {
        format!("±0.0 {}", unit.as_str())
    } else {
        format!("{:+.1} {}", v, unit.as_str())
    }
}

/// Create a simple ASCII progress bar from a [0,1] fraction.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let ratio = fraction.clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_renders_in_display_unit() {
        assert_eq!(format_weight(80.0, Unit::Kg), "80.0 kg");
        assert_eq!(format_weight(80.0, Unit::Lb), "176.4 lb");
    }

    #[test]
    fn delta_keeps_its_sign() {
        assert_eq!(format_delta(-1.5, Unit::Kg), "-1.5 kg");
        assert_eq!(format_delta(0.3, Unit::Kg), "+0.3 kg");
        assert_eq!(format_delta(0.0, Unit::Kg), "±0.0 kg");
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(2.0, 4), "████");
        assert_eq!(progress_bar(-1.0, 4), "░░░░");
    }
}
