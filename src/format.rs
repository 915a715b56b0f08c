//! Number formatting for factor descriptions, notes and explanations

/// Multiplier as written in factor text: `2.0`, `1.25`, `0.9`
pub fn multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Dollar amount with thousands separators and the given number of decimals
pub fn currency(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{}${}.{}", sign, grouped, fraction),
        None => format!("{}${}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_text() {
        assert_eq!(multiplier(2.0), "2.0");
        assert_eq!(multiplier(1.25), "1.25");
        assert_eq!(multiplier(0.9), "0.9");
    }

    #[test]
    fn test_currency_grouping() {
        assert_eq!(currency(0.0, 0), "$0");
        assert_eq!(currency(999.0, 0), "$999");
        assert_eq!(currency(1000.0, 0), "$1,000");
        assert_eq!(currency(250_000.0, 0), "$250,000");
        assert_eq!(currency(1_234_567.891, 2), "$1,234,567.89");
        assert_eq!(currency(-1500.5, 2), "-$1,500.50");
    }
}
