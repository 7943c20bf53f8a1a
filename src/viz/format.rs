// src/viz/format.rs

// Shared display formatting. Every panel that shows a raw number goes
// through these, so KPI cards, tooltips, and axes agree.

pub fn format_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        group_thousands(value)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

// Thousands grouping for the sub-1K (and negative) cases format_number does
// not scale down.
fn group_thousands(value: f64) -> String {
    let text = format!("{}", value);
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rest, None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millions_scale_with_one_decimal() {
        assert_eq!(format_number(1_500_000.0), "1.5M");
        assert_eq!(format_number(1_000_000.0), "1.0M");
        assert_eq!(format_number(12_345_678.0), "12.3M");
    }

    #[test]
    fn thousands_scale_with_one_decimal() {
        assert_eq!(format_number(2_300.0), "2.3K");
        assert_eq!(format_number(1_000.0), "1.0K");
        assert_eq!(format_number(999_999.0), "1000.0K");
    }

    #[test]
    fn small_values_keep_grouping() {
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-12345.0), "-12,345");
        assert_eq!(format_number(999.5), "999.5");
    }

    #[test]
    fn percent_renders_one_decimal() {
        assert_eq!(format_percent(61.42), "61.4%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
    }
}
