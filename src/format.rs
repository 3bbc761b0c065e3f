//! Metric value formatting
//!
//! Raw measure values arrive as strings; these helpers render them the way
//! each metric type is meant to be read. Values that don't parse are returned
//! unchanged.

use crate::models::MetricType;

/// Hours in a work day, used for technical debt durations
const HOURS_PER_DAY: u64 = 8;

/// Format a raw measure value for display
pub fn format_measure(value: &str, metric_type: MetricType) -> String {
    match metric_type {
        MetricType::Int => format_int(value),
        MetricType::Float => format_decimal(value, ""),
        MetricType::Percent => format_decimal(value, "%"),
        MetricType::Rating => format_rating(value),
        MetricType::WorkDur => format_work_duration(value),
        MetricType::Millisec => format_millis(value),
        MetricType::Level => format_level(value),
        MetricType::Bool => match value {
            "true" => "Yes".to_string(),
            "false" => "No".to_string(),
            _ => value.to_string(),
        },
        MetricType::Data | MetricType::String => value.to_string(),
    }
}

/// Integer with thousands separators (e.g., 12345 -> "12,345")
pub fn format_int(value: &str) -> String {
    let Ok(n) = value.parse::<i64>() else {
        return value.to_string();
    };
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 { format!("-{out}") } else { out }
}

fn format_decimal(value: &str, suffix: &str) -> String {
    match value.parse::<f64>() {
        Ok(n) => format!("{n:.1}{suffix}"),
        Err(_) => value.to_string(),
    }
}

/// Rating 1..=5 as a letter grade A..=E
pub fn format_rating(value: &str) -> String {
    let grade = value
        .parse::<f64>()
        .ok()
        .map(|n| n.round() as i64)
        .filter(|n| (1..=5).contains(n));
    match grade {
        Some(n) => char::from(b'A' + (n - 1) as u8).to_string(),
        None => value.to_string(),
    }
}

/// Work duration in minutes as days/hours/minutes (8h work days)
pub fn format_work_duration(value: &str) -> String {
    let Ok(minutes) = value.parse::<i64>() else {
        return value.to_string();
    };
    if minutes == 0 {
        return "0".to_string();
    }
    let sign = if minutes < 0 { "-" } else { "" };
    let total = minutes.unsigned_abs();
    let days = total / (HOURS_PER_DAY * 60);
    let hours = (total % (HOURS_PER_DAY * 60)) / 60;
    let mins = total % 60;

    let body = if days > 0 {
        if hours > 0 {
            format!("{days}d {hours}h")
        } else {
            format!("{days}d")
        }
    } else if hours > 0 {
        if mins > 0 {
            format!("{hours}h {mins}min")
        } else {
            format!("{hours}h")
        }
    } else {
        format!("{mins}min")
    };
    format!("{sign}{body}")
}

fn format_millis(value: &str) -> String {
    match value.parse::<i64>() {
        Ok(ms) if ms.unsigned_abs() < 1000 => format!("{ms}ms"),
        Ok(ms) => format!("{:.1}s", ms as f64 / 1000.0),
        Err(_) => value.to_string(),
    }
}

fn format_level(value: &str) -> String {
    match value {
        "OK" => "Passed",
        "ERROR" => "Failed",
        "WARN" => "Warning",
        other => other,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_int() {
        assert_eq!(format_int("0"), "0");
        assert_eq!(format_int("999"), "999");
        assert_eq!(format_int("1000"), "1,000");
        assert_eq!(format_int("1234567"), "1,234,567");
        assert_eq!(format_int("-12345"), "-12,345");
        assert_eq!(format_int("n/a"), "n/a");
    }

    #[test]
    fn test_format_percent_and_float() {
        assert_eq!(format_measure("87.54", MetricType::Percent), "87.5%");
        assert_eq!(format_measure("100", MetricType::Percent), "100.0%");
        assert_eq!(format_measure("3.14159", MetricType::Float), "3.1");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating("1.0"), "A");
        assert_eq!(format_rating("3"), "C");
        assert_eq!(format_rating("5.0"), "E");
        assert_eq!(format_rating("9"), "9");
    }

    #[test]
    fn test_format_work_duration() {
        assert_eq!(format_work_duration("0"), "0");
        assert_eq!(format_work_duration("5"), "5min");
        assert_eq!(format_work_duration("60"), "1h");
        assert_eq!(format_work_duration("95"), "1h 35min");
        assert_eq!(format_work_duration("480"), "1d");
        assert_eq!(format_work_duration("600"), "1d 2h");
        assert_eq!(format_work_duration("-30"), "-30min");
    }

    #[test]
    fn test_most_negative_values_do_not_overflow() {
        let min = i64::MIN.to_string();
        assert_eq!(
            format_measure(&min, MetricType::WorkDur),
            "-19215358410114116d 2h"
        );
        let millis = format_measure(&min, MetricType::Millisec);
        assert!(millis.starts_with("-922337203685477") && millis.ends_with('s'));
        assert_eq!(format_measure("-999", MetricType::Millisec), "-999ms");
    }

    #[test]
    fn test_format_misc_types() {
        assert_eq!(format_measure("250", MetricType::Millisec), "250ms");
        assert_eq!(format_measure("2500", MetricType::Millisec), "2.5s");
        assert_eq!(format_measure("OK", MetricType::Level), "Passed");
        assert_eq!(format_measure("ERROR", MetricType::Level), "Failed");
        assert_eq!(format_measure("true", MetricType::Bool), "Yes");
        assert_eq!(format_measure("java", MetricType::String), "java");
    }
}
