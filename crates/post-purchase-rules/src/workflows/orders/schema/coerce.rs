pub(crate) const BOOLEAN: &str = "a boolean (0, 1, true, false)";
pub(crate) const AMOUNT: &str = "a non-negative number";
pub(crate) const COUNT: &str = "a non-negative integer";

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        // folds -0.0 into 0.0
        Some(value.abs())
    } else {
        None
    }
}

/// Counts accept integral decimals such as `2.0`, which spreadsheet exports produce.
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return Some(value);
    }

    let value = parse_amount(trimmed)?;
    if value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}
