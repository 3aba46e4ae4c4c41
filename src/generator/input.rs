//! Validation of user supplied numbers: known values, sampling ranges and rounding digits.
//! An unparseable value is always an error, never silently replaced by a default.
use crate::generator::errors::{Result, TaskGenError};

fn parse_number(name: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TaskGenError::InvalidNumericInput {
            name: name.to_string(),
            text: trimmed.to_string(),
        }),
    }
}

/// Known value of `name`; empty text means the variable is not known.
pub fn parse_known_value(name: &str, text: &str) -> Result<Option<f64>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_number(name, text).map(Some)
}

/// Inclusive range written as `"min,max"`.
pub fn parse_range(name: &str, text: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 2 {
        return Err(TaskGenError::InvalidRange {
            name: name.to_string(),
            text: text.trim().to_string(),
            reason: "expected two numbers 'min,max'".to_string(),
        });
    }
    let low = parse_number(name, parts[0])?;
    let high = parse_number(name, parts[1])?;
    check_range(name, low, high)?;
    Ok((low, high))
}

/// Bounds must be finite, ordered, and not so far apart that their distance overflows.
pub fn check_range(name: &str, low: f64, high: f64) -> Result<()> {
    let reason = if !low.is_finite() || !high.is_finite() {
        "bounds must be finite numbers"
    } else if low > high {
        "lower bound exceeds upper bound"
    } else if !(high - low).is_finite() {
        "range is too wide"
    } else {
        return Ok(());
    };
    Err(TaskGenError::InvalidRange {
        name: name.to_string(),
        text: format!("{},{}", low, high),
        reason: reason.to_string(),
    })
}

/// Number of decimal digits, a non-negative integer.
pub fn parse_precision(name: &str, text: &str) -> Result<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|digits| *digits <= 15)
        .ok_or_else(|| TaskGenError::InvalidNumericInput {
            name: name.to_string(),
            text: text.trim().to_string(),
        })
}
