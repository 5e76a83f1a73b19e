//! Numeric reading of a record's `value` for the overview bars.
//!
//! The core stores `value` as text and never interprets it; this is a
//! display helper only.

/// `value` as a bar fill percentage in `[0, 100]`. Anything that does not
/// parse as a finite number reads as 0.
pub fn percent(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n.clamp(0.0, 100.0),
        _ => 0.0,
    }
}
