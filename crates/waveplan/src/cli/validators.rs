//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate a phase number.
///
/// Phases are non-negative integers; `0` is a valid phase (setup phases are
/// commonly numbered zero).
pub fn validate_phase(s: &str) -> Result<u32, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Phase cannot be empty".to_string());
    }

    s.parse::<u32>().map_err(|_| {
        format!("Invalid phase '{s}'. Expected a non-negative integer such as 1 or 12")
    })
}

/// Validate the minutes assumed per task.
pub fn validate_minutes(s: &str) -> Result<u32, String> {
    let minutes: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number of minutes '{}'", s.trim()))?;

    if minutes == 0 {
        return Err("Minutes per task must be at least 1".to_string());
    }

    Ok(minutes)
}
