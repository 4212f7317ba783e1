//! Parsing of human-written token lifetimes such as `15m` or `168h`

use std::time::Duration;

/// Parse a duration string into a [`Duration`].
///
/// Accepts a bare number of seconds (`900`) or a sequence of number/unit
/// pairs using `s`, `m`, `h` and `d` (`15m`, `1h30m`, `7d`).
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    let mut total: u64 = 0;
    let mut digits = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let multiplier = match ch {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            _ => return Err(format!("invalid duration unit '{}' in '{}'", ch, input)),
        };

        if digits.is_empty() {
            return Err(format!("missing number before '{}' in '{}'", ch, input));
        }

        let value: u64 = digits
            .parse()
            .map_err(|e| format!("invalid duration '{}': {}", input, e))?;
        total = value
            .checked_mul(multiplier)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| format!("duration '{}' overflows", input))?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(format!("trailing number without unit in '{}'", input));
    }

    Ok(Duration::from_secs(total))
}

/// Read a duration from an environment variable, falling back to `default`
/// when the variable is unset or unparsable.
pub fn duration_from_env(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|value| parse_duration(&value).ok())
        .unwrap_or(default)
}
