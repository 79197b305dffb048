use std::str::FromStr;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse an optional raw value into `T`. Returns `None` when the value is absent, and `Some(Err)` with the raw string
/// when it could not be parsed, so callers can log what was rejected before falling back to a default.
pub fn parse_env_value<T: FromStr>(value: Option<String>) -> Option<Result<T, String>> {
    value.map(|v| v.trim().parse::<T>().map_err(|_| v))
}
