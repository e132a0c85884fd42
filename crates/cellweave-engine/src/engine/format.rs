/// Format a number for display.
///
/// Uses the shortest representation that round-trips, so integral values
/// print without a fractional part (`8`, not `8.0`).
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoid printing "-0".
        "0".to_string()
    } else {
        format!("{}", n)
    }
}
