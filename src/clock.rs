/// Renders a remaining-seconds count as `MM:SS`.
///
/// Minutes are not clamped to 59, so long sessions keep growing the minute
/// field (`6000` seconds renders as `100:00`).
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
