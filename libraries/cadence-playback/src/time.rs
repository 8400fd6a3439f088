//! Clock formatting for elapsed and total time

/// Format seconds as `MM:SS`
///
/// Minutes wrap at the hour, so 3725 seconds renders as `02:05`. Values that are not
/// finite or are negative render as `00:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "00:00".to_string();
    }

    let whole = secs.floor() as u64;
    let minutes = (whole / 60) % 60;
    let seconds = whole % 60;
    format!("{minutes:02}:{seconds:02}")
}
