use chrono::NaiveTime;

/// Minutes the punch interval `[punch_in, punch_out]` shares with
/// `[window_start, window_end]`. Never negative.
///
/// The same calculation serves both the shift's paid span and every break
/// span. Seconds are kept, so the result can be fractional.
pub fn overlap_minutes(
    punch_in: NaiveTime,
    punch_out: NaiveTime,
    window_start: NaiveTime,
    window_end: NaiveTime,
) -> f64 {
    if punch_out <= punch_in {
        return 0.0;
    }

    let start = punch_in.max(window_start);
    let end = punch_out.min(window_end);
    if end <= start {
        return 0.0;
    }

    (end - start).num_seconds() as f64 / 60.0
}
