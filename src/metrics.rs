use std::time::Duration;

/// Percentage of typed characters that match the target at the same position,
/// floored. Measured against what has been typed so far, not the full target.
pub fn accuracy(typed: &str, target: &str) -> u32 {
    let typed_len = typed.chars().count();

    match typed_len {
        0 => 0,
        len => {
            let matching = typed
                .chars()
                .zip(target.chars())
                .filter(|(t, e)| t == e)
                .count();

            (matching * 100 / len) as u32
        }
    }
}

/// Number of pieces the text splits into on single spaces.
///
/// Repeated and trailing spaces each add a piece, so `"a  b "` counts as four.
pub fn word_count(typed: &str) -> usize {
    typed.split(' ').count()
}

pub fn words_per_minute(typed: &str, elapsed: Duration) -> u32 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }

    ((word_count(typed) as f64 / secs) * 60.0).round() as u32
}
