/// Formats a duration as `HH:MM:SS`, or `HH:MM:SS:cc` with hundredths.
///
/// Negative durations render as zero. Hours are not wrapped, so a 100 hour
/// run shows as `100:00:00`.
pub fn format_stopwatch(millis: i64, include_centis: bool) -> String {
    let millis = millis.max(0);

    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1000) % 60;

    if include_centis {
        let centis = (millis % 1000) / 10;
        format!("{hours:02}:{minutes:02}:{seconds:02}:{centis:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}
