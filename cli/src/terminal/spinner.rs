use std::time::Duration;

use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Turns `span` into a bar counting `total` devices.
///
/// The span must carry `indicatif.pb_show` to be rendered.
pub fn device_progress(span: &Span, total: u64, verb: &str) {
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.blue} {msg} [{bar:30.green/bright_black}] {pos}/{len} ({elapsed})",
    ) {
        span.pb_set_style(&style.tick_strings(TICK_STRINGS).progress_chars("━╸ "));
    }
    span.pb_set_length(total);
    span.pb_set_message(verb);
    span.pb_start();
}

/// Advances the bar by one device and names the last one finished.
pub fn device_done(span: &Span, label: &str) {
    span.pb_inc(1);
    span.pb_set_message(label);
}

pub fn finished_in(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
