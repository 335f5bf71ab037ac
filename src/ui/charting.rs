use crate::time_series::History;

/// X (seconds) and Y (wpm) upper bounds for the results chart.
pub fn compute_chart_params(history: &History) -> (f64, f64) {
    let highest_wpm = history
        .points()
        .iter()
        .map(|p| p.wpm.max(p.raw_wpm))
        .max()
        .unwrap_or(0) as f64;

    let overall_duration = history
        .last()
        .map_or(1.0, |p| p.at_second as f64)
        .max(1.0);

    (overall_duration, highest_wpm.max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
