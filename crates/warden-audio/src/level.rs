//! Cheap level measurements used for log lines and telemetry.

/// Largest absolute sample value in the window.
pub fn peak_magnitude(window: &[i16]) -> i32 {
    window.iter().map(|&s| (s as i32).abs()).max().unwrap_or(0)
}

/// RMS level in dBFS, where 0 dBFS is the i16 full-scale amplitude.
pub fn rms_dbfs(window: &[i16]) -> f32 {
    if window.is_empty() {
        return -96.0;
    }
    let sum_sq = window.iter().map(|&s| (s as f64).powi(2)).sum::<f64>();
    let rms = (sum_sq / window.len() as f64).sqrt();
    if rms == 0.0 {
        return -96.0;
    }
    20.0 * (rms / i16::MAX as f64).log10() as f32
}
