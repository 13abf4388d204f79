//! Peak detection
//!
//! Finds the local maxima of a score series. Each local maximum is taken as
//! one attempt at a phase; the aggregator decides which attempts count.

use crate::error::ScoringError;

/// Local maxima of `series`, in encounter order.
///
/// - The first sample is a peak if it is `>=` its successor.
/// - The last sample is a peak if it is `>=` its predecessor.
/// - An interior sample is a peak if it is the maximum of its
///   `(previous, current, next)` window and strictly greater than `next`.
///   A plateau is therefore reported once, at its last sample.
///
/// A single-sample series is its own peak. An empty series is an error.
pub fn local_maxima(series: &[f64]) -> Result<Vec<f64>, ScoringError> {
    match series {
        [] => Err(ScoringError::EmptySeries),
        [only] => Ok(vec![*only]),
        _ => {
            let last = series.len() - 1;
            let mut peaks = Vec::new();

            if series[0] >= series[1] {
                peaks.push(series[0]);
            }

            for window in series.windows(3) {
                let (previous, current, next) = (window[0], window[1], window[2]);
                if current >= previous && current > next {
                    peaks.push(current);
                }
            }

            if series[last] >= series[last - 1] {
                peaks.push(series[last]);
            }

            Ok(peaks)
        }
    }
}
