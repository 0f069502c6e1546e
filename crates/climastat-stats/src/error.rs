/// Reasons a statistical procedure refuses its input.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("value {value} at index {index} is not a finite number")]
    InvalidSample { index: usize, value: f64 },
    #[display("at least {required} observations are required, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[display("at most {limit} observations are supported, got {actual}")]
    TooManyObservations { limit: usize, actual: usize },
    #[display("inputs must have matching lengths ({expected} != {actual})")]
    LengthMismatch { expected: usize, actual: usize },
    #[display("degenerate input: {reason}")]
    Degenerate { reason: &'static str },
}

/// Rejects non-finite values first, then samples shorter than `min_len`.
///
/// ```
/// use climastat_stats::{StatsError, check_sample};
///
/// assert!(check_sample(&[1.0, 2.0, 3.0], 3).is_ok());
/// assert_eq!(
///     check_sample(&[], 3),
///     Err(StatsError::InsufficientData { required: 3, actual: 0 })
/// );
/// assert!(matches!(
///     check_sample(&[1.0, f64::NAN], 3),
///     Err(StatsError::InvalidSample { index: 1, .. })
/// ));
/// ```
pub fn check_sample(values: &[f64], min_len: usize) -> Result<(), StatsError> {
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(StatsError::InvalidSample { index, value });
    }
    if values.len() < min_len {
        return Err(StatsError::InsufficientData {
            required: min_len,
            actual: values.len(),
        });
    }
    Ok(())
}
