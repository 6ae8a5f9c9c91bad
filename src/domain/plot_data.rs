// Plot data transforms - reshape API arrays into chart series
use serde::Deserialize;
use thiserror::Error;

/// One point of a combined bundle: the i-th value of every series.
pub type Point = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotDataError {
    #[error("input series is empty")]
    EmptyInput,
    #[error("series {series} has length {found}, expected {expected}")]
    ShapeMismatch {
        expected: usize,
        found: usize,
        series: usize,
    },
}

/// Raw offset value as it arrives from a form field or query string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OffsetInput {
    Number(f64),
    Text(String),
}

impl From<f64> for OffsetInput {
    fn from(value: f64) -> Self {
        OffsetInput::Number(value)
    }
}

impl From<i64> for OffsetInput {
    fn from(value: i64) -> Self {
        OffsetInput::Number(value as f64)
    }
}

impl From<&str> for OffsetInput {
    fn from(value: &str) -> Self {
        OffsetInput::Text(value.to_string())
    }
}

impl From<String> for OffsetInput {
    fn from(value: String) -> Self {
        OffsetInput::Text(value)
    }
}

/// Combine parallel series point-wise.
///
/// `combine_series(&[a, b, c])[i] == [a[i], b[i], c[i]]`. Every series must
/// have the length of the first one; a shorter or longer series is rejected
/// with [`PlotDataError::ShapeMismatch`] rather than truncated.
pub fn combine_series(bundle: &[Vec<f64>]) -> Result<Vec<Point>, PlotDataError> {
    let first = bundle.first().ok_or(PlotDataError::EmptyInput)?;
    let expected = first.len();

    if let Some((series, s)) = bundle
        .iter()
        .enumerate()
        .find(|(_, s)| s.len() != expected)
    {
        return Err(PlotDataError::ShapeMismatch {
            expected,
            found: s.len(),
            series,
        });
    }

    Ok((0..expected)
        .map(|i| bundle.iter().map(|s| s[i]).collect())
        .collect())
}

pub fn ratio_to_ppm(series: &[f64]) -> Vec<f64> {
    series.iter().map(|v| v * 1_000_000.0).collect()
}

pub fn meters_to_km(series: &[f64]) -> Vec<f64> {
    series.iter().map(|v| v / 1_000.0).collect()
}

/// Largest `values[i] + errors[i]`, the upper end of the error bars.
pub fn max_with_positive_error(values: &[f64], errors: &[f64]) -> Result<f64, PlotDataError> {
    check_pair(values, errors)?;
    Ok(values
        .iter()
        .zip(errors)
        .map(|(v, e)| v + e)
        .fold(f64::NEG_INFINITY, f64::max))
}

/// Smallest `values[i] - errors[i]`, the lower end of the error bars.
pub fn min_with_negative_error(values: &[f64], errors: &[f64]) -> Result<f64, PlotDataError> {
    check_pair(values, errors)?;
    Ok(values
        .iter()
        .zip(errors)
        .map(|(v, e)| v - e)
        .fold(f64::INFINITY, f64::min))
}

fn check_pair(values: &[f64], errors: &[f64]) -> Result<(), PlotDataError> {
    if values.is_empty() && errors.is_empty() {
        return Err(PlotDataError::EmptyInput);
    }
    if values.len() != errors.len() {
        return Err(PlotDataError::ShapeMismatch {
            expected: values.len(),
            found: errors.len(),
            series: 1,
        });
    }
    Ok(())
}

/// Normalize a pagination offset.
///
/// Returns the offset when it is a whole, non-negative number within the
/// signed 32-bit range; anything else (negative, fractional, unparsable,
/// non-finite) falls back to 0.
pub fn normalize_offset(raw: impl Into<OffsetInput>) -> u32 {
    let value = match raw.into() {
        OffsetInput::Number(n) => n,
        OffsetInput::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) => return 0,
        },
    };

    if value.is_finite() && value.fract() == 0.0 && (0.0..=i32::MAX as f64).contains(&value) {
        value as u32
    } else {
        0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn almost_equal(first: f64, second: f64) -> bool {
        (first - second).abs() <= 1e-9
    }

    fn arrays_almost_equal(first: &[f64], second: &[f64]) -> bool {
        first.len() == second.len() && first.iter().zip(second).all(|(a, b)| almost_equal(*a, *b))
    }

    #[test]
    fn test_almost_equal_tolerance() {
        assert!(almost_equal(1.0, 1.0));
        assert!(almost_equal(0.0, 1e-9));
        assert!(!almost_equal(0.0, 1e-8));
        assert!(arrays_almost_equal(&[1.0, 0.0], &[1.0, 1e-9]));
        assert!(!arrays_almost_equal(&[1.0, 0.0], &[1.0, 1e-8]));
    }

    #[test]
    fn test_ratio_to_ppm() {
        let ppm = ratio_to_ppm(&[0.0, 0.1, 1.0]);
        assert!(arrays_almost_equal(&ppm, &[0.0, 1e5, 1e6]));

        for x in [-3.5e-6, 0.0, 2.25e-7, 42.0] {
            assert_eq!(ratio_to_ppm(&[x])[0], x * 1_000_000.0);
        }
    }

    #[test]
    fn test_meters_to_km() {
        let km = meters_to_km(&[0.0, 100.0, 10000.0]);
        assert!(arrays_almost_equal(&km, &[0.0, 0.1, 10.0]));

        for x in [-250.0, 0.0, 12345.678] {
            assert_eq!(meters_to_km(&[x])[0], x / 1_000.0);
        }
    }

    #[test]
    fn test_meters_to_km_round_trip() {
        let meters = vec![0.0, 17.5, 12500.25, 99999.999];
        let back: Vec<f64> = meters_to_km(&meters).iter().map(|km| km * 1000.0).collect();
        assert!(arrays_almost_equal(&meters, &back));
    }

    #[test]
    fn test_converters_pass_non_finite_through() {
        let ppm = ratio_to_ppm(&[f64::NAN, f64::INFINITY]);
        assert!(ppm[0].is_nan());
        assert_eq!(ppm[1], f64::INFINITY);
        assert!(meters_to_km(&[f64::NAN])[0].is_nan());
    }

    #[test]
    fn test_combine_series() {
        let bundle = vec![
            vec![0.0, 1.0, 2.0],
            vec![3.0, 4.0, 5.0],
            vec![6.0, 7.0, 8.0],
        ];
        let zipped = combine_series(&bundle).unwrap();
        assert_eq!(
            zipped,
            vec![
                vec![0.0, 3.0, 6.0],
                vec![1.0, 4.0, 7.0],
                vec![2.0, 5.0, 8.0],
            ]
        );
    }

    #[test]
    fn test_combine_series_twice_is_identity() {
        let bundle = vec![vec![1.5, -2.0], vec![3.0, 4.0], vec![0.0, 9.0]];
        let twice = combine_series(&combine_series(&bundle).unwrap()).unwrap();
        assert_eq!(twice, bundle);
    }

    #[test]
    fn test_combine_series_rejects_mismatched_lengths() {
        let bundle = vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(
            combine_series(&bundle),
            Err(PlotDataError::ShapeMismatch {
                expected: 3,
                found: 2,
                series: 1
            })
        );
    }

    #[test]
    fn test_combine_series_empty() {
        assert_eq!(combine_series(&[]), Err(PlotDataError::EmptyInput));
        assert_eq!(combine_series(&[vec![], vec![]]), Ok(vec![]));
    }

    #[test]
    fn test_max_with_positive_error() {
        let data = [0.05, 0.0, -0.1];
        let errors = [0.1, 0.2, 0.1];
        assert!(almost_equal(max_with_positive_error(&data, &errors).unwrap(), 0.2));
    }

    #[test]
    fn test_min_with_negative_error() {
        let data = [0.05, 0.0, -0.1];
        let errors = [0.1, 0.2, 0.2];
        assert!(almost_equal(min_with_negative_error(&data, &errors).unwrap(), -0.3));
    }

    #[test]
    fn test_error_bounds_reject_bad_input() {
        assert_eq!(max_with_positive_error(&[], &[]), Err(PlotDataError::EmptyInput));
        assert_eq!(min_with_negative_error(&[], &[]), Err(PlotDataError::EmptyInput));
        assert!(matches!(
            max_with_positive_error(&[1.0, 2.0], &[0.1]),
            Err(PlotDataError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            min_with_negative_error(&[], &[0.1]),
            Err(PlotDataError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_normalize_offset() {
        assert_eq!(normalize_offset(10i64), 10);
        assert_eq!(normalize_offset(-10i64), 0);
        assert_eq!(normalize_offset(10.125), 0);
        assert_eq!(normalize_offset("abc"), 0);
    }

    #[test]
    fn test_normalize_offset_from_form_text() {
        assert_eq!(normalize_offset("2000"), 2000);
        assert_eq!(normalize_offset(" 30 "), 30);
        assert_eq!(normalize_offset("10.0"), 10);
        assert_eq!(normalize_offset("10.5"), 0);
        assert_eq!(normalize_offset("-1"), 0);
        assert_eq!(normalize_offset(""), 0);
        assert_eq!(normalize_offset("NaN"), 0);
        assert_eq!(normalize_offset(f64::INFINITY), 0);
        assert_eq!(normalize_offset(3.0e9), 0);
    }

    #[test]
    fn test_offset_input_deserializes_number_or_string() {
        let n: OffsetInput = serde_json::from_str("12").unwrap();
        let s: OffsetInput = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(normalize_offset(n), 12);
        assert_eq!(normalize_offset(s), 12);
    }
}
