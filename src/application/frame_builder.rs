// Result reconciler - Validates retrieval shapes and builds one frame per point
use crate::domain::error::{FetchError, FetchErrors};
use crate::domain::frame::{Field, FieldValues, Frame};
use crate::domain::point::{PointValue, RetrievalOutcome};

const TIME_FIELD: &str = "time";

/// Turn one retrieval result into frames for the requested ids.
///
/// Per-point problems never stop the loop: every id that has usable data gets a frame,
/// and every problem found is returned in `FetchErrors`. A transport failure yields no
/// frames at all.
pub fn build_frames(
    ref_id: &str,
    point_ids: &[String],
    fetched: anyhow::Result<RetrievalOutcome>,
) -> (Vec<Frame>, FetchErrors) {
    let mut errors = FetchErrors::new();

    let outcome = match fetched {
        Ok(outcome) => outcome,
        Err(e) => {
            errors.push(FetchError::Transport(e));
            return (Vec::new(), errors);
        }
    };

    if let Some(fiap_error) = outcome.fiap_error {
        errors.push(FetchError::FiapDomain {
            kind: fiap_error.kind,
            detail: fiap_error.detail,
        });
    }

    let mut frames = Vec::with_capacity(point_ids.len());
    for point_id in point_ids {
        let is_point_set = outcome.point_sets.contains_key(point_id);
        if is_point_set {
            errors.push(FetchError::ProvidesPointSets(point_id.clone()));
        }

        let Some(values) = outcome.points.get(point_id) else {
            errors.push(FetchError::MissingPointData(point_id.clone()));
            continue;
        };
        if is_point_set {
            continue;
        }

        frames.push(point_frame(ref_id, point_id, values));
    }

    (frames, errors)
}

fn point_frame(ref_id: &str, point_id: &str, values: &[PointValue]) -> Frame {
    let times = values.iter().map(|v| v.time).collect();
    let column = match float_column(values) {
        Some(numbers) => FieldValues::Number(numbers),
        None => {
            tracing::debug!("Point {} has non-numeric values, using string column", point_id);
            FieldValues::Text(values.iter().map(|v| v.value.clone()).collect())
        }
    };

    Frame::new(
        format!("{}:{}", ref_id, point_id),
        vec![
            Field::new(TIME_FIELD, FieldValues::Time(times)),
            Field::new(point_id, column),
        ],
    )
}

/// All values as `f64`, or `None` if the sequence is empty or any value is not a number.
fn float_column(values: &[PointValue]) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }
    values.iter().map(|v| parse_float(&v.value)).collect()
}

/// A finite literal that overflows `f64` is not a number; only a spelled-out infinity is.
fn parse_float(raw: &str) -> Option<f64> {
    let value = raw.parse::<f64>().ok()?;
    if value.is_infinite() {
        let unsigned = raw.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if unsigned != "inf" && unsigned != "infinity" {
            return None;
        }
    }
    Some(value)
}
