use energy_client::domain::{Point, TimeSeries};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

/// Side of the limit a line piece lies on. Values equal to the limit are `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Normal,
    Above,
}

impl Band {
    pub fn classify(value: f64, limit: f64) -> Self {
        if value > limit {
            Self::Above
        } else {
            Self::Normal
        }
    }
}

/// A contiguous line piece drawn in one colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub band: Band,
    pub points: Vec<Point>,
}

/// Time at which the straight line from `(t0, v0)` to `(t1, v1)` reaches `limit`.
///
/// Callers guarantee `v0 != v1`.
pub fn crossing_time(t0: OffsetDateTime, v0: f64, t1: OffsetDateTime, v1: f64, limit: f64) -> OffsetDateTime {
    if v0 == limit {
        return t0;
    }
    if v1 == limit {
        return t1;
    }
    let frac = (limit - v0) / (v1 - v0);
    let span = t1 - t0;
    t0 + Duration::seconds_f64(span.as_seconds_f64() * frac)
}

/// Split `series` into `Normal`/`Above` pieces around `limit`.
///
/// Where consecutive samples fall on different sides, the exact crossing
/// point `(t_cross, limit)` ends one piece and starts the next, so pieces join
/// without a visible step. Non-finite samples (NaN, ±inf) break the line:
/// pieces never span them, and a sample with no finite neighbour is dropped.
pub fn segment(series: &TimeSeries, limit: f64) -> Vec<Segment> {
    let samples: Vec<(OffsetDateTime, f64)> = series.iter().collect();
    let mut closed: Vec<Segment> = Vec::new();
    let mut open: Option<Segment> = None;

    for pair in samples.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];

        if !v0.is_finite() || !v1.is_finite() {
            close(&mut closed, open.take());
            continue;
        }

        let mut current = open.take().unwrap_or_else(|| Segment {
            band: Band::classify(v0, limit),
            points: vec![Point::new(t0, v0)],
        });
        let next = Point::new(t1, v1);
        let next_band = Band::classify(v1, limit);

        if next_band == current.band {
            current.points.push(next);
            open = Some(current);
            continue;
        }

        let cross = Point::new(crossing_time(t0, v0, t1, v1, limit), limit);
        if current.points.last() != Some(&cross) {
            current.points.push(cross);
        }

        // A lone point sitting on the limit between two runs of the same band
        // is a touch, not a crossing: resume the previous piece.
        let reopened = if current.points.len() < 2 {
            let resumable = closed
                .last()
                .is_some_and(|prev| prev.band == next_band && prev.points.last() == Some(&cross));
            if resumable {
                closed.pop()
            } else {
                None
            }
        } else {
            closed.push(current);
            None
        };

        let mut fresh = reopened.unwrap_or_else(|| Segment {
            band: next_band,
            points: vec![cross],
        });
        if fresh.points.last() != Some(&next) {
            fresh.points.push(next);
        }
        open = Some(fresh);
    }

    close(&mut closed, open);
    closed
}

fn close(closed: &mut Vec<Segment>, segment: Option<Segment>) {
    if let Some(segment) = segment {
        if segment.points.len() >= 2 {
            closed.push(segment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const LIMIT_X1: f64 = 0.4843;

    fn hourly(values: &[f64]) -> TimeSeries {
        let start = datetime!(2024-11-04 00:00:00 UTC);
        TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::hours(i as i64), *v)),
        )
    }

    fn assert_close(a: OffsetDateTime, b: OffsetDateTime) {
        assert!((a - b).abs() < Duration::milliseconds(1), "{a} != {b}");
    }

    #[test]
    fn up_and_down_crossing_gives_three_pieces() {
        let s = hourly(&[0.2, 0.6, 0.3]);
        let t0 = s.index()[0];
        let t1 = s.index()[1];
        let t2 = s.index()[2];

        let segs = segment(&s, LIMIT_X1);

        assert_eq!(segs.len(), 3);
        assert_eq!(
            segs.iter().map(|s| s.band).collect::<Vec<_>>(),
            vec![Band::Normal, Band::Above, Band::Normal]
        );

        let up = t0 + Duration::seconds_f64(3600.0 * (LIMIT_X1 - 0.2) / 0.4);
        let down = t1 + Duration::seconds_f64(3600.0 * (LIMIT_X1 - 0.6) / -0.3);

        assert_eq!(segs[0].points.len(), 2);
        assert_eq!(segs[0].points[0], Point::new(t0, 0.2));
        assert_close(segs[0].points[1].ts, up);
        assert_eq!(segs[0].points[1].value, LIMIT_X1);

        assert_eq!(segs[1].points.len(), 3);
        assert_eq!(segs[1].points[0], segs[0].points[1]);
        assert_eq!(segs[1].points[1], Point::new(t1, 0.6));
        assert_close(segs[1].points[2].ts, down);

        assert_eq!(segs[2].points[0], segs[1].points[2]);
        assert_eq!(segs[2].points[1], Point::new(t2, 0.3));
    }

    #[test]
    fn value_on_the_limit_is_normal() {
        assert_eq!(Band::classify(LIMIT_X1, LIMIT_X1), Band::Normal);
        let segs = segment(&hourly(&[LIMIT_X1, LIMIT_X1]), LIMIT_X1);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].band, Band::Normal);
    }

    #[test]
    fn touching_from_below_does_not_split() {
        let segs = segment(&hourly(&[0.2, LIMIT_X1, 0.3]), LIMIT_X1);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].points.len(), 3);
    }

    #[test]
    fn touching_from_above_stays_one_piece() {
        let segs = segment(&hourly(&[0.6, LIMIT_X1, 0.7]), LIMIT_X1);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].band, Band::Above);
        assert_eq!(
            segs[0].points.iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![0.6, LIMIT_X1, 0.7]
        );
    }

    #[test]
    fn leaving_the_limit_upward_adds_no_extra_point() {
        let s = hourly(&[0.2, LIMIT_X1, 0.9]);
        let segs = segment(&s, LIMIT_X1);

        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].band, Band::Normal);
        assert_eq!(segs[0].points.len(), 2);
        assert_eq!(segs[1].band, Band::Above);
        assert_eq!(segs[1].points[0], Point::new(s.index()[1], LIMIT_X1));
        assert_eq!(segs[1].points.len(), 2);
    }

    #[test]
    fn nan_closes_the_piece_without_interpolation() {
        let segs = segment(&hourly(&[0.2, 0.3, f64::NAN, 0.6, 0.7]), LIMIT_X1);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].band, Band::Normal);
        assert_eq!(segs[0].points.len(), 2);
        assert_eq!(segs[1].band, Band::Above);
        assert_eq!(segs[1].points.len(), 2);
    }

    #[test]
    fn isolated_samples_and_infinities_are_gaps() {
        let segs = segment(&hourly(&[0.2, f64::NAN, 0.3, f64::INFINITY, 0.6]), LIMIT_X1);
        assert!(segs.is_empty());
        assert!(segment(&hourly(&[0.9]), LIMIT_X1).is_empty());
        assert!(segment(&TimeSeries::default(), LIMIT_X1).is_empty());
    }
}
