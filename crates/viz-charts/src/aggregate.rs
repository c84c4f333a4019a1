//! Calendar-day aggregation of fine-grained OHLCV samples.
//!
//! Minute and hour granularities carry too many samples to give each its
//! own slot, so they are folded into one OHLCV point per UTC calendar day
//! before scales and statistics run. Day and week granularities pass
//! through untouched.

use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use viz_core::{AggregatedPoint, Granularity, Sample};

/// UTC calendar date of a millisecond timestamp. Out-of-range timestamps
/// collapse to the epoch day rather than failing the render.
fn day_of(timestamp_ms: i64) -> NaiveDate {
    DateTime::from_timestamp_millis(timestamp_ms)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .date_naive()
}

/// Millisecond timestamp of a date's midnight (start of day, UTC).
fn day_start_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Fold one day's samples into a single OHLCV point. The group is sorted
/// by time first so open/close come from the true first/last samples.
fn fold_day(date: NaiveDate, mut group: Vec<Sample>) -> AggregatedPoint {
    group.sort_by_key(|s| s.t);

    let first = group[0];
    let last = group[group.len() - 1];

    let mut high = f64::MIN;
    let mut low = f64::MAX;
    let mut volume = 0.0;
    for s in &group {
        high = high.max(s.h);
        low = low.min(s.l);
        volume += s.v;
    }

    AggregatedPoint {
        sample: Sample {
            t: day_start_ms(date),
            o: first.o,
            h: high,
            l: low,
            c: last.c,
            v: volume,
        },
        data_points: group.len(),
    }
}

/// Bucket `samples` into displayable points.
///
/// For minute/hour granularity, groups by UTC calendar day and folds each
/// group (open = day's first open, close = day's last close, high/low =
/// day extremes, volume summed); output ascends by day. Every other
/// granularity is the identity, each sample wrapped with
/// `data_points = 1` in its original order. Empty in, empty out.
pub fn aggregate(samples: &[Sample], granularity: Granularity) -> Vec<AggregatedPoint> {
    if !granularity.buckets_to_day() {
        return samples.iter().copied().map(AggregatedPoint::single).collect();
    }

    let mut days: BTreeMap<NaiveDate, Vec<Sample>> = BTreeMap::new();
    for s in samples {
        days.entry(day_of(s.t)).or_default().push(*s);
    }

    // BTreeMap iteration gives ascending day order for free
    days.into_iter()
        .map(|(date, group)| fold_day(date, group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;
    const HOUR: i64 = 3_600_000;

    fn s(t: i64, o: f64, h: f64, l: f64, c: f64, v: f64) -> Sample {
        Sample::new(t, o, h, l, c, v)
    }

    #[test]
    fn test_identity_for_day_granularity() {
        let samples = vec![
            s(2 * DAY, 5.0, 6.0, 4.0, 5.5, 100.0),
            s(DAY, 1.0, 2.0, 0.5, 1.5, 200.0),
        ];
        let out = aggregate(&samples, Granularity::Day);

        assert_eq!(out.len(), 2);
        // order preserved, nothing folded
        assert_eq!(out[0].t(), 2 * DAY);
        assert_eq!(out[1].t(), DAY);
        assert!(out.iter().all(|p| p.data_points == 1));
        assert_eq!(out[0].sample, samples[0]);
    }

    #[test]
    fn test_hourly_folds_by_day() {
        // two days of hourly samples, deliberately out of order
        let samples = vec![
            s(DAY + 3 * HOUR, 20.0, 25.0, 19.0, 24.0, 10.0),
            s(5 * HOUR, 11.0, 14.0, 10.0, 12.0, 30.0),
            s(DAY + HOUR, 18.0, 21.0, 17.0, 20.0, 40.0),
            s(2 * HOUR, 10.0, 12.0, 9.0, 11.0, 20.0),
        ];
        let out = aggregate(&samples, Granularity::Hour);

        assert_eq!(out.len(), 2);

        // day one: first sample at 02:00, last at 05:00
        let d0 = &out[0];
        assert_eq!(d0.t(), 0);
        assert_eq!(d0.sample.o, 10.0);
        assert_eq!(d0.sample.c, 12.0);
        assert_eq!(d0.sample.h, 14.0);
        assert_eq!(d0.sample.l, 9.0);
        assert_eq!(d0.sample.v, 50.0);
        assert_eq!(d0.data_points, 2);

        // day two starts at its midnight
        let d1 = &out[1];
        assert_eq!(d1.t(), DAY);
        assert_eq!(d1.sample.o, 18.0);
        assert_eq!(d1.sample.c, 24.0);
        assert_eq!(d1.data_points, 2);
    }

    #[test]
    fn test_volume_conserved_per_day() {
        let samples: Vec<Sample> = (0..48)
            .map(|i| s(i * HOUR, 1.0, 2.0, 0.5, 1.5, (i + 1) as f64))
            .collect();
        let out = aggregate(&samples, Granularity::Minute);

        let raw_total: f64 = samples.iter().map(|x| x.v).sum();
        let agg_total: f64 = out.iter().map(|p| p.volume()).sum();
        assert_eq!(raw_total, agg_total);

        // day one holds hours 0..=23 -> volumes 1..=24
        assert_eq!(out[0].sample.v, (1..=24).sum::<i64>() as f64);
        assert_eq!(out[0].data_points, 24);
    }

    #[test]
    fn test_output_sorted_ascending() {
        let samples = vec![
            s(3 * DAY + HOUR, 1.0, 1.0, 1.0, 1.0, 1.0),
            s(HOUR, 1.0, 1.0, 1.0, 1.0, 1.0),
            s(DAY + HOUR, 1.0, 1.0, 1.0, 1.0, 1.0),
        ];
        let out = aggregate(&samples, Granularity::Hour);

        let times: Vec<i64> = out.iter().map(|p| p.t()).collect();
        assert_eq!(times, vec![0, DAY, 3 * DAY]);
    }

    #[test]
    fn test_empty_dataset() {
        assert!(aggregate(&[], Granularity::Minute).is_empty());
        assert!(aggregate(&[], Granularity::Week).is_empty());
    }
}
