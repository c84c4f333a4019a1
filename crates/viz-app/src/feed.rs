//! Built-in demo feed.
//!
//! Synthesizes deterministic OHLCV series per asset and period so the
//! visualizer runs without a market-data backend. The waveform is seeded
//! from the ticker, so every asset gets its own recognizable shape and
//! reloading the same selection reproduces it exactly.

use chrono::NaiveDate;
use viz_core::{Granularity, OhlcvSeries, Sample, MAX_SAMPLES};
use viz_state::Asset;

const MS_PER_SEC: i64 = 1_000;

fn step_seconds(granularity: Granularity) -> i64 {
    match granularity {
        Granularity::Minute => 60,
        Granularity::Hour => 3_600,
        Granularity::Day => 86_400,
        Granularity::Week => 604_800,
    }
}

fn base_price(asset: Asset) -> f64 {
    match asset {
        Asset::Aapl => 190.0,
        Asset::Msft => 410.0,
        Asset::Tsla => 240.0,
        Asset::Baba => 85.0,
        Asset::Qqq => 440.0,
        Asset::None => 100.0,
    }
}

/// Cheap integer hash, folded into [0, 1). Keeps the waveform jittery
/// without pulling a PRNG into the wasm bundle.
fn jitter(seed: u64) -> f64 {
    let mut x = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 29;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 32;
    (x % 10_000) as f64 / 10_000.0
}

fn seed_of(asset: Asset) -> u64 {
    asset
        .ticker()
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// Build the series for one selection. Sample count is clamped to the
/// upstream cap so the truncation notice behaves like the real feed.
pub fn demo_series(
    asset: Asset,
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
) -> OhlcvSeries {
    let step = step_seconds(granularity);
    let start_secs = start
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0);
    let end_secs = end
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(start_secs);

    if end_secs < start_secs {
        return OhlcvSeries::default();
    }

    let span = (end_secs - start_secs) / step + 1;
    let count = usize::try_from(span).unwrap_or(0).min(MAX_SAMPLES);

    let seed = seed_of(asset);
    let base = base_price(asset);
    let mut samples = Vec::with_capacity(count);

    for i in 0..count {
        let t_secs = start_secs + i as i64 * step;
        let phase = i as f64;

        // Slow drift plus a faster oscillation plus hashed noise.
        let drift = (phase / 37.0).sin() * 0.08;
        let wave = (phase / 7.0 + seed as f64 % 10.0).sin() * 0.03;
        let noise = (jitter(seed.wrapping_add(i as u64)) - 0.5) * 0.02;

        let close = base * (1.0 + drift + wave + noise);
        let open = base * (1.0 + drift + wave + (jitter(seed ^ i as u64) - 0.5) * 0.02);
        let spread = base * 0.01 * (1.0 + jitter(seed.wrapping_mul(3).wrapping_add(i as u64)));
        let high = close.max(open) + spread;
        let low = close.min(open) - spread;
        let volume = (800_000.0 + 600_000.0 * jitter(seed.wrapping_add(7_919 * i as u64))).round();

        samples.push(Sample::new(t_secs * MS_PER_SEC, open, high, low, close, volume));
    }

    OhlcvSeries::new(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_demo_series_is_deterministic() {
        let a = demo_series(Asset::Aapl, Granularity::Day, date("2024-01-01"), date("2024-01-31"));
        let b = demo_series(Asset::Aapl, Granularity::Day, date("2024-01-01"), date("2024-01-31"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 31);
    }

    #[test]
    fn test_demo_series_respects_ohlc_ordering() {
        let series = demo_series(Asset::Tsla, Granularity::Hour, date("2024-02-01"), date("2024-02-03"));
        assert_eq!(series.len(), 72);
        for s in &series.samples {
            assert!(s.l <= s.o && s.o <= s.h);
            assert!(s.l <= s.c && s.c <= s.h);
            assert!(s.v > 0.0);
        }
    }

    #[test]
    fn test_demo_series_caps_at_upstream_bound() {
        let series = demo_series(Asset::Qqq, Granularity::Minute, date("2024-01-01"), date("2024-01-20"));
        assert_eq!(series.len(), MAX_SAMPLES);
        assert!(series.is_capped());
    }

    #[test]
    fn test_assets_get_distinct_series() {
        let a = demo_series(Asset::Aapl, Granularity::Day, date("2024-01-01"), date("2024-01-10"));
        let b = demo_series(Asset::Msft, Granularity::Day, date("2024-01-01"), date("2024-01-10"));
        assert_ne!(a, b);
    }
}
