//! Streamgraph stacking.
//!
//! Layers are stacked in catalog order on top of a baseline chosen per date
//! to minimize the weighted wiggle of all layers (Byron & Wattenberg, 2008).
//! Per-date thickness always equals the raw value, so totals are preserved.

use chrono::NaiveDate;

use crate::observation::Observation;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub date: NaiveDate,
    pub lower: f64,
    pub upper: f64,
}

impl BandPoint {
    pub fn thickness(&self) -> f64 {
        self.upper - self.lower
    }
}

/// One series' stacked extent across all dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub series: String,
    pub points: Vec<BandPoint>,
}

/// `[lower, upper]` per date, per layer.
type Layers = Vec<Vec<[f64; 2]>>;

pub fn stack_wiggle(observations: &[Observation], keys: &[&str]) -> Vec<Band> {
    let mut layers: Layers = keys
        .iter()
        .map(|key| {
            observations
                .iter()
                .map(|obs| [0.0, obs.value(key)])
                .collect()
        })
        .collect();

    wiggle_offset(&mut layers);

    keys.iter()
        .zip(layers)
        .map(|(key, layer)| Band {
            series: (*key).to_string(),
            points: observations
                .iter()
                .zip(layer)
                .map(|(obs, [lower, upper])| BandPoint {
                    date: obs.date,
                    lower,
                    upper,
                })
                .collect(),
        })
        .collect()
}

fn or_zero(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v }
}

/// Expects every layer as `[0, value]`; rewrites them in place.
fn wiggle_offset(layers: &mut Layers) {
    let n = layers.len();
    let Some(m) = layers.first().map(Vec::len) else {
        return;
    };
    if m == 0 {
        return;
    }

    let mut y = 0.0;

    for j in 1..m {
        let mut weight = 0.0;
        let mut weighted_slope = 0.0;

        for i in 0..n {
            let curr = or_zero(layers[i][j][1]);
            let prev = or_zero(layers[i][j - 1][1]);

            let mut slope = (curr - prev) / 2.0;
            for layer in layers.iter().take(i) {
                slope += or_zero(layer[j][1]) - or_zero(layer[j - 1][1]);
            }

            weight += curr;
            weighted_slope += slope * curr;
        }

        layers[0][j - 1][0] = y;
        layers[0][j - 1][1] += y;

        if weight != 0.0 {
            y -= weighted_slope / weight;
        }
    }

    layers[0][m - 1][0] = y;
    layers[0][m - 1][1] += y;

    stack_on_first(layers);
}

/// Each layer starts where the previous one ends; a missing upper bound
/// falls back to that layer's lower bound.
fn stack_on_first(layers: &mut Layers) {
    for i in 1..layers.len() {
        let (done, rest) = layers.split_at_mut(i);
        let below = &done[i - 1];

        for (point, [prev_lower, prev_upper]) in rest[0].iter_mut().zip(below.iter().copied()) {
            let base = if prev_upper.is_nan() {
                prev_lower
            } else {
                prev_upper
            };
            point[0] = base;
            point[1] += base;
        }
    }
}

/// Lowest lower and highest upper bound, skipping non-finite values.
pub fn extent(bands: &[Band]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;

    for p in bands.iter().flat_map(|b| b.points.iter()) {
        if p.lower.is_finite() {
            lo = lo.min(p.lower);
        }
        if p.upper.is_finite() {
            hi = hi.max(p.upper);
        }
    }

    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}
