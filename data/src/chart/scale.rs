use chrono::{Datelike, NaiveDate, Weekday};

use crate::observation::date_to_ms;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Continuous `domain -> range` mapping. A zero-width domain maps every
/// value onto the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;

        let t = if span != 0.0 {
            (value - d0) / span
        } else if span.is_nan() {
            f64::NAN
        } else {
            0.5
        };

        let (r0, r1) = self.range;
        r0 + (t as f32) * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        linear_ticks(lo, hi, count)
    }

    /// Decimal places needed to tell this scale's ticks apart.
    pub fn tick_precision(&self, count: usize) -> usize {
        let (d0, d1) = self.domain;
        let step = nice_step(d0.min(d1), d0.max(d1), count);
        if step > 0.0 && step < 1.0 {
            (-step.log10().floor()) as usize
        } else {
            0
        }
    }
}

/// Step close to `(stop - start) / count` from the 1/2/5 * 10^k family.
pub fn nice_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }

    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    factor * 10f64.powf(power)
}

pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let step = nice_step(start, stop, count);
    if step <= 0.0 {
        return Vec::new();
    }

    // Sub-unit steps divide by the inverse to keep ticks like 0.3 exact
    let (to_tick, first, last): (Box<dyn Fn(f64) -> f64>, f64, f64) = if step >= 1.0 {
        (
            Box::new(move |i| i * step),
            (start / step).ceil(),
            (stop / step).floor(),
        )
    } else {
        let inv = (1.0 / step).round();
        (
            Box::new(move |i| i / inv),
            (start * inv).ceil(),
            (stop * inv).floor(),
        )
    };

    let mut ticks = Vec::new();
    let mut i = first;
    while i <= last {
        ticks.push(to_tick(i));
        i += 1.0;
    }
    ticks
}

/// Maps calendar dates onto a pixel range through their UTC timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: NaiveDate,
    end: NaiveDate,
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(start: NaiveDate, end: NaiveDate, range: (f32, f32)) -> Self {
        Self {
            start,
            end,
            linear: LinearScale::new((date_to_ms(start) as f64, date_to_ms(end) as f64), range),
        }
    }

    pub fn map(&self, date: NaiveDate) -> f32 {
        self.linear.map(date_to_ms(date) as f64)
    }

    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let (start, end) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        if start == end {
            return vec![start];
        }

        let span_days = (end - start).num_days() as f64;
        TimeInterval::for_span(span_days, count).dates_between(start, end)
    }
}

/// Calendar steps available to a day-resolution time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl TimeInterval {
    const LADDER: [TimeInterval; 6] = [
        TimeInterval::Days(1),
        TimeInterval::Days(2),
        TimeInterval::Weeks(1),
        TimeInterval::Months(1),
        TimeInterval::Months(3),
        TimeInterval::Years(1),
    ];

    fn approx_days(self) -> f64 {
        match self {
            TimeInterval::Days(n) => f64::from(n),
            TimeInterval::Weeks(n) => 7.0 * f64::from(n),
            TimeInterval::Months(n) => 30.0 * f64::from(n),
            TimeInterval::Years(n) => 365.0 * f64::from(n),
        }
    }

    /// Picks the ladder step closest (by ratio) to `span / count`.
    pub fn for_span(span_days: f64, count: usize) -> Self {
        let target = span_days / count.max(1) as f64;

        let Some(i) = Self::LADDER.iter().position(|iv| iv.approx_days() > target) else {
            let years = nice_step(0.0, span_days / 365.0, count).max(1.0);
            return TimeInterval::Years(years.round() as u32);
        };

        if i == 0 {
            return Self::LADDER[0];
        }

        let (lower, upper) = (Self::LADDER[i - 1], Self::LADDER[i]);
        if target / lower.approx_days() < upper.approx_days() / target {
            lower
        } else {
            upper
        }
    }

    fn is_boundary(self, date: NaiveDate) -> bool {
        match self {
            TimeInterval::Days(n) => (date.day() - 1) % n == 0,
            TimeInterval::Weeks(_) => date.weekday() == Weekday::Sun,
            TimeInterval::Months(n) => date.day() == 1 && date.month0() % n == 0,
            TimeInterval::Years(n) => {
                date.ordinal() == 1 && date.year().rem_euclid(n as i32) == 0
            }
        }
    }

    pub fn dates_between(self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_boundary(*d))
            .collect()
    }
}

/// Picks the coarsest calendar unit the date sits on.
pub fn format_date_tick(date: NaiveDate) -> String {
    let fmt = if date.day() != 1 {
        if date.weekday() != Weekday::Sun {
            "%a %d"
        } else {
            "%b %d"
        }
    } else if date.month() != 1 {
        "%B"
    } else {
        "%Y"
    };
    date.format(fmt).to_string()
}

/// Evenly spaced bands over `count` slots, `padding` applied both between
/// and around the bands, leftover space split evenly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    start: f32,
    step: f32,
    bandwidth: f32,
    count: usize,
}

impl BandScale {
    pub fn new(count: usize, range: (f32, f32), padding: f32) -> Self {
        let (r0, r1) = range;
        let n = count as f32;

        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);

        Self {
            start: if count == 0 { r0 } else { start },
            step,
            bandwidth: if count == 0 { 0.0 } else { bandwidth },
            count,
        }
    }

    pub fn position(&self, index: usize) -> Option<f32> {
        (index < self.count).then(|| self.start + self.step * index as f32)
    }

    pub fn center(&self, index: usize) -> Option<f32> {
        self.position(index).map(|x| x + self.bandwidth * 0.5)
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn linear_maps_and_inverts_range() {
        let y = LinearScale::new((0.0, 10.0), (80.0, 5.0));

        assert!(close(y.map(0.0), 80.0));
        assert!(close(y.map(10.0), 5.0));
        assert!(close(y.map(4.0), 50.0));
    }

    #[test]
    fn degenerate_domain_maps_to_midpoint() {
        let x = LinearScale::new((3.0, 3.0), (0.0, 530.0));
        assert!(close(x.map(3.0), 265.0));
        assert!(close(x.map(99.0), 265.0));
    }

    #[test]
    fn nice_ticks() {
        assert_eq!(linear_ticks(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
        assert_eq!(linear_ticks(0.0, 12.0, 3), vec![0.0, 5.0, 10.0]);
        assert_eq!(
            linear_ticks(0.0, 1.0, 5),
            vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]
        );
        assert_eq!(linear_ticks(-3.0, 3.0, 3), vec![-2.0, 0.0, 2.0]);
        assert_eq!(linear_ticks(5.0, 5.0, 3), vec![5.0]);
        assert!(linear_ticks(f64::NAN, 1.0, 3).is_empty());
    }

    #[test]
    fn tick_precision_follows_step() {
        assert_eq!(LinearScale::new((0.0, 10.0), (0.0, 1.0)).tick_precision(3), 0);
        assert_eq!(LinearScale::new((0.0, 0.5), (0.0, 1.0)).tick_precision(3), 1);
        assert_eq!(LinearScale::new((0.0, 0.05), (0.0, 1.0)).tick_precision(3), 2);
    }

    #[test]
    fn time_scale_spans_width() {
        let x = TimeScale::new(date(2024, 1, 1), date(2024, 12, 1), (0.0, 530.0));

        assert!(close(x.map(date(2024, 1, 1)), 0.0));
        assert!(close(x.map(date(2024, 12, 1)), 530.0));
        assert!(x.map(date(2024, 6, 1)) > 0.0 && x.map(date(2024, 6, 1)) < 530.0);
    }

    #[test]
    fn monthly_span_ticks_on_months() {
        let x = TimeScale::new(date(2024, 1, 1), date(2024, 12, 1), (0.0, 530.0));
        let ticks = x.ticks(10);

        assert_eq!(ticks.len(), 12);
        assert!(ticks.iter().all(|d| d.day() == 1));
        assert_eq!(format_date_tick(ticks[0]), "2024");
        assert_eq!(format_date_tick(ticks[1]), "February");
    }

    #[test]
    fn short_span_ticks_on_days() {
        assert_eq!(TimeInterval::for_span(10.0, 10), TimeInterval::Days(1));
        assert_eq!(TimeInterval::for_span(20.0, 10), TimeInterval::Days(2));
        assert_eq!(TimeInterval::for_span(120.0, 10), TimeInterval::Weeks(1));
        assert_eq!(TimeInterval::for_span(900.0, 10), TimeInterval::Months(3));
        assert_eq!(TimeInterval::for_span(365.0 * 30.0, 10), TimeInterval::Years(2));
    }

    #[test]
    fn day_ticks_format_weekdays() {
        assert_eq!(format_date_tick(date(2024, 3, 5)), "Tue 05");
        assert_eq!(format_date_tick(date(2024, 3, 3)), "Mar 03");
    }

    #[test]
    fn band_scale_with_padding() {
        let band = BandScale::new(2, (25.0, 175.0), 0.15);

        let first = band.position(0).unwrap();
        let second = band.position(1).unwrap();

        // step = 150 / (2 - 0.15 + 0.3) = 69.767...
        let step = second - first;
        assert!(close(step, 150.0 / 2.15));
        assert!(close(band.bandwidth(), step * 0.85));

        let last = second + band.bandwidth();
        assert!(close(first - 25.0, 175.0 - last));
        assert_eq!(band.position(2), None);
    }

    #[test]
    fn empty_band_scale() {
        let band = BandScale::new(0, (25.0, 175.0), 0.15);
        assert_eq!(band.position(0), None);
        assert_eq!(band.bandwidth(), 0.0);
    }
}
