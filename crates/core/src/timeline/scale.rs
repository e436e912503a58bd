use chrono::{Datelike, Days, NaiveDate};

/// Tolerance for deciding that the zoom scale factor actually changed.
/// Sub-pixel float jitter during a smooth zoom gesture must not count.
const SCALE_EPSILON: f64 = 1e-6;

/// Linear mapping between calendar days and horizontal track pixels.
///
/// The domain is the record date range padded by one year on each side, so
/// the earliest and latest trips never sit on the track edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    domain_start: NaiveDate,
    domain_end: NaiveDate,
    track_width: f64,
}

impl TimeScale {
    pub const PAD_DAYS: u64 = 365;

    pub fn new(min_date: NaiveDate, max_date: NaiveDate, track_width: f64) -> Self {
        let domain_start = min_date
            .checked_sub_days(Days::new(Self::PAD_DAYS))
            .unwrap_or(min_date);
        let domain_end = max_date
            .checked_add_days(Days::new(Self::PAD_DAYS))
            .unwrap_or(max_date);
        Self {
            domain_start,
            domain_end,
            track_width: track_width.max(1.0),
        }
    }

    /// Same domain at a new track width (window resize).
    pub fn with_track_width(&self, track_width: f64) -> Self {
        Self {
            domain_start: self.domain_start,
            domain_end: self.domain_end,
            track_width: track_width.max(1.0),
        }
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        (self.domain_start, self.domain_end)
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    fn span_days(&self) -> f64 {
        (self.domain_end - self.domain_start).num_days().max(1) as f64
    }

    /// Unzoomed track x-coordinate of a calendar day.
    pub fn x(&self, day: NaiveDate) -> f64 {
        let offset = (day - self.domain_start).num_days() as f64;
        offset / self.span_days() * self.track_width
    }

    /// Inverse of [`Self::x`], clamped to the domain.
    pub fn day_at(&self, x: f64) -> NaiveDate {
        let frac = (x / self.track_width).clamp(0.0, 1.0);
        let days = (frac * self.span_days()).round() as u64;
        self.domain_start
            .checked_add_days(Days::new(days))
            .unwrap_or(self.domain_end)
    }
}

/// A zoom state: pan offset `tx` plus scale factor `k`, applied as
/// `x' = k·x + tx`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub tx: f64,
    pub k: f64,
}

impl ZoomTransform {
    pub const MIN_SCALE: f64 = 0.1;
    pub const MAX_SCALE: f64 = 50.0;
    pub const IDENTITY: Self = Self { tx: 0.0, k: 1.0 };

    /// Clamp `k` to the scale extent and `tx` so the visible track never
    /// leaves `[0, track_width]`.
    pub fn clamped(tx: f64, k: f64, track_width: f64) -> Self {
        let k = k.clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        let reach = track_width * (1.0 - k);
        let (lo, hi) = if reach < 0.0 { (reach, 0.0) } else { (0.0, reach) };
        Self {
            tx: tx.clamp(lo, hi),
            k,
        }
    }

    pub fn apply(&self, x: f64) -> f64 {
        self.k * x + self.tx
    }

    pub fn invert(&self, px: f64) -> f64 {
        (px - self.tx) / self.k
    }

    /// Whether the scale factor differs from `last_k` beyond float jitter.
    pub fn scale_changed(&self, last_k: f64) -> bool {
        let denom = last_k.abs().max(f64::EPSILON);
        (self.k - last_k).abs() / denom > SCALE_EPSILON
    }

    /// Visible date range of `scale` under this transform.
    pub fn visible_days(&self, scale: &TimeScale) -> (NaiveDate, NaiveDate) {
        let start = scale.day_at(self.invert(0.0));
        let end = scale.day_at(self.invert(scale.track_width()));
        (start, end)
    }
}

/// Axis tick granularity as a step function of the zoom scale factor,
/// keeping roughly 5–15 ticks visible at any zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickUnit {
    Year,
    Month,
    Week,
    Day,
}

impl TickUnit {
    pub fn for_scale(k: f64) -> Self {
        if k > 10.0 {
            Self::Day
        } else if k > 5.0 {
            Self::Week
        } else if k > 1.0 {
            Self::Month
        } else {
            Self::Year
        }
    }

    /// Latest unit boundary at or before `day`.
    pub fn floor(self, day: NaiveDate) -> NaiveDate {
        match self {
            Self::Year => NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day),
            Self::Month => NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day),
            Self::Week => {
                let back = u64::from(day.weekday().num_days_from_monday());
                day.checked_sub_days(Days::new(back)).unwrap_or(day)
            }
            Self::Day => day,
        }
    }

    /// Next unit boundary strictly after `boundary`. Saturates at the far
    /// end of the calendar so tick loops always terminate.
    pub fn next(self, boundary: NaiveDate) -> NaiveDate {
        match self {
            Self::Year => {
                NaiveDate::from_ymd_opt(boundary.year() + 1, 1, 1).unwrap_or(NaiveDate::MAX)
            }
            Self::Month => {
                let (y, m) = if boundary.month() == 12 {
                    (boundary.year() + 1, 1)
                } else {
                    (boundary.year(), boundary.month() + 1)
                };
                NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(NaiveDate::MAX)
            }
            Self::Week => boundary
                .checked_add_days(Days::new(7))
                .unwrap_or(NaiveDate::MAX),
            Self::Day => boundary.succ_opt().unwrap_or(NaiveDate::MAX),
        }
    }

    /// Tick label for a boundary in this unit.
    pub fn label(self, boundary: NaiveDate) -> String {
        match self {
            Self::Year => boundary.format("%Y").to_string(),
            Self::Month => boundary.format("%b %Y").to_string(),
            Self::Week | Self::Day => boundary.format("%b %d").to_string(),
        }
    }
}
