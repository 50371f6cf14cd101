use crate::error::{WidgetError, WidgetResult};

/// Multipliers tried, in order, when rounding an axis maximum up.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> WidgetResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(WidgetError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    /// Builds a value scale from `min` up to a nice bound covering `max`,
    /// split into `intervals` equal steps.
    pub fn nice(min: f64, max: f64, intervals: usize) -> WidgetResult<Self> {
        if !min.is_finite() || !max.is_finite() || max < min {
            return Err(WidgetError::InvalidData(
                "value extent must be finite and ordered".to_owned(),
            ));
        }
        let intervals = intervals.max(1) as f64;
        let span = if max > min { max - min } else { max.abs().max(1.0) };
        let step = nice_step(span / intervals);
        let start = (min / step).floor() * step;
        let mut end = start + step * intervals;
        while end < max {
            end += step;
        }
        Self::new(start, end)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Maps `value` linearly onto `range`; the range may be inverted
    /// (`range.0 > range.1`) for y axes that grow downwards.
    pub fn map(self, value: f64, range: (f64, f64)) -> WidgetResult<f64> {
        if !value.is_finite() {
            return Err(WidgetError::InvalidData("value must be finite".to_owned()));
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(range.0 + normalized * (range.1 - range.0))
    }

    pub fn invert(self, pixel: f64, range: (f64, f64)) -> WidgetResult<f64> {
        if !pixel.is_finite() || range.0 == range.1 {
            return Err(WidgetError::InvalidData(
                "pixel and range must be finite and non-empty".to_owned(),
            ));
        }
        let normalized = (pixel - range.0) / (range.1 - range.0);
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }

    /// Evenly spaced values from domain start to end, both inclusive.
    #[must_use]
    pub fn ticks(self, intervals: usize) -> Vec<f64> {
        if intervals == 0 {
            return vec![self.domain_start];
        }
        let span = self.domain_end - self.domain_start;
        (0..=intervals)
            .map(|index| self.domain_start + span * (index as f64) / (intervals as f64))
            .collect()
    }
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    NICE_STEPS
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}

/// Splits a pixel range into `count` equal bands with inner padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    range: (f64, f64),
    padding_ratio: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding_ratio: f64) -> WidgetResult<Self> {
        if count == 0 {
            return Err(WidgetError::InvalidData(
                "band scale needs at least one band".to_owned(),
            ));
        }
        if !(0.0..1.0).contains(&padding_ratio) || !(range.1 > range.0) {
            return Err(WidgetError::InvalidData(
                "band padding must be in [0, 1) and range ascending".to_owned(),
            ));
        }
        Ok(Self {
            count,
            range,
            padding_ratio,
        })
    }

    #[must_use]
    pub fn step(self) -> f64 {
        (self.range.1 - self.range.0) / self.count as f64
    }

    /// Usable width of one band after padding.
    #[must_use]
    pub fn bandwidth(self) -> f64 {
        self.step() * (1.0 - self.padding_ratio)
    }

    #[must_use]
    pub fn band_start(self, index: usize) -> f64 {
        self.range.0 + self.step() * index as f64 + self.step() * self.padding_ratio * 0.5
    }

    #[must_use]
    pub fn band_center(self, index: usize) -> f64 {
        self.range.0 + self.step() * (index as f64 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::{BandScale, LinearScale};

    #[test]
    fn nice_scale_rounds_maximum_up() {
        let scale = LinearScale::nice(0.0, 87.0, 5).expect("nice scale");
        assert_eq!(scale.domain(), (0.0, 100.0));
        assert_eq!(scale.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn nice_scale_handles_flat_zero_data() {
        let scale = LinearScale::nice(0.0, 0.0, 5).expect("nice scale");
        let (start, end) = scale.domain();
        assert_eq!(start, 0.0);
        assert!((end - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn inverted_range_maps_top_down() {
        let scale = LinearScale::new(0.0, 50.0).expect("scale");
        let y = scale.map(50.0, (400.0, 100.0)).expect("map");
        assert!((y - 100.0).abs() <= 1e-9);
        let back = scale.invert(y, (400.0, 100.0)).expect("invert");
        assert!((back - 50.0).abs() <= 1e-9);
    }

    #[test]
    fn band_scale_centers_padded_bands() {
        let bands = BandScale::new(4, (0.0, 400.0), 0.2).expect("bands");
        assert!((bands.bandwidth() - 80.0).abs() <= 1e-9);
        assert!((bands.band_start(1) - 110.0).abs() <= 1e-9);
        assert!((bands.band_center(3) - 350.0).abs() <= 1e-9);
    }
}
