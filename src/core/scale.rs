use indexmap::IndexSet;

use crate::error::{ChartError, ChartResult};

/// Continuous mapping from a numeric domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how the
/// vertical axis maps larger values upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    /// Builds a scale covering `values`, widening degenerate domains by one
    /// unit on each side.
    pub fn covering(
        values: impl IntoIterator<Item = f64>,
        include_zero: bool,
    ) -> ChartResult<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        if include_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        if min == max {
            min -= 1.0;
            max += 1.0;
        }
        Self::new(min, max)
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Err(ChartError::InvalidData(
                "scale range must be non-empty".to_owned(),
            ));
        }

        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }

    /// Evenly spaced tick values across the domain, endpoints included.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.domain_start];
        }
        let step = (self.domain_end - self.domain_start) / (count - 1) as f64;
        (0..count)
            .map(|index| self.domain_start + step * index as f64)
            .collect()
    }
}

/// Discrete mapping from categories onto equal-width pixel bands.
///
/// Categories keep first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: IndexSet<String>,
    range_start: f64,
    range_end: f64,
}

impl BandScale {
    pub fn new(
        categories: impl IntoIterator<Item = String>,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        let domain: IndexSet<String> = categories.into_iter().collect();
        if domain.is_empty() {
            return Err(ChartError::InvalidData(
                "band scale needs at least one category".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() || range_end <= range_start {
            return Err(ChartError::InvalidData(
                "band scale range must be finite and increasing".to_owned(),
            ));
        }
        Ok(Self {
            domain,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        (self.range_end - self.range_start) / self.domain.len() as f64
    }

    /// Left edge of the band assigned to `category`.
    #[must_use]
    pub fn band_start(&self, category: &str) -> Option<f64> {
        self.domain
            .get_index_of(category)
            .map(|index| self.range_start + self.bandwidth() * index as f64)
    }

    #[must_use]
    pub fn band_center(&self, category: &str) -> Option<f64> {
        self.band_start(category)
            .map(|start| start + self.bandwidth() / 2.0)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{BandScale, LinearScale};

    #[test]
    fn linear_scale_round_trips_through_inverted_range() {
        let scale = LinearScale::new(0.0, 100.0)
            .and_then(|scale| scale.with_range(400.0, 0.0))
            .expect("valid scale");

        let pixel = scale.domain_to_pixel(25.0).expect("to pixel");
        assert_relative_eq!(pixel, 300.0);
        let back = scale.pixel_to_domain(pixel).expect("to domain");
        assert_relative_eq!(back, 25.0);
    }

    #[test]
    fn covering_widens_degenerate_domain() {
        let scale = LinearScale::covering([5.0, 5.0], false).expect("scale");
        assert_eq!(scale.domain(), (4.0, 6.0));
    }

    #[test]
    fn covering_includes_zero_for_bars() {
        let scale = LinearScale::covering([12.0, 40.0], true).expect("scale");
        assert_eq!(scale.domain(), (0.0, 40.0));
    }

    #[test]
    fn band_scale_keeps_first_seen_order() {
        let scale = BandScale::new(
            ["B", "A", "B", "C"].map(str::to_owned),
            0.0,
            300.0,
        )
        .expect("band scale");

        assert_eq!(scale.len(), 3);
        assert_relative_eq!(scale.bandwidth(), 100.0);
        assert_eq!(scale.band_start("B"), Some(0.0));
        assert_eq!(scale.band_center("C"), Some(250.0));
        assert_eq!(scale.band_start("missing"), None);
    }
}
