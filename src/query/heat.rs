//! Percentile heat map: deterministic value -> color mapping used by the
//! matrix views. One canonical breakpoint table lives in the config; the
//! alert branch is a hard threshold, everything else is linear.

use {
    crate::config::constants::heat,
    colorgrad::{Color, Gradient, GradientBuilder, LinearGradient},
};

/// Which branch of the mapping produced a style. Buckets let callers (and
/// tests) reason about the hard boundaries without comparing raw colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatBucket {
    NoData,
    Cool,
    Warm,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatStyle {
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub bucket: HeatBucket,
}

impl HeatStyle {
    pub fn background_hex(&self) -> String {
        let [r, g, b] = self.background;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn text_hex(&self) -> String {
        let [r, g, b] = self.text;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

fn ramp(from: [u8; 3], to: [u8; 3], domain: [f64; 2], value: f64) -> [u8; 3] {
    let grad = GradientBuilder::new()
        .colors(&[
            Color::from_rgba8(from[0], from[1], from[2], 255),
            Color::from_rgba8(to[0], to[1], to[2], 255),
        ])
        .domain(&[domain[0] as f32, domain[1] as f32])
        .build::<LinearGradient>()
        .expect("Failed to create heat gradient");

    let rgba8 = grad.at(value as f32).to_rgba8();
    [rgba8[0], rgba8[1], rgba8[2]]
}

/// Map a 0-100 percentile to its display style. Non-finite or out-of-range
/// values get the neutral "no data" style, never a panic.
pub fn heat_color(value: f64) -> HeatStyle {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return HeatStyle {
            background: heat::NEUTRAL_RGB,
            text: heat::TEXT_DARK_RGB,
            bucket: HeatBucket::NoData,
        };
    }

    let (background, bucket) = if value >= heat::ALERT_THRESHOLD {
        (heat::ALERT_RGB, HeatBucket::Alert)
    } else if value >= heat::MIDPOINT {
        (
            ramp(
                heat::NEUTRAL_RGB,
                heat::WARM_RGB,
                [heat::MIDPOINT, heat::ALERT_THRESHOLD],
                value,
            ),
            HeatBucket::Warm,
        )
    } else {
        (
            ramp(
                heat::COOL_RGB,
                heat::NEUTRAL_RGB,
                [0.0, heat::MIDPOINT],
                value,
            ),
            HeatBucket::Cool,
        )
    };

    let text = if value >= heat::TEXT_FLIP_HIGH || value <= heat::TEXT_FLIP_LOW {
        heat::TEXT_LIGHT_RGB
    } else {
        heat::TEXT_DARK_RGB
    };

    HeatStyle {
        background,
        text,
        bucket,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_threshold_is_hard_not_interpolated() {
        let at = heat_color(97.0);
        let below = heat_color(96.999);

        assert_eq!(at.bucket, HeatBucket::Alert);
        assert_eq!(at.background, heat::ALERT_RGB);
        assert_eq!(below.bucket, HeatBucket::Warm);
        assert_ne!(at.background, below.background);
    }

    #[test]
    fn out_of_range_and_non_finite_values_are_no_data() {
        for value in [f64::NAN, f64::INFINITY, -0.001, 100.001] {
            let style = heat_color(value);
            assert_eq!(style.bucket, HeatBucket::NoData, "value {value}");
            assert_eq!(style.background, heat::NEUTRAL_RGB);
        }
        // 100 itself is a valid percentile.
        assert_eq!(heat_color(100.0).bucket, HeatBucket::Alert);
    }

    #[test]
    fn ramp_endpoints_hit_the_configured_colors_exactly() {
        assert_eq!(heat_color(0.0).background, heat::COOL_RGB);
        assert_eq!(heat_color(50.0).background, heat::NEUTRAL_RGB);
    }

    #[test]
    fn text_flips_to_light_only_at_the_extremes() {
        assert_eq!(heat_color(90.0).text, heat::TEXT_LIGHT_RGB);
        assert_eq!(heat_color(10.0).text, heat::TEXT_LIGHT_RGB);
        assert_eq!(heat_color(50.0).text, heat::TEXT_DARK_RGB);
        assert_eq!(heat_color(84.9).text, heat::TEXT_DARK_RGB);
    }

    #[test]
    fn warm_ramp_monotonically_leaves_neutral() {
        let low = heat_color(55.0).background;
        let high = heat_color(90.0).background;
        // Green/blue channels fall as the warm tone saturates.
        assert!(high[1] < low[1]);
        assert!(high[2] < low[2]);
    }
}
