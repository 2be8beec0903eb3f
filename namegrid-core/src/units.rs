use crate::constants::{PX_PER_CM, PX_PER_IN, PX_PER_PC, PX_PER_PT};

/// Convert centimeters to SVG pixels.
pub fn cm_to_px(cm: f64) -> f64 {
    cm * PX_PER_CM
}

/// Convert SVG pixels to centimeters.
pub fn px_to_cm(px: f64) -> f64 {
    px / PX_PER_CM
}

pub fn mm_to_px(mm: f64) -> f64 {
    cm_to_px(mm / 10.0)
}

pub fn in_to_px(inches: f64) -> f64 {
    inches * PX_PER_IN
}

pub fn pt_to_px(pt: f64) -> f64 {
    pt * PX_PER_PT
}

pub fn pc_to_px(pc: f64) -> f64 {
    pc * PX_PER_PC
}

/// Round to a fixed number of decimals, the way values are shown in the form.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let p = 10_f64.powi(decimals as i32);
    (v * p).round() / p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_centimeter_is_the_css_ratio() {
        assert!((cm_to_px(1.0) - 37.7952755906).abs() < 1e-9);
        assert!((cm_to_px(2.54) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn conversions_invert() {
        for v in [-3.5, 0.0, 0.1, 10.0, 1234.5] {
            assert!((px_to_cm(cm_to_px(v)) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn physical_units_agree_with_each_other() {
        assert!((mm_to_px(25.4) - in_to_px(1.0)).abs() < 1e-9);
        assert!((pt_to_px(72.0) - 96.0).abs() < 1e-9);
        assert!((pc_to_px(6.0) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn rounding_matches_two_decimal_display() {
        assert_eq!(round_to(0.529166, 2), 0.53);
        assert_eq!(round_to(1.0, 2), 1.0);
    }
}
