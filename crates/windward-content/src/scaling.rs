//! Level scaling curves shared by every content table.
//!
//! Costs and production grow geometrically (`base * multiplier^(level-1)`,
//! floored per resource); build and research times follow a piecewise
//! curve that keeps early levels in seconds and pushes late levels toward
//! hours; technology effects grow linearly per level.
//!
//! All fractional math uses [`Decimal`] so the client predictor and the
//! server authority compute bit-identical values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// `multiplier^(level-1)` by repeated multiplication, saturating at
/// [`Decimal::MAX`].
///
/// Levels are small (content caps at 30), so the loop is cheaper and more
/// predictable than a float `powf` round-trip.
pub fn growth_factor(level: u32, multiplier: Decimal) -> Decimal {
    let mut factor = Decimal::ONE;
    for _ in 1..level.max(1) {
        factor = factor.checked_mul(multiplier).unwrap_or(Decimal::MAX);
    }
    factor
}

/// Scale an integer base amount geometrically and floor the result.
pub fn scaled_amount(base: u64, level: u32, multiplier: Decimal) -> u64 {
    Decimal::from(base)
        .checked_mul(growth_factor(level, multiplier))
        .map_or(u64::MAX, |v| v.floor().to_u64().unwrap_or(u64::MAX))
}

/// Build or research time in seconds for a given level.
///
/// Piecewise: level 1 is the base time, levels 2-5
/// grow linearly, 6-10 twice as fast, 11-20 reach minutes, 21-30 reach
/// hours. Levels beyond 30 saturate at the level-30 value; shipped content
/// caps `max_level` at 30, so that branch is unreachable with real data.
pub fn time_for_level(level: u32, base_secs: u64) -> u64 {
    match level {
        0 | 1 => base_secs,
        2..=5 => base_secs.saturating_mul(u64::from(level)),
        6..=10 => base_secs
            .saturating_mul(5)
            .saturating_add(base_secs.saturating_mul(2).saturating_mul(u64::from(level - 5))),
        11..=20 => base_secs
            .saturating_mul(15)
            .saturating_add(base_secs.saturating_mul(5).saturating_mul(u64::from(level - 10))),
        21..=30 => base_secs
            .saturating_mul(65)
            .saturating_add(base_secs.saturating_mul(10).saturating_mul(u64::from(level - 20))),
        _ => base_secs.saturating_mul(165),
    }
}

/// Technology effect bonus at a given researched level:
/// `base + (level-1) * per_level`. Level 0 (not researched) is no bonus.
pub fn effect_for_level(level: u32, base: Decimal, per_level: Decimal) -> Decimal {
    if level == 0 {
        return Decimal::ZERO;
    }
    let extra = per_level
        .checked_mul(Decimal::from(level.saturating_sub(1)))
        .unwrap_or(Decimal::MAX);
    base.checked_add(extra).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn growth_factor_level_one_is_unity() {
        assert_eq!(growth_factor(1, dec!(1.5)), Decimal::ONE);
        assert_eq!(growth_factor(0, dec!(1.5)), Decimal::ONE);
    }

    #[test]
    fn growth_factor_compounds_exactly() {
        assert_eq!(growth_factor(3, dec!(1.3)), dec!(1.69));
        assert_eq!(growth_factor(3, dec!(1.5)), dec!(2.25));
    }

    #[test]
    fn scaled_amount_floors_per_level() {
        // Gold mine base {gold: 5} at level 3: floor(5 * 1.69) = 8.
        assert_eq!(scaled_amount(5, 3, dec!(1.3)), 8);
        // Cost scaling: floor(100 * 1.5^2) = 225.
        assert_eq!(scaled_amount(100, 3, dec!(1.5)), 225);
        assert_eq!(scaled_amount(100, 1, dec!(1.5)), 100);
    }

    #[test]
    fn time_curve_is_continuous_at_band_edges() {
        let base = 30;
        assert_eq!(time_for_level(1, base), 30);
        assert_eq!(time_for_level(5, base), 150);
        assert_eq!(time_for_level(6, base), 210);
        assert_eq!(time_for_level(10, base), 450);
        assert_eq!(time_for_level(11, base), 600);
        assert_eq!(time_for_level(20, base), 1950);
        assert_eq!(time_for_level(21, base), 2250);
        assert_eq!(time_for_level(30, base), 4950);
        // Beyond the content cap the curve saturates.
        assert_eq!(time_for_level(31, base), 4950);
    }

    #[test]
    fn effect_scales_linearly_from_base() {
        assert_eq!(effect_for_level(0, dec!(0.25), dec!(0.05)), Decimal::ZERO);
        assert_eq!(effect_for_level(1, dec!(0.25), dec!(0.05)), dec!(0.25));
        assert_eq!(effect_for_level(4, dec!(0.25), dec!(0.05)), dec!(0.40));
    }
}
