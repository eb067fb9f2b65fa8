//! Pure colour and elevation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Srgba` / `Vec3` inputs, making them straightforward to unit-test.

use bevy::color::{Alpha, Mix, Srgba};
use bevy::math::{Vec2, Vec3};

use crate::tiering::Tier;

/// Tier palette, indexed by [`Tier::rank`] (`F` first).
pub const TIER_COLORS: [Srgba; 7] = [
    Srgba::rgb(0.40, 0.40, 0.40),
    Srgba::rgb(0.60, 0.60, 0.60),
    Srgba::rgb(0.80, 0.80, 0.80),
    Srgba::rgb(0.40, 0.60, 0.80),
    Srgba::rgb(0.40, 0.80, 0.40),
    Srgba::rgb(1.00, 0.53, 0.00),
    Srgba::rgb(1.00, 0.80, 0.00),
];

/// Colour of tiles without a tier (water, ice, or an unusable tier table).
pub const UNTIERED_COLOR: Srgba = Srgba::rgb(0.10, 0.37, 0.62);

/// Heatmap gradient stops, cold to hot.
pub const HEAT_STOPS: [Srgba; 3] = [
    Srgba::rgb(0.15, 0.20, 0.75),
    Srgba::rgb(0.95, 0.90, 0.25),
    Srgba::rgb(0.85, 0.10, 0.10),
];

/// Palette colour for a tier, [`UNTIERED_COLOR`] for `None`.
pub fn tier_color(tier: Option<Tier>) -> Srgba {
    tier.map_or(UNTIERED_COLOR, |t| TIER_COLORS[t.rank()])
}

/// Samples the heatmap gradient at `fraction` (clamped to `[0, 1]`).
///
/// Callers map a normalized score into the fraction with
/// [`ScoreRange::fraction`](crate::recalc::ScoreRange::fraction).
pub fn heat_color(fraction: f64) -> Srgba {
    let t = fraction.clamp(0.0, 1.0) as f32;
    let segments = (HEAT_STOPS.len() - 1) as f32;
    let scaled = t * segments;
    let i = (scaled.floor() as usize).min(HEAT_STOPS.len() - 2);
    HEAT_STOPS[i].mix(&HEAT_STOPS[i + 1], scaled - i as f32)
}

/// Moves `color` towards white by `amount` in `[0, 1]`, keeping its alpha.
pub fn brighten(color: Srgba, amount: f32) -> Srgba {
    color
        .mix(&Srgba::WHITE, amount.clamp(0.0, 1.0))
        .with_alpha(color.alpha)
}

/// Height of a tile face above the ground plane.
///
/// Tiered tiles rise one `step` per rank, starting at one step for `F`;
/// untiered tiles stay flat.
pub fn tier_elevation(tier: Option<Tier>, step: f32) -> f32 {
    tier.map_or(0.0, |t| (t.rank() + 1) as f32 * step)
}

/// Where a ray meets the `y = 0` ground plane, as `(x, z)`.
///
/// `None` when the ray runs (nearly) parallel to the plane or points away
/// from it.
pub fn ray_ground_hit(origin: Vec3, direction: Vec3) -> Option<Vec2> {
    if direction.y.abs() <= 0.001 {
        return None;
    }
    let t = -origin.y / direction.y;
    (t > 0.0).then(|| {
        let hit = origin + direction * t;
        Vec2::new(hit.x, hit.z)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Srgba, b: Srgba) -> bool {
        (a.red - b.red).abs() < 1e-5
            && (a.green - b.green).abs() < 1e-5
            && (a.blue - b.blue).abs() < 1e-5
            && (a.alpha - b.alpha).abs() < 1e-5
    }

    // ── tier_color ──────────────────────────────────────────────────

    #[test]
    fn every_tier_has_its_own_colour() {
        for (i, a) in Tier::ALL.iter().enumerate() {
            for b in &Tier::ALL[i + 1..] {
                assert_ne!(tier_color(Some(*a)), tier_color(Some(*b)), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn untiered_uses_water_colour() {
        assert_eq!(tier_color(None), UNTIERED_COLOR);
    }

    // ── heat_color ──────────────────────────────────────────────────

    #[test]
    fn heat_endpoints_are_the_outer_stops() {
        assert!(close(heat_color(0.0), HEAT_STOPS[0]));
        assert!(close(heat_color(1.0), HEAT_STOPS[2]));
        assert!(close(heat_color(0.5), HEAT_STOPS[1]));
    }

    #[test]
    fn heat_clamps_out_of_range_fractions() {
        assert!(close(heat_color(-3.0), HEAT_STOPS[0]));
        assert!(close(heat_color(7.5), HEAT_STOPS[2]));
    }

    #[test]
    fn heat_red_channel_rises_through_the_cold_half() {
        assert!(heat_color(0.1).red < heat_color(0.4).red);
    }

    // ── brighten ────────────────────────────────────────────────────

    #[test]
    fn brighten_moves_towards_white_and_keeps_alpha() {
        let base = Srgba::new(0.2, 0.4, 0.6, 0.5);
        let lit = brighten(base, 0.5);
        assert!((lit.red - 0.6).abs() < 1e-5);
        assert!((lit.blue - 0.8).abs() < 1e-5);
        assert_eq!(lit.alpha, 0.5);
        assert!(close(brighten(base, 0.0), base));
    }

    // ── tier_elevation ──────────────────────────────────────────────

    #[test]
    fn elevation_grows_with_rank() {
        assert_eq!(tier_elevation(None, 0.2), 0.0);
        assert!((tier_elevation(Some(Tier::F), 0.2) - 0.2).abs() < 1e-6);
        assert!((tier_elevation(Some(Tier::S), 0.2) - 1.4).abs() < 1e-6);
    }

    // ── ray_ground_hit ──────────────────────────────────────────────

    #[test]
    fn straight_down_hits_below_the_origin() {
        let hit = ray_ground_hit(Vec3::new(3.0, 10.0, -2.0), Vec3::NEG_Y);
        assert_eq!(hit, Some(Vec2::new(3.0, -2.0)));
    }

    #[test]
    fn slanted_ray_travels_along_its_direction() {
        let hit = ray_ground_hit(Vec3::new(0.0, 4.0, 0.0), Vec3::new(1.0, -1.0, 0.5)).unwrap();
        assert!((hit - Vec2::new(4.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn parallel_or_upward_rays_miss() {
        assert_eq!(ray_ground_hit(Vec3::new(0.0, 5.0, 0.0), Vec3::X), None);
        assert_eq!(ray_ground_hit(Vec3::new(0.0, 5.0, 0.0), Vec3::Y), None);
    }
}
