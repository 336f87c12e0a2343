//! Distance tiers and style selection
//!
//! Every proxy is styled from how far its point sits from the anchor
//! origin, measured on the scaled offset:
//! - Inner: d < 2.0 - the nucleus shell
//! - Near:  2.0 <= d < 5.0 - first orbit
//! - Mid:   5.0 <= d < 8.0 - second orbit
//! - Far:   d >= 8.0 - outer reaches
//!
//! Boundary distances belong to the farther band. Classification is a
//! pure function of the scaled offset; which material a tier maps to is
//! the palette's business, and what a material looks like is the host's.

use crate::{ParticleKind, Vec3};

/// Upper bound (exclusive) of the Inner band
pub const INNER_LIMIT: f64 = 2.0;
/// Upper bound (exclusive) of the Near band
pub const NEAR_LIMIT: f64 = 5.0;
/// Upper bound (exclusive) of the Mid band
pub const MID_LIMIT: f64 = 8.0;

/// Distance tier, nearest to farthest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Tier {
    Inner = 0,
    Near = 1,
    Mid = 2,
    Far = 3,
}

impl Tier {
    /// Band a scaled distance; total for every f64 (non-finite goes Far)
    pub fn from_distance(d: f64) -> Self {
        if !d.is_finite() {
            return Tier::Far;
        }
        if d < INNER_LIMIT {
            Tier::Inner
        } else if d < NEAR_LIMIT {
            Tier::Near
        } else if d < MID_LIMIT {
            Tier::Mid
        } else {
            Tier::Far
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// All tiers, nearest first
    pub fn all() -> &'static [Tier] {
        &[Tier::Inner, Tier::Near, Tier::Mid, Tier::Far]
    }
}

/// Result of classifying one scaled offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub tier: Tier,
    pub distance: f64,
}

/// Classify a scaled offset from the origin
#[inline]
pub fn classify(scaled: Vec3) -> Classification {
    let distance = scaled.length();
    Classification {
        tier: Tier::from_distance(distance),
        distance,
    }
}

/// Abstract material slot; the host decides what each one renders as
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    Lantern,
    AmberGlass,
    MagentaGlass,
    VioletGlass,
}

impl Material {
    /// RGB tint for glow-capable hosts
    pub fn tint(self) -> Tint {
        match self {
            Material::Lantern => Tint::new(0.95, 0.97, 0.85),
            Material::AmberGlass => Tint::new(1.0, 0.65, 0.1),
            Material::MagentaGlass => Tint::new(0.9, 0.2, 0.7),
            Material::VioletGlass => Tint::new(0.5, 0.2, 0.9),
        }
    }
}

/// Normalized RGB color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Tint { r, g, b }
    }
}

/// Tier-to-material mapping plus kind-dependent sizes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StylePalette {
    /// One material per tier, indexed by `Tier::index`
    pub tiers: [Material; 4],
    /// Material forced for nuclei under `StylePolicy::NucleusOverride`
    pub nucleus: Material,
    pub nucleus_size: f32,
    pub point_size: f32,
}

impl Default for StylePalette {
    fn default() -> Self {
        StylePalette {
            tiers: [
                Material::Lantern,
                Material::AmberGlass,
                Material::MagentaGlass,
                Material::VioletGlass,
            ],
            nucleus: Material::Lantern,
            nucleus_size: 0.5,
            point_size: 0.1,
        }
    }
}

impl StylePalette {
    #[inline]
    pub fn material_for(&self, tier: Tier) -> Material {
        self.tiers[tier.index()]
    }
}

/// How kind interacts with tier when picking a material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum StylePolicy {
    /// Material comes from the tier alone
    DistanceOnly,
    /// Nuclei always get the palette's nucleus material
    #[default]
    NucleusOverride,
}

/// Everything a host needs to dress one proxy
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleDescriptor {
    pub material: Material,
    pub size: f32,
}

impl StyleDescriptor {
    #[inline]
    pub fn new(material: Material, size: f32) -> Self {
        StyleDescriptor { material, size }
    }

    /// Tint of this descriptor's material
    #[inline]
    pub fn tint(&self) -> Tint {
        self.material.tint()
    }
}

/// Select the style for one point given its tier
pub fn style_for(
    palette: &StylePalette,
    policy: StylePolicy,
    kind: ParticleKind,
    tier: Tier,
) -> StyleDescriptor {
    let material = match policy {
        StylePolicy::NucleusOverride if kind.is_nucleus() => palette.nucleus,
        _ => palette.material_for(tier),
    };
    let size = if kind.is_nucleus() {
        palette.nucleus_size
    } else {
        palette.point_size
    };
    StyleDescriptor { material, size }
}

/// Optional host refinements, probed once when a renderer is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Host can change a proxy's material after creation
    Restyle,
    /// Host can tint a proxy's glow
    GlowTint,
    /// Host can emit a transient orbit trail
    Trail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_boundaries_go_outward() {
        assert_eq!(Tier::from_distance(0.0), Tier::Inner);
        assert_eq!(Tier::from_distance(1.999), Tier::Inner);
        assert_eq!(Tier::from_distance(2.0), Tier::Near);
        assert_eq!(Tier::from_distance(4.999), Tier::Near);
        assert_eq!(Tier::from_distance(5.0), Tier::Mid);
        assert_eq!(Tier::from_distance(7.999), Tier::Mid);
        assert_eq!(Tier::from_distance(8.0), Tier::Far);
        assert_eq!(Tier::from_distance(1e9), Tier::Far);
    }

    #[test]
    fn test_tier_total_on_non_finite() {
        assert_eq!(Tier::from_distance(f64::NAN), Tier::Far);
        assert_eq!(Tier::from_distance(f64::INFINITY), Tier::Far);
        assert_eq!(Tier::from_distance(f64::NEG_INFINITY), Tier::Far);
    }

    #[test]
    fn test_classify_uses_euclidean_norm() {
        let c = classify(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(c.tier, Tier::Near);
        assert!((c.distance - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_nucleus_override_wins_at_any_tier() {
        let palette = StylePalette::default();
        for &tier in Tier::all() {
            let style = style_for(
                &palette,
                StylePolicy::NucleusOverride,
                ParticleKind::Nucleus,
                tier,
            );
            assert_eq!(style.material, Material::Lantern);
            assert_eq!(style.size, palette.nucleus_size);
        }
    }

    #[test]
    fn test_distance_only_ignores_kind() {
        let palette = StylePalette::default();
        let style = style_for(
            &palette,
            StylePolicy::DistanceOnly,
            ParticleKind::Nucleus,
            Tier::Far,
        );
        assert_eq!(style.material, Material::VioletGlass);
        // size still tracks kind
        assert_eq!(style.size, palette.nucleus_size);
    }

    #[test]
    fn test_electron_styles_by_tier() {
        let palette = StylePalette::default();
        let expected = [
            Material::Lantern,
            Material::AmberGlass,
            Material::MagentaGlass,
            Material::VioletGlass,
        ];
        for &tier in Tier::all() {
            let style = style_for(
                &palette,
                StylePolicy::NucleusOverride,
                ParticleKind::Electron,
                tier,
            );
            assert_eq!(style.material, expected[tier.index()]);
            assert_eq!(style.size, palette.point_size);
        }
    }

    proptest! {
        #[test]
        fn prop_classification_is_total(x in -1e6f64..1e6, y in -1e6f64..1e6, z in -1e6f64..1e6) {
            let c = classify(Vec3::new(x, y, z));
            prop_assert!(c.distance >= 0.0);
            prop_assert!(Tier::all().contains(&c.tier));
        }

        #[test]
        fn prop_tier_monotone_in_distance(a in 0.0f64..1e4, b in 0.0f64..1e4) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Tier::from_distance(lo) <= Tier::from_distance(hi));
        }

        #[test]
        fn prop_same_distance_same_tier(d in 0.0f64..1e4) {
            prop_assert_eq!(Tier::from_distance(d), Tier::from_distance(d));
        }
    }
}
