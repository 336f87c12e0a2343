//! Feed packet model
//!
//! One packet is the authoritative update for one point: identity, kind
//! tag, and position relative to the anchor origin. Packets are
//! immutable once decoded; everything downstream copies them.

use crate::{PointId, Vec3};

/// Particle kind, from the wire tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ParticleKind {
    /// Nucleus particle ("n")
    Nucleus,
    /// Electron particle ("e")
    #[default]
    Electron,
    /// Any tag this client does not recognize
    Other,
}

impl ParticleKind {
    /// Parse a wire tag; unknown tags map to `Other`, never an error
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "n" => ParticleKind::Nucleus,
            "e" => ParticleKind::Electron,
            _ => ParticleKind::Other,
        }
    }

    /// Wire tag for this kind
    pub fn tag(self) -> &'static str {
        match self {
            ParticleKind::Nucleus => "n",
            ParticleKind::Electron => "e",
            ParticleKind::Other => "p",
        }
    }

    #[inline]
    pub fn is_nucleus(self) -> bool {
        matches!(self, ParticleKind::Nucleus)
    }
}

/// Decoded point update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Packet {
    pub id: PointId,
    pub kind: ParticleKind,
    /// Offset from the anchor origin, unscaled
    pub position: Vec3,
}

impl Packet {
    #[inline]
    pub fn new(id: PointId, kind: ParticleKind, position: Vec3) -> Self {
        Packet { id, kind, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(ParticleKind::from_tag("n"), ParticleKind::Nucleus);
        assert_eq!(ParticleKind::from_tag("e"), ParticleKind::Electron);
        assert_eq!(ParticleKind::from_tag("quark"), ParticleKind::Other);
        assert_eq!(ParticleKind::from_tag(""), ParticleKind::Other);
    }

    #[test]
    fn test_nucleus_flag() {
        assert!(ParticleKind::Nucleus.is_nucleus());
        assert!(!ParticleKind::Electron.is_nucleus());
        assert!(!ParticleKind::Other.is_nucleus());
    }
}
