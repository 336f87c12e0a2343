//! Frame payload decode/encode
//!
//! A frame payload is a JSON array of point objects in feed order. The
//! decode is atomic: either every element parses and the whole batch is
//! returned, or the frame is rejected and nothing is applied. A blank
//! payload and an empty array both mean "no updates this frame".

use serde::{Deserialize, Serialize};

use orrery_core::{OrreryError, OrreryResult, Packet, ParticleKind, PointId, Vec3};

/// Raw JSON shape of one point
///
/// Unknown extra fields are ignored; missing fields reject the frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WirePoint {
    pub id: i64,
    pub t: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&Packet> for WirePoint {
    fn from(packet: &Packet) -> Self {
        WirePoint {
            id: packet.id.as_i64(),
            t: packet.kind.tag().to_string(),
            x: packet.position.x,
            y: packet.position.y,
            z: packet.position.z,
        }
    }
}

impl WirePoint {
    fn into_packet(self) -> Packet {
        Packet::new(
            PointId::new(self.id),
            ParticleKind::from_tag(&self.t),
            Vec3::new(self.x, self.y, self.z),
        )
    }
}

/// Decode one frame payload into a batch of packets
///
/// Array order is preserved. Unknown kind tags decode to
/// `ParticleKind::Other`; a schema or syntax failure anywhere rejects
/// the whole frame.
pub fn decode_frame(payload: &str) -> OrreryResult<Vec<Packet>> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let points: Vec<WirePoint> = serde_json::from_str(trimmed)
        .map_err(|e| OrreryError::MalformedFrame(e.to_string()))?;

    Ok(points.into_iter().map(WirePoint::into_packet).collect())
}

/// Encode a batch of packets as a frame payload
pub fn encode_frame(packets: &[Packet]) -> OrreryResult<String> {
    let points: Vec<WirePoint> = packets.iter().map(WirePoint::from).collect();
    serde_json::to_string(&points).map_err(|e| OrreryError::MalformedFrame(e.to_string()))
}
