//! Visual proxy record

use orrery_core::{PointId, ProxyHandle, StyleDescriptor, Tick};

/// One registered proxy
///
/// An entry exists in the scene map exactly as long as its handle is
/// registered with the host. There is no half-alive state: a failed
/// host call either never inserts the entry or removes it.
#[derive(Clone, Copy, Debug)]
pub struct VisualProxy {
    pub id: PointId,
    pub handle: ProxyHandle,
    /// Style the host last accepted
    pub style: StyleDescriptor,
    /// Tick of the last packet that touched this proxy
    pub last_seen: Tick,
}
