//! Identity types for the orrery client
//!
//! Point identities come off the wire and are stable for the lifetime of
//! a connection. Proxy and world handles are opaque tokens allocated by
//! the host; the client never interprets their bits.

use std::fmt;

/// Feed point identity - assigned by the feed, stable per connection
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointId(pub i64);

impl PointId {
    pub const ZERO: PointId = PointId(0);

    #[inline]
    pub fn new(id: i64) -> Self {
        PointId(id)
    }

    #[inline]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", self.0)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual proxy handle - allocated by the host renderer on register
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProxyHandle(pub u64);

impl ProxyHandle {
    #[inline]
    pub fn new(handle: u64) -> Self {
        ProxyHandle(handle)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProxyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proxy({:#x})", self.0)
    }
}

/// Host scene handle - identifies the world proxies are anchored in
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WorldHandle(pub u64);

impl WorldHandle {
    #[inline]
    pub fn new(handle: u64) -> Self {
        WorldHandle(handle)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for WorldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "World({:#x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_accessors() {
        let id = PointId::new(-42);
        assert_eq!(id.as_i64(), -42);
        assert_eq!(format!("{}", id), "-42");
        assert_eq!(format!("{:?}", id), "Point(-42)");
    }

    #[test]
    fn test_handles_are_opaque_values() {
        let a = ProxyHandle::new(7);
        let b = ProxyHandle::new(7);
        assert_eq!(a, b);
        assert_eq!(a.as_u64(), 7);
        assert_ne!(WorldHandle::new(1), WorldHandle::new(2));
    }
}
