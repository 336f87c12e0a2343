//! User notification seam
//!
//! The processing loop reports connection lifecycle changes through
//! this trait; a CLI prints them, a host overlays them, tests record
//! them. Notices are fire-and-forget and must not block.

/// Connection lifecycle notice
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Connected { address: String },
    Disconnected { code: u16, reason: String },
    Faulted { detail: String },
}

/// Receives notices from the processing loop
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Discards every notice
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _notice: Notice) {}
}
