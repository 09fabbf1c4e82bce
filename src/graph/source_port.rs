//! Producer-side bookkeeping shared by every port that forwards frames to a
//! single downstream target.

use crate::graph::error::{PortError, PortResult};
use crate::graph::input_port::InputPort;
use crate::graph::port::{Port, PortInfo, PortOp, PortState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// Identity, open flag and target handle of a producing port.
///
/// The target is held weakly: the downstream filter owns its input port,
/// so tearing the graph down invalidates the link instead of keeping the
/// peer alive. A link whose target has been dropped reads as unconnected.
pub struct SourceLink {
    info: PortInfo,
    blocking: bool,
    open: AtomicBool,
    target: RwLock<Option<Weak<InputPort>>>,
}

impl SourceLink {
    pub fn new(info: PortInfo, blocking: bool) -> Self {
        Self {
            info,
            blocking,
            open: AtomicBool::new(false),
            target: RwLock::new(None),
        }
    }

    #[inline]
    pub fn info(&self) -> &PortInfo {
        &self.info
    }

    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Flip the open flag. Returns `true` if it changed.
    pub fn set_open(&self, open: bool) -> bool {
        self.open.swap(open, Ordering::AcqRel) != open
    }

    /// The live target port, if any.
    pub fn target(&self) -> Option<Arc<InputPort>> {
        self.target
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    pub fn is_connected(&self) -> bool {
        self.target().is_some()
    }

    pub fn state(&self) -> PortState {
        PortState::from_flags(self.is_connected(), self.is_open())
    }

    /// Link to `target`, registering this port as its source.
    pub fn attach(&self, target: &Arc<InputPort>) -> PortResult<()> {
        let mut slot = self.target.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref().and_then(Weak::upgrade) {
            return Err(PortError::AlreadyConnected {
                port: self.info.clone(),
                peer: existing.info().clone(),
            });
        }
        target.attach_source(self.info.clone())?;
        *slot = Some(Arc::downgrade(target));
        Ok(())
    }

    /// Drop the link. Returns the former target if it was still alive.
    pub fn detach(&self) -> Option<Arc<InputPort>> {
        let previous = self
            .target
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let target = previous.as_ref().and_then(Weak::upgrade);
        if let Some(target) = &target {
            target.detach_source();
        }
        target
    }

    /// Fail with `PortNotOpen` unless the port is open.
    pub fn assert_port_is_open(&self, op: PortOp) -> PortResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(PortError::PortNotOpen {
                port: self.info.clone(),
                op,
            })
        }
    }
}

impl Drop for SourceLink {
    fn drop(&mut self) {
        let target = self
            .target
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .and_then(|weak| weak.upgrade());
        // Frames already delivered stay with the consumer, which drains them.
        if let Some(target) = target {
            target.release_source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::port::{PortDescriptor, PortDirection};

    fn link() -> SourceLink {
        SourceLink::new(PortInfo::new("source", "out", PortDirection::Output), true)
    }

    fn input() -> Arc<InputPort> {
        Arc::new(InputPort::new("sink", &PortDescriptor::input("in")))
    }

    #[test]
    fn test_assert_open() {
        let link = link();
        let err = link.assert_port_is_open(PortOp::Set).unwrap_err();
        assert!(matches!(err, PortError::PortNotOpen { op: PortOp::Set, .. }));

        assert!(link.set_open(true));
        assert!(!link.set_open(true));
        assert!(link.assert_port_is_open(PortOp::Set).is_ok());
    }

    #[test]
    fn test_attach_is_symmetric() {
        let link = link();
        let target = input();
        link.attach(&target).unwrap();

        assert!(link.is_connected());
        assert_eq!(target.source().as_ref(), Some(link.info()));
        assert_eq!(link.state(), PortState::ConnectedClosed);
    }

    #[test]
    fn test_attach_twice_fails() {
        let link = link();
        let first = input();
        let second = input();
        link.attach(&first).unwrap();

        let err = link.attach(&second).unwrap_err();
        assert!(matches!(err, PortError::AlreadyConnected { .. }));
        assert!(!second.is_connected());
    }

    #[test]
    fn test_dropped_target_reads_unconnected() {
        let link = link();
        let target = input();
        link.attach(&target).unwrap();
        drop(target);

        assert!(!link.is_connected());
        assert!(link.target().is_none());
        assert_eq!(link.state(), PortState::Unconnected);
    }

    #[test]
    fn test_detach() {
        let link = link();
        let target = input();
        link.attach(&target).unwrap();

        let former = link.detach().unwrap();
        assert!(Arc::ptr_eq(&former, &target));
        assert!(!link.is_connected());
        assert!(!target.is_connected());
        assert!(link.detach().is_none());
    }

    #[test]
    fn test_dropped_link_releases_target() {
        let target = input();
        let link = link();
        link.attach(&target).unwrap();
        drop(link);

        assert!(!target.is_connected());
        assert!(target.source().is_none());
        assert!(target.is_source_closed());

        let replacement =
            SourceLink::new(PortInfo::new("other", "out", PortDirection::Output), true);
        assert!(replacement.attach(&target).is_ok());
        assert!(!target.is_source_closed());
    }
}
