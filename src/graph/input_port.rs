//! Consuming port: the single buffering point of a connection.
//!
//! Pushed frames queue up in FIFO order, bounded by the port's capacity.
//! A frame delivered with `set_frame` is latched instead: it replaces
//! whatever was buffered and every pull returns it until it is replaced,
//! cleared, or a new frame is pushed.
//!
//! The open flag lives under the same lock as the buffer, so a closed
//! port never holds frames, whichever thread closes it.

use crate::config::DEFAULT_QUEUE_CAPACITY;
use crate::graph::error::{PortError, PortResult};
use crate::graph::frame::{Frame, FrameFormat};
use crate::graph::port::{Port, PortDescriptor, PortDirection, PortInfo, PortOp};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

#[derive(Default)]
struct InputBuffer {
    open: bool,
    /// Set when the upstream output closes or goes away; cleared when it
    /// opens again or a new source attaches.
    source_closed: bool,
    queue: VecDeque<Frame>,
    latched: Option<Frame>,
    /// `None` until the descriptor or the graph assigns one.
    capacity: Option<usize>,
}

impl InputBuffer {
    fn capacity(&self) -> usize {
        self.capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    fn release(&mut self) {
        self.queue.clear();
        self.latched = None;
    }

    fn has_frame(&self) -> bool {
        !self.queue.is_empty() || self.latched.is_some()
    }
}

/// Input port owned by a filter and shared (weakly) with its upstream
/// `OutputPort`.
pub struct InputPort {
    info: PortInfo,
    format: Option<FrameFormat>,
    blocking: bool,
    source: RwLock<Option<PortInfo>>,
    buffer: Mutex<InputBuffer>,
}

impl InputPort {
    pub fn new(filter: impl Into<String>, descriptor: &PortDescriptor) -> Self {
        debug_assert_eq!(descriptor.direction, PortDirection::Input);
        Self {
            info: PortInfo::new(filter, descriptor.name, PortDirection::Input),
            format: descriptor.format.clone(),
            blocking: descriptor.blocking,
            source: RwLock::new(None),
            buffer: Mutex::new(InputBuffer {
                capacity: descriptor.capacity,
                ..InputBuffer::default()
            }),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, InputBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn format(&self) -> Option<&FrameFormat> {
        self.format.as_ref()
    }

    pub fn capacity(&self) -> usize {
        self.buffer().capacity()
    }

    /// Assign `capacity` unless the descriptor already fixed one.
    pub fn apply_default_capacity(&self, capacity: usize) {
        let mut buffer = self.buffer();
        if buffer.capacity.is_none() {
            buffer.capacity = Some(capacity.max(1));
        }
    }

    /// Number of frames waiting in the queue (the latched slot excluded).
    pub fn queued_len(&self) -> usize {
        self.buffer().queue.len()
    }

    /// The upstream port, if connected.
    pub fn source(&self) -> Option<PortInfo> {
        self.source
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record the upstream end of a new connection.
    pub(crate) fn attach_source(&self, source: PortInfo) -> PortResult<()> {
        let mut slot = self.source.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            return Err(PortError::AlreadyConnected {
                port: self.info.clone(),
                peer: existing.clone(),
            });
        }
        *slot = Some(source);
        self.buffer().source_closed = false;
        Ok(())
    }

    /// Forget the upstream end and drop frames it delivered.
    pub(crate) fn detach_source(&self) {
        self.source
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.buffer().release();
    }

    /// The upstream port was dropped: forget it, but keep what it delivered
    /// so the consumer can drain before closing.
    pub(crate) fn release_source(&self) {
        self.source
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.buffer().source_closed = true;
    }

    pub(crate) fn mark_source_open(&self) {
        self.buffer().source_closed = false;
    }

    pub(crate) fn mark_source_closed(&self) {
        self.buffer().source_closed = true;
    }

    pub fn is_source_closed(&self) -> bool {
        self.buffer().source_closed
    }

    fn check_open(&self, buffer: &InputBuffer, op: PortOp) -> PortResult<()> {
        if buffer.open {
            Ok(())
        } else {
            Err(PortError::PortNotOpen {
                port: self.info.clone(),
                op,
            })
        }
    }

    fn check_format(&self, frame: &Frame, op: PortOp) -> PortResult<()> {
        match &self.format {
            Some(expected) if expected != frame.format() => Err(PortError::FormatMismatch {
                port: self.info.clone(),
                op,
                expected: expected.clone(),
                actual: frame.format().clone(),
            }),
            _ => Ok(()),
        }
    }
}

impl Port for InputPort {
    fn info(&self) -> &PortInfo {
        &self.info
    }

    fn open(&self) {
        let mut buffer = self.buffer();
        if !buffer.open {
            buffer.open = true;
            tracing::debug!("Opened {}", self.info);
        }
    }

    fn close(&self) {
        let mut buffer = self.buffer();
        if buffer.open {
            buffer.open = false;
            tracing::debug!("Closed {}", self.info);
        }
        buffer.release();
    }

    fn is_open(&self) -> bool {
        self.buffer().open
    }

    fn is_connected(&self) -> bool {
        self.source
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn is_blocking(&self) -> bool {
        self.blocking
    }

    fn clear(&self) {
        let mut buffer = self.buffer();
        if buffer.has_frame() {
            tracing::trace!("Clearing {} buffered frame(s) on {}", buffer.queue.len(), self.info);
        }
        buffer.release();
    }

    fn push_frame(&self, frame: Frame) -> PortResult<()> {
        let mut buffer = self.buffer();
        self.check_open(&buffer, PortOp::Push)?;
        self.check_format(&frame, PortOp::Push)?;

        let capacity = buffer.capacity();
        if buffer.queue.len() >= capacity {
            return Err(PortError::QueueFull {
                port: self.info.clone(),
                capacity,
            });
        }
        buffer.latched = None;
        buffer.queue.push_back(frame);
        tracing::trace!("Queued frame on {} ({} waiting)", self.info, buffer.queue.len());
        Ok(())
    }

    fn set_frame(&self, frame: Frame) -> PortResult<()> {
        let mut buffer = self.buffer();
        self.check_open(&buffer, PortOp::Set)?;
        self.check_format(&frame, PortOp::Set)?;

        buffer.queue.clear();
        buffer.latched = Some(frame);
        tracing::trace!("Latched frame on {}", self.info);
        Ok(())
    }

    fn pull_frame(&self) -> PortResult<Frame> {
        let mut buffer = self.buffer();
        if let Some(frame) = buffer.queue.pop_front() {
            return Ok(frame);
        }
        buffer.latched.clone().ok_or_else(|| PortError::NoFrame {
            port: self.info.clone(),
        })
    }

    fn has_frame(&self) -> bool {
        self.buffer().has_frame()
    }

    fn is_ready(&self) -> bool {
        self.has_frame() || !self.blocking
    }

    fn filter_must_close(&self) -> bool {
        let buffer = self.buffer();
        (!buffer.open || buffer.source_closed) && self.blocking && !buffer.has_frame()
    }
}

impl std::fmt::Debug for InputPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputPort")
            .field("info", &self.info)
            .field("open", &self.is_open())
            .field("source", &self.source())
            .field("queued", &self.queued_len())
            .finish()
    }
}
