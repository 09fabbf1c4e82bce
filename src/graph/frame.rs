//! Frame handles passed along connections.
//!
//! A `Frame` is an opaque, reference-counted unit of data. Cloning a frame
//! clones the handle, never the payload, and the payload cannot be mutated
//! once the frame exists. Ports only move handles around.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Format tag attached to every frame.
///
/// The port layer treats this as an opaque label: a port that declares a
/// format only accepts frames carrying an equal tag. What the label means
/// (pixel layout, sample type, ...) belongs to whoever produces the frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameFormat(Cow<'static, str>);

impl FrameFormat {
    /// Format of frames that carry no declared layout.
    pub const OPAQUE: FrameFormat = FrameFormat::from_static("opaque");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct FrameInner {
    format: FrameFormat,
    timestamp: Duration,
    payload: Box<dyn Any + Send + Sync>,
}

/// Shared, immutable frame handle.
#[derive(Clone)]
pub struct Frame {
    inner: Arc<FrameInner>,
}

impl Frame {
    /// Wrap a payload in a new frame with a zero timestamp.
    pub fn new<T: Any + Send + Sync>(format: FrameFormat, payload: T) -> Self {
        Self::with_timestamp(format, Duration::ZERO, payload)
    }

    pub fn with_timestamp<T: Any + Send + Sync>(
        format: FrameFormat,
        timestamp: Duration,
        payload: T,
    ) -> Self {
        Self {
            inner: Arc::new(FrameInner {
                format,
                timestamp,
                payload: Box::new(payload),
            }),
        }
    }

    #[inline]
    pub fn format(&self) -> &FrameFormat {
        &self.inner.format
    }

    #[inline]
    pub fn timestamp(&self) -> Duration {
        self.inner.timestamp
    }

    /// Borrow the payload if it has type `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.inner.payload.downcast_ref::<T>()
    }

    /// Whether two handles refer to the same frame.
    #[inline]
    pub fn ptr_eq(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live handles to this frame, including `self`.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("format", &self.inner.format)
            .field("timestamp", &self.inner.timestamp)
            .field("handles", &self.share_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_downcast() {
        let frame = Frame::new(FrameFormat::OPAQUE, 7u64);
        assert_eq!(frame.payload::<u64>(), Some(&7));
        assert!(frame.payload::<f32>().is_none());
    }

    #[test]
    fn test_clone_shares_payload() {
        let frame = Frame::new(FrameFormat::new("samples/f32"), vec![0.5f32; 4]);
        assert_eq!(frame.share_count(), 1);

        let copy = frame.clone();
        assert!(copy.ptr_eq(&frame));
        assert_eq!(frame.share_count(), 2);

        drop(copy);
        assert_eq!(frame.share_count(), 1);
    }

    #[test]
    fn test_distinct_frames_are_not_ptr_eq() {
        let a = Frame::new(FrameFormat::OPAQUE, 1u8);
        let b = Frame::new(FrameFormat::OPAQUE, 1u8);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_format_equality() {
        assert_eq!(FrameFormat::from_static("rgba8"), FrameFormat::new("rgba8"));
        assert_ne!(FrameFormat::OPAQUE, FrameFormat::new("rgba8"));
        assert_eq!(FrameFormat::new("rgba8").to_string(), "rgba8");
    }

    #[test]
    fn test_timestamp() {
        let frame = Frame::with_timestamp(FrameFormat::OPAQUE, Duration::from_millis(40), ());
        assert_eq!(frame.timestamp(), Duration::from_millis(40));
    }
}
