//! Accumulating buffer with incremental end-of-message search.
//!
//! Only bytes that could complete a marker are re-scanned after each append:
//! the new data plus the last `marker.len() - 1` bytes already held. For large
//! replies (full configurations, route tables) this keeps detection linear.

use bytes::BytesMut;
use memchr::memmem;

/// Buffer for accumulating a reply until an end-of-message marker arrives.
#[derive(Debug)]
pub struct FrameBuffer {
    /// The accumulated bytes.
    buffer: BytesMut,

    /// Offset below which the marker is known to be absent.
    scanned: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            scanned: 0,
        }
    }

    /// Append newly received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Position of the first occurrence of `marker`, if any.
    pub fn find(&mut self, marker: &[u8]) -> Option<usize> {
        if marker.is_empty() {
            return Some(0);
        }
        let start = self.scanned.saturating_sub(marker.len() - 1);
        match memmem::find(&self.buffer[start..], marker) {
            Some(pos) => Some(start + pos),
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    /// If `marker` has arrived, return everything before its first occurrence
    /// and reset. Bytes after the marker are discarded.
    pub fn take_frame(&mut self, marker: &[u8]) -> Option<Vec<u8>> {
        let pos = self.find(marker)?;
        self.buffer.truncate(pos);
        let frame = self.buffer.split().to_vec();
        self.clear();
        Some(frame)
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &[u8] = b"]]>]]>";

    #[test]
    fn test_basic_extend() {
        let mut buffer = FrameBuffer::new();
        buffer.extend(b"<rpc-reply>");
        assert_eq!(buffer.as_slice(), b"<rpc-reply>");
        assert_eq!(buffer.len(), 11);
        assert!(buffer.take_frame(MARKER).is_none());
    }

    #[test]
    fn test_marker_split_across_appends() {
        let mut buffer = FrameBuffer::new();
        buffer.extend(b"<ok/>]]");
        assert!(buffer.take_frame(MARKER).is_none());
        buffer.extend(b">]]");
        assert!(buffer.take_frame(MARKER).is_none());
        buffer.extend(b">\n");
        assert_eq!(buffer.take_frame(MARKER).unwrap(), b"<ok/>");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_truncates_at_first_marker() {
        let mut buffer = FrameBuffer::new();
        buffer.extend(b"first]]>]]>second]]>]]>");
        assert_eq!(buffer.take_frame(MARKER).unwrap(), b"first");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_frame() {
        let mut buffer = FrameBuffer::new();
        buffer.extend(b"]]>]]>");
        assert_eq!(buffer.take_frame(MARKER).unwrap(), b"");
    }

    #[test]
    fn test_large_buffer_after_many_appends() {
        let mut buffer = FrameBuffer::new();
        for _ in 0..100 {
            buffer.extend(&[b'x'; 100]);
            assert!(buffer.find(MARKER).is_none());
        }
        buffer.extend(b"]]>]]>");
        assert_eq!(buffer.find(MARKER), Some(10_000));
    }
}
