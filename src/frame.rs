//! Encoded packet type.

/// One encoded Opus packet.
///
/// Owns its bytes independently of the scratch buffer it was copied out of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(pub Vec<u8>);

impl Frame {
    /// Creates a new frame from bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Creates a frame from a byte slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self(data.to_vec())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Frame {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Frame {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_new() {
        let data = vec![0x01, 0x02, 0x03];
        let frame = Frame::new(data.clone());
        assert_eq!(frame.len(), 3);
        assert!(!frame.is_empty());
        assert_eq!(frame.as_bytes(), &data[..]);
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::new(vec![]);
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn test_frame_from_slice() {
        let data = [0x48, 0x01, 0x02];
        let frame = Frame::from_slice(&data);
        assert_eq!(frame.as_bytes(), &data[..]);
    }

    #[test]
    fn test_frame_as_ref() {
        let data = vec![0x48, 0x01];
        let frame = Frame::new(data.clone());
        let slice: &[u8] = frame.as_ref();
        assert_eq!(slice, &data[..]);
    }

    #[test]
    fn test_frame_from_vec() {
        let data = vec![0x48, 0x01, 0x02];
        let frame: Frame = data.clone().into();
        assert_eq!(frame.as_bytes(), &data[..]);
    }
}
