//! Raw vertex buffers and position decoding.

use nalgebra::Point3;

/// Size in bytes of a position (three `f32`).
pub const POSITION_SIZE: usize = 12;

/// Raw interleaved vertex storage for one mesh.
///
/// Each vertex record is `stride` bytes long and starts with its position
/// as three little-endian `f32`. Any remaining bytes of a record belong to
/// other attributes (normals, texture coordinates) and are ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexBuffer {
    /// Raw bytes of all vertex records.
    pub bytes: Vec<u8>,
    /// Byte distance between the starts of consecutive records.
    pub stride: usize,
}

impl VertexBuffer {
    /// Create a vertex buffer from raw bytes and a record stride.
    #[inline]
    #[must_use]
    pub const fn new(bytes: Vec<u8>, stride: usize) -> Self {
        Self { bytes, stride }
    }

    /// Number of complete vertex records in the buffer.
    ///
    /// A zero stride yields zero records.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.bytes.len() / self.stride
        }
    }

    /// Decode the position of the vertex at `index`.
    ///
    /// Returns `None` if the record lies outside the buffer.
    #[inline]
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point3<f32>> {
        read_position(&self.bytes, index, self.stride)
    }
}

/// Read a position from raw vertex bytes.
///
/// Reads three little-endian `f32` values starting at byte offset
/// `index * stride`. Returns `None` when the read would run past the end of
/// `bytes` or the offset overflows.
///
/// # Example
///
/// ```
/// use scan_asset::read_position;
///
/// let mut bytes = Vec::new();
/// for v in [1.0_f32, 2.0, 3.0] {
///     bytes.extend_from_slice(&v.to_le_bytes());
/// }
///
/// let p = read_position(&bytes, 0, 12).unwrap();
/// assert_eq!(p.y, 2.0);
/// assert!(read_position(&bytes, 1, 12).is_none());
/// ```
#[must_use]
pub fn read_position(bytes: &[u8], index: usize, stride: usize) -> Option<Point3<f32>> {
    let start = index.checked_mul(stride)?;
    let end = start.checked_add(POSITION_SIZE)?;
    let record = bytes.get(start..end)?;

    let x = read_f32(record, 0)?;
    let y = read_f32(record, 4)?;
    let z = read_f32(record, 8)?;
    Some(Point3::new(x, y, z))
}

fn read_f32(bytes: &[u8], offset: usize) -> Option<f32> {
    let raw: [u8; 4] = bytes.get(offset..offset + 4)?.try_into().ok()?;
    Some(f32::from_le_bytes(raw))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn pack(positions: &[[f32; 3]], stride: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; positions.len() * stride];
        for (i, p) in positions.iter().enumerate() {
            for (c, v) in p.iter().enumerate() {
                let at = i * stride + c * 4;
                bytes[at..at + 4].copy_from_slice(&v.to_le_bytes());
            }
        }
        bytes
    }

    #[test]
    fn reads_tightly_packed_positions() {
        let bytes = pack(&[[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]], 12);
        let p = read_position(&bytes, 1, 12).unwrap();
        assert_eq!((p.x, p.y, p.z), (1.0, 2.0, 3.0));
    }

    #[test]
    fn honors_interleaved_stride() {
        // position + normal + uv
        let stride = 32;
        let bytes = pack(&[[4.0, 5.0, 6.0], [-1.0, -2.0, -3.0]], stride);
        let p = read_position(&bytes, 1, stride).unwrap();
        assert_eq!((p.x, p.y, p.z), (-1.0, -2.0, -3.0));
    }

    #[test]
    fn out_of_bounds_is_none() {
        let bytes = pack(&[[1.0, 1.0, 1.0]], 12);
        assert!(read_position(&bytes, 1, 12).is_none());
        assert!(read_position(&bytes[..11], 0, 12).is_none());
    }

    #[test]
    fn overflowing_offset_is_none() {
        let bytes = pack(&[[1.0, 1.0, 1.0]], 12);
        assert!(read_position(&bytes, usize::MAX, 12).is_none());
    }

    #[test]
    fn vertex_count_uses_whole_records() {
        let buffer = VertexBuffer::new(vec![0; 70], 32);
        assert_eq!(buffer.vertex_count(), 2);

        let zero_stride = VertexBuffer::new(vec![0; 70], 0);
        assert_eq!(zero_stride.vertex_count(), 0);
    }
}
