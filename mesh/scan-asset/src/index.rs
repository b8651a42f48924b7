//! Index buffer element types and triangle-list decoding.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::SubmeshSource;

/// Element type of a submesh index buffer.
///
/// Only 16-bit and 32-bit indices describe exportable triangle lists.
/// 8-bit indices exist in some asset formats and are carried so that a
/// loader can describe them, but exporters skip such submeshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndexType {
    /// Unsigned 8-bit indices (unsupported for export).
    U8,
    /// Unsigned 16-bit little-endian indices.
    U16,
    /// Unsigned 32-bit little-endian indices.
    U32,
}

impl IndexType {
    /// Width of one index element in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Whether triangles can be decoded from indices of this type.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::U16 | Self::U32)
    }

    /// Look up the index type for an element width in bytes.
    #[must_use]
    pub const fn from_width(width: usize) -> Option<Self> {
        match width {
            1 => Some(Self::U8),
            2 => Some(Self::U16),
            4 => Some(Self::U32),
            _ => None,
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
        };
        f.write_str(name)
    }
}

/// Read the index stored in element slot `slot` of a raw index buffer.
///
/// Returns `None` if the slot lies outside `bytes` or if `index_type` is not
/// a supported triangle index type.
///
/// # Example
///
/// ```
/// use scan_asset::{IndexType, read_index};
///
/// let bytes = [7u8, 0, 9, 0];
/// assert_eq!(read_index(&bytes, 1, IndexType::U16), Some(9));
/// assert_eq!(read_index(&bytes, 2, IndexType::U16), None);
/// assert_eq!(read_index(&bytes, 0, IndexType::U8), None);
/// ```
#[must_use]
pub fn read_index(bytes: &[u8], slot: usize, index_type: IndexType) -> Option<u32> {
    let width = index_type.width();
    let start = slot.checked_mul(width)?;
    let raw = bytes.get(start..start.checked_add(width)?)?;

    match index_type {
        IndexType::U16 => Some(u32::from(u16::from_le_bytes(raw.try_into().ok()?))),
        IndexType::U32 => Some(u32::from_le_bytes(raw.try_into().ok()?)),
        IndexType::U8 => None,
    }
}

/// Iterator over the triangles of a submesh index buffer.
///
/// Created by [`triangle_indices`].
#[derive(Debug, Clone)]
pub struct TriangleIndices<'a> {
    bytes: &'a [u8],
    index_type: IndexType,
    next_group: usize,
    group_count: usize,
}

impl Iterator for TriangleIndices<'_> {
    type Item = [u32; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_group >= self.group_count {
            return None;
        }
        let base = self.next_group * 3;
        self.next_group += 1;

        Some([
            read_index(self.bytes, base, self.index_type)?,
            read_index(self.bytes, base + 1, self.index_type)?,
            read_index(self.bytes, base + 2, self.index_type)?,
        ])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.group_count.saturating_sub(self.next_group);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TriangleIndices<'_> {}

/// Iterate a submesh index buffer in non-overlapping groups of three.
///
/// Groups start at index 0 and step by 3. A trailing partial group (one or
/// two leftover indices) is never yielded. The number of groups is bounded
/// by both the declared index count and the bytes actually present.
/// Unsupported index types yield no groups at all.
///
/// # Example
///
/// ```
/// use scan_asset::{IndexType, MeshBuilder, MeshSource, triangle_indices};
///
/// // 7 indices: two full triangles, the 7th index is ignored.
/// let mesh = MeshBuilder::new(12)
///     .positions(&[[0.0; 3]; 4])
///     .submesh_u16(&[0, 1, 2, 1, 2, 3, 0])
///     .build();
///
/// let submesh = mesh.submesh_at(0).unwrap();
/// let groups: Vec<_> = triangle_indices(submesh).collect();
/// assert_eq!(groups, vec![[0, 1, 2], [1, 2, 3]]);
/// ```
#[must_use]
pub fn triangle_indices(submesh: &dyn SubmeshSource) -> TriangleIndices<'_> {
    let index_type = submesh.index_type();
    let bytes = submesh.index_bytes();

    let group_count = if index_type.is_supported() {
        let available = bytes.len() / index_type.width();
        submesh.index_count().min(available) / 3
    } else {
        0
    };

    TriangleIndices {
        bytes,
        index_type,
        next_group: 0,
        group_count,
    }
}
