//! Segmentation of a raw buffer into a chain of length-prefixed descriptors.
//!
//! Every USB descriptor starts with `bLength` and `bDescriptorType`. The cursor
//! hops from one descriptor to the next using `bLength` alone, so it trusts the
//! device for segmentation, but any byte past the two-byte header is only
//! reachable through [DescriptorRecord::byte], which checks it against both the
//! declared length and the number of bytes actually received.

use std::iter::FusedIterator;

use crate::ParseError;

/// One descriptor in a chain, borrowed from the receive buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorRecord<'a> {
    /// Position of `bLength` in the buffer
    pub offset: usize,
    /// `bLength`, as declared by the device
    pub length: u8,
    /// `bDescriptorType`
    pub descriptor_type: u8,
    body: &'a [u8],
    max: usize,
}

impl DescriptorRecord<'_> {
    /// Byte at `field`, counted from the start of the descriptor
    pub fn byte(&self, field: usize) -> Result<u8, ParseError> {
        self.body
            .get(field)
            .copied()
            .ok_or(ParseError::FieldOutOfBounds {
                offset: self.offset,
                length: self.length,
                field,
                max: self.max,
            })
    }

    /// Little-endian word at `field`
    pub fn le_u16(&self, field: usize) -> Result<u16, ParseError> {
        Ok(u16::from_le_bytes([self.byte(field)?, self.byte(field + 1)?]))
    }
}

/// Single forward pass over a descriptor chain.
///
/// The walk ends at the end of the buffer, at the first descriptor declaring a
/// length of zero, or right after yielding a [ParseError].
#[derive(Clone, Debug)]
pub struct DescriptorCursor<'a> {
    data: &'a [u8],
    position: usize,
    done: bool,
}

impl<'a> DescriptorCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for DescriptorCursor<'a> {
    type Item = Result<DescriptorRecord<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let offset = self.position;
        let max = self.data.len();

        let length = match self.data.get(offset) {
            Some(&0) | None => {
                self.done = true;
                return None;
            }
            Some(&length) => length,
        };
        let Some(&descriptor_type) = self.data.get(offset + 1) else {
            self.done = true;
            return Some(Err(ParseError::TruncatedHeader { offset, max }));
        };

        let end = (offset + length as usize).min(max);
        self.position = offset + length as usize;
        Some(Ok(DescriptorRecord {
            offset,
            length,
            descriptor_type,
            body: &self.data[offset..end],
            max,
        }))
    }
}

impl FusedIterator for DescriptorCursor<'_> {}

/// Walk the descriptor chain held in `data`
pub fn walk(data: &[u8]) -> DescriptorCursor<'_> {
    DescriptorCursor::new(data)
}
