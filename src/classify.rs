use crate::{DescriptorRecord, DescriptorType, ParseError};

/// Offset of `bNumDescriptors` in a HID descriptor
const HID_NUM_DESCRIPTORS: usize = 5;
/// Offset of the first `bDescriptorType`/`wDescriptorLength` pair in a HID descriptor
const HID_SUB_DESCRIPTORS: usize = 6;
/// Offset of `bInterfaceNumber` in an interface descriptor
const INTERFACE_NUMBER: usize = 2;

/// How a descriptor in the chain is interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classified {
    Interface {
        number: u8,
    },
    Hid {
        num_descriptors: u8,
        /// Offset of the sub-descriptor array, relative to the HID descriptor
        sub_descriptors: usize,
    },
    Other,
}

impl Classified {
    /// A well-formed HID descriptor lists exactly one class descriptor
    pub fn has_unexpected_count(&self) -> bool {
        matches!(self, Classified::Hid { num_descriptors, .. } if *num_descriptors != 1)
    }
}

pub fn classify(record: &DescriptorRecord) -> Result<Classified, ParseError> {
    const INTERFACE: u8 = DescriptorType::Interface as u8;
    const HID: u8 = DescriptorType::Hid as u8;

    match record.descriptor_type {
        INTERFACE => Ok(Classified::Interface {
            number: record.byte(INTERFACE_NUMBER)?,
        }),
        HID => Ok(Classified::Hid {
            num_descriptors: record.byte(HID_NUM_DESCRIPTORS)?,
            sub_descriptors: HID_SUB_DESCRIPTORS,
        }),
        _ => Ok(Classified::Other),
    }
}
