//! Interface to the USB stack that supplies descriptor buffers.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ClassCode, DescriptorType, GET_DESCRIPTOR, TransferError};

/// The three GET_DESCRIPTOR requests issued for every HID interface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DescriptorRequest {
    /// Configuration descriptor with all its interface and class descriptors
    Config,
    /// The HID descriptor of one interface
    HidDescriptor,
    /// The report descriptor of one interface
    ReportDescriptor,
}

impl DescriptorRequest {
    pub fn descriptor_type(self) -> DescriptorType {
        match self {
            DescriptorRequest::Config => DescriptorType::Config,
            DescriptorRequest::HidDescriptor => DescriptorType::Hid,
            DescriptorRequest::ReportDescriptor => DescriptorType::Report,
        }
    }

    /// `bmRequestType`: device to host, standard, device or interface recipient
    pub fn request_type(self) -> u8 {
        match self {
            DescriptorRequest::Config => 0x80,
            DescriptorRequest::HidDescriptor | DescriptorRequest::ReportDescriptor => 0x81,
        }
    }

    pub fn request(self) -> u8 {
        GET_DESCRIPTOR
    }

    /// `wValue`: descriptor type in the high byte, index 0
    pub fn value(self) -> u16 {
        (self.descriptor_type() as u16) << 8
    }

    /// `wIndex`: the interface number for class descriptors
    pub fn index(self, interface: u8) -> u16 {
        match self {
            DescriptorRequest::Config => 0,
            DescriptorRequest::HidDescriptor | DescriptorRequest::ReportDescriptor => {
                interface as u16
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceId {
    pub bus_number: u8,
    pub address: u8,
    pub vendor_id: u16,
    pub product_id: u16,
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// One alternate setting of an interface of the active configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceInfo {
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub interface_class: u8,
}

impl InterfaceInfo {
    pub fn is_hid(&self) -> bool {
        self.interface_class == ClassCode::HID as u8
    }
}

/// A claimed interface that control transfers can be issued on.
///
/// The interface is released when the value is dropped.
pub trait DescriptorSource {
    /// Issue `request` and receive the response into `buf`, returning the
    /// number of bytes received
    fn fetch_descriptor(
        &mut self,
        request: DescriptorRequest,
        interface: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransferError>;
}

/// A device found during enumeration
pub trait UsbDevice {
    fn id(&self) -> DeviceId;

    /// Every interface and alternate setting of the active configuration
    fn interfaces(&self) -> &[InterfaceInfo];

    /// Open the device and claim `interface`
    fn claim(&self, interface: u8) -> Result<Box<dyn DescriptorSource + '_>, TransferError>;
}

/// The bus, or whatever stands in for it
pub trait UsbHost {
    fn devices(&mut self) -> Result<Vec<Box<dyn UsbDevice>>, TransferError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_requests() {
        let config = DescriptorRequest::Config;
        assert_eq!(
            (config.request_type(), config.request(), config.value(), config.index(2)),
            (0x80, 0x06, 0x0200, 0)
        );
        let hid = DescriptorRequest::HidDescriptor;
        assert_eq!(
            (hid.request_type(), hid.request(), hid.value(), hid.index(2)),
            (0x81, 0x06, 0x2100, 2)
        );
        let report = DescriptorRequest::ReportDescriptor;
        assert_eq!(
            (report.request_type(), report.value(), report.index(1)),
            (0x81, 0x2200, 1)
        );
    }

    #[test]
    fn device_id_display() {
        let id = DeviceId {
            bus_number: 1,
            address: 4,
            vendor_id: 0x046d,
            product_id: 0xc52b,
        };
        assert_eq!(id.to_string(), "046d:c52b");
    }
}
