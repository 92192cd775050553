use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Standard request code for GET_DESCRIPTOR
pub const GET_DESCRIPTOR: u8 = 0x06;

/// Default timeout of a single control transfer, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Default size of the buffer a descriptor is received into
pub const DEFAULT_BUFFER_SIZE: usize = 3072;

/// Descriptor types, see USB 2.0 table 9-5 and HID 1.11 section 7.1
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum DescriptorType {
    Device = 0x01,
    Config = 0x02,
    String = 0x03,
    Interface = 0x04,
    Endpoint = 0x05,
    Bos = 0x0F,
    DeviceCapability = 0x10,
    Hid = 0x21,
    Report = 0x22,
    Physical = 0x23,
    Hub = 0x29,
    SuperSpeedHub = 0x2A,
    SsEndpointCompanion = 0x30,
}

impl DescriptorType {
    pub fn name(self) -> &'static str {
        match self {
            DescriptorType::Device => "DT_DEVICE",
            DescriptorType::Config => "DT_CONFIG",
            DescriptorType::String => "DT_STRING",
            DescriptorType::Interface => "DT_INTERFACE",
            DescriptorType::Endpoint => "DT_ENDPOINT",
            DescriptorType::Bos => "DT_BOS",
            DescriptorType::DeviceCapability => "DT_DEVICE_CAPABILITY",
            DescriptorType::Hid => "DT_HID",
            DescriptorType::Report => "DT_REPORT",
            DescriptorType::Physical => "DT_PHYSICAL",
            DescriptorType::Hub => "DT_HUB",
            DescriptorType::SuperSpeedHub => "DT_SUPERSPEED_HUB",
            DescriptorType::SsEndpointCompanion => "DT_SS_ENDPOINT_COMPANION",
        }
    }

    /// Name of a raw `bDescriptorType` byte
    pub fn name_of(raw: u8) -> &'static str {
        DescriptorType::from_u8(raw).map_or("unknown descriptor", DescriptorType::name)
    }
}

/// A list of defined USB class codes:
/// https://www.usb.org/defined-class-codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum ClassCode {
    SeeInterface = 0,
    Audio = 0x01,
    CDC = 0x02,
    HID = 0x03,
    Physical = 0x05,
    Image = 0x06,
    Printer = 0x07,
    MassStorage = 0x08,
    Hub = 0x09,
    CDCData = 0x0A,
    SmartCard = 0x0B,
    ContentSecurity = 0x0D,
    Video = 0x0E,
    PersonalHealthcare = 0x0F,
    DiagnosticDevice = 0xDC,
    WirelessController = 0xE0,
    Misc = 0xEF,
    ApplicationSpecific = 0xFE,
    VendorSpecific = 0xFF,
}

impl ClassCode {
    pub fn name(self) -> &'static str {
        match self {
            ClassCode::SeeInterface => "CLASS_PER_INTERFACE",
            ClassCode::Audio => "CLASS_AUDIO",
            ClassCode::CDC => "CLASS_COMM",
            ClassCode::HID => "CLASS_HID",
            ClassCode::Physical => "CLASS_PHYSICAL",
            ClassCode::Image => "CLASS_IMAGE",
            ClassCode::Printer => "CLASS_PRINTER",
            ClassCode::MassStorage => "CLASS_MASS_STORAGE",
            ClassCode::Hub => "CLASS_HUB",
            ClassCode::CDCData => "CLASS_DATA",
            ClassCode::SmartCard => "CLASS_SMART_CARD",
            ClassCode::ContentSecurity => "CLASS_CONTENT_SECURITY",
            ClassCode::Video => "CLASS_VIDEO",
            ClassCode::PersonalHealthcare => "CLASS_PERSONAL_HEALTHCARE",
            ClassCode::DiagnosticDevice => "CLASS_DIAGNOSTIC_DEVICE",
            ClassCode::WirelessController => "CLASS_WIRELESS",
            ClassCode::Misc => "CLASS_MISCELLANEOUS",
            ClassCode::ApplicationSpecific => "CLASS_APPLICATION",
            ClassCode::VendorSpecific => "CLASS_VENDOR_SPEC",
        }
    }

    /// Name of a raw `bInterfaceClass` byte
    pub fn name_of(raw: u8) -> &'static str {
        ClassCode::from_u8(raw).map_or("unknown class", ClassCode::name)
    }
}
