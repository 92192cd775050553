#![allow(dead_code)]

//! Synthetic descriptors shared by unit and integration tests.

pub fn setup_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Configuration descriptor header, `wTotalLength` left at zero
pub fn config_header(num_interfaces: u8) -> Vec<u8> {
    vec![9, 0x02, 0, 0, num_interfaces, 1, 0, 0xA0, 50]
}

/// HID class interface descriptor
pub fn interface(number: u8) -> Vec<u8> {
    interface_alt(number, 0)
}

pub fn interface_alt(number: u8, alternate: u8) -> Vec<u8> {
    vec![9, 0x04, number, alternate, 1, 0x03, 0x01, 0x01, 0]
}

/// HID descriptor declaring one sub-descriptor per `(type, length)` entry
pub fn hid(entries: &[(u8, u16)]) -> Vec<u8> {
    let mut desc = vec![
        (6 + 3 * entries.len()) as u8,
        0x21,
        0x11,
        0x01,
        0,
        entries.len() as u8,
    ];
    for &(ty, len) in entries {
        desc.push(ty);
        desc.extend(len.to_le_bytes());
    }
    desc
}

/// HID descriptor with a single report sub-descriptor
pub fn hid_report(len: u16) -> Vec<u8> {
    hid(&[(0x22, len)])
}

pub fn endpoint(address: u8) -> Vec<u8> {
    vec![7, 0x05, address, 0x03, 8, 0, 10]
}

/// Full configuration descriptor with one HID interface per report length
pub fn config(report_lengths: &[u16]) -> Vec<u8> {
    let mut desc = config_header(report_lengths.len() as u8);
    for (number, &len) in report_lengths.iter().enumerate() {
        desc.extend(interface(number as u8));
        desc.extend(hid_report(len));
        desc.extend(endpoint(0x81 + number as u8));
    }
    let total = (desc.len() as u16).to_le_bytes();
    desc[2] = total[0];
    desc[3] = total[1];
    desc
}

/// Report descriptor of a boot keyboard, 63 bytes
pub const KEYBOARD_REPORT: [u8; 63] = [
    0x05, 0x01, 0x09, 0x06, 0xA1, 0x01, 0x05, 0x07, 0x19, 0xE0, 0x29, 0xE7, 0x15, 0x00, 0x25,
    0x01, 0x75, 0x01, 0x95, 0x08, 0x81, 0x02, 0x95, 0x01, 0x75, 0x08, 0x81, 0x01, 0x95, 0x05,
    0x75, 0x01, 0x05, 0x08, 0x19, 0x01, 0x29, 0x05, 0x91, 0x02, 0x95, 0x01, 0x75, 0x03, 0x91,
    0x01, 0x95, 0x06, 0x75, 0x08, 0x15, 0x00, 0x25, 0x65, 0x05, 0x07, 0x19, 0x00, 0x29, 0x65,
    0x81, 0x00, 0xC0,
];
