//! A linter for the HID report descriptor length declared by USB devices
//!
//! The length of a HID report descriptor can be learned three ways: from the
//! HID descriptor embedded in the configuration descriptor, from the HID
//! descriptor requested on its own, and by fetching the report descriptor and
//! counting the bytes. Buggy firmware lets these disagree. This crate walks the
//! descriptor chains, extracts the declared lengths and compares them.

mod analyze;
mod check;
mod classify;
mod consts;
mod context;
mod cursor;
mod device;
mod error;
mod hid;
mod scan;
mod util;
pub use analyze::*;
pub use check::*;
pub use classify::*;
pub use consts::*;
pub use context::*;
pub use cursor::*;
pub use device::*;
pub use error::*;
pub use hid::*;
pub use scan::*;
pub use util::*;

#[cfg(feature = "nusb")]
mod nusb_impl;
#[cfg(feature = "rusb")]
mod rusb_impl;
#[cfg(feature = "nusb")]
pub use nusb_impl::NusbHost;
#[cfg(feature = "rusb")]
pub use rusb_impl::RusbHost;
