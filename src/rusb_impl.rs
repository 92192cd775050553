use std::time::Duration;

use log::*;
use rusb::{Device, DeviceHandle, GlobalContext};

use crate::{
    DescriptorRequest, DescriptorSource, DeviceId, InterfaceInfo, TransferError, UsbDevice,
    UsbHost,
};

/// Devices of the host, accessed through libusb
#[derive(Debug, Default)]
pub struct RusbHost;

impl RusbHost {
    pub fn new() -> Self {
        Self
    }
}

impl UsbHost for RusbHost {
    fn devices(&mut self) -> Result<Vec<Box<dyn UsbDevice>>, TransferError> {
        let list = rusb::devices().map_err(|err| TransferError::new("libusb_get_device_list", err))?;

        let mut devices: Vec<Box<dyn UsbDevice>> = vec![];
        for dev in list.iter() {
            let desc = match dev.device_descriptor() {
                Ok(desc) => desc,
                Err(err) => {
                    warn!("Impossible to get device descriptor for {dev:?}: {err}, ignoring device");
                    continue;
                }
            };
            let cfg = match dev.active_config_descriptor() {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Impossible to get config descriptor for {dev:?}: {err}, ignoring device");
                    continue;
                }
            };

            let mut interfaces = vec![];
            for intf in cfg.interfaces() {
                for alt in intf.descriptors() {
                    interfaces.push(InterfaceInfo {
                        interface_number: alt.interface_number(),
                        alternate_setting: alt.setting_number(),
                        interface_class: alt.class_code(),
                    });
                }
            }

            let id = DeviceId {
                bus_number: dev.bus_number(),
                address: dev.address(),
                vendor_id: desc.vendor_id(),
                product_id: desc.product_id(),
            };
            devices.push(Box::new(RusbDevice {
                device: dev,
                id,
                interfaces,
            }));
        }
        Ok(devices)
    }
}

struct RusbDevice {
    device: Device<GlobalContext>,
    id: DeviceId,
    interfaces: Vec<InterfaceInfo>,
}

impl UsbDevice for RusbDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn interfaces(&self) -> &[InterfaceInfo] {
        &self.interfaces
    }

    fn claim(&self, interface: u8) -> Result<Box<dyn DescriptorSource + '_>, TransferError> {
        let mut handle = self
            .device
            .open()
            .map_err(|err| TransferError::new("libusb_open", err))?;

        // not supported on every platform
        handle.set_auto_detach_kernel_driver(true).ok();
        match handle.kernel_driver_active(interface) {
            Ok(active) => trace!("{} interface {interface}: kernel driver active: {active}", self.id),
            Err(rusb::Error::NotSupported) => {}
            Err(err) => return Err(TransferError::new("libusb_kernel_driver_active", err)),
        }

        handle
            .claim_interface(interface)
            .map_err(|err| TransferError::new("libusb_claim_interface", err))?;
        Ok(Box::new(RusbClaim { handle, interface }))
    }
}

/// Claimed interface, released and closed on drop
struct RusbClaim {
    handle: DeviceHandle<GlobalContext>,
    interface: u8,
}

impl DescriptorSource for RusbClaim {
    fn fetch_descriptor(
        &mut self,
        request: DescriptorRequest,
        interface: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransferError> {
        buf.fill(0);
        self.handle
            .read_control(
                request.request_type(),
                request.request(),
                request.value(),
                request.index(interface),
                buf,
                timeout,
            )
            .map_err(|err| TransferError::new("libusb_control_transfer", err))
    }
}

impl Drop for RusbClaim {
    fn drop(&mut self) {
        if let Err(err) = self.handle.release_interface(self.interface) {
            warn!("Failed to release interface {}: {err}", self.interface);
        }
    }
}
