use std::time::Duration;

use log::*;
use nusb::transfer::{Control, ControlType, Recipient};

use crate::{
    DescriptorRequest, DescriptorSource, DeviceId, InterfaceInfo, TransferError, UsbDevice,
    UsbHost,
};

/// Devices of the host, accessed through nusb
#[derive(Debug, Default)]
pub struct NusbHost;

impl NusbHost {
    pub fn new() -> Self {
        Self
    }
}

impl UsbHost for NusbHost {
    fn devices(&mut self) -> Result<Vec<Box<dyn UsbDevice>>, TransferError> {
        let infos = nusb::list_devices().map_err(|err| TransferError::new("list devices", err))?;

        let mut devices: Vec<Box<dyn UsbDevice>> = vec![];
        for device_info in infos {
            let id = DeviceId {
                bus_number: device_info.bus_number(),
                address: device_info.device_address(),
                vendor_id: device_info.vendor_id(),
                product_id: device_info.product_id(),
            };
            let interfaces = list_interfaces(&device_info);
            devices.push(Box::new(NusbDevice {
                info: device_info,
                id,
                interfaces,
            }));
        }
        Ok(devices)
    }
}

/// Every alternate setting of the active configuration. The device is only
/// opened for as long as it takes to read it; when it cannot be opened the
/// interfaces known to the OS are listed with alternate setting 0.
fn list_interfaces(device_info: &nusb::DeviceInfo) -> Vec<InterfaceInfo> {
    let from_info = || {
        device_info
            .interfaces()
            .map(|intf| InterfaceInfo {
                interface_number: intf.interface_number(),
                alternate_setting: 0,
                interface_class: intf.class(),
            })
            .collect()
    };

    let dev = match device_info.open() {
        Ok(dev) => dev,
        Err(err) => {
            debug!("Impossible to open device {device_info:?}: {err}, listing known interfaces");
            return from_info();
        }
    };
    let cfg = match dev.active_configuration() {
        Ok(cfg) => cfg,
        Err(err) => {
            debug!(
                "Impossible to get active configuration {device_info:?}: {err}, listing known interfaces",
            );
            return from_info();
        }
    };

    cfg.interfaces()
        .flat_map(|intf| {
            intf.alt_settings()
                .map(|alt| InterfaceInfo {
                    interface_number: alt.interface_number(),
                    alternate_setting: alt.alternate_setting(),
                    interface_class: alt.class(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

struct NusbDevice {
    info: nusb::DeviceInfo,
    id: DeviceId,
    interfaces: Vec<InterfaceInfo>,
}

impl UsbDevice for NusbDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn interfaces(&self) -> &[InterfaceInfo] {
        &self.interfaces
    }

    /// Opens the device on demand, so a device that cannot be opened only
    /// fails the interfaces that get inspected
    fn claim(&self, interface: u8) -> Result<Box<dyn DescriptorSource + '_>, TransferError> {
        let device = self
            .info
            .open()
            .map_err(|err| TransferError::new("open device", err))?;
        let interface = device
            .claim_interface(interface)
            .map_err(|err| TransferError::new("claim interface", err))?;
        // released when the handle is dropped
        Ok(Box::new(NusbClaim { interface }))
    }
}

struct NusbClaim {
    interface: nusb::Interface,
}

impl DescriptorSource for NusbClaim {
    fn fetch_descriptor(
        &mut self,
        request: DescriptorRequest,
        interface: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransferError> {
        let recipient = match request {
            DescriptorRequest::Config => Recipient::Device,
            DescriptorRequest::HidDescriptor | DescriptorRequest::ReportDescriptor => {
                Recipient::Interface
            }
        };
        buf.fill(0);
        self.interface
            .control_in_blocking(
                Control {
                    control_type: ControlType::Standard,
                    recipient,
                    request: request.request(),
                    value: request.value(),
                    index: request.index(interface),
                },
                buf,
                timeout,
            )
            .map_err(|err| TransferError::new("control transfer", err))
    }
}
