//! Enumerate HID interfaces and cross-check their report descriptor lengths.

use std::str::FromStr;
use std::time::Duration;

use log::*;

use crate::{
    Analysis, DEFAULT_BUFFER_SIZE, DEFAULT_TIMEOUT_MS, DescriptorRequest, DescriptorSource,
    DeviceId, InterfaceInfo, TransferError, UsbDevice, UsbHost, ValidationResult, analyze, check,
};

/// Restrict a scan to one vendor, or one vendor and product
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceFilter {
    pub vendor_id: u16,
    pub product_id: Option<u16>,
}

impl DeviceFilter {
    pub fn matches(&self, id: &DeviceId) -> bool {
        self.vendor_id == id.vendor_id && self.product_id.is_none_or(|pid| pid == id.product_id)
    }
}

impl FromStr for DeviceFilter {
    type Err = String;

    /// Parses `VID` or `VID:PID`, both in hex
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            u16::from_str_radix(part.trim_start_matches("0x"), 16)
                .map_err(|err| format!("invalid id {part:?}: {err}"))
        };
        match s.split_once(':') {
            Some((vid, pid)) => Ok(Self {
                vendor_id: parse(vid)?,
                product_id: Some(parse(pid)?),
            }),
            None => Ok(Self {
                vendor_id: parse(s)?,
                product_id: None,
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Timeout of each control transfer
    pub timeout: Duration,
    /// Size of the buffer each descriptor is received into
    pub buffer_size: usize,
    pub filter: Option<DeviceFilter>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            buffer_size: DEFAULT_BUFFER_SIZE,
            filter: None,
        }
    }
}

/// The three views of one HID interface
#[derive(Debug)]
pub struct InterfaceReport {
    pub config: Analysis,
    pub hid: Analysis,
    /// Raw report descriptor, `None` if the transfer failed
    pub report: Option<Vec<u8>>,
    /// `None` when none of the three requests yielded a length
    pub result: Option<ValidationResult>,
}

impl InterfaceReport {
    pub fn is_bad(&self) -> bool {
        self.result.is_some_and(|result| !result.is_consistent())
    }
}

#[derive(Debug)]
pub enum InterfaceOutcome {
    /// Not a HID interface, left alone
    NotHid,
    Inspected(Box<InterfaceReport>),
    /// The interface could not be opened or claimed
    Skipped(TransferError),
}

#[derive(Debug)]
pub struct InterfaceScan {
    pub interface: InterfaceInfo,
    pub outcome: InterfaceOutcome,
}

#[derive(Debug)]
pub struct DeviceReport {
    pub id: DeviceId,
    pub interfaces: Vec<InterfaceScan>,
}

impl DeviceReport {
    pub fn reports(&self) -> impl Iterator<Item = (&InterfaceInfo, &InterfaceReport)> {
        self.interfaces.iter().filter_map(|scan| match &scan.outcome {
            InterfaceOutcome::Inspected(report) => Some((&scan.interface, report.as_ref())),
            _ => None,
        })
    }

    pub fn is_bad(&self) -> bool {
        self.reports().any(|(_, report)| report.is_bad())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Enumerate the host and scan every device passing the filter, handing
    /// each report to `on_device` as soon as that device is done
    pub fn scan(
        &self,
        host: &mut dyn UsbHost,
        mut on_device: impl FnMut(DeviceReport),
    ) -> Result<(), TransferError> {
        let devices = host.devices()?;
        debug!("Found {} devices", devices.len());
        for device in devices.iter().filter(|device| self.wants(device.as_ref())) {
            on_device(self.scan_device(device.as_ref()));
        }
        Ok(())
    }

    pub fn wants(&self, device: &dyn UsbDevice) -> bool {
        self.options
            .filter
            .is_none_or(|filter| filter.matches(&device.id()))
    }

    /// Inspect every HID interface of `device`. Failures on one interface do
    /// not prevent inspection of the others.
    pub fn scan_device(&self, device: &dyn UsbDevice) -> DeviceReport {
        let id = device.id();
        info!("Scanning device {id} with {} interfaces", device.interfaces().len());

        let interfaces = device
            .interfaces()
            .iter()
            .map(|interface| {
                let outcome = if !interface.is_hid() {
                    InterfaceOutcome::NotHid
                } else {
                    match self.inspect(device, interface) {
                        Ok(report) => InterfaceOutcome::Inspected(Box::new(report)),
                        Err(err) => {
                            warn!(
                                "Impossible to inspect {id} interface {}: {err}, ignoring interface",
                                interface.interface_number
                            );
                            InterfaceOutcome::Skipped(err)
                        }
                    }
                };
                InterfaceScan {
                    interface: *interface,
                    outcome,
                }
            })
            .collect();

        DeviceReport { id, interfaces }
    }

    /// Fetch the three descriptors of one HID interface and compare them
    pub fn inspect(
        &self,
        device: &dyn UsbDevice,
        interface: &InterfaceInfo,
    ) -> Result<InterfaceReport, TransferError> {
        let number = interface.interface_number;
        let mut source = device.claim(number)?;

        let config = self.fetch(source.as_mut(), DescriptorRequest::Config, number);
        let config = analyze(
            config.as_deref().unwrap_or_default(),
            DescriptorRequest::Config.descriptor_type(),
            number,
        );

        let hid = self.fetch(source.as_mut(), DescriptorRequest::HidDescriptor, number);
        let hid = analyze(
            hid.as_deref().unwrap_or_default(),
            DescriptorRequest::HidDescriptor.descriptor_type(),
            number,
        );

        let report = self.fetch(source.as_mut(), DescriptorRequest::ReportDescriptor, number);

        let result = check(
            config.report_length,
            hid.report_length,
            report.as_ref().map(Vec::len),
        );
        match &result {
            Some(result) if !result.is_consistent() => {
                warn!("{} interface {number}: {result:?}", device.id())
            }
            _ => debug!("{} interface {number}: {result:?}", device.id()),
        }

        Ok(InterfaceReport {
            config,
            hid,
            report,
            result,
        })
    }

    fn fetch(
        &self,
        source: &mut dyn DescriptorSource,
        request: DescriptorRequest,
        interface: u8,
    ) -> Option<Vec<u8>> {
        let mut buf = vec![0; self.options.buffer_size];
        match source.fetch_descriptor(request, interface, &mut buf, self.options.timeout) {
            Ok(len) => {
                debug!("{request:?} for interface {interface}: got {len} bytes");
                buf.truncate(len);
                Some(buf)
            }
            Err(err) => {
                warn!("{request:?} for interface {interface}: {err}");
                None
            }
        }
    }
}
