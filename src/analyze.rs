//! Walk one received descriptor buffer and pull out the report descriptor
//! length declared for a given interface.

use std::fmt;

use log::*;

use crate::{
    Classified, DescriptorType, InterfaceContext, ParseError, classify, extract_report_length,
    walk,
};

/// Something observed while walking a descriptor chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    Record {
        offset: usize,
        length: u8,
        descriptor_type: u8,
    },
    Interface {
        number: u8,
        is_target: bool,
    },
    UnexpectedSubDescriptorCount {
        count: u8,
    },
    UnexpectedSubDescriptorType {
        descriptor_type: u8,
    },
    ReportLength {
        length: u16,
        is_target: bool,
    },
    Malformed(ParseError),
}

impl TraceEvent {
    /// Whether this event points at a defect in the device's descriptors
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            TraceEvent::UnexpectedSubDescriptorCount { .. }
                | TraceEvent::UnexpectedSubDescriptorType { .. }
                | TraceEvent::Malformed(_)
        )
    }
}

fn marker(is_target: bool) -> &'static str {
    if is_target { ">" } else { " " }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TraceEvent::Record {
                offset,
                length,
                descriptor_type,
            } => write!(
                f,
                "      [{offset}] >> type 0x{descriptor_type:02x} {} with length {length}",
                DescriptorType::name_of(descriptor_type)
            ),
            TraceEvent::Interface { number, is_target } => {
                write!(f, "{}       bInterfaceNumber = {number}", marker(is_target))
            }
            TraceEvent::UnexpectedSubDescriptorCount { count } => {
                write!(f, "        bNumDescriptors = {count} - BAD must be 1")
            }
            TraceEvent::UnexpectedSubDescriptorType { descriptor_type } => write!(
                f,
                "        bDescriptorType = 0x{descriptor_type:02x} {} - BAD must be 0x{:02x}",
                DescriptorType::name_of(descriptor_type),
                DescriptorType::Report as u8
            ),
            TraceEvent::ReportLength { length, is_target } => {
                write!(f, "{}       wDescriptorLength = {length}", marker(is_target))
            }
            TraceEvent::Malformed(err) => write!(f, "        {err} - BAD"),
        }
    }
}

/// Ordered record of everything a walk visited
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn push(&mut self, event: TraceEvent) {
        if event.is_warning() {
            warn!("{}", event.to_string().trim_start());
        } else {
            trace!("{}", event.to_string().trim_start());
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn warnings(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(|event| event.is_warning())
    }
}

/// Outcome of [analyze] on one buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub requested: DescriptorType,
    pub received: usize,
    pub target_interface: u8,
    /// `wDescriptorLength` of the report descriptor of the target interface
    pub report_length: Option<u16>,
    pub trace: Trace,
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "      === requested 0x{:02x} {} got {} bytes ===",
            self.requested as u8,
            self.requested.name(),
            self.received
        )?;
        for event in self.trace.events() {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

/// Walk the descriptors received for a `requested` fetch and return the report
/// descriptor length the chain declares for `target_interface`.
///
/// `data` holds exactly the bytes the device returned. The walk always runs to
/// the end of the chain so every descriptor ends up in the trace.
///
/// A HID descriptor request already names its interface in `wIndex`, so its
/// response is attributed to `target_interface` from the first byte. Any other
/// response has nothing attributed until an interface descriptor shows up.
pub fn analyze(data: &[u8], requested: DescriptorType, target_interface: u8) -> Analysis {
    let mut ctx = match requested {
        DescriptorType::Hid => InterfaceContext::addressed(target_interface),
        _ => InterfaceContext::new(target_interface),
    };
    let mut trace = Trace::default();
    let mut report_length = None;

    debug!(
        "Analyzing {} bytes of {} for interface {target_interface}",
        data.len(),
        requested.name()
    );

    for record in walk(data) {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                trace.push(TraceEvent::Malformed(err));
                break;
            }
        };
        trace.push(TraceEvent::Record {
            offset: record.offset,
            length: record.length,
            descriptor_type: record.descriptor_type,
        });

        match classify(&record) {
            Ok(Classified::Interface { number }) => {
                ctx.on_interface(number);
                trace.push(TraceEvent::Interface {
                    number,
                    is_target: ctx.is_target_active(),
                });
            }
            Ok(hid @ Classified::Hid {
                num_descriptors,
                sub_descriptors,
            }) => {
                if hid.has_unexpected_count() {
                    trace.push(TraceEvent::UnexpectedSubDescriptorCount {
                        count: num_descriptors,
                    });
                }
                if let Some(len) =
                    extract_report_length(record, num_descriptors, sub_descriptors, &ctx, &mut trace)
                {
                    report_length = Some(len);
                }
            }
            Ok(Classified::Other) => {}
            Err(err) => {
                if record.descriptor_type == DescriptorType::Interface as u8 {
                    ctx.on_unknown_interface();
                }
                trace.push(TraceEvent::Malformed(err));
            }
        }
    }

    Analysis {
        requested,
        received: data.len(),
        target_interface,
        report_length,
        trace,
    }
}
