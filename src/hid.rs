//! Class descriptors listed by a HID descriptor (HID 1.11, section 6.2.1).

use std::iter::FusedIterator;

use crate::{DescriptorRecord, DescriptorType, InterfaceContext, ParseError, Trace, TraceEvent};

/// Size of one `bDescriptorType`/`wDescriptorLength` pair
const ENTRY_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HidSubDescriptor {
    pub descriptor_type: u8,
    pub length: u16,
}

impl HidSubDescriptor {
    pub fn is_report(&self) -> bool {
        self.descriptor_type == DescriptorType::Report as u8
    }
}

/// Iterator over the sub-descriptor array of a HID descriptor
#[derive(Clone, Debug)]
pub struct SubDescriptors<'a> {
    record: DescriptorRecord<'a>,
    start: usize,
    index: usize,
    count: usize,
}

impl Iterator for SubDescriptors<'_> {
    type Item = Result<HidSubDescriptor, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let offset = self.start + ENTRY_SIZE * self.index;
        self.index += 1;

        let entry = self.record.byte(offset).and_then(|descriptor_type| {
            Ok(HidSubDescriptor {
                descriptor_type,
                length: self.record.le_u16(offset + 1)?,
            })
        });
        if entry.is_err() {
            self.index = self.count;
        }
        Some(entry)
    }
}

impl FusedIterator for SubDescriptors<'_> {}

pub fn sub_descriptors<'a>(
    record: DescriptorRecord<'a>,
    num_descriptors: u8,
    start: usize,
) -> SubDescriptors<'a> {
    SubDescriptors {
        record,
        start,
        index: 0,
        count: num_descriptors as usize,
    }
}

/// Report descriptor length declared by a HID descriptor.
///
/// Every entry is traced; a length is only returned when `ctx` says the HID
/// descriptor belongs to the target interface. With several report entries the
/// last one wins. An entry that does not fit in the descriptor ends the scan of
/// this descriptor, keeping what was found before it.
pub fn extract_report_length(
    record: DescriptorRecord<'_>,
    num_descriptors: u8,
    start: usize,
    ctx: &InterfaceContext,
    trace: &mut Trace,
) -> Option<u16> {
    let mut found = None;
    for entry in sub_descriptors(record, num_descriptors, start) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                trace.push(TraceEvent::Malformed(err));
                break;
            }
        };
        if !entry.is_report() {
            trace.push(TraceEvent::UnexpectedSubDescriptorType {
                descriptor_type: entry.descriptor_type,
            });
            continue;
        }

        let is_target = ctx.is_target_active();
        trace.push(TraceEvent::ReportLength {
            length: entry.length,
            is_target,
        });
        if is_target {
            found = Some(entry.length);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::tests::*;
    use crate::walk;

    fn first_record(data: &[u8]) -> DescriptorRecord<'_> {
        walk(data).next().unwrap().unwrap()
    }

    fn active(target: u8) -> InterfaceContext {
        let mut ctx = InterfaceContext::new(target);
        ctx.on_interface(target);
        ctx
    }

    #[test]
    fn reads_entries() {
        let data = hid(&[(0x22, 0x0134), (0x23, 7)]);
        let entries: Vec<_> = sub_descriptors(first_record(&data), 2, 6)
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            entries,
            vec![
                HidSubDescriptor {
                    descriptor_type: 0x22,
                    length: 0x0134
                },
                HidSubDescriptor {
                    descriptor_type: 0x23,
                    length: 7
                },
            ]
        );
        assert!(entries[0].is_report());
        assert!(!entries[1].is_report());
    }

    #[test]
    fn extracts_for_target() {
        setup_test_logger();
        let data = hid_report(63);
        let mut trace = Trace::default();
        let len = extract_report_length(first_record(&data), 1, 6, &active(0), &mut trace);
        assert_eq!(len, Some(63));
        assert_eq!(
            trace.events(),
            &[TraceEvent::ReportLength {
                length: 63,
                is_target: true
            }]
        );
    }

    #[test]
    fn observes_other_interface() {
        setup_test_logger();
        let data = hid_report(63);
        let mut ctx = InterfaceContext::new(1);
        ctx.on_interface(0);
        let mut trace = Trace::default();
        let len = extract_report_length(first_record(&data), 1, 6, &ctx, &mut trace);
        assert_eq!(len, None);
        assert_eq!(
            trace.events(),
            &[TraceEvent::ReportLength {
                length: 63,
                is_target: false
            }]
        );
    }

    #[test]
    fn skips_non_report_entries() {
        setup_test_logger();
        let data = hid(&[(0x23, 9), (0x22, 40)]);
        let mut trace = Trace::default();
        let len = extract_report_length(first_record(&data), 2, 6, &active(0), &mut trace);
        assert_eq!(len, Some(40));
        assert_eq!(
            trace.events()[0],
            TraceEvent::UnexpectedSubDescriptorType {
                descriptor_type: 0x23
            }
        );
    }

    #[test]
    fn entry_past_descriptor_end() {
        setup_test_logger();
        // declares two entries but only has room for one
        let mut data = hid_report(21);
        data[5] = 2;
        let mut trace = Trace::default();
        let len = extract_report_length(first_record(&data), 2, 6, &active(0), &mut trace);
        assert_eq!(len, Some(21));
        assert!(matches!(
            trace.events()[1],
            TraceEvent::Malformed(ParseError::FieldOutOfBounds { field: 9, .. })
        ));
    }

    #[test]
    fn last_report_entry_wins() {
        setup_test_logger();
        let data = hid(&[(0x22, 5), (0x22, 7)]);
        let mut trace = Trace::default();
        let len = extract_report_length(first_record(&data), 2, 6, &active(3), &mut trace);
        assert_eq!(len, Some(7));
        assert_eq!(trace.events().len(), 2);
    }
}
