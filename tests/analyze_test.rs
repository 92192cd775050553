mod common;
use common::*;
use hid_desc_lint::*;

fn chain(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.concat()
}

#[test]
fn empty_buffer_is_not_found() {
    setup_test_logger();
    let analysis = analyze(&[], DescriptorType::Config, 0);
    assert_eq!(analysis.report_length, None);
    assert!(analysis.trace.events().is_empty());
}

#[test]
fn zero_length_stops_walk() {
    setup_test_logger();
    let mut data = chain(&[interface(0), hid_report(10)]);
    data.extend([0, 0x21]);
    // would override the result if the walk went on
    data.extend(hid_report(99));

    let analysis = analyze(&data, DescriptorType::Config, 0);
    assert_eq!(analysis.report_length, Some(10));
    let records = analysis
        .trace
        .events()
        .iter()
        .filter(|event| matches!(event, TraceEvent::Record { .. }))
        .count();
    assert_eq!(records, 2);
}

#[test]
fn analysis_is_repeatable() {
    setup_test_logger();
    let data = config(&[63, 52]);
    let first = analyze(&data, DescriptorType::Config, 1);
    let second = analyze(&data, DescriptorType::Config, 1);
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn attributes_to_preceding_interface() {
    setup_test_logger();
    let data = chain(&[interface(0), hid_report(10), interface(1), hid_report(20)]);
    assert_eq!(analyze(&data, DescriptorType::Config, 1).report_length, Some(20));
    assert_eq!(analyze(&data, DescriptorType::Config, 0).report_length, Some(10));
    assert_eq!(analyze(&data, DescriptorType::Config, 2).report_length, None);
}

#[test]
fn unreadable_interface_number_ends_attribution() {
    setup_test_logger();
    // the second interface descriptor is too short to hold bInterfaceNumber
    let data = chain(&[interface(0), hid_report(10), vec![2, 0x04], hid_report(99)]);
    let analysis = analyze(&data, DescriptorType::Config, 0);
    assert_eq!(analysis.report_length, Some(10));
    assert!(analysis.trace.events().contains(&TraceEvent::ReportLength {
        length: 99,
        is_target: false
    }));
    assert_eq!(analysis.trace.warnings().count(), 1);
}

#[test]
fn last_match_wins() {
    setup_test_logger();
    let data = chain(&[interface(1), hid_report(5), interface(1), hid_report(7)]);
    assert_eq!(analyze(&data, DescriptorType::Config, 1).report_length, Some(7));
}

#[test]
fn alternate_settings_keep_interface() {
    setup_test_logger();
    let data = chain(&[
        interface_alt(0, 0),
        hid_report(40),
        interface_alt(0, 1),
        hid_report(41),
    ]);
    assert_eq!(analyze(&data, DescriptorType::Config, 0).report_length, Some(41));
}

#[test]
fn two_sub_descriptors_still_extracted() {
    setup_test_logger();
    let data = chain(&[interface(0), hid(&[(0x23, 12), (0x22, 88)])]);
    let analysis = analyze(&data, DescriptorType::Config, 0);
    assert_eq!(analysis.report_length, Some(88));
    let warnings: Vec<_> = analysis.trace.warnings().cloned().collect();
    assert_eq!(
        warnings,
        vec![
            TraceEvent::UnexpectedSubDescriptorCount { count: 2 },
            TraceEvent::UnexpectedSubDescriptorType {
                descriptor_type: 0x23
            },
        ]
    );
}

#[test]
fn standalone_hid_descriptor() {
    setup_test_logger();
    // a HID descriptor request returns the HID descriptor alone, with no
    // interface descriptor in front of it
    let data = hid_report(63);
    assert_eq!(analyze(&data, DescriptorType::Hid, 2).report_length, Some(63));
    // inside a configuration descriptor the same bytes belong to no interface
    assert_eq!(analyze(&data, DescriptorType::Config, 0).report_length, None);
}

#[test]
fn oversized_length_stays_in_bounds() {
    setup_test_logger();
    let mut data = interface(0);
    // claims 255 bytes but the buffer ends after bNumDescriptors
    data.extend([0xFF, 0x21, 0x11, 0x01, 0x00, 0x01]);
    let analysis = analyze(&data, DescriptorType::Config, 0);
    assert_eq!(analysis.report_length, None);
    assert!(analysis.trace.events().iter().any(|event| matches!(
        event,
        TraceEvent::Malformed(ParseError::FieldOutOfBounds {
            offset: 9,
            field: 6,
            max: 15,
            ..
        })
    )));
}

#[test]
fn truncated_report_length() {
    setup_test_logger();
    let mut data = chain(&[interface(0), hid_report(0x0140)]);
    // drop the high byte of wDescriptorLength
    data.pop();
    let analysis = analyze(&data, DescriptorType::Config, 0);
    assert_eq!(analysis.report_length, None);
    assert_eq!(analysis.trace.warnings().count(), 1);
}

#[test]
fn lone_length_byte() {
    setup_test_logger();
    let analysis = analyze(&[9], DescriptorType::Config, 0);
    assert_eq!(analysis.report_length, None);
    assert_eq!(
        analysis.trace.events(),
        &[TraceEvent::Malformed(ParseError::TruncatedHeader {
            offset: 0,
            max: 1
        })]
    );
}

#[test]
fn little_endian_length() {
    setup_test_logger();
    let data = chain(&[interface(0), hid_report(0x0134)]);
    assert_eq!(
        analyze(&data, DescriptorType::Config, 0).report_length,
        Some(308)
    );
}
