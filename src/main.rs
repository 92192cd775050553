use std::collections::BTreeSet;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use hid_desc_lint::*;
use log::*;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Rusb,
    #[cfg(feature = "nusb")]
    Nusb,
}

#[derive(Parser, Debug)]
#[command(
    name = "hid-desc-lint",
    about = "Check that USB HID devices agree with themselves about the length of their report descriptor"
)]
struct Args {
    /// Only scan devices matching VID or VID:PID (hex)
    #[arg(long, value_name = "VID[:PID]")]
    device: Option<DeviceFilter>,

    /// Timeout of each control transfer in milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Size of the receive buffer in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_SIZE,
          value_parser = parse_buffer_size)]
    buffer_size: usize,

    /// USB stack to use
    #[arg(long, value_enum, default_value_t = Backend::Rusb)]
    backend: Backend,

    /// Only print the result of each HID interface
    #[arg(long, short, action = clap::ArgAction::SetTrue)]
    quiet: bool,
}

fn parse_buffer_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|err| format!("{err}"))?;
    if size < 9 {
        return Err("must hold at least a configuration descriptor header (9 bytes)".into());
    }
    Ok(size)
}

fn print_device(report: &DeviceReport, quiet: bool) {
    let numbers: BTreeSet<_> = report
        .interfaces
        .iter()
        .map(|scan| scan.interface.interface_number)
        .collect();
    if !quiet {
        println!("device {} with {} interfaces", report.id, numbers.len());
    }

    for scan in &report.interfaces {
        let interface = &scan.interface;
        if !quiet {
            println!(
                "  interface {} alternate {} is class {}",
                interface.interface_number,
                interface.alternate_setting,
                ClassCode::name_of(interface.interface_class)
            );
        }
        let inspected = match &scan.outcome {
            InterfaceOutcome::NotHid => continue,
            InterfaceOutcome::Skipped(err) => {
                println!("      {err}");
                continue;
            }
            InterfaceOutcome::Inspected(inspected) => inspected,
        };

        if !quiet {
            println!("\n{}", inspected.config);
            println!("{}", inspected.hid);
            match &inspected.report {
                Some(bytes) => println!(
                    "      === requested 0x{:02x} {} got {} bytes ===\n     {}",
                    DescriptorType::Report as u8,
                    DescriptorType::Report.name(),
                    bytes.len(),
                    hex_dump(bytes)
                ),
                None => println!(
                    "      === requested 0x{:02x} {} failed ===",
                    DescriptorType::Report as u8,
                    DescriptorType::Report.name()
                ),
            }
        }

        if let Some(result) = &inspected.result {
            println!(
                "\n      === result for device {} interface {} ===",
                report.id, interface.interface_number
            );
            println!("{result}");
        }
    }
    if !quiet {
        println!();
    }
}

fn run(args: Args) -> anyhow::Result<bool> {
    let mut host: Box<dyn UsbHost> = match args.backend {
        Backend::Rusb => Box::new(RusbHost::new()),
        #[cfg(feature = "nusb")]
        Backend::Nusb => Box::new(NusbHost::new()),
    };
    let scanner = Scanner::new(ScanOptions {
        timeout: Duration::from_millis(args.timeout_ms),
        buffer_size: args.buffer_size,
        filter: args.device,
    });

    let mut bad = false;
    scanner
        .scan(host.as_mut(), |report| {
            print_device(&report, args.quiet);
            bad |= report.is_bad();
        })
        .context("Failed to enumerate USB devices")?;
    Ok(bad)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(2)
        }
    }
}
