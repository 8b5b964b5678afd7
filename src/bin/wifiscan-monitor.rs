//! CLI tool to watch Wi-Fi scan batches from a serial device.
//!
//! Usage:
//!   wifiscan-monitor --port /dev/ttyUSB0 --baud 115200
//!   wifiscan-monitor --input capture.log
//!   cat /dev/ttyUSB0 | wifiscan-monitor --input -

use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wifiscan_monitor::source::{
    DEFAULT_BAUD_RATE, DEFAULT_POLL_INTERVAL, DEFAULT_PORT, DEFAULT_TIMEOUT_MS,
};
use wifiscan_monitor::{
    LineSource, Monitor, MonitorError, ReaderSource, Screen, SerialConfig, SerialSource,
};

/// Show the latest Wi-Fi scan reported by a serial-attached device as a
/// live table, strongest signal first.
#[derive(Parser)]
#[command(name = "wifiscan-monitor", version)]
struct Cli {
    /// Serial device to open
    #[arg(short, long, default_value = DEFAULT_PORT)]
    port: String,

    /// Baud rate of the serial link
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Serial read timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Read captured device output from a file (or - for stdin) instead
    /// of the serial port
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Log session details on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn serial_config(&self) -> SerialConfig {
        SerialConfig {
            port: self.port.clone(),
            baud_rate: self.baud,
            timeout: Duration::from_millis(self.timeout_ms),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_source(
    cli: &Cli,
    screen: &mut Screen<io::Stdout>,
) -> Result<Box<dyn LineSource>, MonitorError> {
    match &cli.input {
        Some(path) if path.as_os_str() == "-" => Ok(Box::new(ReaderSource::stdin())),
        Some(path) => Ok(Box::new(ReaderSource::open(path)?)),
        None => {
            let config = cli.serial_config();
            screen.connecting(&config.port, config.baud_rate)?;
            Ok(Box::new(SerialSource::open(&config)?))
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut screen = Screen::stdout();
    let mut source = match open_source(&cli, &mut screen) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "could not open byte source");
            let _ = screen.connection_error(&e);
            process::exit(1);
        }
    };

    let mut monitor = Monitor::new(screen);
    let result = monitor
        .screen_mut()
        .connected()
        .map_err(MonitorError::from)
        .and_then(|()| monitor.run(&mut source));

    let exit_code = match result {
        Ok(summary) => {
            info!(
                lines = summary.lines_read,
                records = summary.records_parsed,
                batches = summary.batches_started,
                displays = summary.displays,
                "monitor finished"
            );
            0
        }
        Err(e) => {
            error!(source = source.name(), error = %e, "monitor stopped");
            let _ = monitor.screen_mut().connection_error(&e);
            1
        }
    };

    if cli.input.is_none() {
        let _ = monitor.screen_mut().closing();
    }
    source.close();
    process::exit(exit_code);
}
