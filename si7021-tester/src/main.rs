use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use clap::Parser;
use linux_embedded_hal::{Delay, I2cdev};
use si7021::Si7021Builder;

/// Read humidity and temperature from a SI7021 sensor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// Time between samples, in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,
    /// Stop after this many samples
    #[arg(short, long)]
    count: Option<u64>,
    /// Turn the on-chip heater on while sampling
    #[arg(long, default_value_t = false)]
    heater: bool,
    /// Response read attempts before a measurement times out
    #[arg(long, default_value_t = 10)]
    read_attempts: u8,
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    log::info!("Arguments: {args:#?}");
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            log::info!("Received Ctrl+C, stopping...");
            running.store(false, Ordering::Relaxed);
        })
        .expect("Error setting Ctrl-C handler");
    }
    run(args, running);
}

fn run(args: Args, running: Arc<AtomicBool>) {
    log::info!("[SI] Opening bus: {}", args.path);
    let i2c = I2cdev::new(&args.path).expect("Failed to open I2C device");
    let mut si = Si7021Builder::default()
        .with_read_attempts(args.read_attempts)
        .build(i2c, Delay);

    if !si.initialize() {
        log::error!(
            "[SI] No sensor at address 0x{:02x} on {}",
            si.get_address(),
            args.path
        );
        std::process::exit(1);
    }
    log::info!("[SI] Device found at address 0x{:02x}", si.get_address());

    match si.read_serial_number() {
        Ok(sn) => log::info!(
            "[SI] Serial: {:016x}, device: {:?}",
            sn.value(),
            si7021::DeviceKind::from(sn.device_id())
        ),
        Err(e) => log::warn!("[SI] Could not read serial number: {e:?}"),
    }

    if args.heater {
        if let Err(e) = si.set_heater_enabled(true) {
            log::warn!("[SI] Could not enable heater: {e:?}");
        }
    }
    match si.heater_enabled() {
        Ok(on) => log::info!("[SI] Heater: {}", if on { "on" } else { "off" }),
        Err(e) => log::warn!("[SI] Could not read heater state: {e:?}"),
    }

    let interval = Duration::from_millis(args.interval_ms);
    let mut samples = 0u64;
    while running.load(Ordering::Relaxed) && args.count.is_none_or(|n| samples < n) {
        let start = Instant::now();
        match si.read_humidity_and_temperature() {
            Ok(env) => log::info!(
                "[SI] {:.2} %RH, {:.2} C, {:.2} F",
                env.humidity_basis_points as f32 / 100.0,
                env.celsius_hundredths as f32 / 100.0,
                env.fahrenheit_hundredths as f32 / 100.0
            ),
            Err(e) => log::warn!("[SI] Error reading: {e:?}"),
        }
        samples += 1;
        log::debug!(
            "[SI] Sample {samples} in {:.2} ms.",
            start.elapsed().as_secs_f64() * 1000.0
        );
        if let Some(rest) = interval.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    if args.heater {
        if let Err(e) = si.set_heater_enabled(false) {
            log::warn!("[SI] Could not disable heater: {e:?}");
        }
    }
    log::info!("[SI] Exiting after {samples} samples.");
}
