use std::{
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use clap::Parser;
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use ens210::{DEFAULT_SOLDER_CORRECTION, Ens210, Ens210Builder, Reading, convert};
use linux_embedded_hal::{Delay, I2cdev};

/// Read temperature and relative humidity from an ENS210 sensor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// Solder correction in 1/64 K, subtracted from every temperature
    #[arg(short, long, default_value_t = DEFAULT_SOLDER_CORRECTION, allow_negative_numbers = true)]
    correction: i16,
    /// Time between measurements in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,
    /// Number of measurements to take, runs until Ctrl+C if omitted
    #[arg(short = 'n', long)]
    count: Option<usize>,
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    log::debug!("Arguments: {args:#?}");
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            log::info!("Received Ctrl+C, stopping...");
            running.store(false, Ordering::Relaxed);
        }) {
            log::warn!("Could not set Ctrl+C handler: {e}");
        }
    }

    log::info!("[ENS210] {}> Opening bus", args.path);
    let mut i2c = match I2cdev::new(&args.path) {
        Ok(i2c) => i2c,
        Err(e) => {
            log::error!("[ENS210] {}> Could not open bus: {e}", args.path);
            return ExitCode::FAILURE;
        }
    };
    let mut delay = Delay;
    let mut ens = match Ens210Builder::default()
        .with_solder_correction(args.correction)
        .build_identified(&mut i2c, &mut delay)
    {
        Ok((ens, id)) => {
            log::info!(
                "[ENS210] {}> Device found at address 0x{:02x}: part 0x{:04x}, uid 0x{:016x}",
                args.path,
                ens.get_address(),
                id.part_id,
                id.uid
            );
            ens
        }
        Err(e) => {
            log::error!("[ENS210] {}> Initialization failed: {e:?}", args.path);
            return ExitCode::FAILURE;
        }
    };
    run(&args, &running, &mut ens, &mut i2c, &mut delay);
    log::info!("[ENS210] {}> Exiting.", args.path);
    ExitCode::SUCCESS
}

fn run<T: I2c<SevenBitAddress>, D: DelayNs>(
    args: &Args,
    running: &AtomicBool,
    ens: &mut Ens210,
    i2c: &mut T,
    delay: &mut D,
) {
    let path = &args.path;
    let interval = Duration::from_millis(args.interval_ms);
    let mut taken = 0;
    while running.load(Ordering::Relaxed) && args.count.is_none_or(|n| taken < n) {
        let start = Instant::now();
        let m = ens.measure(i2c, delay);
        taken += 1;
        report_temperature(path, ens, &m.temperature);
        report_humidity(path, &m.humidity);
        log::debug!(
            "[ENS210] {path}> Measured in {:.2} ms.",
            start.elapsed().as_secs_f64() * 1000.0
        );
        if let Some(rest) = interval.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

fn report_temperature(path: &str, ens: &Ens210, r: &Reading) {
    match r.ok() {
        Some(t) => {
            let c = ens.to_celsius(t, 100);
            let f = ens.to_fahrenheit(t, 100);
            log::info!(
                "[ENS210] {path}> T = {} K = {}{}.{:02} C = {}{}.{:02} F",
                ens.kelvin(t),
                if c < 0 { "-" } else { "" },
                c.abs() / 100,
                c.abs() % 100,
                if f < 0 { "-" } else { "" },
                f.abs() / 100,
                f.abs() % 100,
            );
        }
        None => log::warn!("[ENS210] {path}> Temperature: {}", r.status),
    }
}

fn report_humidity(path: &str, r: &Reading) {
    match r.ok() {
        Some(h) => log::info!(
            "[ENS210] {path}> H = {} %RH ({:.1}%)",
            convert::relative_humidity(h),
            convert::to_percentage_h(h, 10) as f32 / 10.0
        ),
        None => log::warn!("[ENS210] {path}> Humidity: {}", r.status),
    }
}
