//! Replay Transmit Main Application
//!
//! Entry point for the handheld replay firmware. Initializes hardware
//! and spawns the dispatch and control tasks.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use replay_firmware::dispatch;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Replay TX Firmware v{}", env!("CARGO_PKG_VERSION"));

    // Initialize peripherals with default clock configuration
    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // Status LED
    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // Spawn background tasks
    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(dispatch::cycle_timer_task()).unwrap();
    // The control task needs the platform's streaming backend (SD card
    // reader, baseband pipeline); spawn it once the board support
    // package provides one:
    // spawner.spawn(replay_control_task(backend)).unwrap();

    info!("Tasks spawned, entering main loop");

    // Main loop - additional coordination can happen here
    loop {
        Timer::after(Duration::from_secs(10)).await;
        info!("Main loop tick");
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
