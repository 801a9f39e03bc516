//! Lumen - ambient-dimmed LED matrix firmware
//!
//! Drives a daisy-chain of MAX7219 8x8 matrices from an RP2040, showing a
//! scrolling or fixed message. Perceived brightness follows the room: a
//! photoresistor sets the duty of a SHUTDOWN toggle run from a hardware
//! alarm interrupt.
//!
//! Startup order matters:
//! 1. Parse and validate the embedded configuration
//! 2. Claim pins, build the bit-banged chain bus and install it
//! 3. Initialise the chips (fatal on failure)
//! 4. Publish the initial PWM timing, then start the PWM interrupt
//! 5. Spawn the brightness and content tasks

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::Level;
use {defmt_rtt as _, panic_probe as _};

use lumen_core::brightness::PhaseTimes;
use lumen_core::config::{parse_config, DisplayConfig};
use lumen_drivers::max7219::{BitBang, Max7219};
use lumen_drivers::sensor::Photoresistor;
use lumen_hal::SpiConfig;
use lumen_hal_rp2040::{PinBank, PinError, RpAdc};

use crate::bus::{CycleDelay, SharedBus};

mod bus;
mod pwm;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lumen firmware starting...");

    let p = embassy_rp::init(Default::default());

    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid display.toml: {:?}", e);
            return;
        }
    };
    info!(
        "Config: {} chips, {} Hz PWM, {:?} mode",
        config.chain.chip_count, config.pwm.frequency_hz, config.content.mode
    );

    let (mut pins, adc) = PinBank::from_peripherals(p);

    let bus = match build_bus(&mut pins, &config) {
        Ok(bus) => bus,
        Err(e) => {
            error!("Chain pin setup failed: {:?}", e);
            return;
        }
    };
    bus::install(bus);

    let sensor_channel = match pins.take_adc_channel(config.brightness.sensor_pin) {
        Ok(channel) => channel,
        Err(e) => {
            error!("Light sensor setup failed: {:?}", e);
            return;
        }
    };
    let sensor = Photoresistor::new(RpAdc::new(adc, sensor_channel));

    let mut display = Max7219::new(
        SharedBus,
        usize::from(config.chain.chip_count),
        config.chain.order,
    );
    if let Err(e) = display.init() {
        error!("Display init failed: {:?}", e);
        return;
    }
    // Lowest useful hardware intensity leaves the dimming range to the PWM
    if let Err(e) = display.set_intensity(config.content.intensity) {
        warn!("Setting intensity failed: {:?}", e);
    }
    info!(
        "Display initialized: {} columns",
        display.framebuffer().width()
    );

    let period_us = config.pwm.period_us();
    pwm::PWM_TIMING.publish(PhaseTimes::half(period_us));
    pwm::start(*display.encoder(), period_us);
    info!("Brightness PWM started ({} us period)", period_us);

    let DisplayConfig {
        brightness,
        pwm: pwm_config,
        content,
        ..
    } = config;

    spawner
        .spawn(tasks::brightness_task(sensor, brightness, pwm_config))
        .unwrap();
    spawner
        .spawn(tasks::content_task(display, content))
        .unwrap();

    info!("All tasks spawned");
}

/// Claim the chain pins and build the bit-banged bus
fn build_bus(pins: &mut PinBank, config: &DisplayConfig) -> Result<bus::ChainBus, PinError> {
    let data = pins.take_output(config.chain.data_pin, Level::Low)?;
    let clock = pins.take_output(config.chain.clock_pin, Level::Low)?;
    let select = pins.take_output(config.chain.select_pin, Level::High)?;

    Ok(BitBang::new(
        data,
        clock,
        select,
        CycleDelay::new(clk_sys_freq()),
        SpiConfig::max7219(config.chain.bus_clock_hz),
    ))
}
