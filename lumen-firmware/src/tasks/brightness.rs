//! Ambient brightness task
//!
//! Samples the light sensor, maps it to a duty and publishes the ON/OFF
//! times for the PWM interrupt.

use defmt::*;
use embassy_time::{Duration, Ticker};

use lumen_core::brightness::{duty_to_timing, BrightnessController};
use lumen_core::config::{BrightnessConfig, PwmConfig};
use lumen_core::traits::LightSensor;
use lumen_drivers::sensor::Photoresistor;
use lumen_hal_rp2040::RpAdc;

use crate::pwm::PWM_TIMING;

#[embassy_executor::task]
pub async fn brightness_task(
    mut sensor: Photoresistor<RpAdc>,
    config: BrightnessConfig,
    pwm: PwmConfig,
) {
    info!("Brightness task started");

    let controller = BrightnessController::new(config);
    let period_us = pwm.period_us();
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.sample_interval_ms)));
    let mut last_duty = None;

    loop {
        let reading = sensor.read_raw();
        if let Err(e) = reading {
            warn!("Light sensor read failed: {:?}, dimming", e);
        }

        let duty = controller.duty_from_reading(reading);
        PWM_TIMING.publish(duty_to_timing(duty, period_us, pwm.min_pulse_us));

        if last_duty != Some(duty) {
            debug!("Duty {}% (raw {:?})", duty, reading.ok());
            last_duty = Some(duty);
        }

        ticker.next().await;
    }
}
