//! Ambient light to PWM duty mapping
//!
//! A photoresistor reading is mapped linearly onto a duty range, then the
//! duty is turned into an ON/OFF pair for the PWM scheduler. Both steps are
//! pure so they can be checked on the host.

use crate::config::BrightnessConfig;

/// ON/OFF phase lengths of one PWM period, in µs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseTimes {
    pub on_us: u32,
    pub off_us: u32,
}

impl PhaseTimes {
    /// Total period
    pub const fn period_us(&self) -> u32 {
        self.on_us.saturating_add(self.off_us)
    }

    /// 50 % split of `period_us`
    pub const fn half(period_us: u32) -> Self {
        let on_us = period_us / 2;
        Self {
            on_us,
            off_us: period_us - on_us,
        }
    }
}

/// Maps raw sensor samples to duty percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessController {
    config: BrightnessConfig,
}

impl BrightnessController {
    pub fn new(config: BrightnessConfig) -> Self {
        Self { config }
    }

    /// Duty used when the sensor cannot be read
    pub fn fallback_duty(&self) -> u8 {
        self.config.min_pct
    }

    /// Map a raw reading to a duty percentage
    ///
    /// Readings are clamped into `[bright_limit, dark_limit]`. Brighter
    /// rooms give lower readings and a higher duty.
    pub fn sample_to_duty(&self, raw: u16) -> u8 {
        let cfg = &self.config;
        if cfg.dark_limit <= cfg.bright_limit {
            return cfg.min_pct;
        }

        let raw = raw.clamp(cfg.bright_limit, cfg.dark_limit);
        let span = u32::from(cfg.dark_limit - cfg.bright_limit);
        let range = u32::from(cfg.max_pct.saturating_sub(cfg.min_pct));
        let drop = u32::from(raw - cfg.bright_limit) * range / span;

        // drop <= range, so the result stays within [min_pct, max_pct]
        cfg.max_pct.saturating_sub(drop as u8)
    }

    /// Duty for one sample attempt, failing dim on a sensor error
    pub fn duty_from_reading<E>(&self, reading: Result<u16, E>) -> u8 {
        match reading {
            Ok(raw) => self.sample_to_duty(raw),
            Err(_) => self.fallback_duty(),
        }
    }
}

/// Split `period_us` into ON/OFF times for `duty` percent
///
/// Any phase that exists is at least `min_pulse_us` long, borrowing from
/// the other phase so that ON + OFF stays equal to the period. Duty 0 and
/// 100 are left unclamped (pure OFF / pure ON). Duty above 100 is treated
/// as 100.
pub fn duty_to_timing(duty: u8, period_us: u32, min_pulse_us: u32) -> PhaseTimes {
    let duty = duty.min(100);
    let mut on_us = (u64::from(period_us) * u64::from(duty) / 100) as u32;
    let mut off_us = period_us - on_us;

    if duty > 0 && on_us < min_pulse_us {
        on_us = min_pulse_us.min(period_us);
        off_us = period_us - on_us;
    }
    if duty < 100 && off_us < min_pulse_us {
        off_us = min_pulse_us.min(period_us);
        on_us = period_us - off_us;
    }

    PhaseTimes { on_us, off_us }
}
