// Unit and range conversion
//
// Physical motor parameters -> electrical frequency range -> sensor interval
// range. All intervals are measured between two consecutive hall sensor
// edges, i.e. one commutation step.

use core::f64::consts::PI;

use tracing::debug;

use crate::config::TableConfig;
use crate::error::{Result, TableError};

/// Microseconds per second
pub const US_PER_S: f64 = 1_000_000.0;

/// Validated physical parameters of the motor and PWM timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParameters {
    pub pole_pairs: u8,
    pub steps_per_cycle: u8,
    pub min_rpm: f64,
    pub max_rpm: f64,
    /// PWM update rate [Hz]
    pub update_rate_hz: f64,
    /// Phase resistance [Ohm]
    pub coil_resistance: f64,
    /// Phase inductance [H]
    pub coil_inductance: f64,
}

/// Electrical frequency range [Hz]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRange {
    pub min_freq_hz: f64,
    pub max_freq_hz: f64,
}

/// Commutation interval range [us]
///
/// `min_interval_us` belongs to `max_freq_hz`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRange {
    pub min_interval_us: f64,
    pub max_interval_us: f64,
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TableError::configuration(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

impl PhysicalParameters {
    /// Validate the motor and timer part of a configuration
    ///
    /// # Errors
    /// `TableError::Configuration` for zero pole pairs or steps, an inverted
    /// or non-positive RPM range, and non-positive clock, divisor or coil
    /// values.
    pub fn from_config(config: &TableConfig) -> Result<Self> {
        if config.pole_pairs == 0 {
            return Err(TableError::configuration("pole_pairs must be at least 1"));
        }
        if config.steps_per_cycle == 0 {
            return Err(TableError::configuration(
                "steps_per_cycle must be at least 1",
            ));
        }
        require_positive("min_rpm", config.min_rpm)?;
        require_positive("max_rpm", config.max_rpm)?;
        if config.min_rpm >= config.max_rpm {
            return Err(TableError::configuration(format!(
                "min_rpm ({}) must be below max_rpm ({})",
                config.min_rpm, config.max_rpm
            )));
        }
        require_positive("clock_hz", config.clock_hz)?;
        require_positive("pwm_divisor", config.pwm_divisor)?;
        require_positive("coil_resistance", config.coil_resistance)?;
        require_positive("coil_inductance", config.coil_inductance)?;

        let params = Self {
            pole_pairs: config.pole_pairs,
            steps_per_cycle: config.steps_per_cycle,
            min_rpm: config.min_rpm,
            max_rpm: config.max_rpm,
            update_rate_hz: config.update_rate_hz(),
            coil_resistance: config.coil_resistance,
            coil_inductance: config.coil_inductance,
        };
        debug!("Physical parameters: {:?}", params);
        Ok(params)
    }

    /// Electrical frequency at a shaft speed [Hz]
    pub fn rpm_to_freq_hz(&self, rpm: f64) -> f64 {
        self.pole_pairs as f64 * rpm / 60.0
    }

    /// Sensor interval at an electrical frequency [us]
    pub fn freq_to_interval_us(&self, freq_hz: f64) -> f64 {
        US_PER_S / (freq_hz * self.steps_per_cycle as f64)
    }

    /// Electrical frequency at a sensor interval [Hz]
    pub fn interval_to_freq_hz(&self, interval_us: f64) -> f64 {
        US_PER_S / (interval_us * self.steps_per_cycle as f64)
    }

    pub fn frequency_range(&self) -> FrequencyRange {
        FrequencyRange {
            min_freq_hz: self.rpm_to_freq_hz(self.min_rpm),
            max_freq_hz: self.rpm_to_freq_hz(self.max_rpm),
        }
    }

    /// Interval range; the shortest interval comes from the highest frequency
    pub fn interval_range(&self) -> IntervalRange {
        let freq = self.frequency_range();
        IntervalRange {
            min_interval_us: self.freq_to_interval_us(freq.max_freq_hz),
            max_interval_us: self.freq_to_interval_us(freq.min_freq_hz),
        }
    }

    /// Corner frequency of the coil low-pass, 1 / (2*pi*R*L) [Hz]
    pub fn coil_corner_hz(&self) -> f64 {
        1.0 / (2.0 * PI * self.coil_resistance * self.coil_inductance)
    }
}
