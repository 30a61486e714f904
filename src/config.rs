//! Generator configuration
//!
//! The generator never reads global constants directly: every run takes a
//! [`TableConfig`], whose defaults come from [`params`].

pub mod params;

pub use params::*;

/// All inputs of one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    // === Motor ===
    /// Motor pole pairs
    pub pole_pairs: u8,
    /// Commutation steps per electrical cycle
    pub steps_per_cycle: u8,
    /// Slowest covered speed [RPM]
    pub min_rpm: f64,
    /// Fastest covered speed [RPM]
    pub max_rpm: f64,
    /// Speed at which back-EMF equals bus voltage [RPM]
    pub bemf_rpm: f64,

    // === PWM timing ===
    /// Timer input clock [Hz]
    pub clock_hz: f64,
    /// Clocks per PWM update
    pub pwm_divisor: f64,

    // === Coil ===
    /// Phase resistance [Ohm]
    pub coil_resistance: f64,
    /// Phase inductance [H]
    pub coil_inductance: f64,

    // === Tables ===
    /// Sine table length
    pub n_samps: usize,
    /// Step rate fixed-point scale
    pub dither_scale: u32,
    /// Flash available for phase bucket tables [bytes]
    pub flash_budget: usize,
    /// Width of one phase entry [bytes]
    pub bytes_per_sample: usize,
    /// Optional upper bound on phase buckets, below what the budget allows
    pub max_buckets: Option<usize>,

    // === Feature switches ===
    /// Build the phase compensation table set
    pub emit_phase_tables: bool,
    /// Append a 0 sentinel to the bucket frequency table
    pub append_f0_sentinel: bool,
    /// Advance phase entries by half a PWM period
    pub compensate_pwm_delay: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            pole_pairs: DEFAULT_POLE_PAIRS,
            steps_per_cycle: STEPS_PER_CYCLE,
            min_rpm: DEFAULT_MIN_RPM,
            max_rpm: DEFAULT_MAX_RPM,
            bemf_rpm: DEFAULT_BEMF_RPM,

            clock_hz: pwm::DEFAULT_CLOCK_HZ,
            pwm_divisor: pwm::DEFAULT_DIVISOR,

            coil_resistance: coil::DEFAULT_RESISTANCE,
            coil_inductance: coil::DEFAULT_INDUCTANCE,

            n_samps: sine::N_SAMPS,
            dither_scale: step_rate::DEFAULT_DITHER_SCALE,
            flash_budget: phase::DEFAULT_FLASH_BUDGET,
            bytes_per_sample: phase::DEFAULT_BYTES_PER_SAMPLE,
            max_buckets: None,

            emit_phase_tables: true,
            append_f0_sentinel: phase::DEFAULT_APPEND_SENTINEL,
            compensate_pwm_delay: phase::DEFAULT_COMPENSATE_PWM_DELAY,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// PWM update rate [Hz]
    ///
    /// One table lookup happens per PWM update, so this is also the rate at
    /// which the firmware advances its sine position.
    pub fn update_rate_hz(&self) -> f64 {
        self.clock_hz / self.pwm_divisor
    }
}
