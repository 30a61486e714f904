//! Default generator parameters
//!
//! Values describe the reference build: an ATmega328 at 16 MHz driving a
//! 2 pole-pair outrunner with phase correct 8-bit PWM.

/// Motor pole pairs (electrical cycles per shaft revolution)
pub const DEFAULT_POLE_PAIRS: u8 = 2;

/// Commutation steps per electrical cycle (always 6 for six-step drive)
pub const STEPS_PER_CYCLE: u8 = 6;

/// Slowest speed the tables must cover [RPM]
pub const DEFAULT_MIN_RPM: f64 = 600.0;

/// Fastest speed the tables must cover [RPM]
pub const DEFAULT_MAX_RPM: f64 = 6000.0;

/// Speed at which back-EMF equals the nominal bus voltage [RPM]
pub const DEFAULT_BEMF_RPM: f64 = 5600.0;

/// PWM timing
pub mod pwm {
    /// CPU / timer input clock [Hz]
    pub const DEFAULT_CLOCK_HZ: f64 = 16_000_000.0;

    /// Clock divisor for one PWM update
    /// (prescaler 1, phase correct 8-bit counts 0..255..0 = 510 clocks)
    pub const DEFAULT_DIVISOR: f64 = 510.0;

    /// Maximum duty register value
    pub const DUTY_MAX: u8 = 255;
}

/// Coil electrical characteristic
pub mod coil {
    /// Phase resistance [Ohm]
    pub const DEFAULT_RESISTANCE: f64 = 0.8;

    /// Phase inductance [H]
    pub const DEFAULT_INDUCTANCE: f64 = 0.002;
}

/// Sine table
pub mod sine {
    /// Entries per electrical cycle, a multiple of 3 so the three phases
    /// sit exactly N/3 apart
    pub const N_SAMPS: usize = 768 * 5;

    /// Sample amplitude ceiling
    pub const AMPLITUDE: f64 = 255.0;
}

/// Step rate table
pub mod step_rate {
    /// Fixed-point scale of the sine position accumulator (8 fractional bits)
    pub const DEFAULT_DITHER_SCALE: u32 = 256;
}

/// Phase compensation table set
pub mod phase {
    /// Flash reserved for the bucket tables [bytes]
    pub const DEFAULT_FLASH_BUDGET: usize = 8192;

    /// Storage width of one phase entry [bytes]
    pub const DEFAULT_BYTES_PER_SAMPLE: usize = 2;

    /// Terminate the bucket frequency table with a 0 entry
    pub const DEFAULT_APPEND_SENTINEL: bool = true;

    /// Add half a PWM period of phase advance to every entry
    pub const DEFAULT_COMPENSATE_PWM_DELAY: bool = false;
}

/// Serializer layout
pub mod output {
    /// Entries per line in an emitted array literal
    pub const ENTRIES_PER_LINE: usize = 256;
}
