// Interval <-> table index mapping
//
// The firmware measures the sensor interval with a timer that ticks once per
// PWM update, so one table index ("tick") is one PWM period wide.

use libm::floor;
use tracing::debug;

use crate::error::{Result, TableError};
use crate::units::{IntervalRange, PhysicalParameters, US_PER_S};

/// Valid table index domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexDomain {
    /// Width of one tick [us]
    pub resolution_us: f64,
    /// Tick of the first table entry
    pub table_min_tick: u32,
    /// Tick one past the last table entry
    pub table_max_tick: u32,
    /// Number of entries in every per-tick table
    pub table_size: usize,
}

impl IndexDomain {
    /// Build the domain covering an interval range
    ///
    /// Both bounds are truncated, never rounded: a partial tick at the slow
    /// end is dropped instead of extending past the timer's range.
    ///
    /// # Errors
    /// * `Configuration` if the shortest interval is under one tick or the
    ///   range collapses to zero ticks
    /// * `DomainViolation` if the resolution or a bound is not a usable number
    pub fn new(params: &PhysicalParameters, intervals: &IntervalRange) -> Result<Self> {
        let resolution_us = US_PER_S / params.update_rate_hz;
        if !(resolution_us.is_finite() && resolution_us > 0.0) {
            return Err(TableError::domain(format!(
                "tick resolution {} us is not positive",
                resolution_us
            )));
        }

        let min_tick = floor(intervals.min_interval_us / resolution_us);
        let max_tick = floor(intervals.max_interval_us / resolution_us);
        if !(min_tick >= 0.0 && max_tick <= u32::MAX as f64) {
            return Err(TableError::domain(format!(
                "tick bounds {}..{} outside the timer range",
                min_tick, max_tick
            )));
        }

        let table_min_tick = min_tick as u32;
        let table_max_tick = max_tick as u32;
        if table_min_tick == 0 {
            return Err(TableError::configuration(format!(
                "max RPM too fast for update rate: {:.3} us interval under one {:.3} us tick",
                intervals.min_interval_us, resolution_us
            )));
        }
        if table_max_tick <= table_min_tick {
            return Err(TableError::configuration(format!(
                "interval range {:.1}..{:.1} us spans less than one {:.3} us tick",
                intervals.min_interval_us, intervals.max_interval_us, resolution_us
            )));
        }

        let domain = Self {
            resolution_us,
            table_min_tick,
            table_max_tick,
            table_size: (table_max_tick - table_min_tick) as usize,
        };
        debug!(
            "Index domain: ticks {}..{} ({} entries, {:.3} us/tick)",
            domain.table_min_tick, domain.table_max_tick, domain.table_size, domain.resolution_us
        );
        Ok(domain)
    }

    /// Interval of the first table entry [us]
    pub fn table_min_us(&self) -> f64 {
        self.table_min_tick as f64 * self.resolution_us
    }

    /// Interval of the last table entry [us]
    pub fn table_max_us(&self) -> f64 {
        self.table_max_tick as f64 * self.resolution_us
    }

    /// Interval sampled at table entry `index` [us]
    ///
    /// The `table_size` entries are evenly spaced over
    /// `[table_min_us, table_max_us]`, both ends included.
    pub fn index_to_interval_us(&self, index: usize) -> f64 {
        if self.table_size <= 1 {
            return self.table_min_us();
        }
        let step = (self.table_max_us() - self.table_min_us()) / (self.table_size - 1) as f64;
        self.table_min_us() + index as f64 * step
    }

    /// Fractional table index of an interval
    ///
    /// Only used to mark where measured limits fall in a table; never used
    /// to build one.
    pub fn interval_to_index(&self, interval_us: f64) -> f64 {
        (interval_us - self.table_min_us()) / self.resolution_us
    }

    /// Interval axis of the per-tick tables [us]
    pub fn intervals(&self) -> Vec<f64> {
        (0..self.table_size)
            .map(|i| self.index_to_interval_us(i))
            .collect()
    }
}
