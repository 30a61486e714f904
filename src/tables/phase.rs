// Phase compensation table set
//
// The coil behaves as a first-order low-pass, so the current lags the
// applied voltage by atan(f / f0). The firmware cancels that lag by reading
// the sine table ahead of the rotor position. One f0 does not fit the whole
// speed range, so the set holds one table per f0 bucket, as many as the flash
// budget allows, plus a small table of the bucket frequencies.

use core::f64::consts::PI;

use libm::{atan, round};
use tracing::{debug, info};

use super::{quantize, Table};
use crate::error::{Result, TableError};
use crate::index::IndexDomain;
use crate::units::{FrequencyRange, PhysicalParameters};

pub const PHASE_TABLE_NAME: &str = "table_phase";
pub const PHASE_F0_TABLE_NAME: &str = "table_phase_f0";

/// Sizing and feature options for the table set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseOptions {
    /// Sine table length; phase is expressed in sine table positions
    pub n_samps: usize,
    /// Flash reserved for all bucket tables [bytes]
    pub flash_budget: usize,
    /// Width of one entry [bytes]: 1, 2 or 4
    pub bytes_per_sample: usize,
    /// Optional cap below what the budget allows
    pub max_buckets: Option<usize>,
    /// Add half a PWM period of lead to every entry
    pub compensate_pwm_delay: bool,
}

/// Phase tables for every bucket, bucket-major
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTableSet {
    /// One table per bucket, each `table_size` long
    pub tables: Vec<Table<u32>>,
    /// Representative f0 of each bucket [Hz]
    pub bucket_f0_hz: Vec<f64>,
    /// Bucket whose f0 is closest to the coil corner frequency
    pub default_bucket: usize,
    pub bytes_per_sample: usize,
}

impl PhaseTableSet {
    pub fn bucket_count(&self) -> usize {
        self.tables.len()
    }

    /// Flash taken by the bucket tables [bytes]
    pub fn total_bytes(&self) -> usize {
        self.tables.iter().map(|t| t.len()).sum::<usize>() * self.bytes_per_sample
    }

    /// All bucket tables concatenated, bucket 0 first
    pub fn flattened(&self) -> Vec<u32> {
        self.tables
            .iter()
            .flat_map(|t| t.samples.iter().copied())
            .collect()
    }

    /// Bucket frequency table rounded to whole Hz
    ///
    /// With `sentinel` a trailing 0 marks the end for a firmware search loop.
    pub fn f0_table(&self, sentinel: bool) -> Table<u32> {
        let mut samples: Vec<u32> = self
            .bucket_f0_hz
            .iter()
            .map(|&f| round(f) as u32)
            .collect();
        if sentinel {
            samples.push(0);
        }
        Table::new(PHASE_F0_TABLE_NAME, samples)
    }

    /// Index of the bucket whose f0 is nearest `freq_hz`
    pub fn nearest_bucket(&self, freq_hz: f64) -> usize {
        nearest_index(&self.bucket_f0_hz, freq_hz)
    }
}

fn nearest_index(values: &[f64], target: f64) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_err), (i, &v)| {
            let err = (v - target).abs();
            if err < best_err {
                (i, err)
            } else {
                (best, best_err)
            }
        })
        .0
}

/// Phase lag of a first-order low-pass at `freq_hz` [degrees, negative]
pub fn phase_deg(freq_hz: f64, f0_hz: f64) -> f64 {
    -atan(freq_hz / f0_hz) * 180.0 / PI
}

/// Number of bucket tables that fit the budget
///
/// # Errors
/// `Sizing` if not even one table fits, or the entry width is unsupported.
pub fn bucket_count(
    flash_budget: usize,
    bytes_per_sample: usize,
    table_size: usize,
    max_buckets: Option<usize>,
) -> Result<usize> {
    if !matches!(bytes_per_sample, 1 | 2 | 4) {
        return Err(TableError::sizing(format!(
            "phase entries must be 1, 2 or 4 bytes wide, got {}",
            bytes_per_sample
        )));
    }
    let table_bytes = bytes_per_sample * table_size;
    let fit = if table_bytes == 0 {
        0
    } else {
        flash_budget / table_bytes
    };
    let count = max_buckets.map_or(fit, |cap| fit.min(cap));
    if count == 0 {
        return Err(TableError::sizing(format!(
            "flash budget {} B holds no {} B phase table (cap {:?})",
            flash_budget, table_bytes, max_buckets
        )));
    }
    Ok(count)
}

/// Build the phase compensation table set
///
/// # Arguments
/// * `params` - Validated motor/timer parameters
/// * `freq` - Electrical frequency range; buckets cover `[min, max)`
/// * `domain` - Index domain every bucket table is addressed by
/// * `options` - Sizing and feature options
///
/// # Returns
/// For bucket `b` and entry `i`:
/// `round(-phase_deg(f(i), f0_b) * N / 360)` sine positions of lead
pub fn build_phase_tables(
    params: &PhysicalParameters,
    freq: &FrequencyRange,
    domain: &IndexDomain,
    options: &PhaseOptions,
) -> Result<PhaseTableSet> {
    let count = bucket_count(
        options.flash_budget,
        options.bytes_per_sample,
        domain.table_size,
        options.max_buckets,
    )?;

    let spacing = (freq.max_freq_hz - freq.min_freq_hz) / count as f64;
    let bucket_f0_hz: Vec<f64> = (0..count)
        .map(|b| freq.min_freq_hz + b as f64 * spacing)
        .collect();

    // Largest value an entry of the configured width can hold
    let entry_max = if options.bytes_per_sample >= 4 {
        u32::MAX as u64
    } else {
        (1u64 << (8 * options.bytes_per_sample)) - 1
    };
    let positions_per_deg = options.n_samps as f64 / 360.0;
    // PWM output changes half an update period after the compare write
    let delay_s = if options.compensate_pwm_delay {
        0.5 / params.update_rate_hz
    } else {
        0.0
    };

    let tables = bucket_f0_hz
        .iter()
        .map(|&f0| -> Result<Table<u32>> {
            let samples = (0..domain.table_size)
                .map(|i| -> Result<u32> {
                    let f = params.interval_to_freq_hz(domain.index_to_interval_us(i));
                    let lead_deg = -phase_deg(f, f0) + 360.0 * f * delay_s;
                    let entry: u32 = quantize(PHASE_TABLE_NAME, lead_deg * positions_per_deg)?;
                    if entry as u64 > entry_max {
                        return Err(TableError::sizing(format!(
                            "{}: entry {} does not fit {} byte(s)",
                            PHASE_TABLE_NAME, entry, options.bytes_per_sample
                        )));
                    }
                    Ok(entry)
                })
                .collect::<Result<Vec<u32>>>()?;
            Ok(Table::new(PHASE_TABLE_NAME, samples))
        })
        .collect::<Result<Vec<_>>>()?;

    let default_bucket = nearest_index(&bucket_f0_hz, params.coil_corner_hz());
    let set = PhaseTableSet {
        tables,
        bucket_f0_hz,
        default_bucket,
        bytes_per_sample: options.bytes_per_sample,
    };

    debug!(
        "Phase buckets: {:?} Hz",
        set.bucket_f0_hz.iter().map(|f| round(*f) as u32).collect::<Vec<_>>()
    );
    info!(
        "Phase table set: {} buckets x {} entries = {} / {} B, default bucket {}",
        set.bucket_count(),
        domain.table_size,
        set.total_bytes(),
        options.flash_budget,
        set.default_bucket
    );
    Ok(set)
}
