//! Sine amplitude table
//!
//! One full electrical cycle, offset and scaled to the 8-bit duty range.
//! The firmware reads the three phases at offsets of N/3 and 2N/3.

use core::f64::consts::TAU;

use libm::sin;

use super::{quantize, Table};
use crate::config::sine::AMPLITUDE;
use crate::error::{Result, TableError};

pub const SINE_TABLE_NAME: &str = "table_sin";

/// Build the sine table
///
/// # Arguments
/// * `n_samps` - Entries per electrical cycle; must be a non-zero multiple of 3
///
/// # Returns
/// `round(255 * (sin(2*pi*k/N) + 1) / 2)` for k in 0..N
pub fn build_sine_table(n_samps: usize) -> Result<Table<u8>> {
    if n_samps == 0 || n_samps % 3 != 0 {
        return Err(TableError::configuration(format!(
            "sine table length {} must be a non-zero multiple of 3",
            n_samps
        )));
    }

    let samples = (0..n_samps)
        .map(|k| {
            let theta = TAU * k as f64 / n_samps as f64;
            quantize(SINE_TABLE_NAME, AMPLITUDE * (sin(theta) + 1.0) / 2.0)
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(Table::new(SINE_TABLE_NAME, samples))
}
