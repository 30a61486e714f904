// Lookup table builders
// Each builder is a pure function of the validated parameters and the index domain.

pub mod phase;
pub mod pwm_ceiling;
pub mod sine;
pub mod step_rate;

pub use phase::{build_phase_tables, PhaseTableSet};
pub use pwm_ceiling::build_pwm_ceiling_table;
pub use sine::build_sine_table;
pub use step_rate::build_step_rate_table;

use libm::round;

use crate::error::{Result, TableError};

/// A named, quantized lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    /// Identifier used for the emitted array
    pub name: &'static str,
    pub samples: Vec<T>,
}

impl<T: Copy + Into<f64>> Table<T> {
    pub fn new(name: &'static str, samples: Vec<T>) -> Self {
        Self { name, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples widened to f64 for formatting
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|&s| s.into())
    }
}

/// Round half away from zero and narrow to the sample type
///
/// All table values go through this single rounding rule so regenerated
/// tables match the firmware copy bit for bit.
///
/// # Errors
/// `DomainViolation` if `value` is not finite or does not fit `T`.
pub fn quantize<T: TryFrom<i64>>(table: &str, value: f64) -> Result<T> {
    let rounded = round(value);
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(TableError::domain(format!(
            "{}: value {} is not representable",
            table, value
        )));
    }
    T::try_from(rounded as i64).map_err(|_| {
        TableError::domain(format!(
            "{}: value {} does not fit a {}-byte sample",
            table,
            rounded,
            core::mem::size_of::<T>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_half_away_from_zero() {
        assert_eq!(quantize::<u8>("t", 127.5).unwrap(), 128);
        assert_eq!(quantize::<u8>("t", 2.5).unwrap(), 3);
        assert_eq!(quantize::<u8>("t", 2.4999).unwrap(), 2);
        assert_eq!(quantize::<i64>("t", -0.5).unwrap(), -1);
    }

    #[test]
    fn test_quantize_rejects_out_of_range() {
        assert!(matches!(
            quantize::<u8>("t", 255.5),
            Err(TableError::DomainViolation(_))
        ));
        assert!(quantize::<u16>("t", -1.0).is_err());
        assert!(quantize::<u32>("t", f64::INFINITY).is_err());
        assert!(quantize::<u32>("t", f64::NAN).is_err());
    }

    #[test]
    fn test_table_values() {
        let table = Table::new("t", vec![1u8, 2, 3]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }
}
