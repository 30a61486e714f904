// Step rate table
//
// Sine table positions to advance per PWM update, indexed by the measured
// sensor interval. At heart a 1/x table. Entries are scaled by the dither
// factor so the firmware can accumulate the fractional part of the step.

use tracing::debug;

use super::{quantize, Table};
use crate::error::{Result, TableError};
use crate::index::IndexDomain;
use crate::units::{PhysicalParameters, US_PER_S};

pub const STEP_RATE_TABLE_NAME: &str = "table_rate";

/// Build the step rate table
///
/// # Arguments
/// * `params` - Validated motor/timer parameters
/// * `domain` - Index domain the table is addressed by
/// * `n_samps` - Sine table length
/// * `dither_scale` - Fixed-point scale of each entry
///
/// # Returns
/// For each entry `round(dither * 1e6 * N / (f_update * interval * steps))`
///
/// # Errors
/// * `Configuration` for a zero dither scale
/// * `DomainViolation` for a non-positive cycle time or an entry beyond `u32`
pub fn build_step_rate_table(
    params: &PhysicalParameters,
    domain: &IndexDomain,
    n_samps: usize,
    dither_scale: u32,
) -> Result<Table<u32>> {
    if dither_scale == 0 {
        return Err(TableError::configuration("dither_scale must be at least 1"));
    }
    let scale = dither_scale as f64 * US_PER_S * n_samps as f64 / params.update_rate_hz;

    let samples = (0..domain.table_size)
        .map(|i| {
            let interval = domain.index_to_interval_us(i);
            // One electrical cycle is `steps_per_cycle` sensor intervals
            let cycle_us = interval * params.steps_per_cycle as f64;
            if !(cycle_us.is_finite() && cycle_us > 0.0) {
                return Err(TableError::domain(format!(
                    "{}: entry {} has cycle time {} us",
                    STEP_RATE_TABLE_NAME, i, cycle_us
                )));
            }
            quantize(STEP_RATE_TABLE_NAME, scale / cycle_us)
        })
        .collect::<Result<Vec<u32>>>()?;

    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        debug!("Step rate table: {} -> {} (scale {})", first, last, dither_scale);
    }
    Ok(Table::new(STEP_RATE_TABLE_NAME, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;

    fn build(config: &TableConfig) -> Result<Table<u32>> {
        let params = PhysicalParameters::from_config(config)?;
        let domain = IndexDomain::new(&params, &params.interval_range())?;
        build_step_rate_table(&params, &domain, config.n_samps, config.dither_scale)
    }

    #[test]
    fn test_step_rate_reference_values() {
        let config = TableConfig::default();
        let table = build(&config).unwrap();
        assert_eq!(table.len(), 235);

        // Entry 0: interval 26 ticks = 828.75 us, cycle 4972.5 us
        // 256 * 1e6 * 3840 / (31372.549 * 4972.5) = 6301.6
        assert_eq!(table.samples[0], 6302);
    }

    #[test]
    fn test_step_rate_non_increasing() {
        let cases = [(2, 600.0, 6000.0), (7, 100.0, 3000.0), (1, 1000.0, 5600.0)];
        for (pole_pairs, min_rpm, max_rpm) in cases {
            let config = TableConfig {
                pole_pairs,
                min_rpm,
                max_rpm,
                ..TableConfig::default()
            };
            let table = build(&config).unwrap();
            assert!(table.samples.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_step_rate_unscaled_matches_cycle_time() {
        // Without dithering an entry is sine positions per update:
        // a full cycle of N positions takes f_update * cycle updates
        let config = TableConfig {
            dither_scale: 1,
            ..TableConfig::default()
        };
        let table = build(&config).unwrap();
        assert_eq!(table.samples[0], 25);
    }

    #[test]
    fn test_step_rate_overflow_is_domain_violation() {
        let config = TableConfig {
            dither_scale: u32::MAX,
            ..TableConfig::default()
        };
        assert!(matches!(build(&config), Err(TableError::DomainViolation(_))));
    }

    #[test]
    fn test_step_rate_rejects_zero_dither_scale() {
        let config = TableConfig {
            dither_scale: 0,
            ..TableConfig::default()
        };
        assert!(matches!(build(&config), Err(TableError::Configuration(_))));
        assert!(matches!(
            crate::pipeline::generate(&config),
            Err(TableError::Configuration(_))
        ));
    }

    #[test]
    fn test_step_rate_rejects_degenerate_intervals() {
        let params = PhysicalParameters::from_config(&TableConfig::default()).unwrap();

        // Entry 0 sits at tick 0, a zero interval
        let zero_start = IndexDomain {
            resolution_us: 31.875,
            table_min_tick: 0,
            table_max_tick: 10,
            table_size: 10,
        };
        assert!(matches!(
            build_step_rate_table(&params, &zero_start, 3840, 256),
            Err(TableError::DomainViolation(_))
        ));

        let not_a_number = IndexDomain {
            resolution_us: f64::NAN,
            ..zero_start
        };
        assert!(matches!(
            build_step_rate_table(&params, &not_a_number, 3840, 256),
            Err(TableError::DomainViolation(_))
        ));
    }
}
