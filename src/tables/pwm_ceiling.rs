// PWM ceiling table
//
// Same axis as the step rate table, but holding the highest duty the drive
// may apply at each speed. Back-EMF rises linearly with speed; the duty
// ceiling follows it so that current stays bounded at low speed.

use libm::round;

use super::Table;
use crate::config::pwm::DUTY_MAX;
use crate::error::{Result, TableError};
use crate::index::IndexDomain;
use crate::units::{IntervalRange, PhysicalParameters};

pub const PWM_CEILING_TABLE_NAME: &str = "table_pwm";

/// Build the PWM ceiling table
///
/// # Arguments
/// * `params` - Validated motor/timer parameters
/// * `intervals` - Interval range the motor runs in
/// * `domain` - Index domain the table is addressed by
/// * `bemf_rpm` - Speed at which back-EMF equals bus voltage
///
/// # Returns
/// `min(255, round(255 * min_interval / interval * max_rpm / bemf_rpm))`
pub fn build_pwm_ceiling_table(
    params: &PhysicalParameters,
    intervals: &IntervalRange,
    domain: &IndexDomain,
    bemf_rpm: f64,
) -> Result<Table<u8>> {
    if !(bemf_rpm.is_finite() && bemf_rpm > 0.0) {
        return Err(TableError::configuration(format!(
            "bemf_rpm must be a positive finite number, got {}",
            bemf_rpm
        )));
    }
    let rpm_ratio = params.max_rpm / bemf_rpm;
    let duty_max = DUTY_MAX as f64;

    let samples = (0..domain.table_size)
        .map(|i| {
            let interval = domain.index_to_interval_us(i);
            if !(interval.is_finite() && interval > 0.0) {
                return Err(TableError::domain(format!(
                    "{}: entry {} has interval {} us",
                    PWM_CEILING_TABLE_NAME, i, interval
                )));
            }
            let duty = round(duty_max * (intervals.min_interval_us / interval) * rpm_ratio);
            Ok(duty.min(duty_max) as u8)
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(Table::new(PWM_CEILING_TABLE_NAME, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;

    fn build(config: &TableConfig) -> Result<Table<u8>> {
        let params = PhysicalParameters::from_config(config)?;
        let intervals = params.interval_range();
        let domain = IndexDomain::new(&params, &intervals)?;
        build_pwm_ceiling_table(&params, &intervals, &domain, config.bemf_rpm)
    }

    #[test]
    fn test_pwm_ceiling_reference_values() {
        let table = build(&TableConfig::default()).unwrap();
        assert_eq!(table.len(), 235);
        // Top speed exceeds bemf_rpm, so the fast end is clamped
        assert_eq!(table.samples[0], 255);
        // Slowest entry: 255 * 833.33 / 8319.375 * 6000 / 5600 = 27.4
        assert_eq!(table.samples[234], 27);
    }

    #[test]
    fn test_pwm_ceiling_bounded_and_non_increasing() {
        for bemf_rpm in [1000.0, 5600.0, 6000.0, 12000.0] {
            let config = TableConfig {
                bemf_rpm,
                ..TableConfig::default()
            };
            let table = build(&config).unwrap();
            assert!(table.samples.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_pwm_ceiling_without_headroom_is_proportional() {
        // bemf_rpm = max_rpm: entry ~ 255 * min_interval / interval
        let config = TableConfig {
            bemf_rpm: 6000.0,
            ..TableConfig::default()
        };
        let table = build(&config).unwrap();
        assert_eq!(table.samples[234], 26);
    }

    #[test]
    fn test_pwm_ceiling_rejects_zero_bemf_speed() {
        let config = TableConfig {
            bemf_rpm: 0.0,
            ..TableConfig::default()
        };
        assert!(matches!(build(&config), Err(TableError::Configuration(_))));
    }

    #[test]
    fn test_pwm_ceiling_rejects_zero_interval() {
        let params = PhysicalParameters::from_config(&TableConfig::default()).unwrap();
        let domain = IndexDomain {
            resolution_us: 31.875,
            table_min_tick: 0,
            table_max_tick: 10,
            table_size: 10,
        };
        assert!(matches!(
            build_pwm_ceiling_table(&params, &params.interval_range(), &domain, 5600.0),
            Err(TableError::DomainViolation(_))
        ));
    }
}
