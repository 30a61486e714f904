// Table generation pipeline
//
// configuration -> ranges -> index domain -> tables. Every table is built
// before anything is returned, so a failing run produces no output at all.

use tracing::{info, warn};

use crate::config::TableConfig;
use crate::error::Result;
use crate::index::IndexDomain;
use crate::tables::phase::PhaseOptions;
use crate::tables::{
    build_phase_tables, build_pwm_ceiling_table, build_sine_table, build_step_rate_table,
    PhaseTableSet, Table,
};
use crate::units::{FrequencyRange, IntervalRange, PhysicalParameters};

/// Everything one run produces
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTables {
    pub config: TableConfig,
    pub params: PhysicalParameters,
    pub freq: FrequencyRange,
    pub intervals: IntervalRange,
    pub domain: IndexDomain,
    pub sine: Table<u8>,
    pub step_rate: Table<u32>,
    pub pwm_ceiling: Table<u8>,
    /// `None` when phase tables are disabled
    pub phase: Option<PhaseTableSet>,
}

impl GeneratedTables {
    /// Interval axis shared by the per-tick tables [us]
    pub fn interval_axis(&self) -> Vec<f64> {
        self.domain.intervals()
    }

    /// Fractional table positions of the real interval limits
    pub fn valid_range_markers(&self) -> (f64, f64) {
        (
            self.domain.interval_to_index(self.intervals.min_interval_us),
            self.domain.interval_to_index(self.intervals.max_interval_us),
        )
    }
}

/// Run the whole pipeline for one configuration
pub fn generate(config: &TableConfig) -> Result<GeneratedTables> {
    let params = PhysicalParameters::from_config(config)?;
    let freq = params.frequency_range();
    let intervals = params.interval_range();
    info!(
        "Speed {}..{} rpm -> {:.1}..{:.1} Hz -> {:.1}..{:.1} us, update rate {:.1} Hz",
        params.min_rpm,
        params.max_rpm,
        freq.min_freq_hz,
        freq.max_freq_hz,
        intervals.min_interval_us,
        intervals.max_interval_us,
        params.update_rate_hz
    );

    let domain = IndexDomain::new(&params, &intervals)?;
    info!(
        "Table domain: ticks {}..{} ({} entries at {:.3} us)",
        domain.table_min_tick, domain.table_max_tick, domain.table_size, domain.resolution_us
    );

    let sine = build_sine_table(config.n_samps)?;
    let step_rate = build_step_rate_table(&params, &domain, config.n_samps, config.dither_scale)?;
    let pwm_ceiling = build_pwm_ceiling_table(&params, &intervals, &domain, config.bemf_rpm)?;

    let phase = if config.emit_phase_tables {
        let options = PhaseOptions {
            n_samps: config.n_samps,
            flash_budget: config.flash_budget,
            bytes_per_sample: config.bytes_per_sample,
            max_buckets: config.max_buckets,
            compensate_pwm_delay: config.compensate_pwm_delay,
        };
        Some(build_phase_tables(&params, &freq, &domain, &options)?)
    } else {
        warn!("Phase compensation tables disabled");
        None
    };

    info!("Coil corner frequency {:.1} Hz", params.coil_corner_hz());

    Ok(GeneratedTables {
        config: config.clone(),
        params,
        freq,
        intervals,
        domain,
        sine,
        step_rate,
        pwm_ceiling,
        phase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    #[test]
    fn test_reference_scenario() {
        let tables = generate(&TableConfig::default()).unwrap();

        assert!((tables.params.update_rate_hz - 31_372.5).abs() < 0.1);
        assert!((tables.freq.min_freq_hz - 20.0).abs() < 1e-9);
        assert!((tables.freq.max_freq_hz - 200.0).abs() < 1e-9);
        assert!((tables.intervals.min_interval_us - 833.3).abs() < 0.1);
        assert!((tables.intervals.max_interval_us - 8333.3).abs() < 0.1);

        assert_eq!(tables.domain.table_size, 235);
        assert_eq!(tables.sine.len(), 3840);
        assert_eq!(tables.step_rate.len(), 235);
        assert_eq!(tables.pwm_ceiling.len(), 235);
        assert_eq!(tables.phase.as_ref().map(|p| p.bucket_count()), Some(17));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(&TableConfig::default()).unwrap();
        let b = generate(&TableConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_valid_range_markers_inside_table() {
        let tables = generate(&TableConfig::default()).unwrap();
        let (lo, hi) = tables.valid_range_markers();
        let size = tables.domain.table_size as f64;
        assert!(lo >= 0.0 && lo < 1.0);
        assert!(hi >= size && hi < size + 1.0);
    }

    #[test]
    fn test_phase_tables_can_be_disabled() {
        let config = TableConfig {
            emit_phase_tables: false,
            flash_budget: 0,
            ..TableConfig::default()
        };
        let tables = generate(&config).unwrap();
        assert!(tables.phase.is_none());
    }

    #[test]
    fn test_any_failure_aborts_the_run() {
        let config = TableConfig {
            flash_budget: 10,
            ..TableConfig::default()
        };
        assert!(matches!(generate(&config), Err(TableError::Sizing(_))));

        let config = TableConfig {
            n_samps: 100,
            ..TableConfig::default()
        };
        assert!(matches!(generate(&config), Err(TableError::Configuration(_))));
    }
}
