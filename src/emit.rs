//! Output rendering
//!
//! Two layouts for the same generated set: a console report that mirrors
//! the generator's historical printout, and a C header the firmware build
//! includes directly.

use core::fmt;

use libm::round;

use crate::pipeline::GeneratedTables;
use crate::serializer::{table_to_c_array, TableSummary};
use crate::tables::phase::PHASE_TABLE_NAME;
use crate::tables::Table;

/// Include guard of the generated header
pub const HEADER_GUARD: &str = "__MOTOR_TABLES_H__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Summary line and literal per table
    #[default]
    Report,
    /// C header with `#define`s and `const` arrays
    Header,
}

/// Render in the requested layout
pub fn render(tables: &GeneratedTables, format: OutputFormat) -> String {
    match format {
        OutputFormat::Report => render_report(tables),
        OutputFormat::Header => render_header(tables),
    }
}

/// Console report: heading, count/range/domain line and literal per table
pub struct Report<'a>(pub &'a GeneratedTables);

/// C header with the domain constants and every table
pub struct Header<'a>(pub &'a GeneratedTables);

pub fn render_report(tables: &GeneratedTables) -> String {
    Report(tables).to_string()
}

pub fn render_header(tables: &GeneratedTables) -> String {
    Header(tables).to_string()
}

fn report_section(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    values: &[f64],
    domain: Option<&[f64]>,
) -> fmt::Result {
    let summary = TableSummary::new(values.iter().copied(), domain);
    writeln!(f, "// {}: {}", name, summary)?;
    writeln!(f, "{}", table_to_c_array(values.iter().copied()))?;
    writeln!(f)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.0;
        let domain = &tables.domain;
        let axis = tables.interval_axis();
        let (lo, hi) = tables.valid_range_markers();

        writeln!(
            f,
            "// ticks {}..{} x {:.3} us, valid interval at index {:.2}..{:.2}",
            domain.table_min_tick, domain.table_max_tick, domain.resolution_us, lo, hi
        )?;
        writeln!(f)?;

        let sine: Vec<f64> = tables.sine.values().collect();
        report_section(f, tables.sine.name, &sine, None)?;
        let rate: Vec<f64> = tables.step_rate.values().collect();
        report_section(f, tables.step_rate.name, &rate, Some(axis.as_slice()))?;
        let pwm: Vec<f64> = tables.pwm_ceiling.values().collect();
        report_section(f, tables.pwm_ceiling.name, &pwm, Some(axis.as_slice()))?;

        if let Some(phase) = &tables.phase {
            let flat: Vec<f64> = phase.flattened().into_iter().map(f64::from).collect();
            report_section(f, PHASE_TABLE_NAME, &flat, Some(axis.as_slice()))?;
            let f0 = phase.f0_table(tables.config.append_f0_sentinel);
            let f0_values: Vec<f64> = f0.values().collect();
            report_section(f, f0.name, &f0_values, None)?;
        }
        Ok(())
    }
}

/// Narrowest unsigned C type holding `max`
fn c_type_for(max: f64) -> &'static str {
    if max <= u8::MAX as f64 {
        "uint8_t"
    } else if max <= u16::MAX as f64 {
        "uint16_t"
    } else {
        "uint32_t"
    }
}

fn c_type_for_width(bytes: usize) -> &'static str {
    match bytes {
        1 => "uint8_t",
        2 => "uint16_t",
        _ => "uint32_t",
    }
}

fn header_array<T>(
    f: &mut fmt::Formatter<'_>,
    c_type: &str,
    len: &str,
    table: &Table<T>,
) -> fmt::Result
where
    T: Copy + Into<f64>,
{
    let literal = table_to_c_array(table.values());
    writeln!(f, "const {} {}[{}] PROGMEM = {}", c_type, table.name, len, literal)?;
    writeln!(f)
}

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.0;
        let params = &tables.params;
        let domain = &tables.domain;

        writeln!(f, "// Generated by bldc-table-gen, do not edit.")?;
        writeln!(
            f,
            "// {} pole pairs, {}..{} rpm, {:.1} Hz PWM update",
            params.pole_pairs, params.min_rpm, params.max_rpm, params.update_rate_hz
        )?;
        writeln!(f, "#ifndef {}", HEADER_GUARD)?;
        writeln!(f, "#define {}", HEADER_GUARD)?;
        writeln!(f)?;
        writeln!(f, "#include <stdint.h>")?;
        writeln!(f, "#include <avr/pgmspace.h>")?;
        writeln!(f)?;

        writeln!(f, "#define N_SAMPS {}", tables.sine.len())?;
        writeln!(f, "#define TABLE_MIN_TICK {}", domain.table_min_tick)?;
        writeln!(f, "#define TABLE_MAX_TICK {}", domain.table_max_tick)?;
        writeln!(f, "#define TABLE_SIZE {}", domain.table_size)?;
        let res_ns = round(domain.resolution_us * 1000.0) as u64;
        writeln!(f, "#define TABLE_RES_NS {}", res_ns)?;
        writeln!(f, "#define DITHER_SCALE {}", tables.config.dither_scale)?;
        if let Some(phase) = &tables.phase {
            writeln!(f, "#define PHASE_BUCKETS {}", phase.bucket_count())?;
            writeln!(f, "#define PHASE_DEFAULT_BUCKET {}", phase.default_bucket)?;
        }
        writeln!(f)?;

        header_array(f, "uint8_t", "N_SAMPS", &tables.sine)?;
        let rate_max = TableSummary::new(tables.step_rate.values(), None).max;
        header_array(f, c_type_for(rate_max), "TABLE_SIZE", &tables.step_rate)?;
        header_array(f, "uint8_t", "TABLE_SIZE", &tables.pwm_ceiling)?;

        if let Some(phase) = &tables.phase {
            let flat = Table::new(PHASE_TABLE_NAME, phase.flattened());
            let width = c_type_for_width(phase.bytes_per_sample);
            header_array(f, width, "PHASE_BUCKETS * TABLE_SIZE", &flat)?;
            let f0 = phase.f0_table(tables.config.append_f0_sentinel);
            let f0_max = TableSummary::new(f0.values(), None).max;
            header_array(f, c_type_for(f0_max), &f0.len().to_string(), &f0)?;
        }

        writeln!(f, "#endif // {}", HEADER_GUARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::pipeline::generate;
    use crate::serializer::parse_c_array;

    /// Literal of the array declared as `name` in a rendered header
    fn declared_array(header: &str, name: &str) -> Vec<i64> {
        let start = header
            .find(&format!(" {}[", name))
            .expect("array declared");
        let body = &header[start..];
        let open = body.find("= ").expect("initializer") + 2;
        let close = body.find("};").expect("terminator") + 2;
        parse_c_array(&body[open..close]).expect("parsable literal")
    }

    #[test]
    fn test_report_lists_every_table() {
        let tables = generate(&TableConfig::default()).unwrap();
        let report = render_report(&tables);
        for name in ["table_sin", "table_rate", "table_pwm", "table_phase", "table_phase_f0"] {
            assert!(report.contains(&format!("// {}:", name)), "missing {}", name);
        }
        assert!(report.contains("// table_sin: 3840 entries, 0 .. 255"));
        assert!(report.contains("// table_pwm: 235 entries, 27 .. 255, 829 -> 8319"));
    }

    #[test]
    fn test_header_round_trips_tables() {
        let tables = generate(&TableConfig::default()).unwrap();
        let header = render(&tables, OutputFormat::Header);

        assert!(header.contains("#define TABLE_MIN_TICK 26"));
        assert!(header.contains("#define TABLE_SIZE 235"));
        assert!(header.contains("#define TABLE_RES_NS 31875"));
        assert!(header.contains("#define PHASE_BUCKETS 17"));
        assert!(header.contains("const uint16_t table_rate[TABLE_SIZE] PROGMEM"));

        let sine: Vec<i64> = tables.sine.samples.iter().map(|&v| v as i64).collect();
        assert_eq!(declared_array(&header, "table_sin"), sine);

        let phase = tables.phase.as_ref().unwrap();
        let flat: Vec<i64> = phase.flattened().iter().map(|&v| v as i64).collect();
        assert_eq!(declared_array(&header, "table_phase"), flat);

        let f0 = declared_array(&header, "table_phase_f0");
        assert_eq!(f0.len(), 18);
        assert_eq!(f0.last(), Some(&0));
    }

    #[test]
    fn test_header_without_phase_or_sentinel() {
        let config = TableConfig {
            emit_phase_tables: false,
            ..TableConfig::default()
        };
        let header = render_header(&generate(&config).unwrap());
        assert!(!header.contains("PHASE_BUCKETS"));
        assert!(!header.contains("table_phase"));
        assert!(header.trim_end().ends_with("#endif // __MOTOR_TABLES_H__"));

        let config = TableConfig {
            append_f0_sentinel: false,
            ..TableConfig::default()
        };
        let header = render_header(&generate(&config).unwrap());
        assert_eq!(declared_array(&header, "table_phase_f0").len(), 17);
    }

    #[test]
    fn test_c_type_selection() {
        assert_eq!(c_type_for(255.0), "uint8_t");
        assert_eq!(c_type_for(6302.0), "uint16_t");
        assert_eq!(c_type_for(70_000.0), "uint32_t");
    }

    #[test]
    fn test_views_match_render() {
        let tables = generate(&TableConfig::default()).unwrap();
        let report = Report(&tables).to_string();
        assert_eq!(report, render(&tables, OutputFormat::Report));
        assert!(report.starts_with("// ticks 26..261 x 31.875 us"));
        assert!(report.contains("\n\n// table_sin: "));
        assert!(report.ends_with("};\n\n"));

        let header = Header(&tables).to_string();
        assert_eq!(header, render(&tables, OutputFormat::Header));
        assert!(header.starts_with("// Generated by bldc-table-gen, do not edit.\n"));
        assert!(header.contains("#include <avr/pgmspace.h>\n\n#define N_SAMPS 3840\n"));
    }
}
