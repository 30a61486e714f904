// Lookup table generator for a sensored BLDC six-step drive
//
// Computes the sine, step rate, PWM ceiling and phase compensation tables
// the firmware indexes by measured sensor interval, and renders them as C
// array literals.

pub mod config;
pub mod emit;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod serializer;
pub mod tables;
pub mod units;

// Re-export main types for easier access
pub use config::TableConfig;
pub use emit::{render, OutputFormat};
pub use error::TableError;
pub use index::IndexDomain;
pub use pipeline::{generate, GeneratedTables};
pub use serializer::{parse_c_array, table_to_c_array, TableSummary};
pub use tables::{PhaseTableSet, Table};
pub use units::{FrequencyRange, IntervalRange, PhysicalParameters};
