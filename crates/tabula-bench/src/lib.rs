//! Tabula Benchmark Suite
//!
//! Criterion benchmarks for the grid processing pipeline.
//!
//! # Benchmark Categories
//!
//! - **Serialization**: turning records into rows, with and without row hooks
//! - **Pipeline**: search, sort and pagination through the processor

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod fixtures;

pub use fixtures::{generate_measurements, repeat_measurement, Measurement, Scale};

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
