//! Benchmark-only crate for axshim; see `benches/`.
