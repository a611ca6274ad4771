pub mod band;
pub mod band_executor;
