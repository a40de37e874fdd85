


/// Footprint-predicting page cache.
pub mod unison;
