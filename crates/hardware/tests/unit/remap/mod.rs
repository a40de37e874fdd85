
/// Hybrid hot-row migration.
pub mod hybrid;




/// Bank and vault swapping.
pub mod swap;

/// Hot-row tracker.
pub mod tracker;
