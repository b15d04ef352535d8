pub mod constants;
pub mod distance;
pub mod error;
pub mod payload;
pub mod types;

pub use distance::haversine_meters;
pub use error::{Error, Result};
pub use payload::{RangePolicy, parse_reference, parse_reference_with};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
