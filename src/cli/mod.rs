pub mod scan;
pub mod sweep;

pub use scan::*;
pub use sweep::*;
