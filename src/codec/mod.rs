pub mod encoding;
pub mod fixed;
pub mod line;

pub use encoding::*;
pub use fixed::*;
pub use line::*;
