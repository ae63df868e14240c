pub mod generation;
pub mod style;
pub mod upload;

pub use generation::*;
pub use style::*;
pub use upload::*;
