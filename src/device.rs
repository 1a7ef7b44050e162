mod handle;
mod reading;
mod registry;

pub use handle::*;
pub use reading::*;
pub use registry::*;
