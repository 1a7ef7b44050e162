mod batch;
mod influx;
mod line_protocol;
mod metrics_sink;
mod point;
mod postgres;

pub use batch::*;
pub use influx::*;
pub use line_protocol::*;
pub use metrics_sink::*;
pub use point::*;
pub use postgres::*;
