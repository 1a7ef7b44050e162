mod description;
mod registry;
mod soap;
mod ssdp;

pub use description::*;
pub use registry::*;
pub use soap::*;
pub use ssdp::*;

/// Service offering the transfer counters of a router's WAN interface.
pub const WAN_COMMON_INTERFACE_CONFIG: &str =
    "urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1";
