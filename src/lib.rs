pub mod config;
pub mod device;
pub mod scheduler;
pub mod sink;
pub mod upnp;

#[cfg(test)]
mod http_stub;
