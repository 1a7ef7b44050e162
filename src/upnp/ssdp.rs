//! SSDP multicast search.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use anyhow::{Context as _, Result};
use indexmap::IndexSet;
use reqwest::Url;
use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

const SSDP_MULTICAST: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900);

/// Seconds devices may delay their answer.
const SEARCH_MX: u64 = 2;

/// UDP is lossy; the search datagram is sent more than once.
const SEARCH_REPEATS: usize = 2;

/// Sends an `M-SEARCH` for `search_target` and collects the description
/// locations announced within `window`, in order of first response.
///
/// Failing to bind or send is an error; unusable responses are skipped.
pub async fn search(search_target: &str, window: Duration) -> Result<Vec<Url>> {
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
        .await
        .context("failed to bind SSDP socket")?;

    let request = search_request(search_target);
    for _ in 0..SEARCH_REPEATS {
        socket
            .send_to(request.as_bytes(), SSDP_MULTICAST)
            .await
            .context("failed to send SSDP search")?;
    }

    Ok(collect_locations(&socket, search_target, Instant::now() + window).await)
}

/// Reads search responses until `deadline`. Receive errors are logged and
/// skipped; collection always runs for the whole window.
async fn collect_locations(
    socket: &UdpSocket,
    search_target: &str,
    deadline: Instant,
) -> Vec<Url> {
    let mut locations = IndexSet::new();
    let mut buf = [0u8; 2048];

    loop {
        let (len, from) = match timeout_at(deadline, socket.recv_from(&mut buf)).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => {
                warn!("failed to receive SSDP response: {e}");
                continue;
            }
            Err(_) => break,
        };

        let response = String::from_utf8_lossy(&buf[..len]);
        match parse_search_response(&response, search_target) {
            Some(location) => {
                if locations.insert(location.clone()) {
                    debug!(%from, %location, "SSDP response");
                }
            }
            None => debug!(%from, "ignoring unusable SSDP response"),
        }
    }

    locations.into_iter().collect()
}

pub fn search_request(search_target: &str) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {SSDP_MULTICAST}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {SEARCH_MX}\r\n\
         ST: {search_target}\r\n\
         \r\n"
    )
}

/// Extracts the `LOCATION` of a successful search response for
/// `search_target`. Header names are case-insensitive.
pub fn parse_search_response(response: &str, search_target: &str) -> Option<Url> {
    let mut lines = response.lines();

    let status = lines.next()?;
    let mut status_parts = status.split_whitespace();
    if !status_parts.next()?.starts_with("HTTP/") || status_parts.next()? != "200" {
        return None;
    }

    let mut location = None;
    let mut target_matches = false;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if name.trim().eq_ignore_ascii_case("LOCATION") {
            location = Url::parse(value).ok();
        } else if name.trim().eq_ignore_ascii_case("ST") {
            target_matches = value == search_target;
        }
    }

    if !target_matches {
        return None;
    }
    location
}
