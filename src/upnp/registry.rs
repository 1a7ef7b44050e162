use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::config::DiscoveryConfig;
use crate::device::{DeviceHandle, DeviceRegistry, Discovery, Reading};
use crate::upnp::{
    GET_ADDON_INFOS, WAN_COMMON_INTERFACE_CONFIG, fault_description, parse_addon_infos,
    parse_description, request_envelope, search, soap_action,
};

/// Finds routers on the local network via SSDP and polls them over SOAP.
#[derive(Debug, Clone)]
pub struct UpnpRegistry {
    client: Client,
    search_window: Duration,
}

impl UpnpRegistry {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build UPnP HTTP client")?;

        Ok(Self {
            client,
            search_window: config.search_window,
        })
    }

    async fn describe(&self, location: &Url) -> Result<Vec<DeviceHandle>> {
        let xml = self
            .client
            .get(location.clone())
            .send()
            .await
            .context("failed to request device description")?
            .error_for_status()
            .context("device description request failed")?
            .text()
            .await
            .context("failed to read device description")?;

        parse_description(&xml, location, WAN_COMMON_INTERFACE_CONFIG)
    }

    /// Describes every location. A location that cannot be described is
    /// recorded as an error and does not affect the others.
    async fn describe_all(&self, locations: Vec<Url>) -> Discovery {
        let mut discovery = Discovery::default();
        for location in locations {
            match self.describe(&location).await {
                Ok(devices) => discovery.devices.extend(devices),
                Err(e) => discovery
                    .errors
                    .push(e.context(format!("failed to describe device at {location}"))),
            }
        }

        discovery
    }
}

#[async_trait]
impl DeviceRegistry for UpnpRegistry {
    async fn discover(&self) -> Result<Discovery> {
        info!("discovering routers in the local network");

        let locations = search(WAN_COMMON_INTERFACE_CONFIG, self.search_window)
            .await
            .context("SSDP search failed")?;
        debug!(locations = locations.len(), "SSDP search finished");

        Ok(self.describe_all(locations).await)
    }

    async fn fetch_reading(&self, device: &DeviceHandle) -> Result<Reading> {
        let response = self
            .client
            .post(device.control_url.clone())
            .header(CONTENT_TYPE, r#"text/xml; charset="utf-8""#)
            .header(
                "SOAPACTION",
                soap_action(WAN_COMMON_INTERFACE_CONFIG, GET_ADDON_INFOS),
            )
            .body(request_envelope(WAN_COMMON_INTERFACE_CONFIG, GET_ADDON_INFOS))
            .send()
            .await
            .context("failed to send SOAP request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read SOAP response")?;

        if !status.is_success() {
            let detail = fault_description(&body).unwrap_or_else(|| body.trim().to_string());
            bail!("device answered {status}: {detail}");
        }

        parse_addon_infos(&body)
    }
}
