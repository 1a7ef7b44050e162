//! UPnP device description parsing.

use anyhow::{Context as _, Result, anyhow, bail};
use reqwest::Url;
use roxmltree::{Document, Node};

use crate::device::DeviceHandle;

/// Builds one handle per `service_type` service found in a device
/// description fetched from `location`.
///
/// Identity comes from the root device even when the service belongs to an
/// embedded device. Control URLs are resolved against `URLBase`, or against
/// `location` when the description has none.
pub fn parse_description(
    xml: &str,
    location: &Url,
    service_type: &str,
) -> Result<Vec<DeviceHandle>> {
    let doc = Document::parse(xml).context("failed to parse device description")?;
    let root = doc.root_element();

    let base = match child_text(root, "URLBase") {
        Some(url_base) => {
            Url::parse(url_base).with_context(|| format!("invalid URLBase: {url_base}"))?
        }
        None => location.clone(),
    };
    let host = host_name(&base)?;

    let device = child(root, "device").ok_or_else(|| anyhow!("description has no root device"))?;
    let manufacturer = child_text(device, "manufacturer").unwrap_or_default();
    let model = child_text(device, "modelName").unwrap_or_default();
    let udn = child_text(device, "UDN").unwrap_or_default();

    let handles = device
        .descendants()
        .filter(|n| n.tag_name().name() == "service")
        .filter(|service| child_text(*service, "serviceType") == Some(service_type))
        .map(|service| -> Result<DeviceHandle> {
            let control = child_text(service, "controlURL")
                .ok_or_else(|| anyhow!("service {service_type} has no controlURL"))?;
            let control_url = base
                .join(control)
                .with_context(|| format!("invalid controlURL: {control}"))?;

            Ok(DeviceHandle {
                host: host.clone(),
                manufacturer: manufacturer.to_string(),
                model: model.to_string(),
                udn: udn.to_string(),
                control_url,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if handles.is_empty() {
        bail!("device does not offer {service_type}");
    }

    Ok(handles)
}

/// Host of `url` without port or IPv6 brackets.
fn host_name(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {url}"))?;

    Ok(host.trim_start_matches('[').trim_end_matches(']').to_string())
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Trimmed, non-empty text of the named child element.
fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name)?
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
