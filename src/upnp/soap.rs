//! SOAP envelopes for the `GetAddonInfos` action.

use anyhow::{Context as _, Result, anyhow, bail};
use roxmltree::{Document, Node};

use crate::device::Reading;

/// Vendor action returning the current transfer rates of the WAN link.
pub const GET_ADDON_INFOS: &str = "GetAddonInfos";

pub fn request_envelope(service_type: &str, action: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action} xmlns:u="{service_type}"></u:{action}></s:Body></s:Envelope>"#
    )
}

/// Value of the `SOAPACTION` request header.
pub fn soap_action(service_type: &str, action: &str) -> String {
    format!("\"{service_type}#{action}\"")
}

/// Reads the counters out of a `GetAddonInfosResponse`.
///
/// Counters that are absent or not a valid unsigned 32-bit number read as 0.
pub fn parse_addon_infos(xml: &str) -> Result<Reading> {
    let doc = Document::parse(xml).context("failed to parse SOAP response")?;

    if let Some(fault) = fault_in(&doc) {
        bail!("SOAP fault: {fault}");
    }

    let response_name = format!("{GET_ADDON_INFOS}Response");
    let response = doc
        .descendants()
        .find(|n| n.tag_name().name() == response_name)
        .ok_or_else(|| anyhow!("SOAP response has no {response_name}"))?;

    let counter = |name: &str| -> u32 {
        element_text(response, name)
            .and_then(|text| text.parse().ok())
            .unwrap_or_default()
    };

    Ok(Reading {
        byte_send_rate: counter("NewByteSendRate"),
        byte_receive_rate: counter("NewByteReceiveRate"),
        packet_send_rate: counter("NewPacketSendRate"),
        packet_receive_rate: counter("NewPacketReceiveRate"),
        total_bytes_sent: counter("NewTotalBytesSent"),
        total_bytes_received: counter("NewTotalBytesReceived"),
    })
}

/// Describes the SOAP fault in `xml`, if it is one.
pub fn fault_description(xml: &str) -> Option<String> {
    let doc = Document::parse(xml).ok()?;
    fault_in(&doc)
}

fn fault_in(doc: &Document) -> Option<String> {
    let fault = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Fault")?;

    let fault_string = element_text(fault, "faultstring").unwrap_or("unknown fault");
    let description = match (
        element_text(fault, "errorCode"),
        element_text(fault, "errorDescription"),
    ) {
        (Some(code), Some(description)) => format!("{fault_string} ({code} {description})"),
        (Some(code), None) => format!("{fault_string} ({code})"),
        (None, Some(description)) => format!("{fault_string} ({description})"),
        (None, None) => fault_string.to_string(),
    };

    Some(description)
}

fn element_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)?
        .text()
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upnp::WAN_COMMON_INTERFACE_CONFIG;

    #[test]
    fn request_names_action_and_service() {
        let envelope = request_envelope(WAN_COMMON_INTERFACE_CONFIG, GET_ADDON_INFOS);

        assert!(envelope.contains(
            r#"<u:GetAddonInfos xmlns:u="urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1"></u:GetAddonInfos>"#
        ));
        Document::parse(&envelope).unwrap();
        assert_eq!(
            soap_action(WAN_COMMON_INTERFACE_CONFIG, GET_ADDON_INFOS),
            "\"urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1#GetAddonInfos\""
        );
    }

    #[test]
    fn parses_counters() {
        let xml = r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
<s:Body>
<u:GetAddonInfosResponse xmlns:u="urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1">
<NewByteSendRate>1433</NewByteSendRate>
<NewByteReceiveRate>20568</NewByteReceiveRate>
<NewPacketSendRate>12</NewPacketSendRate>
<NewPacketReceiveRate>17</NewPacketReceiveRate>
<NewTotalBytesSent>2983414377</NewTotalBytesSent>
<NewTotalBytesReceived>1630238745</NewTotalBytesReceived>
<NewAutoDisconnectTime>0</NewAutoDisconnectTime>
</u:GetAddonInfosResponse>
</s:Body>
</s:Envelope>"#;

        let reading = parse_addon_infos(xml).unwrap();

        assert_eq!(
            reading,
            Reading {
                byte_send_rate: 1433,
                byte_receive_rate: 20568,
                packet_send_rate: 12,
                packet_receive_rate: 17,
                total_bytes_sent: 2_983_414_377,
                total_bytes_received: 1_630_238_745,
            }
        );
    }

    #[test]
    fn missing_or_invalid_counters_read_as_zero() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
<u:GetAddonInfosResponse xmlns:u="urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1">
<NewByteSendRate>-5</NewByteSendRate>
<NewByteReceiveRate>99</NewByteReceiveRate>
<NewTotalBytesSent>4294967296</NewTotalBytesSent>
</u:GetAddonInfosResponse>
</s:Body></s:Envelope>"#;

        let reading = parse_addon_infos(xml).unwrap();

        assert_eq!(reading.byte_send_rate, 0);
        assert_eq!(reading.byte_receive_rate, 99);
        assert_eq!(reading.packet_send_rate, 0);
        assert_eq!(reading.total_bytes_sent, 0);
    }

    #[test]
    fn faults_are_errors() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
<s:Fault>
<faultcode>s:Client</faultcode>
<faultstring>UPnPError</faultstring>
<detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
<errorCode>401</errorCode>
<errorDescription>Invalid Action</errorDescription>
</UPnPError></detail>
</s:Fault>
</s:Body></s:Envelope>"#;

        assert_eq!(
            fault_description(xml).as_deref(),
            Some("UPnPError (401 Invalid Action)")
        );
        let err = parse_addon_infos(xml).unwrap_err();
        assert_eq!(err.to_string(), "SOAP fault: UPnPError (401 Invalid Action)");
    }

    #[test]
    fn unexpected_body_is_an_error() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body/></s:Envelope>"#;

        assert!(parse_addon_infos(xml).is_err());
        assert!(fault_description(xml).is_none());
    }
}
