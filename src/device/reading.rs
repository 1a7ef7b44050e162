use std::fmt;

use indexmap::IndexMap;

pub const FIELD_BYTE_SEND_RATE: &str = "byteSendRate";
pub const FIELD_BYTE_RECEIVE_RATE: &str = "byteReceiveRate";
pub const FIELD_PACKET_SEND_RATE: &str = "packetSendRate";
pub const FIELD_PACKET_RECEIVE_RATE: &str = "packetReceiveRate";
pub const FIELD_TOTAL_BYTES_SENT: &str = "totalBytesSent";
pub const FIELD_TOTAL_BYTES_RECEIVED: &str = "totalBytesReceived";

/// Transfer counters polled from a gateway at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reading {
    pub byte_send_rate: u32,

    pub byte_receive_rate: u32,

    pub packet_send_rate: u32,

    pub packet_receive_rate: u32,

    pub total_bytes_sent: u32,

    pub total_bytes_received: u32,
}

impl Reading {
    pub fn fields(&self) -> IndexMap<&'static str, u32> {
        IndexMap::from([
            (FIELD_BYTE_SEND_RATE, self.byte_send_rate),
            (FIELD_BYTE_RECEIVE_RATE, self.byte_receive_rate),
            (FIELD_PACKET_SEND_RATE, self.packet_send_rate),
            (FIELD_PACKET_RECEIVE_RATE, self.packet_receive_rate),
            (FIELD_TOTAL_BYTES_SENT, self.total_bytes_sent),
            (FIELD_TOTAL_BYTES_RECEIVED, self.total_bytes_received),
        ])
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rate: bytes(up {} / down {}) packets(up {} / down {}) | total: bytes(up {} / down {})",
            self.byte_send_rate,
            self.byte_receive_rate,
            self.packet_send_rate,
            self.packet_receive_rate,
            self.total_bytes_sent,
            self.total_bytes_received,
        )
    }
}
