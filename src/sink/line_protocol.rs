//! InfluxDB line protocol encoding.
//!
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=1i,field2=2i timestamp_s
//! ```
//!
//! Timestamps are written with second precision. Tags with an empty value
//! are left out, as InfluxDB rejects them.

use crate::sink::{Batch, MeasurementPoint};

/// Encodes a whole batch, one line per point.
pub fn encode_batch(batch: &Batch) -> String {
    batch
        .points()
        .iter()
        .map(encode_point)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn encode_point(point: &MeasurementPoint) -> String {
    let mut line = escape_measurement(&point.measurement);

    // Tags sorted by key for canonical form
    let mut tags: Vec<_> = point.tags.iter().collect();
    tags.sort_by_key(|(k, _)| **k);
    for (key, value) in tags.into_iter().filter(|(_, v)| !v.is_empty()) {
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }

    line.push(' ');
    let fields: Vec<String> = point
        .fields
        .iter()
        .map(|(key, value)| format!("{}={value}i", escape_key(key)))
        .collect();
    line.push_str(&fields.join(","));

    line.push(' ');
    line.push_str(&point.timestamp.timestamp().to_string());

    line
}

fn escape_measurement(s: &str) -> String {
    single_line(s)
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(' ', "\\ ")
}

/// Tag keys, tag values and field keys share the same rules.
fn escape_key(s: &str) -> String {
    single_line(s)
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

/// Line breaks would end the point early.
fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}
