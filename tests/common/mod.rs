#![allow(dead_code)]

use std::path::Path;

/// Encode a posting-list index file: header, offset table, then one
/// terminated block per class, in the given order.
pub fn write_index_file(path: &Path, classes: &[(i32, Vec<(u32, f32)>)]) {
    std::fs::write(path, index_bytes(classes)).unwrap();
}

pub fn index_bytes(classes: &[(i32, Vec<(u32, f32)>)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend(0x4b53_2049_4e44_4558i64.to_le_bytes());
    let table_len = (classes.len() + 1) * 8;
    let mut offset = 8 + table_len;
    for (class_id, postings) in classes {
        bytes.extend(class_id.to_le_bytes());
        bytes.extend((offset as i32).to_le_bytes());
        offset += (postings.len() + 1) * 8;
    }
    bytes.extend((-1i32).to_le_bytes());
    bytes.extend(0i32.to_le_bytes());
    for (_, postings) in classes {
        for (item, weight) in postings {
            bytes.extend(item.to_le_bytes());
            bytes.extend(weight.to_le_bytes());
        }
        bytes.extend(0xFFFF_FFFFu32.to_le_bytes());
        bytes.extend(0.0f32.to_le_bytes());
    }
    bytes
}

/// Encode an IDF file: 36-byte header, dimension, raw f32 values.
pub fn write_idf_file(path: &Path, raw: &[f32]) {
    let mut bytes = Vec::new();
    bytes.extend(b"BC");
    bytes.extend([0u8; 14]);
    bytes.extend(b"2018-04-01 00:00:00\n");
    bytes.extend((raw.len() as i32).to_le_bytes());
    for value in raw {
        bytes.extend(value.to_le_bytes());
    }
    std::fs::write(path, bytes).unwrap();
}

pub fn write_labels_file(path: &Path, lines: &[&str]) {
    std::fs::write(path, lines.join("\n")).unwrap();
}
