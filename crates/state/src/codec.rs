//! JSON encoding for persisted documents

use modhost_errors::{Error, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Encode as an indented JSON array
pub(crate) fn encode<T: Serialize>(items: &[T]) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    items.serialize(&mut ser)?;
    Ok(buf)
}

/// Decode a document; blank content reads as an empty list
pub(crate) fn decode<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<Vec<T>, Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        StorageError::CorruptedData {
            name: name.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhost_types::PackageRecord;

    #[test]
    fn encodes_with_four_space_indent() {
        let records = vec![PackageRecord::new("v1", "P1", "https://cdn/x.jar", "x.jar")];
        let text = String::from_utf8(encode(&records).unwrap()).unwrap();
        assert!(text.starts_with("[\n    {\n        \"id\": \"v1\""));
    }

    #[test]
    fn blank_document_is_empty() {
        let records: Vec<PackageRecord> = decode("ready_to_install.json", b"  \n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_document_names_itself() {
        let err = decode::<PackageRecord>("installed_mods.json", b"[{").unwrap_err();
        assert!(err.to_string().contains("installed_mods.json"));
    }
}
