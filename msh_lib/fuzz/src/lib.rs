use msh_lib::{decode, encode, MshDocument};

/// Checks that decoding `bytes` and encoding the result produces the original bytes.
pub fn test_read_write(bytes: &[u8]) {
    if let Ok(document) = decode(bytes) {
        let output = encode(&document).unwrap();
        assert_eq!(bytes, &output[..], "{}", serde_json::to_string(&document).unwrap());
    }
}

/// Checks that any document that can be encoded decodes and encodes to the same bytes.
pub fn test_write_read_write(input: &MshDocument) {
    if let Ok(before) = encode(input) {
        let output = decode(&before).unwrap();
        let after = encode(&output).unwrap();
        assert_eq!(before, after, "{}", serde_json::to_string(input).unwrap());
    }
}
