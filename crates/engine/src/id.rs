//! Primary-key generation.

use uuid::Uuid;

/// Generate a fresh 24-character lowercase hex document id.
///
/// Takes the first 12 bytes of a random UUIDv4 rather than hand-rolling an
/// RNG, mirroring the teacher's reuse of `Uuid` as the backing source for
/// its own identifier types.
pub fn generate() -> String {
    let bytes = Uuid::new_v4();
    let hex = format!("{:x}", bytes.simple());
    hex[..24].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_24_char_lowercase_hex() {
        let id = generate();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn successive_ids_differ() {
        assert_ne!(generate(), generate());
    }
}
