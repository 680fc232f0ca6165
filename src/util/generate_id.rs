use sha2::{Digest, Sha256};

/// Stable 20-character base62 id derived from a name, used for actor and film ids.
pub fn generate_id(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();

    // Top 119 bits of the digest.
    let mut num = [0u8; 16];
    num.copy_from_slice(&hash[..16]);
    let mut value = u128::from_be_bytes(num) >> 9;

    let mut id = String::with_capacity(20);
    for _ in 0..20 {
        let remainder = (value % 62) as u8;
        value /= 62;

        let c = match remainder {
            0..=9 => (b'0' + remainder) as char,
            10..=35 => (b'A' + remainder - 10) as char,
            _ => (b'a' + remainder - 36) as char,
        };
        id.push(c);
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id("Keanu Reeves");
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(id, generate_id("Keanu Reeves"));
        assert_ne!(id, generate_id("Keanu Reeve"));
    }
}
