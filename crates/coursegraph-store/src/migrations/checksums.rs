use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a migration's SQL text
pub fn compute_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable_hex() {
        let a = compute_checksum("CREATE TABLE t (x INTEGER);");
        let b = compute_checksum("CREATE TABLE t (x INTEGER);");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, compute_checksum("CREATE TABLE t (y INTEGER);"));
    }
}
