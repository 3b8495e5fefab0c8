use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

const SALT_LENGTH: usize = 16;

pub fn salt_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password);
    hasher.update(salt);

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

pub fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a plaintext password with a fresh salt, returning `(salted_password, salt)`.
pub fn hash_password(password: &str) -> (String, String) {
    let salt = generate_salt();
    (salt_password(password, &salt), salt)
}

/// Records without a stored credential never match.
pub fn verify_password(password: &str, salted_password: Option<&str>, salt: Option<&str>) -> bool {
    match (salted_password, salt) {
        (Some(salted_password), Some(salt)) => salt_password(password, salt) == salted_password,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_hex() {
        let (salted, salt) = hash_password("hunter22");
        assert_eq!(salt.len(), SALT_LENGTH);
        assert_eq!(salted.len(), 64);
        assert!(salted.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(salted, "hunter22");
    }

    #[test]
    fn same_password_different_salts() {
        let (a, _) = hash_password("hunter22");
        let (b, _) = hash_password("hunter22");
        assert_ne!(a, b);
    }

    #[test]
    fn verify_matches_only_the_right_password() {
        let (salted, salt) = hash_password("hunter22");
        assert!(verify_password("hunter22", Some(&salted), Some(&salt)));
        assert!(!verify_password("hunter23", Some(&salted), Some(&salt)));
        assert!(!verify_password("hunter22", None, None));
    }
}
