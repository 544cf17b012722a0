//! Salted password hashing. Unremarkable infrastructure: a random per-user
//! salt and a SHA-256 digest, stored as `salt$digest`.

use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    digest(salt, password) == hash
}

fn digest(salt: &str, password: &str) -> String {
    let output = Sha256::digest(format!("{salt}{password}").as_bytes());
    general_purpose::STANDARD_NO_PAD.encode(output)
}
