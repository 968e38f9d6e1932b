//! Shared-password gate for status toggles and deletions.
//!
//! A single md5-hashed secret stored under the `password` key. The first
//! check ever performed claims the default password by writing its hash,
//! then compares against it.

use crate::kv::KvStore;

const PASSWORD_KEY: &str = "password";
const DEFAULT_PASSWORD: &str = "admin";

/// Checks `entered` against the stored password hash.
///
/// If no hash is stored yet, the default is written first, so the very
/// first call already compares against a concrete stored value.
pub fn is_correct_password(store: &dyn KvStore, entered: &str) -> bool {
    let stored = store.get(PASSWORD_KEY).unwrap_or_else(|| {
        let default_hash = hash(DEFAULT_PASSWORD);
        store.set(PASSWORD_KEY, &default_hash);
        default_hash
    });

    hash(entered) == stored
}

fn hash(password: &str) -> String {
    format!("{:x}", md5::compute(password))
}
