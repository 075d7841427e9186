//! The hash/shield registry (spec §3, §5; SPEC_FULL.md C1).
//!
//! Fragments that must survive later stages untouched — raw HTML blocks and
//! spans, code-span payloads, escaped characters, protected URLs — are
//! replaced with an opaque placeholder key and restored in the final
//! `UNHASH_HTML` stage. The key shape (`md5-<32 hex chars>`) is kept
//! verbatim from the reference implementation for behavioral fidelity: it is
//! an opaque token, not an actual MD5 digest. Keys are derived with SHA-256
//! (spec §5), truncated to 32 hex characters, over a per-process random
//! salt plus a monotonic counter plus the fragment bytes — the counter
//! guarantees two calls storing byte-identical fragments still get distinct
//! keys, and the salt guarantees a key can never collide with literal user
//! content that merely looks like one.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Matches a hash-registry placeholder key anywhere in text.
pub static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"md5-[0-9a-f]{32}").unwrap());

/// Upper bound on unhash passes; guards against a pathological fragment
/// referencing its own key (which should never happen, since keys are
/// derived from pre-substitution content) turning into an infinite loop.
const MAX_UNHASH_PASSES: usize = 8;

/// Stores hashed-out fragments and restores them on demand.
pub struct HashRegistry {
    salt: [u8; 16],
    table: HashMap<String, String>,
    counter: u64,
}

impl HashRegistry {
    /// Create a registry with a freshly generated random salt.
    pub fn new() -> Self {
        let mut salt = [0u8; 16];
        rand::rng().fill_bytes(&mut salt);
        Self::with_salt(salt)
    }

    /// Create a registry with an explicit salt (used by tests for
    /// deterministic output).
    pub fn with_salt(salt: [u8; 16]) -> Self {
        Self { salt, table: HashMap::new(), counter: 0 }
    }

    /// Store `fragment` and return the placeholder key that replaces it.
    pub fn store(&mut self, fragment: &str) -> String {
        let key = self.derive_key(fragment);
        self.table.insert(key.clone(), fragment.to_string());
        key
    }

    fn derive_key(&mut self, fragment: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt);
        hasher.update(self.counter.to_le_bytes());
        hasher.update(fragment.as_bytes());
        self.counter += 1;
        let digest = hasher.finalize();
        let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
        format!("md5-{}", &hex[..32])
    }

    /// Look up a stored fragment by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    /// Replace every placeholder key in `text` with its stored fragment,
    /// repeating until a fixed point (a restored fragment may itself
    /// contain other keys, e.g. an HTML block holding a hashed code span).
    pub fn unhash(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..MAX_UNHASH_PASSES {
            let mut changed = false;
            let next = KEY_RE.replace_all(&current, |caps: &regex::Captures| {
                let key = &caps[0];
                match self.table.get(key) {
                    Some(value) => {
                        changed = true;
                        value.clone()
                    }
                    None => key.to_string(),
                }
            });
            let next = next.into_owned();
            if !changed {
                return next;
            }
            current = next;
        }
        current
    }
}

impl Default for HashRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_unhash_roundtrips() {
        let mut reg = HashRegistry::with_salt([7u8; 16]);
        let key = reg.store("<div>raw</div>");
        let wrapped = format!("before {key} after");
        assert_eq!(reg.unhash(&wrapped), "before <div>raw</div> after");
    }

    #[test]
    fn identical_fragments_get_distinct_keys() {
        let mut reg = HashRegistry::with_salt([1u8; 16]);
        let a = reg.store("same");
        let b = reg.store("same");
        assert_ne!(a, b);
    }

    #[test]
    fn nested_keys_are_resolved() {
        let mut reg = HashRegistry::with_salt([3u8; 16]);
        let inner = reg.store("inner");
        let outer = reg.store(&format!("<p>{inner}</p>"));
        assert_eq!(reg.unhash(&outer), "<p>inner</p>");
    }

    #[test]
    fn unknown_key_is_left_untouched() {
        let reg = HashRegistry::with_salt([0u8; 16]);
        let text = "md5-00000000000000000000000000000000";
        assert_eq!(reg.unhash(text), text);
    }
}
