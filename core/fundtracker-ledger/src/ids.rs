//! Identifier and display-hash generation

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of record identifiers and cosmetic display hashes.
///
/// Display hashes are decoration only: they are not computed from the
/// record and carry no integrity guarantee.
pub trait IdGenerator: Send + Sync {
    fn transaction_id(&self) -> String;
    fn project_id(&self) -> String;
    fn milestone_id(&self) -> String;
    fn user_id(&self) -> String;
    fn display_hash(&self) -> String;
}

fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Random ids in the formats the web client produced:
/// `k3x9a0q2m`, `proj_a81kz0`, `ms_0qz7fe`, hash `0x3fa9c...`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn transaction_id(&self) -> String {
        random_base36(9)
    }

    fn project_id(&self) -> String {
        format!("proj_{}", random_base36(6))
    }

    fn milestone_id(&self) -> String {
        format!("ms_{}", random_base36(6))
    }

    fn user_id(&self) -> String {
        random_base36(9)
    }

    fn display_hash(&self) -> String {
        let bytes: [u8; 3] = rand::thread_rng().gen();
        let hex = hex::encode(bytes);
        format!("0x{}...", &hex[..5])
    }
}

/// Deterministic ids from a single counter, for tests and replays
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: AtomicU64::new(first) }
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl IdGenerator for SequentialIds {
    fn transaction_id(&self) -> String {
        format!("tx_{}", self.bump())
    }

    fn project_id(&self) -> String {
        format!("proj_seq{}", self.bump())
    }

    fn milestone_id(&self) -> String {
        format!("ms_seq{}", self.bump())
    }

    fn user_id(&self) -> String {
        format!("user_{}", self.bump())
    }

    fn display_hash(&self) -> String {
        format!("0x{:05x}...", self.bump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_formats() {
        let ids = RandomIds;
        let tx = ids.transaction_id();
        assert_eq!(tx.len(), 9);
        assert!(tx.bytes().all(|b| BASE36.contains(&b)));

        assert!(ids.project_id().starts_with("proj_"));
        assert_eq!(ids.project_id().len(), 11);
        assert!(ids.milestone_id().starts_with("ms_"));

        let hash = ids.display_hash();
        assert!(hash.starts_with("0x"));
        assert!(hash.ends_with("..."));
        assert_eq!(hash.len(), 10);
        assert!(hash[2..7].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sequential_ids_never_repeat() {
        let ids = SequentialIds::new();
        assert_eq!(ids.transaction_id(), "tx_1");
        assert_eq!(ids.project_id(), "proj_seq2");
        assert_eq!(ids.display_hash(), "0x00003...");
        assert_ne!(ids.transaction_id(), ids.transaction_id());
    }
}
