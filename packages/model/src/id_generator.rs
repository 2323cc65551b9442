use crc32fast::Hasher;
use std::collections::HashSet;

/// Derive a short stable seed from an arbitrary namespace string using CRC32
pub fn get_seed(namespace: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks and columns.
///
/// IDs look like `<seed>-<n>`. Two generators with the same seed produce the
/// same sequence, so callers that may see foreign ids (loaded documents)
/// should mint through [`IdGenerator::new_id_excluding`].
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            seed: get_seed(namespace),
            count: 0,
        }
    }

    /// Seeded from the current wall clock, so separate editor sessions do not collide
    pub fn for_session() -> Self {
        let now = chrono::Utc::now();
        let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros());
        Self::new(&format!("session:{}", nanos))
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Generate the next ID that is not in `taken`, and record it there
    pub fn new_id_excluding(&mut self, taken: &mut HashSet<String>) -> String {
        loop {
            let id = self.new_id();
            if taken.insert(id.clone()) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
