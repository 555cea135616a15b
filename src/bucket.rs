//! The fixed-depth bucket index: prime table, hash paths, and the leaf
//! store holding collision-chain heads.

use core::hash::BuildHasher;
use hashbrown::HashTable;
use slotmap::DefaultKey;

/// Moduli defining the 37 levels of the bucket index, one prime per
/// level, strictly decreasing. Because the primes shrink each level, most
/// keys separate within the first few levels; keys sharing the entire
/// path share a leaf and are disambiguated by walking its chain.
pub(crate) const DIMENSION_PRIMES: [u32; 37] = [
    1147488061, // 0
    1147485919, // 1
    1147483837, // 2
    860617801,  // 3
    573745439,  // 4
    430311703,  // 5
    215158439,  // 6
    143438059,  // 7
    71721511,   // 8
    39447563,   // 9
    19725653,   // 10
    9865993,    // 11
    4933301,    // 12
    2468657,    // 13
    1470373,    // 14
    769429,     // 15
    371311,     // 16
    169199,     // 17
    88721,      // 18
    49741,      // 19
    25457,      // 20
    11261,      // 21
    5657,       // 22
    2593,       // 23
    1777,       // 24
    1291,       // 25
    997,        // 26
    863,        // 27
    431,        // 28
    233,        // 29
    109,        // 30
    83,         // 31
    41,         // 32
    23,         // 33
    11,         // 34
    5,          // 35
    2,          // 36
];

/// The per-level indices a hash descends through, one per prime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct BucketPath([u32; 37]);

impl BucketPath {
    /// Path for a hash: at each level, `hash mod prime` normalized to
    /// non-negative.
    pub(crate) fn for_hash(hash: i64) -> Self {
        let mut indices = [0u32; 37];
        for (index, prime) in indices.iter_mut().zip(DIMENSION_PRIMES) {
            *index = hash.rem_euclid(i64::from(prime)) as u32;
        }
        BucketPath(indices)
    }
}

struct Leaf {
    digest: u64,
    path: BucketPath,
    head: DefaultKey,
}

/// Flat realization of the 37-level bucket hierarchy: one entry per
/// occupied leaf path, holding the head of that leaf's collision chain.
/// A path with no entry is "not found" at whatever level the descent
/// would have stopped; the flat form collapses that into one probe while
/// keeping lookup cost bounded by the local chain length.
pub(crate) struct BucketTree<S> {
    leaves: HashTable<Leaf>,
    build: S,
}

impl<S> BucketTree<S>
where
    S: BuildHasher,
{
    pub(crate) fn new(build: S) -> Self {
        Self {
            leaves: HashTable::new(),
            build,
        }
    }

    fn digest(&self, path: &BucketPath) -> u64 {
        self.build.hash_one(path)
    }

    /// Head of the collision chain at `path`, if any key hashes there.
    pub(crate) fn head(&self, path: &BucketPath) -> Option<DefaultKey> {
        let digest = self.digest(path);
        self.leaves
            .find(digest, |leaf| leaf.path == *path)
            .map(|leaf| leaf.head)
    }

    /// Install the chain head for a previously empty leaf.
    pub(crate) fn insert_head(&mut self, path: BucketPath, head: DefaultKey) {
        let digest = self.digest(&path);
        self.leaves
            .insert_unique(digest, Leaf { digest, path, head }, |leaf| leaf.digest);
    }

    /// Rewrite the chain head at `path`; `None` clears the leaf.
    pub(crate) fn set_head(&mut self, path: &BucketPath, head: Option<DefaultKey>) {
        let digest = self.digest(path);
        if let Ok(mut leaf) = self.leaves.find_entry(digest, |leaf| leaf.path == *path) {
            match head {
                Some(node) => leaf.get_mut().head = node,
                None => {
                    leaf.remove();
                }
            }
        }
    }

    /// Number of occupied leaves (distinct chains).
    #[cfg(test)]
    pub(crate) fn occupied_leaves(&self) -> usize {
        self.leaves.len()
    }
}
