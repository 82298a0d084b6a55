//! Byte-sequence hash functions a table can probe with.
//!
//! All strategies share one signature, `fn(&[u8]) -> u32`, so they can be
//! swapped freely to compare how evenly they spread keys over the slot array.

/// Signature shared by every hash strategy.
pub type HashFunction = fn(&[u8]) -> u32;

/// The hash function a table uses to place and look up keys.
///
/// A strategy is picked when the table is built and may be replaced later
/// with `set_hash_strategy`. Replacing it does **not** rehash the entries
/// already stored: they stay where the previous strategy put them, so
/// lookups for those keys may no longer find them. Only swap strategies on
/// an empty table unless that breakage is what you are measuring.
#[derive(Clone, Copy, Debug)]
pub enum HashStrategy {
    /// Adler-32 checksum.
    Adler32,
    /// Bernstein's multiplicative hash (`h * 33 + b`).
    Djb2,
    /// The sdbm shift-and-add mixer.
    Sdbm,
    /// foldhash's fast hasher, folded to 32 bits.
    #[cfg(feature = "foldhash")]
    Foldhash,
    /// A caller supplied function.
    Custom(HashFunction),
}

cfg_if::cfg_if! {
    if #[cfg(feature = "default-djb2")] {
        const DEFAULT_STRATEGY: HashStrategy = HashStrategy::Djb2;
    } else if #[cfg(feature = "default-sdbm")] {
        const DEFAULT_STRATEGY: HashStrategy = HashStrategy::Sdbm;
    } else {
        const DEFAULT_STRATEGY: HashStrategy = HashStrategy::Adler32;
    }
}

impl Default for HashStrategy {
    /// Adler-32, unless the `default-djb2` or `default-sdbm` feature picks
    /// another one.
    fn default() -> Self {
        DEFAULT_STRATEGY
    }
}

impl HashStrategy {
    /// The built-in strategies, in declaration order.
    pub const BUILTIN: &'static [HashStrategy] = &[
        HashStrategy::Adler32,
        HashStrategy::Djb2,
        HashStrategy::Sdbm,
        #[cfg(feature = "foldhash")]
        HashStrategy::Foldhash,
    ];

    /// Hashes `bytes` with this strategy.
    #[inline]
    pub fn hash(self, bytes: &[u8]) -> u32 {
        match self {
            HashStrategy::Adler32 => adler32(bytes),
            HashStrategy::Djb2 => djb2(bytes),
            HashStrategy::Sdbm => sdbm(bytes),
            #[cfg(feature = "foldhash")]
            HashStrategy::Foldhash => foldhash32(bytes),
            HashStrategy::Custom(f) => f(bytes),
        }
    }

    /// Short human readable name, used by the benchmarks and demos.
    pub fn name(self) -> &'static str {
        match self {
            HashStrategy::Adler32 => "adler32",
            HashStrategy::Djb2 => "djb2",
            HashStrategy::Sdbm => "sdbm",
            #[cfg(feature = "foldhash")]
            HashStrategy::Foldhash => "foldhash",
            HashStrategy::Custom(_) => "custom",
        }
    }
}

const ADLER_MOD: u32 = 65521;

/// Adler-32 checksum of `bytes`.
pub fn adler32(bytes: &[u8]) -> u32 {
    let mut s1: u32 = 1;
    let mut s2: u32 = 0;
    for &b in bytes {
        s1 = (s1 + b as u32) % ADLER_MOD;
        s2 = (s2 + s1) % ADLER_MOD;
    }
    (s2 << 16) | s1
}

/// djb2: `h = h * 33 + b`, seeded with 5381.
pub fn djb2(bytes: &[u8]) -> u32 {
    bytes.iter().fold(5381u32, |h, &b| {
        (h << 5).wrapping_add(h).wrapping_add(b as u32)
    })
}

/// sdbm: `h = b + (h << 6) + (h << 16) - h`.
pub fn sdbm(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |h, &b| {
        (b as u32)
            .wrapping_add(h << 6)
            .wrapping_add(h << 16)
            .wrapping_sub(h)
    })
}

#[cfg(feature = "foldhash")]
fn foldhash32(bytes: &[u8]) -> u32 {
    use core::hash::BuildHasher;
    use core::hash::Hasher;

    let mut hasher = foldhash::fast::FixedState::default().build_hasher();
    hasher.write(bytes);
    let h = hasher.finish();
    (h ^ (h >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adler32_known_values() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"abc"), 0x024D_0127);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn adler32_reduces_modulo_largest_prime() {
        let bytes = [0xFFu8; 5552];
        let h = adler32(&bytes);
        assert!(h & 0xFFFF < ADLER_MOD);
        assert!(h >> 16 < ADLER_MOD);
    }

    #[test]
    fn djb2_known_values() {
        assert_eq!(djb2(b""), 5381);
        assert_eq!(djb2(b"a"), 5381 * 33 + 97);
        assert_eq!(djb2(b"ab"), (5381 * 33 + 97) * 33 + 98);
    }

    #[test]
    fn sdbm_known_values() {
        assert_eq!(sdbm(b""), 0);
        assert_eq!(sdbm(b"a"), 97);
        assert_eq!(sdbm(b"ab"), 98 + (97 << 6) + (97 << 16) - 97);
    }

    #[test]
    fn long_inputs_wrap_instead_of_overflowing() {
        let bytes = [0xA5u8; 4096];
        // Only checking that nothing panics in debug builds.
        let _ = djb2(&bytes);
        let _ = sdbm(&bytes);
    }

    #[test]
    fn strategies_dispatch_to_their_functions() {
        let key = b"dispatch";
        assert_eq!(HashStrategy::Adler32.hash(key), adler32(key));
        assert_eq!(HashStrategy::Djb2.hash(key), djb2(key));
        assert_eq!(HashStrategy::Sdbm.hash(key), sdbm(key));
        assert_eq!(HashStrategy::Custom(|_| 7).hash(key), 7);
    }

    #[test]
    fn builtin_names_are_distinct() {
        let names: alloc::vec::Vec<_> = HashStrategy::BUILTIN.iter().map(|s| s.name()).collect();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(HashStrategy::Custom(djb2).name(), "custom");
    }

    #[test]
    #[cfg(not(any(feature = "default-djb2", feature = "default-sdbm")))]
    fn default_is_adler32() {
        assert!(matches!(HashStrategy::default(), HashStrategy::Adler32));
    }

    #[test]
    #[cfg(feature = "foldhash")]
    fn foldhash_is_deterministic() {
        assert_eq!(
            HashStrategy::Foldhash.hash(b"same"),
            HashStrategy::Foldhash.hash(b"same")
        );
    }
}
