//! How keys are hashed and compared.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::strategy::HashStrategy;

/// A key type the table can store.
///
/// The table only needs two things from a key: equality (`Eq`) and a 32-bit
/// hash. Most implementations feed their byte representation to the active
/// [`HashStrategy`]; a type that already carries a good hash may return it
/// directly and ignore the strategy.
///
/// Owned keys and the borrowed forms they are looked up by (for example
/// `String` and `str`) must produce the same hash.
///
/// # Examples
///
/// ```rust
/// use lin_hash::HashMap;
/// use lin_hash::HashStrategy;
/// use lin_hash::TableKey;
///
/// #[derive(PartialEq, Eq)]
/// struct Ticket(u64);
///
/// impl TableKey for Ticket {
///     fn table_hash(&self, _strategy: HashStrategy) -> u32 {
///         (self.0 ^ (self.0 >> 32)) as u32
///     }
/// }
///
/// let mut map = HashMap::new();
/// map.insert(Ticket(7), "seven");
/// assert_eq!(map.get(&Ticket(7)), Ok(&"seven"));
/// ```
pub trait TableKey: Eq {
    /// Returns the hash of this key under `strategy`.
    fn table_hash(&self, strategy: HashStrategy) -> u32;
}

impl TableKey for [u8] {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        strategy.hash(self)
    }
}

impl<const N: usize> TableKey for [u8; N] {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        strategy.hash(self)
    }
}

impl TableKey for Vec<u8> {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        strategy.hash(self)
    }
}

impl TableKey for str {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        strategy.hash(self.as_bytes())
    }
}

impl TableKey for String {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        strategy.hash(self.as_bytes())
    }
}

impl<T: TableKey + ?Sized> TableKey for &T {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        (**self).table_hash(strategy)
    }
}

impl<T: TableKey + ?Sized> TableKey for Box<T> {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        (**self).table_hash(strategy)
    }
}

macro_rules! impl_table_key_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TableKey for $ty {
                #[inline]
                fn table_hash(&self, strategy: HashStrategy) -> u32 {
                    strategy.hash(&self.to_le_bytes())
                }
            }
        )*
    };
}

impl_table_key_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl TableKey for char {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        strategy.hash(&(*self as u32).to_le_bytes())
    }
}

impl TableKey for bool {
    #[inline]
    fn table_hash(&self, strategy: HashStrategy) -> u32 {
        strategy.hash(&[*self as u8])
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::strategy::adler32;

    #[test]
    fn owned_and_borrowed_forms_agree() {
        for strategy in HashStrategy::BUILTIN.iter().copied() {
            let owned = "borrowed".to_string();
            assert_eq!(owned.table_hash(strategy), "borrowed".table_hash(strategy));

            let bytes = vec![1u8, 2, 3];
            assert_eq!(bytes.table_hash(strategy), bytes[..].table_hash(strategy));
            assert_eq!([1u8, 2, 3].table_hash(strategy), bytes.table_hash(strategy));

            let boxed: Box<str> = "boxed".into();
            assert_eq!(boxed.table_hash(strategy), "boxed".table_hash(strategy));
            assert_eq!((&&"ref").table_hash(strategy), "ref".table_hash(strategy));
        }
    }

    #[test]
    fn integers_hash_their_little_endian_bytes() {
        assert_eq!(
            0x0102_0304u32.table_hash(HashStrategy::Adler32),
            adler32(&[4, 3, 2, 1])
        );
        assert_eq!(
            'a'.table_hash(HashStrategy::Adler32),
            adler32(&[97, 0, 0, 0])
        );
        assert_eq!(true.table_hash(HashStrategy::Adler32), adler32(&[1]));
    }

    #[test]
    fn custom_strategy_is_used() {
        let strategy = HashStrategy::Custom(|bytes| bytes.len() as u32);
        assert_eq!("four".table_hash(strategy), 4);
        assert_eq!(7u64.table_hash(strategy), 8);
    }
}
