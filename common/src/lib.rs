pub mod bitset;
pub mod token;

pub use crate::bitset::BitSet;
pub use crate::token::*;
pub use smallvec::{smallvec, SmallVec};

// define some data structures that will be used in other crates, so that they don't need to import them
pub type HashMap<K, V> = hashbrown::HashMap<K, V>;
pub type HashSet<K> = hashbrown::HashSet<K>;
pub type IndexMap<K, V> = indexmap::IndexMap<K, V>;
