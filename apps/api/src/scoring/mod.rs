// The scoring-and-selection core: pure, synchronous, no I/O.
// Every request recomputes from scratch; nothing here caches across calls.

pub mod archetype;
pub mod fit;
pub mod fuzzy;
pub mod hints;
pub mod matrix;
pub mod selector;
pub mod subdims;
