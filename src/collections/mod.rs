mod entry;
pub use entry::Entry;

mod node;

mod tree;
pub use tree::{IntervalTree, Iter};

pub mod set;
pub use set::IntervalSet;
