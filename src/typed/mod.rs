pub mod builder;
pub mod node;
pub mod table;

pub use builder::{TypedBuilder, TypedTree};
pub use node::{NodeInventory, TypeId, TypedNode};
pub use table::TypePossibilityTable;
