//! Models module
//!
//! Defines the description tree handed to document writers. The tree is produced
//! by an introspection layer outside this crate and is read-only once built.

pub mod column;
pub mod description;
pub mod table;

pub use column::Column;
pub use description::{Basic, Description};
pub use table::Table;
