//! Data model types

mod field;
mod page;
mod row;

pub use field::*;
pub use page::*;
pub use row::*;
