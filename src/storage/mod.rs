mod adapter;
mod memory;
mod repository;
mod store;
mod workbook;

pub use adapter::*;
pub use memory::*;
pub use repository::*;
pub use store::*;
pub use workbook::*;
