pub mod errors;
pub mod page;
pub mod table;

pub use page::Page;
pub use table::Table;
