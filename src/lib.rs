pub mod cart;
pub mod catalog;
pub mod filter;

pub use cart::{Cart, CartEntry, Totals};
pub use catalog::{split_category, Catalog, CategoryIndex, Product, Source, DEFAULT_PRICE};
pub use filter::{FilterState, SortKey, ALL};
