pub mod category;
pub mod item;
pub mod store;

pub use category::{categorize, Category, CategoryFilter};
pub use item::HistoryItem;
pub use store::{Filtered, HistoryStore, ItemRef};
