mod item;

pub use item::{Item, ItemView};
