pub mod element;
pub mod rect;
pub mod sprite;
