pub mod base;
pub mod news;
pub mod sina;
