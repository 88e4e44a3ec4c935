pub mod book;
pub mod common;
pub mod image;
