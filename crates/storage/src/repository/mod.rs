pub mod benefit;
pub mod book;
pub mod category;
pub mod image;
