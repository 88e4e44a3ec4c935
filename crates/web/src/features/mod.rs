pub mod books;
pub mod catalog;
pub mod imports;
pub mod sitemap;
