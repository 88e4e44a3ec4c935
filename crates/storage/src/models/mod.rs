mod benefit;
mod book;
mod book_image;
mod category;

pub use benefit::{BENEFIT_NAMES, Benefit};
pub use book::{Book, BookStatus, NewBook};
pub use book_image::{BenefitAssociation, BookImage, ImageAssociation};
pub use category::Category;
