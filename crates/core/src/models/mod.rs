pub mod books;
pub mod category;
pub mod price;
pub mod record;
pub mod report;
pub mod user;
