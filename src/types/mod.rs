pub mod price;
pub mod quote;
pub mod ticker;
