pub mod fill;
pub mod info;
