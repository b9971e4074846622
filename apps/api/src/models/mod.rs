pub mod catalog;
pub mod community;
