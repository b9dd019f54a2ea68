pub mod catalog;
pub mod scripts;
