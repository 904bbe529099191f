pub mod favorites;
pub mod nasa;
