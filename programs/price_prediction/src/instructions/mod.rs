pub mod admin;
pub mod bet;
pub mod claim;
pub mod lifecycle;
