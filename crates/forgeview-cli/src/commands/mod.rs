pub mod doctor;
pub mod rewrite;
pub mod select;
