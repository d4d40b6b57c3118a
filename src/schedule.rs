pub mod ease;
pub mod effect;
pub mod plan;
pub mod select;
