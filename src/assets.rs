pub mod decode;
pub mod gather;
