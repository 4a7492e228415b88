pub mod engine;
pub mod key;
pub mod mode;
pub mod pixel;
pub mod plate;
pub mod request;
pub mod zip;
