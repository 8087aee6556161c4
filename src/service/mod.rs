pub mod finance;
pub mod gateway;
pub mod stream;
