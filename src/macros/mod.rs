#[macro_use]
pub mod cfg;
