pub mod cookie;
pub mod push;
