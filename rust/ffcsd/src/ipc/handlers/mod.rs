pub mod catalog;
pub mod core;
pub mod ffcs;
pub mod session;
pub mod window;
