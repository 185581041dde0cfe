pub mod api;
pub mod calc;
pub mod filter;
pub mod ipc;
pub mod model;
pub mod page;
pub mod session;
pub mod table;
