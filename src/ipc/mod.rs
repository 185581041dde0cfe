mod error;
mod handlers;
mod helpers;
mod router;
mod types;

pub use error::{codes, err, ok};
pub use router::handle_request;
pub use types::{AppState, Request};
