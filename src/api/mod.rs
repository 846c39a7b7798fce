pub mod service;

pub use service::{router, start_http_server};
