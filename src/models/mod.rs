mod request;

pub use request::{ChatRequest, ErrorBody};
