//! HTTP Request domain types

mod body;
mod header;
mod method;
mod query;
mod spec;

pub use body::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, RequestBody, TEXT_CONTENT_TYPE};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::RequestSpec;
