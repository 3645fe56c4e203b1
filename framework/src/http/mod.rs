mod body;
mod request;
mod response;

pub use body::{collect_body, parse_json};
pub use request::Request;
pub use response::{HttpResponse, Response};
