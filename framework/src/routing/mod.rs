mod group;
mod names;
mod router;

pub use group::{GroupBuilder, GroupRouter};
pub use names::RouteNames;
pub use router::{BoxedHandler, Method, RouteBuilder, RouteMatch, Router};
