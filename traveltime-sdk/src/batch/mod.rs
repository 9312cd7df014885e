//! Request batching: split a request into size-bounded bundles, dispatch one
//! outbound request per bundle and merge the responses back into one.
//!
//! Every stage keys on bundle index. Results therefore come back in the
//! caller's search order whatever order the requests complete in.

mod dispatch;
mod merge;
mod request;
mod split;

pub use dispatch::{DispatchMode, Dispatcher};
pub use merge::Merge;
pub use request::{BatchedRequest, SearchItem};
pub use split::{Bundle, split};
