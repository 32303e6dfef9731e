//! Translation of local extension operations into provider operations
pub mod convert;
pub mod dispatch;
pub mod operation;
pub mod resource;

pub use convert::{to_local_error, MULTIPLE_ERRORS_CODE};
pub use dispatch::{dispatch, dispatch_json};
pub use operation::{LocalOperation, UnknownOperation};
pub use resource::{GenericResourceHandler, ResourceHandler};
