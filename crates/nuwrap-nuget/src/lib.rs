//! Location of `NuGet.exe` and construction of its command-line arguments.

pub mod error;
pub mod invoke;
pub mod locate;
pub mod operation;
pub mod pack;
pub mod push;
pub mod quote;
pub mod request;
pub mod restore;

pub use error::NuGetError;
pub use invoke::{Invocation, InvocationResult};
pub use locate::{locate_self_path, NuGetInfo, NuGetLocator};
pub use operation::{NuGetCommand, Operation};
pub use pack::PackOptions;
pub use push::PushOptions;
pub use quote::quote_if_needed;
pub use request::CommonOptions;
pub use restore::RestoreOptions;
