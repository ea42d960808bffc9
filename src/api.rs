//! Typed resource APIs built on the authenticated dispatch path.
//!
//! Every operation here is an ordinary [`Gateway`](crate::gateway::Gateway) call: the
//! access credential is attached on the way out, and an expired session is refreshed
//! and replayed before the caller ever sees an error.

pub mod session;
pub mod types;

mod comments;
mod posts;
mod profiles;
mod tags;

pub use comments::*;
pub use posts::*;
pub use profiles::*;
pub use session::*;
pub use tags::*;
pub use types::*;
