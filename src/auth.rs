//! Auth-domain credential models, access-token claims, and derived session state.

pub mod claims;
pub mod credential;
pub mod state;

pub use claims::*;
pub use credential::*;
pub use state::*;
