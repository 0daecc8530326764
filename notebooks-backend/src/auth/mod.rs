//! Authentication: bearer tokens, the per-request auth context, and the
//! identity collaborator that owns credentials.

mod context;
mod identity;
mod token;

pub use context::AuthContext;
pub use identity::{AuthError, IdentityProvider, SqliteIdentityProvider};
pub use token::{TokenError, TokenService};
