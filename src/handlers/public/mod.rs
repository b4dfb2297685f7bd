// Token acquisition endpoints; no authentication required
pub mod auth;

pub use auth::{sign_in, sign_up};
