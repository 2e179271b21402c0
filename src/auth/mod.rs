//! Authentication and authorization module
//!
//! Verifies JWTs issued by the hosted auth layer and gates admin routes.

mod jwt;
mod middleware;

pub use jwt::{Claims, TokenVerifier};
pub use middleware::{auth_middleware, require_admin};

#[cfg(test)]
pub(crate) use jwt::test_tokens;
