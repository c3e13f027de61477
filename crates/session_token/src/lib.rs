mod error;
mod jwt;

pub use error::Error;
pub use jwt::{SessionTokenClaims, SessionTokenHeader, issue_hs256, sign_hs256, verify_hs256};
