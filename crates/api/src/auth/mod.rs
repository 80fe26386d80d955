//! Identity provider adapter: JWT issuance/validation and password hashing.

pub mod jwt;
pub mod password;
