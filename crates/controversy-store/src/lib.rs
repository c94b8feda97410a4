//! Client-side persistence: the cookie jar and the anonymous identity kept in it.

mod error;
pub use error::StoreError;

pub mod identity;
pub mod jar;

pub use identity::{IdentityStore, generate_user_id};
pub use jar::{Cookie, CookieJar};
