//! Client for the controversy scoring service: HTTP transport and the
//! page-view session built on top of it.

pub mod http;
pub mod page;

#[cfg(test)]
pub(crate) mod test_server;

pub use http::{ClientError, ScoreClient};
pub use page::Page;
