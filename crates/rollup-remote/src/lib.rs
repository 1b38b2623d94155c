//! Remote query collaborator for the rollup SDK.
//!
//! - `RemoteQuery`: account, nonce, offer-id, asset, pair, NFT and gas
//!   queries plus raw transaction submission
//! - `HttpRemote`: REST implementation over reqwest
//! - `MockRemote`: in-memory, recording implementation for tests

pub mod client;
pub mod error;
pub mod mock;
pub mod query;
pub mod types;


pub use client::{HttpRemote, DEFAULT_TIMEOUT};
pub use error::{RemoteError, RemoteResult};
pub use mock::{MockRemote, RemoteCall, Submission};
pub use query::{BoxFuture, DynRemote, RemoteQuery};
