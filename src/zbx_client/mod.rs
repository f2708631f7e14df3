pub(crate) mod client;
pub(crate) mod rpc;

pub use client::ZbxClient;
