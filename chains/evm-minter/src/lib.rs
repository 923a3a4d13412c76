pub mod client;
pub mod minter;

pub use client::EthersChainClient;
pub use minter::Minter;
