pub mod ethereum_provider;

pub use ethereum_provider::{ChainProvider, EthereumProvider};
