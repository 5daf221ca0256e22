pub mod chain_client;
pub mod tx;

pub use chain_client::ChainClient;
pub use tx::context::{CallContext, CancelHandle, CancelReason};
pub use tx::types::{Chain, TransactOptions, TransactionOutcome, TxStatus};
