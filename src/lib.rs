// 双链（L1 / L2）交易客户端 + 链下签名校验

pub mod config;
pub mod crypto;
pub mod errors;
pub mod infrastructure;
pub mod services;
pub mod startup;
pub mod utils;

pub use errors::AppError;
pub use services::{
    CallContext, CancelHandle, CancelReason, Chain, ChainClient, TransactOptions,
    TransactionOutcome, TxStatus,
};
