use crate::services::tx::context::CancelReason;
use crate::services::tx::types::Chain;
use ethers_core::types::{H256, TransactionReceipt};
use ethers_providers::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// 配置缺失或非法（发生在任何网络 I/O 之前）
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{chain} connection error: {message}")]
    Connection { chain: Chain, message: String },

    #[error("{0} connection already closed")]
    ConnectionClosed(Chain),

    #[error("Invalid private key: {0}")]
    KeyFormat(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("No signing key configured")]
    NoSigningKey,

    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("Invalid signature recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("Signature recovery failed: {0}")]
    Recovery(String),

    #[error("Operation cancelled: {reason}")]
    Cancelled { reason: CancelReason },

    #[error("Failed to fetch {chain} chain id: {source}")]
    ChainIdFetch {
        chain: Chain,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to fetch {chain} gas price: {source}")]
    GasPriceFetch {
        chain: Chain,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to fetch {chain} receipt for {tx_hash:#x}: {source}")]
    ReceiptFetch {
        chain: Chain,
        tx_hash: H256,
        #[source]
        source: ProviderError,
    },

    #[error("{chain} reported an unusable chain id: {value}")]
    InvalidChainId { chain: Chain, value: String },

    #[error("Transaction chain id {actual} does not match options built for chain id {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("Signing failed: {0}")]
    Signing(String),

    /// 交易已上链但执行失败，附带回执供排查
    #[error(
        "Transaction {:#x} reverted on {chain} (block {:?})",
        .receipt.transaction_hash,
        .receipt.block_number
    )]
    TransactionReverted {
        chain: Chain,
        receipt: Box<TransactionReceipt>,
    },
}

impl AppError {
    /// 回执（仅 `TransactionReverted` 携带）
    pub fn receipt(&self) -> Option<&TransactionReceipt> {
        match self {
            AppError::TransactionReverted { receipt, .. } => Some(receipt),
            _ => None,
        }
    }

    /// 交易已是最终状态：重发同一笔交易没有意义。
    /// 其余错误都表示交易可能未提交/未确认，调用方可用新的选项重试。
    pub fn is_final(&self) -> bool {
        matches!(self, AppError::TransactionReverted { .. })
    }
}

impl From<CancelReason> for AppError {
    fn from(reason: CancelReason) -> Self {
        AppError::Cancelled { reason }
    }
}

impl From<hex::FromHexError> for AppError {
    fn from(err: hex::FromHexError) -> Self {
        AppError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::U64;

    #[test]
    fn reverted_error_exposes_receipt() {
        let receipt = TransactionReceipt {
            transaction_hash: H256::repeat_byte(0xab),
            block_number: Some(U64::from(42)),
            status: Some(U64::zero()),
            ..Default::default()
        };
        let err = AppError::TransactionReverted {
            chain: Chain::L2,
            receipt: Box::new(receipt),
        };
        assert!(err.is_final());
        assert_eq!(err.receipt().and_then(|r| r.block_number), Some(U64::from(42)));
        let msg = err.to_string();
        assert!(msg.contains("L2"));
        assert!(msg.contains("abab"));
    }

    #[test]
    fn rpc_errors_are_not_final() {
        let err = AppError::GasPriceFetch {
            chain: Chain::L1,
            source: ProviderError::CustomError("boom".into()),
        };
        assert!(!err.is_final());
        assert!(err.receipt().is_none());
        assert!(err.to_string().contains("L1 gas price"));
    }
}
