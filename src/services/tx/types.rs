// services/tx/types.rs

use crate::errors::AppError;
use crate::services::tx::context::CallContext;
use crate::services::tx::signer::TxSigner;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Bytes, H160, H256, Signature, TransactionReceipt, U64, U256};
use std::fmt;
use std::sync::Arc;

/// 客户端管理的两条链
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    L1,
    L2,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::L1, Chain::L2];
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::L1 => f.write_str("L1"),
            Chain::L2 => f.write_str("L2"),
        }
    }
}

/// 针对某一条链、某一次调用构造的交易选项。
///
/// 每次交易都要重新构造：chain id 和 gas price 都可能变化，
/// 而且绝不能拿 L1 的选项去签 L2 的交易。
#[derive(Clone)]
pub struct TransactOptions {
    pub chain: Chain,
    pub from: H160,
    pub chain_id: u64,
    pub gas_price: U256,
    pub signer: Arc<dyn TxSigner>,
    pub context: CallContext,
}

impl fmt::Debug for TransactOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactOptions")
            .field("chain", &self.chain)
            .field("from", &self.from)
            .field("chain_id", &self.chain_id)
            .field("gas_price", &self.gas_price)
            .finish_non_exhaustive()
    }
}

impl TransactOptions {
    /// 把 from / chain_id / gas price 填进交易
    pub fn apply(&self, tx: &mut TypedTransaction) {
        tx.set_from(self.from);
        tx.set_chain_id(self.chain_id);
        tx.set_gas_price(self.gas_price);
    }

    /// 签名前校验交易的 chain id，防止跨链复用选项
    pub async fn sign(&self, tx: &TypedTransaction) -> Result<Signature, AppError> {
        if let Some(actual) = tx.chain_id() {
            let actual = actual.as_u64();
            if actual != self.chain_id {
                return Err(AppError::ChainMismatch {
                    expected: self.chain_id,
                    actual,
                });
            }
        }
        self.context.check()?;
        self.signer.sign_tx(tx).await
    }

    /// 签名并 RLP 编码，交给外部的广播步骤
    pub async fn sign_raw(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        let signature = self.sign(tx).await?;
        Ok(tx.rlp_signed(&signature))
    }
}

/// 回执状态分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Reverted,
    /// 拜占庭分叉前的回执没有 status 字段
    Unknown,
}

impl TxStatus {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        match receipt.status {
            Some(status) if status.is_zero() => TxStatus::Reverted,
            Some(_) => TxStatus::Success,
            None => TxStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    pub chain: Chain,
    pub status: TxStatus,
    pub receipt: TransactionReceipt,
}

impl TransactionOutcome {
    pub fn tx_hash(&self) -> H256 {
        self.receipt.transaction_hash
    }

    pub fn block_number(&self) -> Option<U64> {
        self.receipt.block_number
    }

    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt_with(status: Option<u64>) -> TransactionReceipt {
        TransactionReceipt {
            status: status.map(U64::from),
            ..Default::default()
        }
    }

    #[test]
    fn status_classification() {
        assert_eq!(TxStatus::from_receipt(&receipt_with(Some(1))), TxStatus::Success);
        assert_eq!(TxStatus::from_receipt(&receipt_with(Some(0))), TxStatus::Reverted);
        assert_eq!(TxStatus::from_receipt(&receipt_with(None)), TxStatus::Unknown);
    }

    #[test]
    fn chain_display() {
        assert_eq!(Chain::L1.to_string(), "L1");
        assert_eq!(Chain::L2.to_string(), "L2");
        assert_eq!(Chain::ALL.len(), 2);
    }
}
