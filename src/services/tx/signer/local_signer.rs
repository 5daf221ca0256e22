// services/tx/signer/local_signer.rs

use crate::errors::error::AppError;
use crate::services::tx::signer::TxSigner;
use crate::utils::strip_hex_prefix;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{H160, Signature};
use ethers_signers::{LocalWallet, Signer};
use std::fmt;
use std::sync::Arc;

/// 两条链共用的签名身份：私钥 + 派生地址，构造后不可变
#[derive(Clone)]
pub struct SigningIdentity {
    wallet: Arc<LocalWallet>,
}

impl SigningIdentity {
    /// 解析 hex 私钥（0x 前缀可选）
    pub fn from_hex(private_key: &str) -> Result<Self, AppError> {
        let bytes = hex::decode(strip_hex_prefix(private_key.trim()))
            .map_err(|e| AppError::KeyFormat(format!("not valid hex: {}", e)))?;
        if bytes.len() != 32 {
            return Err(AppError::KeyFormat(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let wallet = LocalWallet::from_bytes(&bytes)
            .map_err(|e| AppError::KeyFormat(format!("not a secp256k1 scalar: {}", e)))?;

        Ok(Self::new(wallet))
    }

    pub fn new(wallet: LocalWallet) -> Self {
        Self {
            wallet: Arc::new(wallet),
        }
    }

    pub fn address(&self) -> H160 {
        self.wallet.address()
    }

    /// 构造绑定 chain id 的签名器（keyed transactor）
    pub fn signer_for_chain(&self, chain_id: u64) -> LocalSigner {
        LocalSigner::new(self.wallet.as_ref().clone().with_chain_id(chain_id))
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct LocalSigner {
    wallet: Arc<LocalWallet>,
}

impl LocalSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet: Arc::new(wallet) }
    }
}

#[async_trait::async_trait]
impl TxSigner for LocalSigner {
    async fn sign_tx(&self, tx: &TypedTransaction) -> Result<Signature, AppError> {
        self.wallet
            .sign_transaction(tx)
            .await
            .map_err(|e| AppError::Signing(e.to_string()))
    }

    fn address(&self) -> H160 {
        self.wallet.address()
    }

    fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }
}
