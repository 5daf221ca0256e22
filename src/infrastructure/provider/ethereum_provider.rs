use crate::errors::error::AppError;
use crate::log_debug;
use crate::services::tx::types::Chain;
use async_trait::async_trait;
use ethers_core::types::{H256, TransactionReceipt, U256};
use ethers_providers::{Http, Middleware, Provider, ProviderError};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// 客户端用到的链上 RPC 能力。
///
/// 返回原始 `ProviderError`，由调用方按步骤包装成具体错误。
#[async_trait]
pub trait ChainProvider: Send + Sync {
    async fn get_chain_id(&self) -> Result<U256, ProviderError>;
    async fn suggest_gas_price(&self) -> Result<U256, ProviderError>;
    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;
}

/// 基于 HTTP JSON-RPC 的实现
pub struct EthereumProvider {
    provider: Arc<Provider<Http>>,
}

impl EthereumProvider {
    pub fn connect(chain: Chain, rpc_url: &str) -> Result<Self, AppError> {
        let url = Url::parse(rpc_url).map_err(|e| AppError::Connection {
            chain,
            message: format!("invalid RPC URL {}: {}", rpc_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Connection {
                chain,
                message: format!("unsupported RPC scheme {}", url.scheme()),
            });
        }

        let provider = Provider::<Http>::try_from(url.as_str())
            .map_err(|e| AppError::Connection {
                chain,
                message: e.to_string(),
            })?
            .interval(Duration::from_millis(1000));

        log_debug!("{} RPC provider ready: {}", chain, url.host_str().unwrap_or("-"));
        Ok(Self {
            provider: Arc::new(provider),
        })
    }
}

#[async_trait]
impl ChainProvider for EthereumProvider {
    async fn get_chain_id(&self) -> Result<U256, ProviderError> {
        self.provider.get_chainid().await
    }

    async fn suggest_gas_price(&self) -> Result<U256, ProviderError> {
        self.provider.get_gas_price().await
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        self.provider.get_transaction_receipt(tx_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_urls() {
        assert!(EthereumProvider::connect(Chain::L1, "http://127.0.0.1:8545").is_ok());
        assert!(EthereumProvider::connect(Chain::L2, "https://rpc.example.org/v1/key").is_ok());
    }

    #[test]
    fn rejects_bad_urls() {
        for bad in ["not a url", "ftp://example.org", "ws://127.0.0.1:8546"] {
            match EthereumProvider::connect(Chain::L2, bad) {
                Err(AppError::Connection { chain, .. }) => assert_eq!(chain, Chain::L2),
                other => panic!("{bad}: unexpected {:?}", other.map(|_| ())),
            }
        }
    }
}
