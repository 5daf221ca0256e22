// services/chain_client.rs

use crate::config::{ChainsConfig, WaitConfig};
use crate::errors::error::AppError;
use crate::infrastructure::provider::{ChainProvider, EthereumProvider};
use crate::services::tx::context::CallContext;
use crate::services::tx::signer::SigningIdentity;
use crate::services::tx::types::{Chain, TransactOptions, TransactionOutcome, TxStatus};
use crate::utils::{ensure_rpc_url, format_gwei, h256_to_string};
use crate::{log_debug, log_info, log_trace, log_warn};
use arc_swap::ArcSwapOption;
use ethers_core::types::{H160, H256, TransactionReceipt, U256};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// 单条链的连接句柄；close 之后为 None
struct ChainEndpoint {
    chain: Chain,
    provider: ArcSwapOption<Box<dyn ChainProvider>>,
}

impl ChainEndpoint {
    fn new(chain: Chain, provider: Box<dyn ChainProvider>) -> Self {
        Self {
            chain,
            provider: ArcSwapOption::from_pointee(provider),
        }
    }

    fn provider(&self) -> Result<Arc<Box<dyn ChainProvider>>, AppError> {
        self.provider
            .load_full()
            .ok_or(AppError::ConnectionClosed(self.chain))
    }

    /// 返回是否真的关闭了一个连接
    fn close(&self) -> bool {
        self.provider.swap(None).is_some()
    }
}

/// 同时连接 L1 / L2 的交易客户端。
///
/// 所有操作都只读共享状态（签名身份不可变，连接句柄只在 close 时替换），
/// 可以放进 `Arc` 在多个任务间并发使用。内部不做任何重试。
pub struct ChainClient {
    l1: ChainEndpoint,
    l2: ChainEndpoint,
    identity: Option<SigningIdentity>,
    poll_interval: Duration,
}

impl ChainClient {
    /// 连接两条链；`private_key` 为空表示只读客户端
    pub fn connect(
        l1_url: &str,
        l2_url: &str,
        private_key: Option<&str>,
    ) -> Result<Self, AppError> {
        // 先做纯校验，避免开了连接再失败
        ensure_rpc_url(Chain::L1, l1_url)?;
        ensure_rpc_url(Chain::L2, l2_url)?;

        let identity = private_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(SigningIdentity::from_hex)
            .transpose()?;

        let l1 = EthereumProvider::connect(Chain::L1, l1_url.trim())?;
        let l2 = EthereumProvider::connect(Chain::L2, l2_url.trim())?;

        match &identity {
            Some(id) => log_info!("Chain client connected, signer {:?}", id.address()),
            None => log_info!("Chain client connected in read-only mode"),
        }

        Ok(Self::from_providers(Box::new(l1), Box::new(l2), identity))
    }

    pub fn from_config(chains: &ChainsConfig, wait: &WaitConfig) -> Result<Self, AppError> {
        Ok(Self::connect(&chains.l1_url, &chains.l2_url, chains.private_key.as_deref())?
            .with_poll_interval(wait.poll_interval()))
    }

    /// 使用自定义的 provider（其它传输层或测试桩）
    pub fn from_providers(
        l1: Box<dyn ChainProvider>,
        l2: Box<dyn ChainProvider>,
        identity: Option<SigningIdentity>,
    ) -> Self {
        Self {
            l1: ChainEndpoint::new(Chain::L1, l1),
            l2: ChainEndpoint::new(Chain::L2, l2),
            identity,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn signer_address(&self) -> Option<H160> {
        self.identity.as_ref().map(SigningIdentity::address)
    }

    fn endpoint(&self, chain: Chain) -> &ChainEndpoint {
        match chain {
            Chain::L1 => &self.l1,
            Chain::L2 => &self.l2,
        }
    }

    /// 实时查询链 ID（不缓存）
    pub async fn chain_id(&self, chain: Chain, ctx: &CallContext) -> Result<U256, AppError> {
        let provider = self.endpoint(chain).provider()?;
        ctx.run(provider.get_chain_id())
            .await?
            .map_err(|source| AppError::ChainIdFetch { chain, source })
    }

    /// 为指定链构造交易选项。
    ///
    /// 步骤顺序固定：chain id → 绑定 chain id 的签名器 → gas price → 挂上上下文。
    /// 每一步失败都返回对应的错误，不做重试。
    pub async fn build_transact_options(
        &self,
        chain: Chain,
        ctx: CallContext,
    ) -> Result<TransactOptions, AppError> {
        let identity = self.identity.as_ref().ok_or(AppError::NoSigningKey)?;

        // 1. chain id
        let raw_chain_id = self.chain_id(chain, &ctx).await?;
        if raw_chain_id.is_zero() || raw_chain_id > U256::from(u64::MAX) {
            return Err(AppError::InvalidChainId {
                chain,
                value: raw_chain_id.to_string(),
            });
        }
        let chain_id = raw_chain_id.as_u64();

        // 2. keyed transactor
        let signer = identity.signer_for_chain(chain_id);

        // 3. gas price
        let provider = self.endpoint(chain).provider()?;
        let gas_price = ctx
            .run(provider.suggest_gas_price())
            .await?
            .map_err(|source| AppError::GasPriceFetch { chain, source })?;

        log_debug!(
            "{} transact options: chain_id={}, gas_price={} gwei",
            chain,
            chain_id,
            format_gwei(gas_price)
        );

        // 4. gas price + 上下文
        Ok(TransactOptions {
            chain,
            from: identity.address(),
            chain_id,
            gas_price,
            signer: Arc::new(signer),
            context: ctx,
        })
    }

    /// 等待交易上链并按回执状态分类。
    ///
    /// 上下文取消或超时返回 `Cancelled`；回执 status 为 0 返回
    /// `TransactionReverted`，错误里带着回执。
    pub async fn wait_for_transaction(
        &self,
        chain: Chain,
        tx_hash: H256,
        ctx: &CallContext,
    ) -> Result<TransactionOutcome, AppError> {
        ctx.check()?;
        let provider = self.endpoint(chain).provider()?;

        let mut ticker = interval(self.poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log_debug!("Waiting for {} transaction {}", chain, h256_to_string(tx_hash));
        loop {
            ctx.run(ticker.tick()).await?;

            let receipt = ctx
                .run(provider.get_transaction_receipt(tx_hash))
                .await?
                .map_err(|source| AppError::ReceiptFetch {
                    chain,
                    tx_hash,
                    source,
                })?;

            match receipt {
                Some(receipt) => return classify_receipt(chain, receipt),
                None => log_trace!("{} transaction {} not yet mined", chain, h256_to_string(tx_hash)),
            }
        }
    }

    /// 释放两条链的连接，可重复调用
    pub fn close(&self) {
        for endpoint in [&self.l1, &self.l2] {
            if endpoint.close() {
                log_info!("{} connection closed", endpoint.chain);
            }
        }
    }
}

impl fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainClient")
            .field("signer", &self.signer_address())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

fn classify_receipt(chain: Chain, receipt: TransactionReceipt) -> Result<TransactionOutcome, AppError> {
    let status = TxStatus::from_receipt(&receipt);
    match status {
        TxStatus::Reverted => {
            log_warn!(
                "{} transaction reverted: hash={}, block={:?}",
                chain,
                h256_to_string(receipt.transaction_hash),
                receipt.block_number
            );
            Err(AppError::TransactionReverted {
                chain,
                receipt: Box::new(receipt),
            })
        }
        TxStatus::Unknown => {
            log_warn!(
                "{} receipt {} has no status field, treating as mined",
                chain,
                h256_to_string(receipt.transaction_hash)
            );
            Ok(TransactionOutcome {
                chain,
                status,
                receipt,
            })
        }
        TxStatus::Success => {
            log_info!(
                "{} transaction succeeded: hash={}, block={:?}",
                chain,
                h256_to_string(receipt.transaction_hash),
                receipt.block_number
            );
            Ok(TransactionOutcome {
                chain,
                status,
                receipt,
            })
        }
    }
}
