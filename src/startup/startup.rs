use std::sync::Arc;

use crate::config::Config;
use crate::errors::error::AppError;
use crate::services::{CallContext, Chain, ChainClient};
use crate::utils::format_gwei;
use crate::{log_error, log_info, log_warn};

/// 应用程序启动与管理结构体（只持有链客户端，无 HTTP API）
pub struct Application {
    pub config: Config,
    pub client: Arc<ChainClient>,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl Application {
    /// 构建应用实例：校验配置、解析私钥、建立两条链的连接
    pub fn build(config: Config) -> Result<Self> {
        log_info!("Loaded configuration: {:?}", config.chains);
        let client = Arc::new(ChainClient::from_config(&config.chains, &config.wait)?);
        Ok(Self { config, client })
    }

    /// 探测两条链的状态：chain id，以及配置了私钥时的 gas price
    pub async fn probe(&self) -> Result<()> {
        for chain in Chain::ALL {
            let ctx = match self.config.wait.timeout() {
                Some(timeout) => CallContext::with_timeout(timeout),
                None => CallContext::background(),
            };

            if self.client.signer_address().is_none() {
                let chain_id = self.client.chain_id(chain, &ctx).await?;
                log_info!("{} reachable | chain_id={} | read-only", chain, chain_id);
                continue;
            }

            let opts = self.client.build_transact_options(chain, ctx).await?;
            log_info!(
                "{} reachable | chain_id={} | gas_price={} gwei | from={:?}",
                chain,
                opts.chain_id,
                format_gwei(opts.gas_price),
                opts.from
            );
        }
        Ok(())
    }

    /// 启动：探测链状态后等待 Ctrl+C，退出前关闭连接
    pub async fn run(self) -> anyhow::Result<()> {
        // 探测失败不退出，由运维根据日志处理
        if let Err(e) = self.probe().await {
            log_error!("Chain probe failed: {}", e);
        }

        log_info!("✔️ Chain client ready, press Ctrl+C to exit");
        tokio::signal::ctrl_c().await?;
        log_warn!("⚠️  Received shutdown signal, closing connections...");
        self.client.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChainsConfig, LogConfig, WaitConfig};

    fn config(l1: &str, key: Option<&str>) -> Config {
        Config {
            chains: ChainsConfig {
                l1_url: l1.to_string(),
                l2_url: "http://127.0.0.1:9545".to_string(),
                private_key: key.map(str::to_string),
            },
            wait: WaitConfig {
                poll_interval_ms: 250,
                timeout_secs: 5,
            },
            log: LogConfig::default(),
        }
    }

    #[test]
    fn build_applies_wait_config() {
        let app = Application::build(config("http://127.0.0.1:8545", None)).unwrap();
        assert_eq!(app.client.poll_interval(), std::time::Duration::from_millis(250));
        assert!(app.client.signer_address().is_none());
    }

    #[test]
    fn build_fails_on_empty_url() {
        let err = Application::build(config("", None)).err().unwrap();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
