use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const ENV_PREFIX: &str = "APP";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub chains: ChainsConfig,
    #[serde(default)]
    pub wait: WaitConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 两条链的 RPC 地址与可选签名私钥
#[derive(Deserialize, Clone)]
pub struct ChainsConfig {
    pub l1_url: String,
    pub l2_url: String,
    /// hex 私钥，可带 0x 前缀；缺省或空串表示只读客户端
    #[serde(default)]
    pub private_key: Option<String>,
}

// 私钥不能出现在日志里
impl fmt::Debug for ChainsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainsConfig")
            .field("l1_url", &self.l1_url)
            .field("l2_url", &self.l2_url)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WaitConfig {
    /// 轮询交易回执的间隔（毫秒）
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 等待上链的默认超时（秒），0 表示不设超时
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WaitConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// 日志输出：级别、目录与按大小轮转
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// 单个日志文件上限（MB），0 表示不轮转
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
    /// 保留的历史文件数（.1 ~ .N）
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_dir() -> String {
    "logs".into()
}

fn default_log_file() -> String {
    "dual-chain-client.log".into()
}

fn default_max_size_mb() -> u64 {
    10
}

fn default_max_files() -> usize {
    5
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            file: default_log_file(),
            max_size_mb: default_max_size_mb(),
            max_files: default_max_files(),
        }
    }
}

/// `APP_` 前缀，层级之间用 `__`：APP_CHAINS__L1_URL / APP_CHAINS__PRIVATE_KEY / APP_LOG__LEVEL
fn environment_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment_source())
    }

    fn load_with(env: Environment) -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
