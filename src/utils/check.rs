use crate::errors::error::AppError;
use crate::services::tx::types::Chain;

/// RPC 地址不能为空（在建立任何连接之前校验）
pub fn ensure_rpc_url(chain: Chain, url: &str) -> Result<(), AppError> {
    if url.trim().is_empty() {
        return Err(AppError::Configuration(format!(
            "{} RPC URL must not be empty",
            chain
        )));
    }
    Ok(())
}

/// 去掉可选的 0x / 0X 前缀
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
