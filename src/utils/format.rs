use ethers_core::utils::format_units;
use ethers_core::types::U256;

/// wei → gwei 字符串（用于日志）
pub fn format_gwei(value: U256) -> String {
    format_units(value, "gwei").unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_gwei() {
        assert_eq!(format_gwei(U256::from(1_500_000_000u64)), "1.500000000");
    }
}
