use crate::errors::error::AppError;
use crate::utils::check::strip_hex_prefix;
use ethers_core::types::{H160, H256, U256};

pub fn h256_to_string(data: H256) -> String {
    format!("{:#x}", data)
}

/// U256 → 32 字节大端（ABI word）
pub fn u256_to_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// 地址左补零到 32 字节（ABI word）
pub fn address_to_word(address: H160) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// hex 字符串（0x 可选）→ 字节
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, AppError> {
    Ok(hex::decode(strip_hex_prefix(s.trim()))?)
}

/// hex 字符串 → 20 字节地址
pub fn hex_to_address(s: &str) -> Result<H160, AppError> {
    let bytes = hex_to_bytes(s)?;
    if bytes.len() != 20 {
        return Err(AppError::Encoding(format!(
            "address must be 20 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(H160::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_left_padded() {
        let word = u256_to_word(U256::from(1u64));
        assert_eq!(word[31], 1);
        assert!(word[..31].iter().all(|b| *b == 0));

        let word = address_to_word(H160::repeat_byte(0xcc));
        assert!(word[..12].iter().all(|b| *b == 0));
        assert!(word[12..].iter().all(|b| *b == 0xcc));
    }

    #[test]
    fn hex_address_parsing() {
        let lower = hex_to_address("0xcccccccccccccccccccccccccccccccccccccccc").unwrap();
        let mixed = hex_to_address("CcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC").unwrap();
        assert_eq!(lower, mixed);
        assert!(matches!(hex_to_address("0x1234"), Err(AppError::Encoding(_))));
        assert!(matches!(hex_to_address("0xzz"), Err(AppError::Encoding(_))));
    }

    #[test]
    fn hash_formatting() {
        let s = h256_to_string(H256::repeat_byte(0x01));
        assert!(s.starts_with("0x0101"));
        assert_eq!(s.len(), 66);
    }
}
