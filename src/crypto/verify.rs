// crypto/verify.rs

use crate::errors::error::AppError;
use crate::utils::{hex_to_address, hex_to_bytes};
use ethers_core::types::{H160, H256, RecoveryMessage, Signature, U256};
use ethers_core::utils::hash_message;

pub const SIGNATURE_LENGTH: usize = 65;

/// 旧式 v 的偏移（27/28）
const LEGACY_V_OFFSET: u8 = 27;

fn normalize_v(v: u8) -> Result<u8, AppError> {
    let v = if v >= LEGACY_V_OFFSET { v - LEGACY_V_OFFSET } else { v };
    if v > 1 {
        return Err(AppError::InvalidRecoveryId(v));
    }
    Ok(v)
}

/// 从 65 字节签名 r ‖ s ‖ v 恢复签名地址；v 接受 0/1 或 27/28，其余值直接拒绝
pub fn recover_signer(message_hash: &[u8; 32], signature: &[u8]) -> Result<H160, AppError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(AppError::InvalidSignatureLength(signature.len()));
    }

    let v = normalize_v(signature[64])?;
    let signature = Signature {
        r: U256::from_big_endian(&signature[0..32]),
        s: U256::from_big_endian(&signature[32..64]),
        v: v as u64,
    };

    signature
        .recover(RecoveryMessage::Hash(H256::from(*message_hash)))
        .map_err(|e| AppError::Recovery(e.to_string()))
}

/// 签名者与 `expected` 一致返回 true；不一致是 false，不是错误
pub fn verify_signature(
    message_hash: &[u8; 32],
    signature: &[u8],
    expected: H160,
) -> Result<bool, AppError> {
    Ok(recover_signer(message_hash, signature)? == expected)
}

/// hex 字符串版本，0x 前缀可选
pub fn verify_signature_hex(
    message_hash: &[u8; 32],
    signature_hex: &str,
    expected_address_hex: &str,
) -> Result<bool, AppError> {
    let signature = hex_to_bytes(signature_hex)?;
    let expected = hex_to_address(expected_address_hex)?;
    verify_signature(message_hash, &signature, expected)
}

/// EIP-191 personal_sign 消息
pub fn verify_personal_message(
    message: &[u8],
    signature: &[u8],
    expected: H160,
) -> Result<bool, AppError> {
    let hash = hash_message(message);
    verify_signature(hash.as_fixed_bytes(), signature, expected)
}
