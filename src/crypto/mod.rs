// crypto/mod.rs
// 链下签名校验：EIP-712 哈希 + ECDSA 恢复签名者

pub mod eip712;
pub mod verify;

pub use eip712::{hash_domain, hash_struct, hash_typed_data, keccak256_chunks, type_hash};
pub use verify::{
    recover_signer, verify_personal_message, verify_signature, verify_signature_hex,
};
