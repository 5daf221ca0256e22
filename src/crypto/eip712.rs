// crypto/eip712.rs

use crate::utils::{address_to_word, u256_to_word};
use ethers_core::types::{H160, U256};
use ethers_core::utils::keccak256;

/// 域类型：name / version / chainId / verifyingContract
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// 按顺序拼接后做 keccak256
pub fn keccak256_chunks<I, T>(chunks: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut buf = Vec::new();
    for chunk in chunks {
        buf.extend_from_slice(chunk.as_ref());
    }
    keccak256(buf)
}

/// 类型签名的哈希，如 `"Mail(address from,string contents)"`
pub fn type_hash(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

/// 域分隔符
pub fn hash_domain(name: &str, version: &str, chain_id: U256, verifying_contract: H160) -> [u8; 32] {
    keccak256_chunks([
        type_hash(DOMAIN_TYPE),
        keccak256(name.as_bytes()),
        keccak256(version.as_bytes()),
        u256_to_word(chain_id),
        address_to_word(verifying_contract),
    ])
}

/// keccak256(typeHash ‖ 字段编码)；字段由调用方按 ABI 编码好，这里不校验
pub fn hash_struct(type_hash: &[u8; 32], encoded_fields: &[u8]) -> [u8; 32] {
    keccak256_chunks([type_hash.as_slice(), encoded_fields])
}

/// 最终被签名的摘要：keccak256(0x19 0x01 ‖ domainSeparator ‖ structHash)
pub fn hash_typed_data(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    keccak256_chunks([
        TYPED_DATA_PREFIX.as_slice(),
        domain_separator.as_slice(),
        struct_hash.as_slice(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    // "Ether Mail" example from EIP-712
    const MAIL_TYPE: &str = "Mail(Person from,Person to,string contents)Person(string name,address wallet)";
    const PERSON_TYPE: &str = "Person(string name,address wallet)";
    const VERIFYING_CONTRACT: &str = "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC";
    const COW: &str = "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826";
    const BOB: &str = "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB";

    fn person_hash(name: &str, wallet: &str) -> [u8; 32] {
        let mut data = Vec::new();
        data.extend_from_slice(&keccak256(name.as_bytes()));
        data.extend_from_slice(&address_to_word(wallet.parse().unwrap()));
        hash_struct(&type_hash(PERSON_TYPE), &data)
    }

    fn mail_domain() -> [u8; 32] {
        hash_domain("Ether Mail", "1", U256::from(1u64), VERIFYING_CONTRACT.parse().unwrap())
    }

    fn mail_hash() -> [u8; 32] {
        let mut data = Vec::new();
        data.extend_from_slice(&person_hash("Cow", COW));
        data.extend_from_slice(&person_hash("Bob", BOB));
        data.extend_from_slice(&keccak256("Hello, Bob!".as_bytes()));
        hash_struct(&type_hash(MAIL_TYPE), &data)
    }

    #[test]
    fn keccak_of_nothing() {
        let empty: [&[u8]; 0] = [];
        assert_eq!(
            hex::encode(keccak256_chunks(empty)),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn keccak_is_order_sensitive() {
        let a = b"hello".as_slice();
        let b = b"world".as_slice();
        assert_ne!(keccak256_chunks([a, b]), keccak256_chunks([b, a]));
        assert_eq!(keccak256_chunks([a, b]), keccak256(b"helloworld"));
    }

    #[test]
    fn domain_separator_matches_reference() {
        assert_eq!(
            hex::encode(mail_domain()),
            "f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f"
        );
    }

    #[test]
    fn domain_separator_is_deterministic() {
        assert_eq!(mail_domain(), mail_domain());
        let other_chain = hash_domain(
            "Ether Mail",
            "1",
            U256::from(10u64),
            VERIFYING_CONTRACT.parse().unwrap(),
        );
        assert_ne!(mail_domain(), other_chain);
    }

    #[test]
    fn struct_hash_matches_reference() {
        assert_eq!(
            hex::encode(mail_hash()),
            "c52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e"
        );
    }

    #[test]
    fn typed_data_digest_matches_reference() {
        assert_eq!(
            hex::encode(hash_typed_data(&mail_domain(), &mail_hash())),
            "be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2"
        );
    }
}
