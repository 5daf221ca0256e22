pub mod context;
pub mod signer;
pub mod types;
