//! EIP-712 voucher signer.
//!
//! Produces the cryptographic artifact the campaign contract accepts as
//! proof of authorized participation: a typed-data signature over
//! `Participate{participant, campaignId, expiry, nonce}` under the fixed
//! `{name: "Stamp", version: "1"}` domain, using the issuing service's
//! well-known key (not the participant's).
//!
//! This component performs no authorization. It is intentionally pure and
//! stateless so the issuance orchestrator is the only place authorization
//! logic lives.

use crate::constants::{EIP712_DOMAIN_NAME, EIP712_DOMAIN_VERSION};
use crate::error::{Result, StampError};
use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol;
use alloy::sol_types::{eip712_domain, Eip712Domain, SolStruct};

sol! {
    /// Typed-data schema the verifying contract checks signatures against.
    struct Participate {
        address participant;
        uint256 campaignId;
        uint256 expiry;
        bytes32 nonce;
    }
}

/// Deterministic, stateless EIP-712 signer for participation vouchers.
#[derive(Clone)]
pub struct VoucherSigner {
    signer: PrivateKeySigner,
    domain: Eip712Domain,
}

impl std::fmt::Debug for VoucherSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoucherSigner")
            .field("address", &self.signer.address())
            .finish_non_exhaustive()
    }
}

impl VoucherSigner {
    /// Create a signer from a hex-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::SigningKeyUnavailable`] if the key does not
    /// parse; a malformed key is the same configuration fault as a missing
    /// one.
    pub fn new(
        private_key_hex: &str,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Result<Self> {
        let signer: PrivateKeySigner = private_key_hex
            .parse()
            .map_err(|_| StampError::SigningKeyUnavailable)?;

        let domain = eip712_domain! {
            name: EIP712_DOMAIN_NAME,
            version: EIP712_DOMAIN_VERSION,
            chain_id: chain_id,
            verifying_contract: verifying_contract,
        };

        Ok(Self { signer, domain })
    }

    /// The address whose signatures the contract will recover.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a participation voucher.
    ///
    /// Numeric fields are 256-bit integers and the nonce is a fixed-width
    /// 32-byte digest; variable-length upstream nonces must go through
    /// [`hash_nonce`] first (the orchestrator's contract, not this one's).
    /// ECDSA here is RFC 6979 deterministic: identical inputs under the
    /// same key yield identical signatures.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::Signing`] if signature computation fails.
    pub fn sign(
        &self,
        participant: Address,
        campaign_id: U256,
        expiry: U256,
        nonce: B256,
    ) -> Result<String> {
        let message = Participate {
            participant,
            campaignId: campaign_id,
            expiry,
            nonce,
        };
        let hash = message.eip712_signing_hash(&self.domain);
        let signature = self
            .signer
            .sign_hash_sync(&hash)
            .map_err(|e| StampError::Signing(e.to_string()))?;

        Ok(format!("0x{}", alloy::hex::encode(signature.as_bytes())))
    }
}

/// Digest a raw ticket nonce into the fixed-width value the contract
/// expects: keccak-256 of the UTF-8 string.
///
/// This function is part of the on-chain wire contract. Submission of
/// `recordParticipation` must hash the nonce identically or signatures will
/// not verify.
#[must_use]
pub fn hash_nonce(nonce: &str) -> B256 {
    keccak256(nonce.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    // First default anvil/hardhat development key; never holds real funds.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn test_signer() -> VoucherSigner {
        VoucherSigner::new(TEST_KEY, 11_155_111, Address::ZERO).unwrap()
    }

    #[test]
    fn test_signer_address_matches_key() {
        let signer = test_signer();
        assert_eq!(signer.address(), TEST_ADDRESS.parse::<Address>().unwrap());
    }

    #[test]
    fn test_malformed_key_is_unavailable() {
        let err = VoucherSigner::new("not-a-key", 1, Address::ZERO).unwrap_err();
        assert_eq!(err, StampError::SigningKeyUnavailable);
    }

    #[test]
    fn test_signature_shape() {
        let signer = test_signer();
        let sig = signer
            .sign(
                TEST_ADDRESS.parse().unwrap(),
                U256::from(1u64),
                U256::from(1_700_003_600u64),
                hash_nonce("nonce-abc"),
            )
            .unwrap();

        // 0x + 65 bytes hex
        assert!(sig.starts_with("0x"));
        assert_eq!(sig.len(), 132);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = test_signer();
        let participant: Address = TEST_ADDRESS.parse().unwrap();
        let nonce = hash_nonce("nonce-abc");

        let first = signer
            .sign(participant, U256::from(1u64), U256::from(100u64), nonce)
            .unwrap();
        let second = signer
            .sign(participant, U256::from(1u64), U256::from(100u64), nonce)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_signature_depends_on_every_field() {
        let signer = test_signer();
        let participant: Address = TEST_ADDRESS.parse().unwrap();
        let nonce = hash_nonce("nonce-abc");

        let base = signer
            .sign(participant, U256::from(1u64), U256::from(100u64), nonce)
            .unwrap();
        let other_campaign = signer
            .sign(participant, U256::from(2u64), U256::from(100u64), nonce)
            .unwrap();
        let other_nonce = signer
            .sign(
                participant,
                U256::from(1u64),
                U256::from(100u64),
                hash_nonce("nonce-xyz"),
            )
            .unwrap();

        assert_ne!(base, other_campaign);
        assert_ne!(base, other_nonce);
    }

    #[test]
    fn test_hash_nonce_is_keccak_of_utf8() {
        // keccak256("abc"), a fixed known digest.
        assert_eq!(
            hash_nonce("abc").to_string(),
            "0x4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }
}
