use std::sync::Arc;

use anvil_core::{DatumType, Receipt, SignedReceipt};
use anvil_crypto::{Digest, PublicKey, Signer};
use log::debug;

/// Issues signed receipts attesting that this node received a piece of
/// data from a peer.
///
/// A receipt is linked when the caller supplies the last published Merkle
/// root; whether that root is still fresh is the caller's responsibility,
/// the issuer signs whatever reference it is handed.
pub struct ReceiptIssuer {
    signer: Arc<dyn Signer>,
}

impl ReceiptIssuer {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self { signer }
    }

    /// The identity receipts from this issuer verify against.
    pub fn recipient_public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    /// Build and sign a receipt for `datum_hash` received from `sender`.
    pub fn issue(
        &self,
        datum_hash: Digest,
        datum_type: DatumType,
        sender_public_key: PublicKey,
        reference_block_height: u32,
        reference_block_hash: Digest,
        last_merkle_root: Option<Digest>,
    ) -> SignedReceipt {
        let receipt = Receipt {
            sender_public_key,
            recipient_public_key: self.signer.public_key(),
            datum_type,
            datum_hash,
            reference_block_height,
            reference_block_hash,
            rmr_linked: last_merkle_root,
        };
        let recipient_signature = self.signer.sign(&receipt.unsigned_bytes());

        debug!(
            "issued {} receipt for datum {} from {} at height {}",
            if receipt.is_linked() { "linked" } else { "unlinked" },
            hex::encode(datum_hash),
            hex::encode(sender_public_key),
            reference_block_height
        );
        SignedReceipt {
            receipt,
            recipient_signature,
        }
    }
}
