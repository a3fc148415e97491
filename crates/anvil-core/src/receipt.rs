use anvil_crypto::{verify_signature, Digest, PublicKey, DIGEST_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte length of the unsigned receipt layout without a linked root.
const UNLINKED_LAYOUT_LEN: usize = 32 + 32 + 4 + DIGEST_SIZE + 4 + DIGEST_SIZE;

/// Byte length with the linked Merkle root appended.
const LINKED_LAYOUT_LEN: usize = UNLINKED_LAYOUT_LEN + DIGEST_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("receipt buffer has invalid length {got}, expected {UNLINKED_LAYOUT_LEN} or {LINKED_LAYOUT_LEN}")]
    InvalidBufferLength { got: usize },

    #[error("unknown datum type tag {0}")]
    InvalidDatumType(u32),
}

/// What kind of datum a receipt attests to having received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatumType {
    Block,
    Transaction,
}

impl DatumType {
    pub fn tag(&self) -> u32 {
        match self {
            DatumType::Block => 1,
            DatumType::Transaction => 2,
        }
    }

    pub fn from_tag(tag: u32) -> Result<Self, ReceiptError> {
        match tag {
            1 => Ok(DatumType::Block),
            2 => Ok(DatumType::Transaction),
            other => Err(ReceiptError::InvalidDatumType(other)),
        }
    }
}

/// Unsigned attestation that `recipient` received `datum_hash` from
/// `sender`. A receipt is *linked* when it references a previously
/// published receipt Merkle root, which earns it full participation credit
/// at scoring time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub sender_public_key: PublicKey,
    pub recipient_public_key: PublicKey,
    pub datum_type: DatumType,
    pub datum_hash: Digest,
    pub reference_block_height: u32,
    pub reference_block_hash: Digest,
    pub rmr_linked: Option<Digest>,
}

impl Receipt {
    pub fn is_linked(&self) -> bool {
        self.rmr_linked.is_some()
    }

    /// Fixed concatenation signed by the recipient. Field order and widths
    /// are consensus-critical; peers recompute this exact buffer to verify
    /// the signature.
    pub fn unsigned_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(LINKED_LAYOUT_LEN);
        buf.extend_from_slice(&self.sender_public_key);
        buf.extend_from_slice(&self.recipient_public_key);
        buf.extend_from_slice(&self.reference_block_height.to_le_bytes());
        buf.extend_from_slice(&self.reference_block_hash);
        buf.extend_from_slice(&self.datum_type.tag().to_le_bytes());
        buf.extend_from_slice(&self.datum_hash);
        if let Some(root) = &self.rmr_linked {
            buf.extend_from_slice(root);
        }
        buf
    }

    /// Inverse of [`Receipt::unsigned_bytes`]. Truncated or padded buffers
    /// from peers are parse errors, never panics.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReceiptError> {
        let linked = match bytes.len() {
            UNLINKED_LAYOUT_LEN => false,
            LINKED_LAYOUT_LEN => true,
            got => return Err(ReceiptError::InvalidBufferLength { got }),
        };

        fn read_array<const N: usize>(bytes: &[u8], offset: &mut usize) -> [u8; N] {
            let mut out = [0u8; N];
            out.copy_from_slice(&bytes[*offset..*offset + N]);
            *offset += N;
            out
        }

        let mut offset = 0usize;
        let sender_public_key: PublicKey = read_array(bytes, &mut offset);
        let recipient_public_key: PublicKey = read_array(bytes, &mut offset);
        let reference_block_height = u32::from_le_bytes(read_array(bytes, &mut offset));
        let reference_block_hash: Digest = read_array(bytes, &mut offset);
        let datum_type = DatumType::from_tag(u32::from_le_bytes(read_array(bytes, &mut offset)))?;
        let datum_hash: Digest = read_array(bytes, &mut offset);
        let rmr_linked = linked.then(|| read_array(bytes, &mut offset));

        Ok(Receipt {
            sender_public_key,
            recipient_public_key,
            datum_type,
            datum_hash,
            reference_block_height,
            reference_block_hash,
            rmr_linked,
        })
    }
}

/// A receipt plus the recipient's detached signature over
/// [`Receipt::unsigned_bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedReceipt {
    pub receipt: Receipt,
    pub recipient_signature: Vec<u8>,
}

impl SignedReceipt {
    /// Verify the recipient signature against the receipt's own layout.
    pub fn verify(&self) -> bool {
        verify_signature(
            &self.receipt.unsigned_bytes(),
            &self.recipient_signature,
            &self.receipt.recipient_public_key,
        )
    }
}
