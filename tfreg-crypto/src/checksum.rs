//! EIP-55 checksummed addresses.
//!
//! Each hex letter of the address is upper-cased when the matching nibble of
//! `keccak256(lowercase_hex)` is >= 8. Deployment scripts and block
//! explorers print addresses this way, so the API and CLI do too.

use tfreg_core::error::{Result, RegistryError};
use tfreg_core::types::Address;

use crate::hash::keccak256;

/// Formats an address in EIP-55 mixed case with 0x prefix.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = digest[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parses an address, verifying the checksum when the input is mixed case.
///
/// All-lowercase and all-uppercase inputs carry no checksum and are accepted
/// as-is, matching ethers' `getAddress`.
pub fn parse_checksummed(s: &str) -> Result<Address> {
    let address = Address::from_hex(s)?;

    let body = s.trim();
    let body = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
        .unwrap_or(body);
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        let expected = to_checksum_address(&address);
        if expected[2..] != *body {
            return Err(RegistryError::InvalidAddress(format!(
                "bad checksum for {}, expected {}",
                s.trim(),
                expected
            )));
        }
    }

    Ok(address)
}
