//! Resolution of the account that signs transactions.

use {
    crate::AlloyProvider,
    alloy::{
        primitives::Address,
        providers::Provider,
        signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    },
    anyhow::{Context, Result, bail},
};

pub fn from_private_key(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse()
        .context("private key is not a valid hex encoded secp256k1 key")
}

/// Derives the signer at `m/44'/60'/0'/0/{index}` from a BIP-39 phrase.
pub fn from_mnemonic(phrase: &str, index: u32) -> Result<PrivateKeySigner> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase.trim())
        .index(index)
        .with_context(|| format!("invalid derivation index {index}"))?
        .build()
        .context("invalid mnemonic")
}

/// Picks the locally configured signer, if any. Configuring both a private
/// key and a mnemonic is ambiguous and therefore rejected.
pub fn local_signer(
    private_key: Option<&str>,
    mnemonic: Option<&str>,
    index: u32,
) -> Result<Option<PrivateKeySigner>> {
    match (private_key, mnemonic) {
        (Some(_), Some(_)) => bail!("both a private key and a mnemonic are configured"),
        (Some(key), None) => from_private_key(key).map(Some),
        (None, Some(phrase)) => from_mnemonic(phrase, index).map(Some),
        (None, None) => Ok(None),
    }
}

/// Returns the first unlocked account of the node.
pub async fn node_account(provider: &AlloyProvider) -> Result<Address> {
    let accounts = provider
        .get_accounts()
        .await
        .context("failed to fetch node accounts")?;
    accounts
        .first()
        .copied()
        .context("no signer configured and the node does not expose any accounts")
}
