mod instrumentation;
pub mod wallet;

#[cfg(any(test, feature = "test-util"))]
use alloy::providers::mock;
use {
    crate::AlloyProvider,
    alloy::{
        network::EthereumWallet,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
        signers::local::PrivateKeySigner,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

/// Creates a provider without a local wallet. Transactions sent through it
/// have to be signed by the node, i.e. their sender must be one of the
/// node's unlocked accounts.
pub fn provider(url: &Url) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer)
        .http(url.clone());
    ProviderBuilder::new().connect_client(rpc).erased()
}

/// Creates a provider which signs transactions locally with `signer`.
pub fn provider_with_signer(url: &Url, signer: PrivateKeySigner) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer)
        .http(url.clone());
    ProviderBuilder::new()
        .wallet(EthereumWallet::new(signer))
        .connect_client(rpc)
        .erased()
}

/// Provider answering requests with the responses queued in `asserter`.
#[cfg(any(test, feature = "test-util"))]
pub fn mock_provider(asserter: mock::Asserter) -> AlloyProvider {
    ProviderBuilder::new()
        .connect_mocked_client(asserter)
        .erased()
}
