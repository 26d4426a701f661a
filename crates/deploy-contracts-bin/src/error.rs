#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The deploying account or the network could not be resolved.
    #[error("invalid signer or network configuration: {0:#}")]
    Configuration(anyhow::Error),
    #[error("failed to deploy {contract}: {source:#}")]
    Deployment {
        contract: String,
        source: anyhow::Error,
    },
    #[error("failed to write deployment report")]
    Report(#[from] std::io::Error),
}
