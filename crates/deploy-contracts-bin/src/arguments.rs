use {
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(
        long,
        env,
        default_value = "warn,deploy_contracts=info,contracts=info,ethrpc=info"
    )]
    pub log_filter: String,

    /// Events at or above this level are written to stderr instead of stdout.
    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Emit log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

#[derive(clap::Parser)]
#[clap(about = "Deploys the Asset and AssetMarketplace contracts")]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// The chain ID the deployment is expected to run against. When set, the
    /// deployment is aborted before sending any transaction if the node
    /// reports a different chain.
    #[clap(long, env)]
    pub chain_id: Option<u64>,

    /// Hex encoded private key of the deploying account.
    #[clap(long, env)]
    pub private_key: Option<String>,

    /// BIP-39 mnemonic from which the deploying account is derived.
    #[clap(long, env)]
    pub mnemonic: Option<String>,

    /// Index of the account derived from `--mnemonic`.
    #[clap(long, env, default_value = "0")]
    pub account_index: u32,

    /// Directory containing the compiled Hardhat artifacts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Number of blocks a deployment transaction has to be confirmed by
    /// before it counts as complete.
    #[clap(long, env, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub confirmations: u64,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            node_url,
            chain_id,
            private_key,
            mnemonic,
            account_index,
            artifacts_dir,
            confirmations,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "node_url: {node_url}")?;
        display_option(f, "chain_id", chain_id)?;
        display_secret_option(f, "private_key", private_key)?;
        display_secret_option(f, "mnemonic", mnemonic)?;
        writeln!(f, "account_index: {account_index}")?;
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "confirmations: {confirmations}")?;
        Ok(())
    }
}

fn display_secret_option<T>(f: &mut Formatter<'_>, name: &str, option: &Option<T>) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}
