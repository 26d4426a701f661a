pub mod arguments;
pub mod deployer;
mod error;
pub mod sequencer;

pub use error::Error;
use {
    arguments::Arguments,
    clap::Parser,
    contracts::Artifacts,
    deployer::{Account, NodeDeployer},
    ethrpc::alloy::wallet,
    sequencer::{Report, Sequencer},
    std::process::ExitCode,
};

pub async fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = match Arguments::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => {
            // `--help` and `--version` also end up here.
            let _ = err.print();
            return if err.exit_code() == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };
    let obs_config = observe::Config::new(
        &args.logging.log_filter,
        args.logging.log_stderr_threshold.into_level(),
        args.logging.use_json_logs,
    );
    observe::tracing::initialize(&obs_config);
    tracing::info!("running deploy-contracts with validated arguments:\n{}", args);

    match run(&args).await {
        Ok(report) => {
            tracing::info!(
                deployer = %report.deployer,
                contracts = report.contracts.len(),
                "deployment finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Deploys the marketplace contracts with the configured account and reports
/// their addresses on stdout.
pub async fn run(args: &Arguments) -> Result<Report, Error> {
    let deployer = node_deployer(args)?;
    Sequencer::new(deployer, sequencer::requests())
        .run(&mut std::io::stdout())
        .await
}

fn node_deployer(args: &Arguments) -> Result<NodeDeployer, Error> {
    let signer = wallet::local_signer(
        args.private_key.as_deref(),
        args.mnemonic.as_deref(),
        args.account_index,
    )
    .map_err(Error::Configuration)?;
    let (provider, account) = match signer {
        Some(signer) => {
            let address = signer.address();
            (
                ethrpc::alloy::provider_with_signer(&args.node_url, signer),
                Account::Local(address),
            )
        }
        None => (ethrpc::alloy::provider(&args.node_url), Account::Node),
    };

    Ok(NodeDeployer::new(
        provider,
        account,
        Artifacts::new(&args.artifacts_dir),
        args.confirmations,
        args.chain_id,
    ))
}
