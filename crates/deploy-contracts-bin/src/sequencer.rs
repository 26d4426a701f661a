use {
    crate::{
        Error,
        deployer::{DeployedContract, Deployer, DeploymentRequest},
    },
    alloy::{dyn_abi::DynSolValue, primitives::Address},
    std::io::Write,
};

/// The contracts making up the marketplace, in deployment order.
pub fn requests() -> Vec<DeploymentRequest> {
    vec![
        DeploymentRequest::new(
            "Asset",
            vec![
                DynSolValue::String("Asset".into()),
                DynSolValue::String("AST".into()),
            ],
        ),
        DeploymentRequest::new("AssetMarketplace", vec![]),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub deployer: Address,
    pub contracts: Vec<DeployedContract>,
}

/// Deploys contracts strictly one after another. A request is only sent once
/// the previous deployment is confirmed and the first failure aborts the
/// remaining ones.
pub struct Sequencer<D> {
    deployer: D,
    requests: Vec<DeploymentRequest>,
}

impl<D: Deployer> Sequencer<D> {
    pub fn new(deployer: D, requests: Vec<DeploymentRequest>) -> Self {
        Self { deployer, requests }
    }

    /// Runs all deployments, writing one line per completed step to `out`.
    pub async fn run(&self, out: &mut impl Write) -> Result<Report, Error> {
        let deployer = self
            .deployer
            .default_signer()
            .await
            .map_err(Error::Configuration)?;
        writeln!(out, "Deploying contracts with the account: {deployer}")?;

        let mut contracts = Vec::with_capacity(self.requests.len());
        for request in &self.requests {
            tracing::info!(contract = %request.name, "deploying");
            let contract =
                self.deployer
                    .deploy(request)
                    .await
                    .map_err(|source| Error::Deployment {
                        contract: request.name.clone(),
                        source,
                    })?;
            tracing::info!(
                contract = %contract.name,
                address = %contract.address,
                transaction = %contract.transaction,
                block = ?contract.block,
                "deployed"
            );
            writeln!(
                out,
                "{} contract deployed at: {}",
                contract.name, contract.address
            )?;
            contracts.push(contract);
        }

        Ok(Report {
            deployer,
            contracts,
        })
    }
}
