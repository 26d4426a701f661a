//! The environment the deployment runs against: an account that signs and a
//! factory that turns a contract name plus constructor arguments into a
//! confirmed on-chain contract.

use {
    alloy::{
        dyn_abi::DynSolValue,
        network::TransactionBuilder,
        primitives::{Address, TxHash},
        providers::Provider,
        rpc::types::{TransactionReceipt, TransactionRequest},
    },
    anyhow::{Context, Result, ensure},
    contracts::Artifacts,
    ethrpc::AlloyProvider,
    tokio::sync::OnceCell,
};

/// A contract to deploy, identified by its artifact name.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRequest {
    pub name: String,
    pub args: Vec<DynSolValue>,
}

impl DeploymentRequest {
    pub fn new(name: impl Into<String>, args: Vec<DynSolValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A contract whose creation transaction has been confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub transaction: TxHash,
    pub block: Option<u64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
    /// Resolves the account that pays for and signs all deployments.
    async fn default_signer(&self) -> Result<Address>;

    /// Deploys a contract and waits until its creation is confirmed.
    async fn deploy(&self, request: &DeploymentRequest) -> Result<DeployedContract>;
}

/// Where the signing account comes from.
#[derive(Debug, Clone, Copy)]
pub enum Account {
    /// The provider holds a wallet for this address.
    Local(Address),
    /// The node signs for its first unlocked account.
    Node,
}

/// Deploys Hardhat artifacts through an Ethereum node.
pub struct NodeDeployer {
    provider: AlloyProvider,
    account: Account,
    artifacts: Artifacts,
    confirmations: u64,
    expected_chain_id: Option<u64>,
    signer: OnceCell<Address>,
}

impl NodeDeployer {
    pub fn new(
        provider: AlloyProvider,
        account: Account,
        artifacts: Artifacts,
        confirmations: u64,
        expected_chain_id: Option<u64>,
    ) -> Self {
        Self {
            provider,
            account,
            artifacts,
            confirmations,
            expected_chain_id,
            signer: OnceCell::new(),
        }
    }

    async fn resolve_signer(&self) -> Result<Address> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .context("failed to connect to node")?;
        tracing::info!(chain_id, "connected to network");
        if let Some(expected) = self.expected_chain_id {
            ensure!(
                chain_id == expected,
                "node is on chain {chain_id} but chain {expected} was expected"
            );
        }

        match self.account {
            Account::Local(address) => Ok(address),
            Account::Node => ethrpc::alloy::wallet::node_account(&self.provider).await,
        }
    }
}

#[async_trait::async_trait]
impl Deployer for NodeDeployer {
    async fn default_signer(&self) -> Result<Address> {
        self.signer
            .get_or_try_init(|| self.resolve_signer())
            .await
            .copied()
    }

    async fn deploy(&self, request: &DeploymentRequest) -> Result<DeployedContract> {
        let from = self.default_signer().await?;
        let artifact = self.artifacts.find(&request.name)?;
        let code = artifact.deploy_code(&request.args)?;

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("deployment transaction was rejected")?;
        let transaction = *pending.tx_hash();
        tracing::debug!(
            contract = %artifact.fully_qualified_name(),
            ?transaction,
            "sent deployment transaction"
        );

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .with_context(|| format!("failed to confirm transaction {transaction}"))?;
        let contract = confirmed_contract(&request.name, &receipt)?;
        tracing::debug!(
            contract = %artifact.fully_qualified_name(),
            address = ?contract.address,
            block = ?contract.block,
            gas_used = receipt.gas_used,
            "deployment confirmed"
        );
        Ok(contract)
    }
}

/// Checks that the receipt belongs to a successful contract creation.
fn confirmed_contract(name: &str, receipt: &TransactionReceipt) -> Result<DeployedContract> {
    let transaction = receipt.transaction_hash;
    ensure!(receipt.status(), "transaction {transaction} reverted");
    let address = receipt
        .contract_address
        .with_context(|| format!("receipt of {transaction} has no contract address"))?;

    Ok(DeployedContract {
        name: name.to_string(),
        address,
        transaction,
        block: receipt.block_number,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::providers::mock::Asserter,
        serde_json::{Value, json},
        std::fs,
        tempfile::TempDir,
    };

    fn deployer(asserter: &Asserter, account: Account, chain_id: Option<u64>) -> NodeDeployer {
        NodeDeployer::new(
            ethrpc::alloy::mock_provider(asserter.clone()),
            account,
            Artifacts::new("artifacts"),
            1,
            chain_id,
        )
    }

    #[tokio::test]
    async fn local_signer_only_checks_network() {
        let asserter = Asserter::new();
        let deployer = deployer(&asserter, Account::Local(Address::repeat_byte(7)), None);
        asserter.push_success(&"0x7a69");

        assert_eq!(
            deployer.default_signer().await.unwrap(),
            Address::repeat_byte(7)
        );
        // Cached, no further requests are made.
        assert_eq!(
            deployer.default_signer().await.unwrap(),
            Address::repeat_byte(7)
        );
    }

    #[tokio::test]
    async fn node_signer_is_first_unlocked_account() {
        let asserter = Asserter::new();
        let deployer = deployer(&asserter, Account::Node, Some(31337));
        asserter.push_success(&"0x7a69");
        asserter.push_success(&vec![Address::repeat_byte(1), Address::repeat_byte(2)]);

        assert_eq!(
            deployer.default_signer().await.unwrap(),
            Address::repeat_byte(1)
        );
    }

    #[tokio::test]
    async fn signer_resolution_fails_on_chain_mismatch() {
        let asserter = Asserter::new();
        let deployer = deployer(&asserter, Account::Node, Some(1));
        asserter.push_success(&"0x7a69");

        let err = deployer.default_signer().await.unwrap_err();
        assert!(err.to_string().contains("chain 31337"));
    }

    #[tokio::test]
    async fn signer_resolution_fails_without_node() {
        let asserter = Asserter::new();
        let deployer = deployer(&asserter, Account::Local(Address::repeat_byte(7)), None);
        asserter.push_failure_msg("connection refused");

        assert!(deployer.default_signer().await.is_err());
    }

    #[tokio::test]
    async fn deploying_unknown_artifact_fails_before_sending() {
        let artifacts = TempDir::new().unwrap();
        let asserter = Asserter::new();
        let deployer = NodeDeployer::new(
            ethrpc::alloy::mock_provider(asserter.clone()),
            Account::Local(Address::repeat_byte(7)),
            Artifacts::new(artifacts.path()),
            1,
            None,
        );
        asserter.push_success(&"0x7a69");

        let err = deployer
            .deploy(&DeploymentRequest::new("Asset", vec![]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    fn receipt(status: &str, contract_address: Option<Address>) -> TransactionReceipt {
        serde_json::from_value(json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x1e8480",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": TxHash::repeat_byte(0x11),
            "transactionIndex": "0x0",
            "blockHash": TxHash::repeat_byte(0x22),
            "blockNumber": "0x2a",
            "gasUsed": "0x1e8480",
            "effectiveGasPrice": "0x3b9aca00",
            "from": Address::repeat_byte(7),
            "to": null,
            "contractAddress": contract_address,
        }))
        .unwrap()
    }

    #[test]
    fn successful_receipt_yields_contract() {
        let contract =
            confirmed_contract("Asset", &receipt("0x1", Some(Address::repeat_byte(3)))).unwrap();

        assert_eq!(
            contract,
            DeployedContract {
                name: "Asset".to_string(),
                address: Address::repeat_byte(3),
                transaction: TxHash::repeat_byte(0x11),
                block: Some(42),
            }
        );
    }

    #[test]
    fn reverted_receipt_is_an_error() {
        let err = confirmed_contract("Asset", &receipt("0x0", Some(Address::repeat_byte(3))))
            .unwrap_err();
        assert!(err.to_string().contains("reverted"));
    }

    #[test]
    fn receipt_without_contract_address_is_an_error() {
        let err = confirmed_contract("Asset", &receipt("0x1", None)).unwrap_err();
        assert!(err.to_string().contains("no contract address"));
    }

    fn write_artifact(root: &std::path::Path, contract: &str, abi: Value) {
        let dir = root.join(format!("contracts/{contract}.sol"));
        fs::create_dir_all(&dir).unwrap();
        let artifact = json!({
            "contractName": contract,
            "sourceName": format!("contracts/{contract}.sol"),
            "abi": abi,
            "bytecode": "0x6001600c60003960016000f300",
        });
        fs::write(dir.join(format!("{contract}.json")), artifact.to_string()).unwrap();
    }

    #[tokio::test]
    async fn rejected_transaction_is_an_error() {
        let artifacts = TempDir::new().unwrap();
        write_artifact(artifacts.path(), "AssetMarketplace", json!([]));
        let asserter = Asserter::new();
        let deployer = NodeDeployer::new(
            ethrpc::alloy::mock_provider(asserter.clone()),
            Account::Local(Address::repeat_byte(7)),
            Artifacts::new(artifacts.path()),
            1,
            None,
        );
        asserter.push_success(&"0x7a69");
        // Every request made while filling and sending the transaction fails.
        for _ in 0..8 {
            asserter.push_failure_msg("insufficient funds for gas * price + value");
        }

        let err = deployer
            .deploy(&DeploymentRequest::new("AssetMarketplace", vec![]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }
}
