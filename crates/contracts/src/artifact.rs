//! Hardhat writes one JSON artifact per compiled contract to
//! `artifacts/<sourceName>/<contractName>.json`. This module locates those
//! artifacts by contract name and turns them into deployment bytecode.

use {
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        json_abi::JsonAbi,
        primitives::{Bytes, hex},
    },
    anyhow::{Context, Result, bail, ensure},
    serde::Deserialize,
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

/// Directory in which Hardhat keeps compiler input and output. It never
/// contains contract artifacts.
const BUILD_INFO_DIR: &str = "build-info";

/// Prefix of the placeholders the compiler leaves in bytecode for every
/// library that still has to be linked.
const LINK_PLACEHOLDER: &str = "__$";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    /// Creation bytecode as hex. Kept as a string because unlinked bytecode
    /// is not valid hex.
    bytecode: String,
}

impl Artifact {
    /// `<sourceName>:<contractName>`, the name that identifies a contract
    /// unambiguously within a project.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Builds the payload of a contract creation transaction: the creation
    /// bytecode followed by the ABI encoded constructor arguments.
    pub fn deploy_code(&self, args: &[DynSolValue]) -> Result<Bytes> {
        let name = self.fully_qualified_name();
        ensure!(
            !self.bytecode.contains(LINK_PLACEHOLDER),
            "{name} references libraries that have not been linked"
        );
        let mut code =
            hex::decode(&self.bytecode).with_context(|| format!("{name} has malformed bytecode"))?;
        ensure!(
            !code.is_empty(),
            "{name} is abstract or an interface and cannot be deployed"
        );

        match self.abi.constructor() {
            Some(constructor) => {
                let encoded = constructor
                    .abi_encode_input(args)
                    .with_context(|| format!("invalid constructor arguments for {name}"))?;
                code.extend(encoded);
            }
            None => ensure!(
                args.is_empty(),
                "{name} has no constructor but {} arguments were given",
                args.len()
            ),
        }

        Ok(code.into())
    }
}

/// Artifact directory of a Hardhat project.
#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loads the artifact of a contract. `name` is either a bare contract
    /// name (`Asset`) or a fully qualified one (`contracts/Asset.sol:Asset`).
    /// A bare name has to be unique across the whole project.
    pub fn find(&self, name: &str) -> Result<Artifact> {
        if let Some((source, contract)) = name.rsplit_once(':') {
            let path = self.root.join(source).join(format!("{contract}.json"));
            ensure!(path.is_file(), "artifact for contract {name:?} not found");
            let artifact = load(&path)?;
            ensure!(
                artifact.contract_name == contract,
                "{} contains contract {:?} instead of {contract:?}",
                path.display(),
                artifact.contract_name,
            );
            return Ok(artifact);
        }

        let mut candidates = Vec::new();
        collect(&self.root, &format!("{name}.json"), &mut candidates)?;
        candidates.sort();
        match candidates.as_slice() {
            [] => bail!(
                "artifact for contract {name:?} not found in {}",
                self.root.display()
            ),
            [path] => load(path),
            _ => {
                let names = candidates
                    .iter()
                    .map(|path| self.qualified_name(path, name))
                    .collect::<Vec<_>>();
                bail!(
                    "ambiguous contract name {name:?}, use one of: {}",
                    names.join(", ")
                )
            }
        }
    }

    fn qualified_name(&self, path: &Path, contract: &str) -> String {
        let source = path
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .unwrap_or(Path::new(""));
        format!("{}:{contract}", source.display())
    }
}

fn collect(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if entry.file_name() != BUILD_INFO_DIR {
                collect(&path, file_name, found)?;
            }
        } else if entry.file_name() == file_name {
            found.push(path);
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<Artifact> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact {}", path.display()))?;
    let artifact: Artifact = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse artifact {}", path.display()))?;
    tracing::debug!(
        contract = %artifact.fully_qualified_name(),
        path = %path.display(),
        "loaded contract artifact"
    );
    Ok(artifact)
}
