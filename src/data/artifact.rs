use std::path::Path;

use alloy::primitives::Bytes;
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;

/// The parts of a Truffle build artifact needed to deploy a contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub bytecode: String,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read contract artifact {}", path.display()))?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        let artifact: ContractArtifact =
            serde_json::from_str(data).wrap_err("Invalid contract artifact JSON")?;
        Ok(artifact)
    }

    /// Creation bytecode, without constructor arguments.
    pub fn creation_code(&self) -> Result<Bytes> {
        let hex = self.bytecode.trim();
        if hex.is_empty() || hex == "0x" {
            return Err(eyre!("Artifact {} has no bytecode", self.contract_name));
        }
        // Truffle leaves `__Name___` placeholders for unlinked libraries
        if hex.contains("__") {
            return Err(eyre!(
                "Artifact {} has unlinked library references",
                self.contract_name
            ));
        }
        hex.parse::<Bytes>()
            .wrap_err_with(|| format!("Artifact {} has malformed bytecode", self.contract_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_truffle_artifact() {
        let json = r#"{
            "contractName": "Choreography",
            "abi": [],
            "bytecode": "0x6080604052",
            "deployedBytecode": "0x6080"
        }"#;
        let artifact = ContractArtifact::parse(json).unwrap();
        assert_eq!(artifact.contract_name, "Choreography");
        let code = artifact.creation_code().unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_missing_bytecode_field() {
        let json = r#"{ "contractName": "Choreography" }"#;
        assert!(ContractArtifact::parse(json).is_err());
    }

    #[test]
    fn test_empty_bytecode() {
        let artifact = ContractArtifact {
            contract_name: "Choreography".to_string(),
            bytecode: "0x".to_string(),
        };
        assert!(artifact.creation_code().is_err());
    }

    #[test]
    fn test_unlinked_bytecode() {
        let artifact = ContractArtifact {
            contract_name: "Choreography".to_string(),
            bytecode: "0x6080__SafeMath______________________________6040".to_string(),
        };
        let err = artifact.creation_code().unwrap_err();
        assert!(err.to_string().contains("unlinked"));
    }

    #[test]
    fn test_malformed_bytecode() {
        let artifact = ContractArtifact {
            contract_name: "Choreography".to_string(),
            bytecode: "0xzz".to_string(),
        };
        assert!(artifact.creation_code().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ContractArtifact::load(Path::new("/nonexistent/Choreography.json"));
        assert!(result.is_err());
    }
}
