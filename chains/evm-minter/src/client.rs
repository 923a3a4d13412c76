//! # EVM Chain Client
//!
//! `ethers`-backed implementation of [`ChainClient`]. One HTTP provider is
//! built at startup and reused for every wallet and attempt.

use async_trait::async_trait;
use core_logic::{
    classify_submission_error, ChainClient, ConfigError, Confirmation, CoreError, FeeQuote,
    GasPriceSource, MintConfig, MintError, NetworkError, PrivateKey, TxSubmission, WalletError,
    GAS_ESTIMATION_FAILED,
};
use ethers::abi::Abi;
use ethers::prelude::*;
use reqwest::Client;
use serde_json::Value;
use std::fs;
use std::str::FromStr;
use tracing::info;

pub struct EthersChainClient {
    provider: Provider<Http>,
    endpoint: String,
    chain_id: u64,
    contract_address: Address,
    contract: BaseContract,
    method: String,
}

impl EthersChainClient {
    /// Loads the ABI, builds the provider and fetches the chain id.
    pub async fn connect(config: &MintConfig) -> Result<Self, CoreError> {
        let abi = load_abi(&config.contract_abi_path)?;
        let contract_address = parse_contract_address(&config.contract_address)?;

        let contract = BaseContract::from(abi);
        if contract.abi().function(&config.mint.method).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "contractAbiPath".into(),
                reason: format!("ABI has no function '{}'", config.mint.method),
            }
            .into());
        }

        let url = reqwest::Url::parse(&config.provider_url).map_err(|_| {
            ConfigError::InvalidRpcUrl {
                url: config.provider_url.clone(),
            }
        })?;
        let client = Client::builder()
            .build()
            .map_err(|e| NetworkError::ConnectionRefused {
                endpoint: config.provider_url.clone(),
                reason: e.to_string(),
            })?;
        let provider = Provider::new(Http::new_with_client(url, client));

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| NetworkError::Rpc {
                endpoint: config.provider_url.clone(),
                reason: e.to_string(),
            })?
            .as_u64();

        info!(
            "Connected to {} (chain {}), contract {:?}",
            config.provider_url, chain_id, contract_address
        );

        Ok(Self {
            provider,
            endpoint: config.provider_url.clone(),
            chain_id,
            contract_address,
            contract,
            method: config.mint.method.clone(),
        })
    }
}

/// Reads a bare ABI array or an artifact object carrying an `abi` field.
pub fn load_abi(path: &str) -> Result<Abi, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, &e))?;
    parse_abi(&content, path)
}

fn parse_abi(content: &str, path: &str) -> Result<Abi, ConfigError> {
    let parse_error = |msg: String| ConfigError::ParseError {
        path: path.to_string(),
        msg,
    };

    let json: Value = serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
    let abi_json = match json {
        Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| parse_error("object has no 'abi' field".into()))?,
        other => other,
    };

    serde_json::from_value(abi_json).map_err(|e| parse_error(e.to_string()))
}

fn parse_contract_address(raw: &str) -> Result<Address, ConfigError> {
    raw.parse::<Address>()
        .map_err(|e| ConfigError::InvalidValue {
            field: "contractAddress".into(),
            reason: format!("'{}' is not an address: {}", raw, e),
        })
}

#[async_trait]
impl GasPriceSource for EthersChainClient {
    async fn gas_price_wei(&self) -> Result<u128, NetworkError> {
        let price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| NetworkError::Rpc {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        u128::try_from(price).map_err(|_| NetworkError::InvalidResponse {
            endpoint: self.endpoint.clone(),
            reason: format!("gas price {} does not fit in u128", price),
        })
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    type Signer = LocalWallet;

    fn signer(&self, key: &PrivateKey, line: usize) -> Result<LocalWallet, WalletError> {
        if key.is_blank() {
            return Err(WalletError::InvalidKeyFormat {
                line,
                reason: "line is empty".into(),
            });
        }

        let wallet = key
            .expose()
            .parse::<LocalWallet>()
            .map_err(|e| WalletError::InvalidKeyFormat {
                line,
                reason: e.to_string(),
            })?;

        Ok(wallet.with_chain_id(self.chain_id))
    }

    async fn submit_purchase(
        &self,
        signer: &LocalWallet,
        quantity: u64,
        fees: &FeeQuote,
    ) -> Result<TxSubmission, MintError> {
        let data = self
            .contract
            .encode(&self.method, U256::from(quantity))
            .map_err(|e| MintError::Submission {
                reason: format!("failed to encode {}({}): {}", self.method, quantity, e),
            })?;

        let tx = Eip1559TransactionRequest::new()
            .from(signer.address())
            .to(self.contract_address)
            .data(data)
            .max_fee_per_gas(U256::from(fees.max_fee_per_gas))
            .max_priority_fee_per_gas(U256::from(fees.max_priority_fee_per_gas));

        let client = SignerMiddleware::new(self.provider.clone(), signer.clone());
        let gas_limit = client
            .estimate_gas(&tx.clone().into(), None)
            .await
            .map_err(|e| {
                classify_submission_error(&format!("{}: {}", GAS_ESTIMATION_FAILED, e))
            })?;

        // Nonce is filled in by the middleware
        let tx = tx.gas(gas_limit);
        let pending_tx = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| classify_submission_error(&e.to_string()))?;

        Ok(TxSubmission {
            hash: format!("{:?}", pending_tx.tx_hash()),
        })
    }

    async fn await_confirmation(
        &self,
        submission: &TxSubmission,
    ) -> Result<Confirmation, MintError> {
        let hash = H256::from_str(&submission.hash).map_err(|e| MintError::Submission {
            reason: format!("bad transaction hash {}: {}", submission.hash, e),
        })?;

        let receipt = PendingTransaction::new(hash, &self.provider)
            .await
            .map_err(|e| classify_submission_error(&e.to_string()))?;

        match receipt {
            Some(r) => Ok(Confirmation {
                tx_hash: format!("{:?}", r.transaction_hash),
                block_number: r.block_number.map(|b| b.as_u64()).unwrap_or_default(),
                success: r.status == Some(U64::from(1)),
            }),
            None => Err(MintError::Submission {
                reason: format!("transaction {} was dropped", submission.hash),
            }),
        }
    }
}
