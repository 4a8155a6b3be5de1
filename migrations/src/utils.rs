//! Utilities for the migrations.

use std::str::FromStr;

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolValue;
use tracing::debug;

use crate::errors::DeployError;

/// Sets up a signing client for the given RPC url, returning the erased
/// provider and the address of the signer.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<(DynProvider, Address), DeployError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| DeployError::ClientInitialization(e.to_string()))?;
    let signer_address = signer.address();

    let url =
        Url::parse(rpc_url).map_err(|e| DeployError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| DeployError::ClientInitialization(e.to_string()))?;
    debug!("Connected to chain {} at {}", chain_id, rpc_url);

    Ok((provider.erased(), signer_address))
}

/// ABI-encode a single address as constructor arguments
pub fn address_constructor_args(address: Address) -> Bytes {
    (address,).abi_encode_params().into()
}

/// Append ABI-encoded constructor arguments to creation bytecode
pub fn creation_code(bytecode: &Bytes, constructor_args: &Bytes) -> Bytes {
    let mut code = Vec::with_capacity(bytecode.len() + constructor_args.len());
    code.extend_from_slice(bytecode);
    code.extend_from_slice(constructor_args);
    code.into()
}
