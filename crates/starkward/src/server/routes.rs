//! Route handlers.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use starkward_core::error::VerifyError;
use starkward_core::types::{EncodedPolicy, Policy, SignerPolicies, Transaction};
use starkward_policy::codec;

use super::error::ApiError;
use super::AppState;

/// Body of a `POST /verify` request.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// Public key of the session/device signer requesting co-signature.
    pub signer: String,
    /// The user-signed transaction under review.
    pub transaction: Transaction,
}

/// Body of a `POST /encodePolicy` request.
#[derive(Debug, Deserialize)]
pub struct EncodePolicyRequest {
    /// The policy rules to encode.
    pub policy: Vec<Policy>,
}

/// Body of a `GET /getPolicies/:address` response.
#[derive(Debug, Serialize)]
pub struct PoliciesResponse {
    /// Latest policy per signer, newest first.
    pub policies: Vec<SignerPolicies>,
}

/// `POST /verify`: run the verification pipeline and return the
/// guardian co-signature.
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let signature = state
        .verifier
        .verify(&request.signer, &request.transaction)
        .await?;
    Ok(Json(json!({ "signature": [signature.r, signature.s] })))
}

/// `POST /encodePolicy`: validate and encode a policy document.
///
/// Structural validation happens here, at the boundary; the matching
/// engine assumes well-formed policies.
pub async fn encode_policy(
    Json(request): Json<EncodePolicyRequest>,
) -> Result<Json<EncodedPolicy>, ApiError> {
    if request.policy.is_empty() {
        return Err(VerifyError::malformed_policy("policy document is empty").into());
    }
    if let Some(bad) = request.policy.iter().find(|p| !p.is_well_formed()) {
        return Err(VerifyError::malformed_policy(format!(
            "policy for address {:?} needs an address with ids or amount, or a non-empty allowlist",
            bad.address
        ))
        .into());
    }
    let encoded = codec::encode_policy(&request.policy).map_err(VerifyError::from)?;
    Ok(Json(encoded))
}

/// `GET /getPolicies/:address`: the latest decoded policy per signer of
/// an account.
pub async fn get_policies(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<PoliciesResponse>, ApiError> {
    let policies = state.verifier.account_policies(&address).await?;
    Ok(Json(PoliciesResponse { policies }))
}

/// `GET /ping`: health check.
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}
