//! Verification orchestrator.
//!
//! Ties the providers, the policy engine, and the guardian signer into
//! the single request pipeline:
//!
//! 1. fetch the account's policy-setting events
//! 2. select the most recent policy for the requesting signer
//! 3. decode the on-chain payload
//! 4. simulate the transaction
//! 5. match the trace against the policy
//! 6. co-sign the recomputed transaction hash, or report violations
//!
//! The orchestrator holds no per-request state; a request yields exactly
//! one signature or exactly one error.

use std::sync::Arc;

use starknet_core::types::Felt;

use starkward_core::error::{Result, VerifyError};
use starkward_core::felt::parse_felt;
use starkward_core::types::{
    GuardianSignature, Policy, PolicySetEvent, SignerPolicies, Transaction,
};
use starkward_crypto::GuardianSigner;
use starkward_policy::{check_trace, decode_policy, extract_transfers};

use crate::provider::{EventProvider, TraceProvider};

/// The verification pipeline shared by all requests.
pub struct Verifier {
    events: Arc<dyn EventProvider>,
    traces: Arc<dyn TraceProvider>,
    signer: GuardianSigner,
    chain_id: Felt,
}

impl Verifier {
    /// Assemble the pipeline from its parts.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventProvider>,
        traces: Arc<dyn TraceProvider>,
        signer: GuardianSigner,
        chain_id: Felt,
    ) -> Self {
        Self {
            events,
            traces,
            signer,
            chain_id,
        }
    }

    /// Verify `tx` against the policy its account set for `signer`, and
    /// co-sign it if no violation is found.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::PolicyViolation`] when the simulated trace
    /// breaks the policy, and the corresponding operational variant when
    /// any pipeline stage fails.
    pub async fn verify(&self, signer: &str, tx: &Transaction) -> Result<GuardianSignature> {
        let account = &tx.contract_address;
        let policies = self.signer_policy(account, signer).await?;

        let trace = self
            .traces
            .simulate(tx)
            .await
            .map_err(|e| VerifyError::simulation(e.to_string()))?;

        // Balance-change ledger for the operator log; never part of the
        // decision.
        for transfer in extract_transfers(&trace, account) {
            tracing::info!(
                account,
                contract = %transfer.contract_address,
                sender = %transfer.sender,
                receiver = %transfer.receiver,
                amount = %transfer.amount,
                "balance change",
            );
        }

        let violations = check_trace(account, &policies, &trace);
        if !violations.is_empty() {
            tracing::warn!(account, signer, count = violations.len(), "policy violated");
            return Err(VerifyError::policy_violation(violations));
        }

        tracing::info!(account, signer, "transaction approved");
        Ok(self.signer.sign_transaction(tx, self.chain_id)?)
    }

    /// The most recent decoded policy per signer of `account`, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::PolicyNotFound`] when the account has never
    /// emitted a policy event.
    pub async fn account_policies(&self, account: &str) -> Result<Vec<SignerPolicies>> {
        let events = self.fetch_events(account).await?;

        let mut seen: Vec<Felt> = Vec::new();
        let mut policies = Vec::new();
        for event in events.iter().rev() {
            let Some((signer_text, signer_felt)) = event_signer(event) else {
                continue;
            };
            if seen.contains(&signer_felt) {
                continue;
            }
            seen.push(signer_felt);
            policies.push(SignerPolicies {
                signer: signer_text.to_string(),
                policy: decode_policy(event.policy_chunks())?,
            });
        }
        Ok(policies)
    }

    /// The most recent policy `account` set for `signer`.
    async fn signer_policy(&self, account: &str, signer: &str) -> Result<Vec<Policy>> {
        let wanted = parse_felt(signer)
            .map_err(|_| VerifyError::signer_policy_not_found(signer))?;

        let events = self.fetch_events(account).await?;
        let event = events
            .iter()
            .rev()
            .find(|event| event_signer(event).is_some_and(|(_, felt)| felt == wanted))
            .ok_or_else(|| VerifyError::signer_policy_not_found(signer))?;

        Ok(decode_policy(event.policy_chunks())?)
    }

    async fn fetch_events(&self, account: &str) -> Result<Vec<PolicySetEvent>> {
        let events = self
            .events
            .policy_events(account)
            .await
            .map_err(|e| VerifyError::provider_unavailable(e.to_string()))?;
        if events.is_empty() {
            return Err(VerifyError::policy_not_found(account));
        }
        Ok(events)
    }
}

/// The signer a policy event applies to, in both its textual and field
/// forms. Events with an unparseable signer word are skipped.
fn event_signer(event: &PolicySetEvent) -> Option<(&str, Felt)> {
    let text = event.signer()?;
    let felt = parse_felt(text).ok()?;
    Some((text, felt))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use starkward_core::error::{ProviderError, ProviderResult};
    use starkward_core::types::{EmittedEvent, InvocationNode};
    use starkward_crypto::chain_id_felt;
    use starkward_policy::codec::encode_policy;

    const GUARDIAN_KEY: &str = "0x659d923453a4ec03749cb0dba1f1d8ee471d9c9c5760bcb12cb1a7c111157e4";
    const SIGNER: &str = "0x5537071ea21b91a3b3743866ea12cf197f0b37a6b83be41dd0bbfec6a2cf8ef";
    const ACCOUNT: &str = "0x38b6f1f5e39f5965a28ff2624ab941112d54fe71b8bf1283f565f5c925566c0";
    const TOKEN: &str = "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";
    const TRANSFER_KEY: &str =
        "0x99cd8bde557814842a3121e8ddfd433a539b8c9f14bf31ebf108d12e6196e9";

    struct FixedEvents(Vec<PolicySetEvent>);

    #[async_trait]
    impl EventProvider for FixedEvents {
        async fn policy_events(&self, _account: &str) -> ProviderResult<Vec<PolicySetEvent>> {
            Ok(self.0.clone())
        }
    }

    struct FailingEvents;

    #[async_trait]
    impl EventProvider for FailingEvents {
        async fn policy_events(&self, _account: &str) -> ProviderResult<Vec<PolicySetEvent>> {
            Err(ProviderError::unavailable("connection refused"))
        }
    }

    struct FixedTrace(InvocationNode);

    #[async_trait]
    impl TraceProvider for FixedTrace {
        async fn simulate(&self, _tx: &Transaction) -> ProviderResult<InvocationNode> {
            Ok(self.0.clone())
        }
    }

    fn policy_event(signer: &str, policy: &[Policy]) -> PolicySetEvent {
        let encoded = encode_policy(policy).unwrap();
        let mut data = vec![
            signer.to_string(),
            format!("{:#x}", encoded.felt_encoded.len()),
        ];
        data.extend(encoded.felt_encoded);
        PolicySetEvent {
            data,
            block_number: None,
        }
    }

    fn capped_policy(amount: &str) -> Vec<Policy> {
        vec![Policy {
            address: TOKEN.to_string(),
            amount: Some(amount.to_string()),
            ids: None,
            allowlist: Some(vec![TOKEN.to_string()]),
        }]
    }

    fn transfer_trace(amount: &str) -> InvocationNode {
        InvocationNode {
            contract_address: TOKEN.to_string(),
            caller_address: ACCOUNT.to_string(),
            selector: Some("0x83af".to_string()),
            calldata: vec!["0xreceiver".to_string(), amount.to_string(), "0x0".to_string()],
            events: vec![EmittedEvent {
                keys: vec![TRANSFER_KEY.to_string()],
                data: vec![ACCOUNT.to_string(), "0xreceiver".to_string(), amount.to_string()],
            }],
            internal_calls: vec![],
        }
    }

    fn sample_tx() -> Transaction {
        Transaction {
            contract_address: ACCOUNT.to_string(),
            calldata: vec!["0x1".to_string()],
            signature: vec![],
            nonce: "0".to_string(),
            max_fee: None,
            version: None,
        }
    }

    fn verifier(events: impl EventProvider + 'static, trace: InvocationNode) -> Verifier {
        Verifier::new(
            Arc::new(events),
            Arc::new(FixedTrace(trace)),
            GuardianSigner::from_key_str(GUARDIAN_KEY).unwrap(),
            chain_id_felt("SN_SEPOLIA").unwrap(),
        )
    }

    #[tokio::test]
    async fn compliant_transaction_is_signed() {
        let verifier = verifier(
            FixedEvents(vec![policy_event(SIGNER, &capped_policy("0x1000"))]),
            transfer_trace("0x1000"),
        );
        let signature = verifier.verify(SIGNER, &sample_tx()).await.unwrap();
        assert!(signature.r.starts_with("0x"));
        assert!(signature.s.starts_with("0x"));
    }

    #[tokio::test]
    async fn violating_transaction_is_refused() {
        let verifier = verifier(
            FixedEvents(vec![policy_event(SIGNER, &capped_policy("0x1000"))]),
            transfer_trace("0x1001"),
        );
        let err = verifier.verify(SIGNER, &sample_tx()).await.unwrap_err();
        assert!(matches!(err, VerifyError::PolicyViolation { count: 1, .. }));
    }

    #[tokio::test]
    async fn account_without_events_is_policy_not_found() {
        let verifier = verifier(FixedEvents(vec![]), transfer_trace("0x1"));
        let err = verifier.verify(SIGNER, &sample_tx()).await.unwrap_err();
        assert!(matches!(err, VerifyError::PolicyNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_signer_is_signer_policy_not_found() {
        let verifier = verifier(
            FixedEvents(vec![policy_event(SIGNER, &capped_policy("0x1000"))]),
            transfer_trace("0x1"),
        );
        let err = verifier.verify("0x9999", &sample_tx()).await.unwrap_err();
        assert!(matches!(err, VerifyError::SignerPolicyNotFound { .. }));
    }

    #[tokio::test]
    async fn newest_policy_for_a_signer_wins() {
        // Older event caps at 0x10, newer one at 0x1000.
        let verifier = verifier(
            FixedEvents(vec![
                policy_event(SIGNER, &capped_policy("0x10")),
                policy_event(SIGNER, &capped_policy("0x1000")),
            ]),
            transfer_trace("0x800"),
        );
        assert!(verifier.verify(SIGNER, &sample_tx()).await.is_ok());
    }

    #[tokio::test]
    async fn signer_comparison_is_numeric_not_textual() {
        let padded = format!("0x0{}", SIGNER.trim_start_matches("0x"));
        let verifier = verifier(
            FixedEvents(vec![policy_event(&padded, &capped_policy("0x1000"))]),
            transfer_trace("0x1"),
        );
        assert!(verifier.verify(SIGNER, &sample_tx()).await.is_ok());
    }

    #[tokio::test]
    async fn provider_outage_is_surfaced() {
        let verifier = verifier(FailingEvents, transfer_trace("0x1"));
        let err = verifier.verify(SIGNER, &sample_tx()).await.unwrap_err();
        assert!(matches!(err, VerifyError::ProviderUnavailable { .. }));
    }

    #[tokio::test]
    async fn account_policies_returns_latest_per_signer() {
        let other = "0x1234";
        let verifier = verifier(
            FixedEvents(vec![
                policy_event(SIGNER, &capped_policy("0x10")),
                policy_event(other, &capped_policy("0x20")),
                policy_event(SIGNER, &capped_policy("0x1000")),
            ]),
            transfer_trace("0x1"),
        );
        let policies = verifier.account_policies(ACCOUNT).await.unwrap();
        assert_eq!(policies.len(), 2);
        // Newest first.
        assert_eq!(policies[0].signer, SIGNER);
        assert_eq!(policies[0].policy[0].amount.as_deref(), Some("0x1000"));
        assert_eq!(policies[1].signer, other);
    }
}
