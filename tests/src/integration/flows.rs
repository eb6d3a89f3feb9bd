//! # Integration Test Flows
//!
//! Intake-then-handle flows through `ExpandHandleSpan`:
//!
//! 1. **Failure precedence**: payer failures stop everything; other-party
//!    failures keep the payer half
//! 2. **Signature handling**: prefix matching, the unused-signature sweep and
//!    real Ed25519/secp256k1 verification
//! 3. **Invalidation**: state changes between intake and handle force a
//!    re-expansion equal to a fresh one

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use qc_10_signature_expansion::{
        create_crypto_sigs_from, BodySigningFactory, ExpansionConfig, RationalizedSigMeta,
        SigMapPubKeyToSigBytes, SignatureExpansionApi, SpanSource, VerificationStatus,
    };
    use shared_types::{
        AccountAmount, AccountRecord, Alias, CryptoTransferBody, CryptoUpdateBody, IdOrAlias,
        ResponseCode, SignedTransaction, TokenManageBody, TokenOperation, TokenRecord,
        TransactionData,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn mint(token: u64) -> TransactionData {
        TransactionData::TokenManage(TokenManageBody {
            token: id(token),
            operation: TokenOperation::Mint,
            account: None,
        })
    }

    fn update_account(account: u64) -> TransactionData {
        TransactionData::CryptoUpdate(CryptoUpdateBody {
            account: IdOrAlias::Id(id(account)),
            key: None,
            receiver_sig_required: None,
        })
    }

    fn transfer(from: IdOrAlias, to: IdOrAlias, amount: i64) -> TransactionData {
        TransactionData::CryptoTransfer(CryptoTransferBody {
            hbar_transfers: vec![
                AccountAmount {
                    account: from,
                    amount: -amount,
                    is_approval: false,
                },
                AccountAmount {
                    account: to,
                    amount,
                    is_approval: false,
                },
            ],
            token_transfers: vec![],
        })
    }

    // =============================================================================
    // SCENARIOS: FAILURE PRECEDENCE
    // =============================================================================

    /// Test: Deleted payer yields nothing and links only the payer.
    #[test]
    fn test_deleted_payer_yields_none_available() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        state.put_token(id(70), TokenRecord::new(id(PAYER)));
        state.delete_account(&id(PAYER));
        let service = service(&state);

        let raw = signed_contents(&body(PAYER, "a", mint(70)), &[&payer]);
        service.track(&raw).unwrap();
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::AccountDeleted);
        assert_eq!(handled.sig_meta(), &RationalizedSigMeta::none_available());
        assert_eq!(handled.linked_refs().len(), 1);
        assert_eq!(handled.source(), &SpanSource::Reused);
    }

    /// Test: Missing token after a good payer keeps the verified payer signature.
    #[test]
    fn test_missing_token_yields_payer_only() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let service = service(&state);

        let raw = signed_contents(&body(PAYER, "b", mint(70)), &[&payer]);
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::InvalidTokenId);
        assert!(handled.status().is_key_ordering_failure());
        let meta = handled.sig_meta();
        assert_eq!(meta.payer_key(), Ok(&payer.key()));
        assert!(meta.others_req_sigs().is_err());
        assert!(meta.pk_to_verified_sig(&payer.public_key()).is_some());
    }

    /// Test: One of two required keys unsigned among three supplied signatures.
    #[test]
    fn test_unsigned_required_key_is_matching_failure() {
        let payer = TestKey::ed25519(1);
        let sender = TestKey::ed25519(2);
        let state = ledger_with_payer(&payer);
        state.put_account(id(2002), AccountRecord::new(sender.key()));
        state.put_account(id(3003), AccountRecord::new(TestKey::ed25519(3).key()));
        let service = service(&state);

        let txn = body(
            PAYER,
            "c",
            transfer(IdOrAlias::Id(id(2002)), IdOrAlias::Id(id(3003)), 5),
        );
        let raw = signed_contents(
            &txn,
            &[&payer, &TestKey::ed25519(3), &TestKey::ed25519(4)],
        );
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::InvalidSignature);
        assert!(handled.status().is_sig_matching_failure());
        assert!(handled.sig_meta().could_rationalize_payer());
        assert!(!handled.sig_meta().could_rationalize_others());

        // The failing pass itself produces nothing.
        let signed = SignedTransaction::from_bytes(&raw).unwrap();
        let mut sig_bytes = SigMapPubKeyToSigBytes::new(&signed.sig_map);
        let factory = BodySigningFactory::new(signed.body_bytes.clone().into());
        let pass = create_crypto_sigs_from(&[payer.key(), sender.key()], &mut sig_bytes, &factory);
        assert!(pass.has_failed());
        assert!(pass.platform_sigs().is_empty());
    }

    /// Test: Full success sweeps an extra full-prefix signature into the set.
    #[test]
    fn test_extra_signature_is_swept_in() {
        let payer = TestKey::ed25519(1);
        let owner = TestKey::ed25519(2);
        let extra = TestKey::ed25519(9);
        let state = ledger_with_payer(&payer);
        state.put_account(id(2002), AccountRecord::new(owner.key()));
        let service = service(&state);

        let raw = signed_contents(&body(PAYER, "d", update_account(2002)), &[&payer, &owner, &extra]);
        service.track(&raw).unwrap();
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::Ok);
        let meta = handled.sig_meta();
        assert_eq!(meta.others_req_sigs(), Ok(&[owner.key()][..]));
        assert_eq!(meta.verified_sigs().map(<[_]>::len), Ok(3));
        assert!(meta.verified_sigs().unwrap().iter().all(|s| s.is_valid()));
        assert!(meta.pk_to_verified_sig(&extra.public_key()).is_some());

        let revoked = meta.revoking_crypto_sigs_from(&owner.key());
        assert!(revoked.pk_to_verified_sig(&owner.public_key()).is_none());
        assert!(revoked.pk_to_verified_sig(&payer.public_key()).is_some());
    }

    #[test]
    fn test_sweep_can_be_disabled() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let config = ExpansionConfig {
            sweep_unused_full_prefix_sigs: false,
            ..ExpansionConfig::for_testing()
        };
        let service = service_with(&state, config);

        let raw = signed_contents(
            &body(PAYER, "e", update_account(PAYER)),
            &[&payer, &TestKey::ed25519(9)],
        );
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::Ok);
        assert_eq!(handled.sig_meta().verified_sigs().map(<[_]>::len), Ok(1));
    }

    /// Test: A key required as payer and as other party uses its one signature once.
    #[test]
    fn test_shared_key_signature_verified_once() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        state.put_account(id(2002), AccountRecord::new(payer.key()));
        let service = service(&state);

        let raw = signed_contents(&body(PAYER, "shared", update_account(2002)), &[&payer]);
        service.track(&raw).unwrap();
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::Ok);
        assert_eq!(handled.sig_meta().others_req_sigs(), Ok(&[payer.key()][..]));
        let sigs = handled.sig_meta().verified_sigs().unwrap();
        assert_eq!(sigs.len(), 1);
        assert!(sigs[0].is_valid());
    }

    // =============================================================================
    // SIGNATURES
    // =============================================================================

    #[test]
    fn test_secp256k1_payer_verifies() {
        let payer = TestKey::secp256k1(7);
        let state = ledger_with_payer(&payer);
        let service = service(&state);

        let raw = signed_contents(&body(PAYER, "k", update_account(PAYER)), &[&payer]);
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::Ok);
        let sig = handled.sig_meta().pk_to_verified_sig(&payer.public_key()).unwrap();
        assert_eq!(sig.status, VerificationStatus::Valid);
    }

    /// Test: Structurally matched bytes that do not verify are not usable.
    #[test]
    fn test_signature_over_other_body_is_invalid() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let service = service(&state);

        let txn = body(PAYER, "real", update_account(PAYER));
        let other = body(PAYER, "other", update_account(PAYER)).to_bytes().unwrap();
        let raw = contents_with_pairs(&txn, vec![payer.sign(&other)]);
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::Ok);
        assert!(handled.sig_meta().pk_to_verified_sig(&payer.public_key()).is_none());
        assert_eq!(
            handled.sig_meta().verified_sigs().unwrap()[0].status,
            VerificationStatus::Invalid
        );
    }

    #[test]
    fn test_partial_prefix_signature_matches() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let service = service(&state);

        let txn = body(PAYER, "prefix", update_account(PAYER));
        let body_bytes = txn.to_bytes().unwrap();
        let raw = contents_with_pairs(&txn, vec![payer.sign_with_prefix(&body_bytes, 4)]);
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.status(), ResponseCode::Ok);
        assert!(handled.sig_meta().pk_to_verified_sig(&payer.public_key()).is_some());
    }

    // =============================================================================
    // INVALIDATION
    // =============================================================================

    /// Test: Re-expansion after a key change equals a fresh expansion.
    #[test]
    fn test_invalidated_span_matches_fresh_expansion() {
        let payer = TestKey::ed25519(1);
        let owner = TestKey::ed25519(2);
        let state = ledger_with_payer(&payer);
        state.put_account(id(2002), AccountRecord::new(owner.key()));
        let intake = service(&state);

        let raw = signed_contents(&body(PAYER, "inv", update_account(2002)), &[&payer, &owner]);
        intake.track(&raw).unwrap();
        state.put_account(id(2002), AccountRecord::new(TestKey::ed25519(7).key()));

        let handled = intake.accessor_for(&raw).unwrap();
        let fresh = service(&state).accessor_for(&raw).unwrap();

        assert!(matches!(handled.source(), SpanSource::Reexpanded { .. }));
        assert!(handled.used_sync_verification());
        assert_eq!(handled.status(), fresh.status());
        assert_eq!(handled.sig_meta(), fresh.sig_meta());
        assert_eq!(handled.linked_refs(), fresh.linked_refs());
    }

    #[test]
    fn test_unchanged_state_reuses_intake_result() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let service = service(&state);

        let raw = signed_contents(&body(PAYER, "same", update_account(PAYER)), &[&payer]);
        service.track(&raw).unwrap();
        state.put_account(id(5555), AccountRecord::new(TestKey::ed25519(5).key()));
        let handled = service.accessor_for(&raw).unwrap();

        assert_eq!(handled.source(), &SpanSource::Reused);
        assert!(!handled.used_sync_verification());
    }

    /// Test: Binding an alias after intake invalidates a credit to that alias.
    #[test]
    fn test_alias_bound_after_intake() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let service = service(&state);
        let alias = Alias(vec![0xA1; 33]);

        let txn = body(
            PAYER,
            "alias",
            transfer(IdOrAlias::Id(id(PAYER)), IdOrAlias::Alias(alias.clone()), 10),
        );
        let raw = signed_contents(&txn, &[&payer]);
        assert_eq!(service.accessor_for(&raw).unwrap().status(), ResponseCode::Ok);

        service.track(&raw).unwrap();
        state.put_account(
            id(4004),
            AccountRecord::new(TestKey::ed25519(4).key()).with_receiver_sig_required(),
        );
        state.bind_alias(alias, id(4004));
        let handled = service.accessor_for(&raw).unwrap();

        assert!(matches!(handled.source(), SpanSource::Reexpanded { .. }));
        assert_eq!(handled.status(), ResponseCode::InvalidSignature);
    }

    /// Test: A payer that did not exist at intake is resolved at handle time.
    #[test]
    fn test_payer_created_after_intake() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let raw = signed_contents(&body(6006, "late", update_account(6006)), &[&payer]);
        let service = service(&state);

        service.track(&raw).unwrap();
        state.put_account(id(6006), AccountRecord::new(payer.key()));
        let handled = service.accessor_for(&raw).unwrap();

        assert!(matches!(handled.source(), SpanSource::Reexpanded { .. }));
        assert_eq!(handled.status(), ResponseCode::Ok);
    }

    // =============================================================================
    // SPAN LIFECYCLE
    // =============================================================================

    #[test]
    fn test_spans_are_single_use() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let service = service(&state);
        let raw = signed_contents(&body(PAYER, "once", update_account(PAYER)), &[&payer]);

        let tracked = service.track(&raw).unwrap();
        assert_eq!(service.accessor_for(&raw).unwrap().source(), &SpanSource::Reused);
        assert_eq!(service.accessor_for(&raw).unwrap().source(), &SpanSource::Uncached);
        assert!(!service.is_cached(&tracked.txn_ref()));
    }

    #[test]
    fn test_full_cache_falls_back_to_handle_expansion() {
        let payer = TestKey::ed25519(1);
        let state = ledger_with_payer(&payer);
        let config = ExpansionConfig {
            span_cache_capacity: 1,
            ..ExpansionConfig::for_testing()
        };
        let service = service_with(&state, config);
        let first = signed_contents(&body(PAYER, "1", update_account(PAYER)), &[&payer]);
        let second = signed_contents(&body(PAYER, "2", update_account(PAYER)), &[&payer]);

        service.track(&first).unwrap();
        service.track(&second).unwrap();
        assert_eq!(service.cached_spans(), 1);

        let handled = service.accessor_for(&second).unwrap();
        assert_eq!(handled.source(), &SpanSource::Uncached);
        assert_eq!(handled.status(), ResponseCode::Ok);
    }

    /// Test: Same contents and state always give the same result.
    #[test]
    fn test_handle_is_deterministic() {
        let payer = TestKey::ed25519(1);
        let owner = TestKey::ed25519(2);
        let state = ledger_with_payer(&payer);
        state.put_account(id(2002), AccountRecord::new(owner.key()));
        let raw = signed_contents(&body(PAYER, "det", update_account(2002)), &[&owner, &payer]);

        let first = service(&state).accessor_for(&raw).unwrap();
        let second = service(&state).accessor_for(&raw).unwrap();

        assert_eq!(first.status(), second.status());
        assert_eq!(first.sig_meta(), second.sig_meta());
        assert_eq!(first.linked_refs(), second.linked_refs());
    }
}
