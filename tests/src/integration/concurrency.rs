//! # Concurrency Flows
//!
//! Many intake threads track independent transactions into one span cache
//! while a single handle thread consumes them in consensus order.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use qc_10_signature_expansion::{ExpansionConfig, SignatureExpansionApi, SpanSource};
    use shared_types::{AccountRecord, CryptoUpdateBody, IdOrAlias, ResponseCode, TransactionData};
    use std::sync::Arc;
    use std::thread;

    const INTAKE_THREADS: usize = 8;
    const TXNS_PER_THREAD: usize = 25;

    fn update_payer() -> TransactionData {
        TransactionData::CryptoUpdate(CryptoUpdateBody {
            account: IdOrAlias::Id(id(PAYER)),
            key: None,
            receiver_sig_required: None,
        })
    }

    #[test]
    fn test_parallel_intake_then_sequential_handle() {
        let payer = Arc::new(TestKey::random_ed25519());
        let state = ledger_with_payer(&payer);
        let config = ExpansionConfig {
            span_cache_capacity: INTAKE_THREADS * TXNS_PER_THREAD,
            ..ExpansionConfig::for_testing()
        };
        let service = Arc::new(service_with(&state, config));

        let handles: Vec<_> = (0..INTAKE_THREADS)
            .map(|t| {
                let service = Arc::clone(&service);
                let payer = Arc::clone(&payer);
                thread::spawn(move || {
                    (0..TXNS_PER_THREAD)
                        .map(|i| {
                            let memo = format!("intake-{}-{}", t, i);
                            let raw =
                                signed_contents(&body(PAYER, &memo, update_payer()), &[payer.as_ref()]);
                            service.track(&raw).expect("decodable");
                            raw
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let tracked: Vec<Vec<u8>> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("intake thread"))
            .collect();

        assert_eq!(service.cached_spans(), INTAKE_THREADS * TXNS_PER_THREAD);
        for raw in &tracked {
            let handled = service.accessor_for(raw).unwrap();
            assert_eq!(handled.source(), &SpanSource::Reused);
            assert_eq!(handled.status(), ResponseCode::Ok);
        }
        assert_eq!(service.cached_spans(), 0);
    }

    /// Test: Racing intakes of one transaction cache it exactly once.
    #[test]
    fn test_duplicate_intake_caches_once() {
        let payer = TestKey::secp256k1(3);
        let state = ledger_with_payer(&payer);
        let service = Arc::new(service(&state));
        let raw = Arc::new(signed_contents(&body(PAYER, "dup", update_payer()), &[&payer]));

        let handles: Vec<_> = (0..INTAKE_THREADS)
            .map(|_| {
                let service = Arc::clone(&service);
                let raw = Arc::clone(&raw);
                thread::spawn(move || service.track(&raw).map(|accessor| accessor.txn_ref()))
            })
            .collect();
        for handle in handles {
            handle.join().expect("intake thread").unwrap();
        }

        assert_eq!(service.cached_spans(), 1);
        assert_eq!(service.accessor_for(&raw).unwrap().source(), &SpanSource::Reused);
        assert_eq!(service.accessor_for(&raw).unwrap().source(), &SpanSource::Uncached);
    }

    /// Test: State written by another thread between phases is observed at handle.
    #[test]
    fn test_mutation_from_other_thread_invalidates() {
        let payer = TestKey::random_secp256k1();
        let state = ledger_with_payer(&payer);
        let service = service(&state);
        let raw = signed_contents(&body(PAYER, "mut", update_payer()), &[&payer]);
        service.track(&raw).unwrap();

        let writer_state = Arc::clone(&state);
        let rotated = TestKey::ed25519(8).key();
        thread::spawn(move || {
            writer_state.put_account(id(PAYER), AccountRecord::new(rotated));
        })
        .join()
        .unwrap();

        let handled = service.accessor_for(&raw).unwrap();
        assert!(matches!(handled.source(), SpanSource::Reexpanded { .. }));
        assert_eq!(handled.status(), ResponseCode::InvalidSignature);
    }
}
