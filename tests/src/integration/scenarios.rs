//! # Swap Scenarios
//!
//! Lock, Claim and Unlock driven through `InMemoryHost` the way two parties
//! would drive them, including a full two-ledger atomic swap where the
//! secret revealed on one ledger settles the other.

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::timeout;

    use htlc_swap::{
        create_image, generate_secret, AgreementStatus, ApprovedEvent, ClaimedEvent, ErrorKind,
        LockedEvent, Secret, SwapConfig, SwapError, TimingViolation, TransferredEvent,
    };

    use crate::harness::{
        address_of, fbtc, fusd, LockSpec, SwapHarness, ALICE_KEY, BOB_KEY, CAROL_KEY, SECRET,
        SUPPLY,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const LOCKED_AT: u64 = 1_000;
    const LOCK_TIME: u64 = 100;
    const EXPIRY: u64 = LOCKED_AT + LOCK_TIME;
    const AMOUNT: u64 = 1_500;

    /// Scenario 1 setup: Alice locks 1500 fusd for Bob.
    fn locked_harness() -> (SwapHarness, htlc_swap::AgreementId) {
        let harness = SwapHarness::new();
        let id = harness
            .approve_and_lock(&LockSpec::alice_to_bob(AMOUNT, LOCK_TIME), LOCKED_AT)
            .expect("lock should succeed");
        (harness, id)
    }

    // =============================================================================
    // SINGLE-LEDGER SCENARIOS
    // =============================================================================

    #[test]
    fn test_lock_moves_amount_into_custody() {
        let (harness, id) = locked_harness();

        assert_eq!(harness.custody_balance(&fusd()), AMOUNT);
        assert_eq!(harness.balance(&fusd(), ALICE_KEY), SUPPLY - AMOUNT);

        let agreement = harness.query(&id).unwrap();
        assert_eq!(agreement.status, AgreementStatus::Locked);
        assert_eq!(agreement.owner, address_of(ALICE_KEY));
        assert_eq!(agreement.counterparty, address_of(BOB_KEY));
        assert_eq!(agreement.amount, AMOUNT);
        assert_eq!(agreement.expiry, EXPIRY);
        assert_eq!(agreement.token_contract, fusd());
    }

    #[test]
    fn test_claim_before_expiry_pays_counterparty() {
        let (harness, id) = locked_harness();

        harness.claim(BOB_KEY, &id, SECRET, EXPIRY - 50).unwrap();

        assert_eq!(harness.balance(&fusd(), BOB_KEY), AMOUNT);
        assert_eq!(harness.custody_balance(&fusd()), 0);
        assert_eq!(harness.query(&id).unwrap().status, AgreementStatus::Claimed);
    }

    #[test]
    fn test_second_claim_is_rejected() {
        let (harness, id) = locked_harness();
        harness.claim(BOB_KEY, &id, SECRET, EXPIRY - 50).unwrap();

        let err = harness.claim(BOB_KEY, &id, SECRET, EXPIRY - 40).unwrap_err();
        assert!(matches!(
            err,
            SwapError::AlreadySettled {
                status: AgreementStatus::Claimed,
                ..
            }
        ));

        assert_eq!(harness.balance(&fusd(), BOB_KEY), AMOUNT);
        assert_eq!(harness.balance(&fusd(), ALICE_KEY), SUPPLY - AMOUNT);
        assert_eq!(harness.custody_balance(&fusd()), 0);
    }

    #[test]
    fn test_unlock_before_expiry_is_rejected() {
        let (harness, id) = locked_harness();

        let err = harness.unlock(ALICE_KEY, &id, EXPIRY - 1).unwrap_err();
        assert!(matches!(
            err,
            SwapError::Timing {
                violation: TimingViolation::NotYetExpired,
                ..
            }
        ));
        assert_eq!(harness.custody_balance(&fusd()), AMOUNT);
        assert_eq!(harness.query(&id).unwrap().status, AgreementStatus::Locked);
    }

    #[test]
    fn test_unlock_after_expiry_refunds_owner() {
        let (harness, id) = locked_harness();

        harness.unlock(ALICE_KEY, &id, EXPIRY + 1).unwrap();

        assert_eq!(harness.balance(&fusd(), ALICE_KEY), SUPPLY);
        assert_eq!(harness.custody_balance(&fusd()), 0);
        assert_eq!(harness.query(&id).unwrap().status, AgreementStatus::Unlocked);

        // A late claim with the right secret still fails
        let err = harness.claim(BOB_KEY, &id, SECRET, EXPIRY + 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadySettled);
    }

    #[test]
    fn test_wrong_secret_keeps_agreement_locked() {
        let (harness, id) = locked_harness();

        let err = harness.claim(BOB_KEY, &id, "wrong", EXPIRY - 50).unwrap_err();
        assert!(matches!(err, SwapError::SecretMismatch(ref failed) if *failed == id));

        assert_eq!(harness.query(&id).unwrap().status, AgreementStatus::Locked);
        assert_eq!(harness.custody_balance(&fusd()), AMOUNT);
        assert_eq!(harness.balance(&fusd(), BOB_KEY), 0);
    }

    #[test]
    fn test_expiry_instant_opens_neither_window() {
        let (harness, id) = locked_harness();

        let err = harness.claim(BOB_KEY, &id, SECRET, EXPIRY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timing);

        let err = harness.unlock(ALICE_KEY, &id, EXPIRY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timing);

        assert_eq!(harness.query(&id).unwrap().status, AgreementStatus::Locked);
    }

    #[test]
    fn test_only_the_named_parties_may_settle() {
        let (harness, id) = locked_harness();

        let err = harness.claim(CAROL_KEY, &id, SECRET, EXPIRY - 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = harness.claim(ALICE_KEY, &id, SECRET, EXPIRY - 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = harness.unlock(BOB_KEY, &id, EXPIRY + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = harness.unlock(b"", &id, EXPIRY + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_lock_without_approval_leaves_no_agreement() {
        let harness = SwapHarness::new();

        let err = harness
            .lock(&LockSpec::alice_to_bob(AMOUNT, LOCK_TIME), LOCKED_AT)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LedgerTransfer);
        assert_eq!(harness.host.agreement_count(), 0);
        assert_eq!(harness.balance(&fusd(), ALICE_KEY), SUPPLY);
    }

    #[test]
    fn test_lock_validation_names_field() {
        let harness = SwapHarness::new();
        harness.approve(ALICE_KEY, &fusd(), AMOUNT).unwrap();

        let mut spec = LockSpec::alice_to_bob(AMOUNT, LOCK_TIME);
        spec.counterparty = ALICE_KEY;
        assert!(matches!(
            harness.lock(&spec, LOCKED_AT),
            Err(SwapError::Validation { field: "counterparty", .. })
        ));

        let spec = LockSpec::alice_to_bob(0, LOCK_TIME);
        assert!(matches!(
            harness.lock(&spec, LOCKED_AT),
            Err(SwapError::Validation { field: "amount", .. })
        ));

        let spec = LockSpec::alice_to_bob(AMOUNT, 0);
        assert!(matches!(
            harness.lock(&spec, LOCKED_AT),
            Err(SwapError::Validation { field: "lock_time", .. })
        ));

        let spec = LockSpec::alice_to_bob(AMOUNT, LOCK_TIME);
        assert!(matches!(
            harness.lock(&spec, u64::MAX),
            Err(SwapError::Validation { field: "lock_time", .. })
        ));

        let mut spec = LockSpec::alice_to_bob(AMOUNT, LOCK_TIME);
        spec.ledger = htlc_swap::LedgerRef::new("unknown");
        assert!(matches!(
            harness.lock(&spec, LOCKED_AT),
            Err(SwapError::Validation { field: "token_contract", .. })
        ));

        assert_eq!(harness.host.agreement_count(), 0);
    }

    #[test]
    fn test_configured_lock_time_cap() {
        let harness = SwapHarness::with_config(SwapConfig {
            max_lock_time_secs: Some(60),
            ..SwapConfig::default()
        });
        harness.approve(ALICE_KEY, &fusd(), AMOUNT).unwrap();

        assert!(harness
            .lock(&LockSpec::alice_to_bob(AMOUNT, 61), LOCKED_AT)
            .is_err());
        assert!(harness
            .lock(&LockSpec::alice_to_bob(AMOUNT, 60), LOCKED_AT)
            .is_ok());
    }

    #[test]
    fn test_custom_contract_name_moves_custody() {
        let harness = SwapHarness::with_config(SwapConfig {
            contract_name: "swapdesk".to_string(),
            ..SwapConfig::default()
        });
        assert_eq!(harness.host.custody_address().as_str(), "cc:swapdesk");

        harness
            .approve_and_lock(&LockSpec::alice_to_bob(AMOUNT, LOCK_TIME), LOCKED_AT)
            .unwrap();
        assert_eq!(harness.custody_balance(&fusd()), AMOUNT);
    }

    #[test]
    fn test_locks_in_distinct_transactions_get_distinct_ids() {
        let harness = SwapHarness::new();
        let spec = LockSpec::alice_to_bob(100, LOCK_TIME);

        let first = harness.approve_and_lock(&spec, LOCKED_AT).unwrap();
        let second = harness.approve_and_lock(&spec, LOCKED_AT).unwrap();

        assert_ne!(first, second);
        assert_eq!(harness.host.agreement_count(), 2);
        assert_eq!(harness.custody_balance(&fusd()), 200);
    }

    // =============================================================================
    // EVENT STREAM
    // =============================================================================

    #[tokio::test]
    async fn test_event_stream_follows_commits() {
        let harness = SwapHarness::new();
        let mut events = harness.host.subscribe();

        harness.approve(ALICE_KEY, &fusd(), AMOUNT).unwrap();
        let id = harness
            .lock(&LockSpec::alice_to_bob(AMOUNT, LOCK_TIME), LOCKED_AT)
            .unwrap();

        // Rejected calls publish nothing
        assert!(harness.claim(BOB_KEY, &id, "wrong", LOCKED_AT + 1).is_err());
        assert!(harness.unlock(ALICE_KEY, &id, LOCKED_AT + 1).is_err());

        harness.claim(BOB_KEY, &id, SECRET, LOCKED_AT + 2).unwrap();

        let approved = timeout(Duration::from_millis(100), events.recv())
            .await
            .expect("timeout waiting for Approved")
            .expect("should receive Approved");
        assert_eq!(approved.name, "Approved");

        let locked = timeout(Duration::from_millis(100), events.recv())
            .await
            .expect("timeout waiting for Locked")
            .expect("should receive Locked");
        assert_eq!(locked.name, "Locked");
        let payload: LockedEvent = locked.decode().unwrap();
        assert_eq!(payload.agreement_id, id);
        assert_eq!(payload.owner, address_of(ALICE_KEY));
        assert_eq!(payload.counterparty, address_of(BOB_KEY));
        assert_eq!(payload.amount, AMOUNT);
        assert_eq!(payload.expiry, EXPIRY);

        let claimed = timeout(Duration::from_millis(100), events.recv())
            .await
            .expect("timeout waiting for Claimed")
            .expect("should receive Claimed");
        assert_eq!(claimed.name, "Claimed");
        let payload: ClaimedEvent = claimed.decode().unwrap();
        assert_eq!(payload.secret, Secret::new(SECRET));

        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_token_calls_publish_ledger_events() {
        let harness = SwapHarness::new();
        let mut events = harness.host.subscribe();
        let bob = address_of(BOB_KEY);

        harness.approve(ALICE_KEY, &fusd(), 500).unwrap();
        harness.transfer(ALICE_KEY, &fusd(), &bob, 100).unwrap();
        // Overdrawn transfer is discarded with its event
        assert!(harness.transfer(CAROL_KEY, &fusd(), &bob, 1).is_err());

        let approved = timeout(Duration::from_millis(100), events.recv())
            .await
            .expect("timeout waiting for Approved")
            .expect("should receive Approved");
        assert_eq!(approved.name, "Approved");
        let payload: ApprovedEvent = approved.decode().unwrap();
        assert_eq!(payload.ledger, fusd());
        assert_eq!(payload.owner, address_of(ALICE_KEY));
        assert_eq!(payload.spender, harness.host.custody_address());
        assert_eq!(payload.amount, 500);

        let transferred = timeout(Duration::from_millis(100), events.recv())
            .await
            .expect("timeout waiting for Transferred")
            .expect("should receive Transferred");
        assert_eq!(transferred.name, "Transferred");
        let payload: TransferredEvent = transferred.decode().unwrap();
        assert_eq!(payload.from, address_of(ALICE_KEY));
        assert_eq!(payload.to, bob);
        assert_eq!(payload.amount, 100);

        assert!(events.try_recv().is_err());
    }

    // =============================================================================
    // CROSS-LEDGER ATOMIC SWAP
    // =============================================================================

    /// Alice trades 1500 fusd for Bob's 3 fbtc.
    ///
    /// Alice picks the secret and locks first with the longer lock time. Bob
    /// mirrors the lock under the same image with a shorter one. Alice claims
    /// Bob's lock, which publishes the secret; Bob reads it from the event
    /// stream and claims Alice's lock before it expires.
    #[tokio::test]
    async fn test_two_ledger_swap_settles_with_revealed_secret() {
        let harness = SwapHarness::new();
        let mut events = harness.host.subscribe();

        let secret = generate_secret();
        let image = create_image(&secret);

        let alice_leg = LockSpec {
            image,
            ..LockSpec::alice_to_bob(AMOUNT, 200)
        };
        let alice_id = harness.approve_and_lock(&alice_leg, LOCKED_AT).unwrap();

        let bob_leg = LockSpec {
            owner: BOB_KEY,
            counterparty: ALICE_KEY,
            ledger: fbtc(),
            amount: 3,
            lock_time: 100,
            image,
        };
        let bob_id = harness.approve_and_lock(&bob_leg, LOCKED_AT + 10).unwrap();

        harness
            .claim(ALICE_KEY, &bob_id, secret.as_str(), LOCKED_AT + 20)
            .unwrap();

        // Bob learns the secret from the Claimed event on his leg
        let mut revealed = None;
        while revealed.is_none() {
            let event = timeout(Duration::from_millis(100), events.recv())
                .await
                .expect("timeout waiting for events")
                .expect("event");
            if event.name == "Claimed" {
                let payload: ClaimedEvent = event.decode().unwrap();
                assert_eq!(payload.agreement_id, bob_id);
                revealed = Some(payload.secret);
            }
        }
        let revealed = revealed.unwrap();

        harness
            .claim(BOB_KEY, &alice_id, revealed.as_str(), LOCKED_AT + 30)
            .unwrap();

        assert_eq!(harness.balance(&fusd(), BOB_KEY), AMOUNT);
        assert_eq!(harness.balance(&fusd(), ALICE_KEY), SUPPLY - AMOUNT);
        assert_eq!(harness.balance(&fbtc(), ALICE_KEY), 3);
        assert_eq!(harness.balance(&fbtc(), BOB_KEY), SUPPLY - 3);
        assert_eq!(harness.custody_balance(&fusd()), 0);
        assert_eq!(harness.custody_balance(&fbtc()), 0);
    }

    /// If Alice never claims, both parties recover their funds after expiry.
    #[test]
    fn test_two_ledger_swap_abandoned_refunds_both() {
        let harness = SwapHarness::new();
        let image = create_image(&generate_secret());

        let alice_id = harness
            .approve_and_lock(
                &LockSpec {
                    image,
                    ..LockSpec::alice_to_bob(AMOUNT, 200)
                },
                LOCKED_AT,
            )
            .unwrap();
        let bob_id = harness
            .approve_and_lock(
                &LockSpec {
                    owner: BOB_KEY,
                    counterparty: ALICE_KEY,
                    ledger: fbtc(),
                    amount: 3,
                    lock_time: 100,
                    image,
                },
                LOCKED_AT,
            )
            .unwrap();

        harness.unlock(BOB_KEY, &bob_id, LOCKED_AT + 101).unwrap();
        harness.unlock(ALICE_KEY, &alice_id, LOCKED_AT + 201).unwrap();

        assert_eq!(harness.balance(&fusd(), ALICE_KEY), SUPPLY);
        assert_eq!(harness.balance(&fbtc(), BOB_KEY), SUPPLY);
        assert_eq!(harness.custody_balance(&fusd()), 0);
        assert_eq!(harness.custody_balance(&fbtc()), 0);
    }

    #[test]
    fn test_tokens_sent_to_custody_directly_are_not_claimable() {
        let harness = SwapHarness::new();
        let custody = harness.host.custody_address();
        harness.transfer(ALICE_KEY, &fusd(), &custody, 10).unwrap();
        assert_eq!(harness.custody_balance(&fusd()), 10);

        let id = harness
            .approve_and_lock(&LockSpec::alice_to_bob(AMOUNT, LOCK_TIME), LOCKED_AT)
            .unwrap();
        harness.claim(BOB_KEY, &id, SECRET, LOCKED_AT + 1).unwrap();

        // Claim releases exactly the agreement amount
        assert_eq!(harness.balance(&fusd(), BOB_KEY), AMOUNT);
        assert_eq!(harness.custody_balance(&fusd()), 10);
    }

    #[test]
    fn test_settlements_show_up_in_exported_metrics() {
        let (harness, id) = locked_harness();
        harness.claim(BOB_KEY, &id, "wrong", LOCKED_AT + 1).unwrap_err();
        harness.claim(BOB_KEY, &id, SECRET, LOCKED_AT + 1).unwrap();

        let text = htlc_telemetry::encode_metrics().unwrap();
        assert!(text.contains("htlc_agreements_tokens_locked_total"));
        assert!(text.contains("htlc_agreements_tokens_released_total{settlement=\"claimed\"}"));
        assert!(text.contains("htlc_engine_operations_total{operation=\"Claim\",outcome=\"ok\"}"));
        assert!(text.contains("htlc_events_published_total{event=\"Claimed\"}"));
    }
}
