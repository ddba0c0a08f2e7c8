//! In-memory ledger host.
//!
//! Runs invocations one at a time. Each invocation executes against a working
//! copy of the agreement store and the token ledgers; the copy replaces the
//! committed state only when the call succeeds, and only then are its events
//! published. A failed call leaves no trace beyond its log line.

use super::{
    BufferedEventEmitter, FungibleToken, InMemoryAgreementStore, InMemoryLedgerRegistry,
    Sha256IdentityResolver,
};
use crate::application::SwapEngine;
use crate::config::SwapConfig;
use crate::domain::{Address, Agreement, AgreementId, LedgerRef, StoreError, SwapError, SwapEvent};
use crate::ipc::{dispatch, Invocation, InvocationResponse};
use crate::ports::{AgreementStore, LedgerRegistry};
use htlc_telemetry::{
    record_operation, time_operation, AGREEMENTS_OPEN, EVENTS_PUBLISHED, TOKENS_LOCKED,
    TOKENS_RELEASED,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

/// Buffered events per subscriber before the slowest one lags.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Event delivered to subscribers after commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedEvent {
    /// Invocation that raised it
    pub correlation_id: Uuid,
    /// Event name, e.g. `Locked` or `Transferred`
    pub name: &'static str,
    /// JSON payload
    pub payload: Vec<u8>,
}

impl PublishedEvent {
    /// Decode the payload.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[derive(Default)]
struct HostState {
    store: InMemoryAgreementStore,
    ledgers: InMemoryLedgerRegistry,
}

/// Transactional host for the swap engine and its token ledgers.
pub struct InMemoryHost {
    config: SwapConfig,
    identity: Sha256IdentityResolver,
    state: Mutex<HostState>,
    publisher: broadcast::Sender<PublishedEvent>,
}

impl InMemoryHost {
    /// Create a host with no ledgers registered.
    ///
    /// Fails when the configuration does not validate.
    pub fn new(config: SwapConfig) -> Result<Self, SwapError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SwapConfig) -> Self {
        let (publisher, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            identity: Sha256IdentityResolver,
            state: Mutex::new(HostState::default()),
            publisher,
        }
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Address holding locked tokens.
    pub fn custody_address(&self) -> Address {
        self.config.custody_address()
    }

    /// Make a token reachable under `reference`, replacing any previous one.
    pub fn register_ledger(&self, reference: LedgerRef, token: FungibleToken) {
        info!(ledger = %reference, symbol = %token.metadata().symbol, "[htlc] Registered ledger");
        self.state.lock().ledgers.register(reference, token);
    }

    /// Receive events of every committed invocation from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.publisher.subscribe()
    }

    /// Committed agreement.
    pub fn agreement(&self, id: &AgreementId) -> Result<Option<Agreement>, SwapError> {
        Ok(self.state.lock().store.get(id)?)
    }

    /// Number of committed agreements.
    pub fn agreement_count(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Committed balance, `None` when the ledger is unknown.
    pub fn balance_of(&self, ledger: &LedgerRef, owner: &Address) -> Option<u64> {
        self.state
            .lock()
            .ledgers
            .ledger(ledger)
            .map(|l| l.balance_of(owner))
    }

    /// Committed allowance, `None` when the ledger is unknown.
    pub fn allowance(&self, ledger: &LedgerRef, owner: &Address, spender: &Address) -> Option<u64> {
        self.state
            .lock()
            .ledgers
            .ledger(ledger)
            .map(|l| l.allowance(owner, spender))
    }

    /// Run one invocation as a transaction.
    pub fn invoke(&self, invocation: Invocation) -> Result<InvocationResponse, SwapError> {
        let operation = invocation.call.operation();
        let correlation_id = invocation.correlation_id;
        let _timer = time_operation(operation);

        let mut state = self.state.lock();
        let mut engine = SwapEngine::new(
            self.config.clone(),
            state.store.clone(),
            state.ledgers.clone(),
            self.identity,
            BufferedEventEmitter::default(),
        );

        let response = dispatch(&mut engine, &invocation.context, invocation.call)
            .map_err(|e| reject(operation, correlation_id, e))?;

        let (store, ledgers, mut buffer) = engine.into_parts();
        let events = buffer.drain();
        let published = encode_events(correlation_id, &events)
            .map_err(|e| reject(operation, correlation_id, e))?;

        record_custody_flows(&store, &events);
        state.store = store;
        state.ledgers = ledgers;

        // Published under the lock so subscribers see commit order
        for event in published {
            EVENTS_PUBLISHED.with_label_values(&[event.name]).inc();
            let _ = self.publisher.send(event);
        }
        drop(state);

        record_operation(operation, "ok");
        info!(
            correlation_id = %correlation_id,
            operation,
            events = events.len(),
            "[htlc] Invocation committed"
        );
        Ok(response)
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::with_valid_config(SwapConfig::default())
    }
}

fn reject(operation: &'static str, correlation_id: Uuid, error: SwapError) -> SwapError {
    let kind = error.kind().as_str();
    warn!(
        correlation_id = %correlation_id,
        operation,
        kind,
        error = %error,
        "[htlc] Invocation rejected, state discarded"
    );
    record_operation(operation, kind);
    error
}

fn encode_events(
    correlation_id: Uuid,
    events: &[SwapEvent],
) -> Result<Vec<PublishedEvent>, SwapError> {
    events
        .iter()
        .map(|event| -> Result<PublishedEvent, SwapError> {
            Ok(PublishedEvent {
                correlation_id,
                name: event.name(),
                payload: event.payload().map_err(StoreError::from)?,
            })
        })
        .collect()
}

fn record_custody_flows(store: &InMemoryAgreementStore, events: &[SwapEvent]) {
    for event in events {
        match event {
            SwapEvent::Locked(e) => {
                AGREEMENTS_OPEN.inc();
                TOKENS_LOCKED.inc_by(e.amount);
            }
            SwapEvent::Unlocked(_) | SwapEvent::Claimed(_) => {
                AGREEMENTS_OPEN.dec();
                let released = event.agreement_id().map(|id| store.get(id));
                if let Some(Ok(Some(agreement))) = released {
                    let settlement = agreement.status.to_string().to_lowercase();
                    TOKENS_RELEASED
                        .with_label_values(&[settlement.as_str()])
                        .inc_by(agreement.amount);
                }
            }
            SwapEvent::Transferred(_) | SwapEvent::Approved(_) => {}
        }
    }
}
