use crate::domain::{Agreement, AgreementId, StoreError};
use crate::ports::AgreementStore;
use std::collections::BTreeMap;

/// In-memory implementation of AgreementStore.
///
/// Records are kept as serialized JSON, the same layout a durable backend
/// would hold. Cloning gives an independent working copy.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAgreementStore {
    records: BTreeMap<AgreementId, Vec<u8>>,
}

impl InMemoryAgreementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw persisted record.
    pub fn raw(&self, id: &AgreementId) -> Option<&[u8]> {
        self.records.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AgreementStore for InMemoryAgreementStore {
    fn get(&self, id: &AgreementId) -> Result<Option<Agreement>, StoreError> {
        match self.records.get(id) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, id: &AgreementId, agreement: &Agreement) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(agreement)?;
        self.records.insert(id.clone(), bytes);
        Ok(())
    }

    fn contains(&self, id: &AgreementId) -> Result<bool, StoreError> {
        Ok(self.records.contains_key(id))
    }
}
