//! The storage seam of the light client. Every read and write the facade
//! performs goes through [`ClientStore`]; hosts plug in their own backing
//! (a contract store, a database) and tests use [`InMemoryStore`].

use std::collections::BTreeMap;

use tm_light_client_types::proto::Height;

/// Key of the encoded client state.
#[must_use]
pub fn client_state_key(client_id: &str) -> String {
    format!("clients/{client_id}/clientState")
}

/// Key of the encoded consensus state at one height.
#[must_use]
pub fn consensus_state_key(client_id: &str, height: Height) -> String {
    format!(
        "clients/{client_id}/consensusStates/{}-{}",
        height.revision_number, height.revision_height
    )
}

/// Storage interface the facade runs against. All values are prost-encoded
/// blobs; the facade owns their interpretation.
pub trait ClientStore {
    /// Reads the encoded client state.
    fn client_state(&self, client_id: &str) -> Option<Vec<u8>>;

    /// Writes the encoded client state.
    fn set_client_state(&mut self, client_id: &str, bytes: Vec<u8>);

    /// Reads the encoded consensus state at a height.
    fn consensus_state(&self, client_id: &str, height: Height) -> Option<Vec<u8>>;

    /// Writes the encoded consensus state at a height.
    fn set_consensus_state(&mut self, client_id: &str, height: Height, bytes: Vec<u8>);

    /// Reads the host height and host time (unix nanoseconds) a consensus
    /// state was stored at, for delay-period enforcement.
    fn processed(&self, client_id: &str, height: Height) -> Option<(u64, u128)>;

    /// Records the host height and host time a consensus state was
    /// stored at.
    fn set_processed(
        &mut self,
        client_id: &str,
        height: Height,
        host_height: u64,
        host_time_nanos: u128,
    );
}

/// A map-backed store for tests and single-process embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
    processed: BTreeMap<String, (u64, u128)>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for InMemoryStore {
    fn client_state(&self, client_id: &str) -> Option<Vec<u8>> {
        self.entries.get(&client_state_key(client_id)).cloned()
    }

    fn set_client_state(&mut self, client_id: &str, bytes: Vec<u8>) {
        self.entries.insert(client_state_key(client_id), bytes);
    }

    fn consensus_state(&self, client_id: &str, height: Height) -> Option<Vec<u8>> {
        self.entries
            .get(&consensus_state_key(client_id, height))
            .cloned()
    }

    fn set_consensus_state(&mut self, client_id: &str, height: Height, bytes: Vec<u8>) {
        self.entries
            .insert(consensus_state_key(client_id, height), bytes);
    }

    fn processed(&self, client_id: &str, height: Height) -> Option<(u64, u128)> {
        self.processed
            .get(&consensus_state_key(client_id, height))
            .copied()
    }

    fn set_processed(
        &mut self,
        client_id: &str,
        height: Height,
        host_height: u64,
        host_time_nanos: u128,
    ) {
        self.processed.insert(
            consensus_state_key(client_id, height),
            (host_height, host_time_nanos),
        );
    }
}
