//! Serialization utilities for simulation state.

use crate::world::SimulationSnapshot;

/// Serialize a snapshot to JSON bytes.
pub fn snapshot_to_json(snapshot: &SimulationSnapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(snapshot)
}

/// Serialize a snapshot to a JSON string.
pub fn snapshot_to_json_string(snapshot: &SimulationSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

/// Deserialize a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> Result<SimulationSnapshot, serde_json::Error> {
    serde_json::from_slice(data)
}

/// Deserialize a snapshot from a JSON string.
pub fn snapshot_from_json_string(data: &str) -> Result<SimulationSnapshot, serde_json::Error> {
    serde_json::from_str(data)
}
