//! Participant repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ParticipantRecord;

/// Repository interface for participant record persistence.
///
/// Implementations must keep identifiers unique and make each `put` atomic:
/// a record is either fully replaced or left untouched.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Get a participant by identifier.
    async fn get(&self, identifier: &str) -> DomainResult<Option<ParticipantRecord>>;

    /// Create or replace a participant record.
    async fn put(&self, record: &ParticipantRecord) -> DomainResult<()>;

    /// All participants, ordered by identifier.
    async fn list_all(&self) -> DomainResult<Vec<ParticipantRecord>>;

    /// Set every record's change counter back to zero.
    ///
    /// Returns the number of records whose counter was non-zero.
    async fn reset_change_counters(&self) -> DomainResult<u64>;

    /// Number of stored participants.
    async fn count(&self) -> DomainResult<u64>;
}
