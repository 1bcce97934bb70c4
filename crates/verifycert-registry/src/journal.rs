//! # Event Journal: Hash-Chained Event Log
//!
//! Every committed registry state change appends an entry whose hash
//! chains to the previous entry's hash. The first entry chains from the
//! all-zero hash. Editing, dropping, or reordering any entry breaks the
//! chain, which [`EventJournal::verify()`] reports.
//!
//! ```text
//! entry_hash = SHA-256(JCS({ sequence, event, recorded_at, previous_hash }))
//! ```

use serde::{Deserialize, Serialize};

use verifycert_core::{sha256_hex, CanonicalBytes, CanonicalizationError, Timestamp, ZERO_HASH_HEX};

use crate::event::RegistryEvent;

/// One journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 1.
    pub sequence: u64,
    /// The committed event.
    pub event: RegistryEvent,
    /// When the event was committed.
    pub recorded_at: Timestamp,
    /// Hash of the preceding entry (zero hash for the first).
    pub previous_hash: String,
    /// Hash of this entry.
    pub entry_hash: String,
}

#[derive(Serialize)]
struct EntryPreimage<'a> {
    sequence: u64,
    event: &'a RegistryEvent,
    recorded_at: &'a Timestamp,
    previous_hash: &'a str,
}

impl JournalEntry {
    fn compute_hash(
        sequence: u64,
        event: &RegistryEvent,
        recorded_at: &Timestamp,
        previous_hash: &str,
    ) -> Result<String, CanonicalizationError> {
        let preimage = EntryPreimage {
            sequence,
            event,
            recorded_at,
            previous_hash,
        };
        Ok(sha256_hex(&CanonicalBytes::new(&preimage)?))
    }

    /// Recompute this entry's hash from its contents.
    pub fn recompute_hash(&self) -> Result<String, CanonicalizationError> {
        Self::compute_hash(
            self.sequence,
            &self.event,
            &self.recorded_at,
            &self.previous_hash,
        )
    }
}

/// Result of a chain integrity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainIntegrity {
    pub total_entries: usize,
    pub broken_links: usize,
    pub valid: bool,
}

/// Append-only, hash-chained event log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventJournal {
    entries: Vec<JournalEntry>,
}

impl EventJournal {
    /// An empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap previously recorded entries without checking them.
    ///
    /// Call [`verify()`](Self::verify) before trusting the result.
    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }

    /// Append an event, chaining it to the current head.
    ///
    /// Nothing is appended if hashing fails.
    pub fn append(
        &mut self,
        event: RegistryEvent,
        recorded_at: Timestamp,
    ) -> Result<&JournalEntry, CanonicalizationError> {
        let sequence = self.entries.len() as u64 + 1;
        let previous_hash = self.head_hash().to_string();
        let entry_hash = JournalEntry::compute_hash(sequence, &event, &recorded_at, &previous_hash)?;
        self.entries.push(JournalEntry {
            sequence,
            event,
            recorded_at,
            previous_hash,
            entry_hash,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Hash of the latest entry, or the zero hash when empty.
    pub fn head_hash(&self) -> &str {
        self.entries
            .last()
            .map(|e| e.entry_hash.as_str())
            .unwrap_or(ZERO_HASH_HEX)
    }

    /// All entries in commit order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries with a sequence number strictly greater than `sequence`.
    pub fn since(&self, sequence: u64) -> &[JournalEntry] {
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk the chain and count broken links.
    ///
    /// A link is broken when an entry's sequence is out of place, its
    /// `previous_hash` is not the preceding entry's hash, or its
    /// `entry_hash` does not recompute from its contents.
    pub fn verify(&self) -> ChainIntegrity {
        let mut broken_links = 0;
        let mut expected_prev: &str = ZERO_HASH_HEX;

        for (index, entry) in self.entries.iter().enumerate() {
            let in_place = entry.sequence == index as u64 + 1;
            let linked = entry.previous_hash == expected_prev;
            let intact = entry
                .recompute_hash()
                .map(|h| h == entry.entry_hash)
                .unwrap_or(false);
            if !(in_place && linked && intact) {
                broken_links += 1;
            }
            expected_prev = entry.entry_hash.as_str();
        }

        ChainIntegrity {
            total_entries: self.entries.len(),
            broken_links,
            valid: broken_links == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifycert_core::{AccountId, CertificateId};

    fn ts() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn issued(id: u64) -> RegistryEvent {
        RegistryEvent::CertificateIssued {
            id: CertificateId::new(id),
            issuer: AccountId::from_bytes([1u8; 20]),
            recipient: AccountId::from_bytes([2u8; 20]),
            digest: format!("{id:064x}"),
        }
    }

    fn journal_of(n: u64) -> EventJournal {
        let mut journal = EventJournal::new();
        for id in 1..=n {
            journal.append(issued(id), ts()).unwrap();
        }
        journal
    }

    #[test]
    fn first_entry_chains_from_zero_hash() {
        let journal = journal_of(1);
        let first = &journal.entries()[0];
        assert_eq!(first.sequence, 1);
        assert_eq!(first.previous_hash, ZERO_HASH_HEX);
        assert_eq!(journal.head_hash(), first.entry_hash);
    }

    #[test]
    fn entries_chain_to_predecessor() {
        let journal = journal_of(3);
        let entries = journal.entries();
        assert_eq!(entries[1].previous_hash, entries[0].entry_hash);
        assert_eq!(entries[2].previous_hash, entries[1].entry_hash);
        assert!(journal.verify().valid);
    }

    #[test]
    fn empty_journal_verifies() {
        let integrity = EventJournal::new().verify();
        assert_eq!(integrity.total_entries, 0);
        assert!(integrity.valid);
    }

    #[test]
    fn tampered_event_is_detected() {
        let mut entries = journal_of(3).entries().to_vec();
        entries[1].event = RegistryEvent::CertificateRevoked {
            id: CertificateId::new(2),
        };
        let integrity = EventJournal::from_entries(entries).verify();
        assert!(!integrity.valid);
        assert_eq!(integrity.broken_links, 1);
    }

    #[test]
    fn dropped_entry_is_detected() {
        let mut entries = journal_of(3).entries().to_vec();
        entries.remove(1);
        assert!(!EventJournal::from_entries(entries).verify().valid);
    }

    #[test]
    fn since_returns_later_entries() {
        let journal = journal_of(4);
        assert_eq!(journal.since(0).len(), 4);
        assert_eq!(journal.since(2)[0].sequence, 3);
        assert!(journal.since(4).is_empty());
        assert!(journal.since(u64::MAX).is_empty());
    }
}
