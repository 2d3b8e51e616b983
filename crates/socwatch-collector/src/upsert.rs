//! Lookup-then-write deduplication of collection rows.

use socwatch_core::NormalizedRecord;
use socwatch_db::DbError;

use crate::store::CollectionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Running totals for one profile's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertCounts {
    pub inserted: u32,
    pub updated: u32,
}

impl UpsertCounts {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }
}

/// Writes `record`, overwriting the existing row for the same
/// `(profile_username, post_id)` when there is one.
///
/// Records without a post id (profile-only snapshots, or posts the scraper
/// returned with no identity) are always inserted.
///
/// # Errors
///
/// Returns [`DbError`] if the lookup or the write fails.
pub async fn upsert_record<S>(store: &S, record: &NormalizedRecord) -> Result<UpsertOutcome, DbError>
where
    S: CollectionStore + ?Sized,
{
    let Some(post_id) = record.post_id() else {
        store.insert_collection(record).await?;
        return Ok(UpsertOutcome::Inserted);
    };

    match store
        .find_collection(&record.profile_username, post_id)
        .await?
    {
        Some(id) => {
            store.update_collection(id, record).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            store.insert_collection(record).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_track_each_outcome() {
        let mut counts = UpsertCounts::default();
        counts.record(UpsertOutcome::Inserted);
        counts.record(UpsertOutcome::Inserted);
        counts.record(UpsertOutcome::Updated);
        assert_eq!(
            counts,
            UpsertCounts {
                inserted: 2,
                updated: 1
            }
        );
    }
}
