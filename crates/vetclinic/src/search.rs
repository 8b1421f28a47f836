//! Phonetic owner search.
//!
//! Resolves a free-text last-name query against the phonetic index and
//! classifies the result set three ways, so callers know whether to show
//! a detail view, a disambiguation list, or a "not found" message.

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::model::Owner;
use crate::storage::Storage;

/// The classified result of an owner search.
///
/// `NotFound` is a normal outcome, not an error: persistence failures
/// surface as `Err`, an empty match set does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No owner matched the query.
    NotFound,
    /// Exactly one owner matched; callers go straight to its detail view.
    Single(Owner),
    /// Two or more owners matched; callers disambiguate. Order follows
    /// the index and is not contractually significant.
    Multiple(Vec<Owner>),
}

impl SearchOutcome {
    /// Number of owners behind this outcome.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::NotFound => 0,
            Self::Single(_) => 1,
            Self::Multiple(owners) => owners.len(),
        }
    }

    /// True when no owner matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Search owners by a last-name query, sound-alike tolerant.
///
/// A blank query is an explicit broad browse: every owner is listed and
/// the phonetic index is bypassed. Otherwise the query is encoded and
/// matched against the index by exact code; owners referenced by more
/// than one entry appear once.
///
/// # Errors
///
/// Returns an error if a storage operation fails.
pub fn find_owners(storage: &Storage, last_name: &str) -> Result<SearchOutcome> {
    let query = last_name.trim();
    let matches = if query.is_empty() {
        storage.list_owners()?
    } else {
        let code = metafone::encode(query);
        debug!("Searching owners: {:?} -> code {:?}", query, code);
        let mut seen = HashSet::new();
        let mut owners = Vec::new();
        for entry in storage.find_by_code(&code)? {
            if !seen.insert(entry.owner_id) {
                continue;
            }
            if let Some(owner) = storage.get_owner(entry.owner_id)? {
                owners.push(owner);
            }
        }
        owners
    };

    Ok(classify(matches))
}

/// Fold a match list into the three-way outcome.
fn classify(mut matches: Vec<Owner>) -> SearchOutcome {
    match matches.len() {
        0 => SearchOutcome::NotFound,
        1 => SearchOutcome::Single(matches.remove(0)),
        _ => SearchOutcome::Multiple(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Owner, Pet};
    use chrono::NaiveDate;

    fn owner(first: &str, last: &str) -> Owner {
        Owner::new(first, last, "Rua das Flores 12", "Campinas", "1932447700")
    }

    fn seeded_storage() -> Storage {
        let mut storage = Storage::open_in_memory().unwrap();
        storage.create_owner(&owner("João", "Silva")).unwrap();
        storage.create_owner(&owner("Maria", "Sousa")).unwrap();
        storage.create_owner(&owner("Carlos", "Souza")).unwrap();
        storage
    }

    #[test]
    fn test_single_match_navigates_to_owner() {
        let storage = seeded_storage();
        let outcome = find_owners(&storage, "Silva").unwrap();

        match outcome {
            SearchOutcome::Single(found) => {
                assert_eq!(found.first_name, "João");
                assert_eq!(found.last_name, "Silva");
            }
            other => panic!("expected Single, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_matches_for_equivalent_surnames() {
        let storage = seeded_storage();
        let outcome = find_owners(&storage, "Souza").unwrap();

        match outcome {
            SearchOutcome::Multiple(owners) => {
                // set equality: order is not part of the contract
                let mut last_names: Vec<_> =
                    owners.iter().map(|o| o.last_name.as_str()).collect();
                last_names.sort_unstable();
                assert_eq!(last_names, vec!["Sousa", "Souza"]);
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_spelling_variant_finds_the_same_owners() {
        let storage = seeded_storage();
        assert_eq!(
            find_owners(&storage, "Sousa").unwrap().len(),
            find_owners(&storage, "Souza").unwrap().len()
        );
    }

    #[test]
    fn test_no_match_is_not_found() {
        let storage = seeded_storage();
        let outcome = find_owners(&storage, "Xyzabc").unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_blank_query_lists_all_owners() {
        let storage = seeded_storage();
        let outcome = find_owners(&storage, "").unwrap();
        assert_eq!(outcome.len(), 3);

        let padded = find_owners(&storage, "   ").unwrap();
        assert_eq!(padded.len(), 3);
    }

    #[test]
    fn test_blank_query_on_empty_database() {
        let storage = Storage::open_in_memory().unwrap();
        let outcome = find_owners(&storage, "").unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound);
    }

    #[test]
    fn test_owner_matched_by_first_name_entry() {
        // both name fields feed the index, so a query can hit a first name
        let mut storage = Storage::open_in_memory().unwrap();
        storage.create_owner(&owner("Silva", "Trindade")).unwrap();

        let outcome = find_owners(&storage, "Silva").unwrap();
        assert_eq!(outcome.len(), 1);
    }

    #[test]
    fn test_owner_with_matching_first_and_last_name_appears_once() {
        let mut storage = Storage::open_in_memory().unwrap();
        storage.create_owner(&owner("Sousa", "Souza")).unwrap();

        let outcome = find_owners(&storage, "Sousa").unwrap();
        assert!(matches!(outcome, SearchOutcome::Single(_)));
    }

    #[test]
    fn test_deleted_owner_stops_matching() {
        let mut storage = seeded_storage();
        let silva = match find_owners(&storage, "Silva").unwrap() {
            SearchOutcome::Single(o) => o,
            other => panic!("expected Single, got {other:?}"),
        };

        storage.delete_owner(silva.id.unwrap()).unwrap();
        assert_eq!(find_owners(&storage, "Silva").unwrap(), SearchOutcome::NotFound);
    }

    #[test]
    fn test_owner_with_pets_survives_rejected_delete_and_still_matches() {
        let mut storage = seeded_storage();
        let silva = match find_owners(&storage, "Silva").unwrap() {
            SearchOutcome::Single(o) => o,
            other => panic!("expected Single, got {other:?}"),
        };
        let id = silva.id.unwrap();
        storage
            .create_pet(&Pet::new(
                id,
                "Rex",
                "dog",
                NaiveDate::from_ymd_opt(2019, 5, 4).unwrap(),
            ))
            .unwrap();

        assert!(storage.delete_owner(id).unwrap_err().is_owner_has_pets());
        assert!(matches!(
            find_owners(&storage, "Silva").unwrap(),
            SearchOutcome::Single(_)
        ));
    }

    #[test]
    fn test_outcome_len() {
        assert_eq!(SearchOutcome::NotFound.len(), 0);
        assert_eq!(SearchOutcome::Single(owner("João", "Silva")).len(), 1);
        assert_eq!(
            SearchOutcome::Multiple(vec![owner("A", "B"), owner("C", "D")]).len(),
            2
        );
    }
}
