//! # Resolution Properties
//!
//! Guarantees of the default ledger policy, checked through
//! `LedgerResolutionApi` against the in-memory stores.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lb_01_ledger_resolution::adapters::{InMemoryLedgerRepository, InMemoryPreferenceStore};
    use lb_01_ledger_resolution::{
        ConsistencyViolation, DefaultLedgerService, LedgerResolutionApi, NewLedger,
        PreferenceStore, ResolutionError, SelectionSource, DEFAULT_LEDGER_NAME,
    };
    use proptest::prelude::*;
    use shared_types::{Ledger, UiPreferences};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Service = DefaultLedgerService<InMemoryLedgerRepository, InMemoryPreferenceStore>;

    fn setup() -> (
        Arc<Service>,
        Arc<InMemoryLedgerRepository>,
        Arc<InMemoryPreferenceStore>,
    ) {
        let ledgers = Arc::new(InMemoryLedgerRepository::new());
        let prefs = Arc::new(InMemoryPreferenceStore::new());
        let service = Arc::new(DefaultLedgerService::new(ledgers.clone(), prefs.clone()));
        (service, ledgers, prefs)
    }

    // =============================================================================
    // FIRST LAUNCH
    // =============================================================================

    #[tokio::test]
    async fn test_first_launch_scenario() {
        let (service, _, prefs) = setup();

        let first = service.ensure_default_ledger("u1").await.unwrap();
        assert_eq!(first.name, DEFAULT_LEDGER_NAME);
        assert!(first.is_default);
        assert_eq!(first.color, "#3A7AFE");
        assert_eq!(first.icon, "book");
        assert_eq!(first.user_id, "u1");

        let second = service.ensure_default_ledger("u1").await.unwrap();
        assert_eq!(second.id, first.id);

        prefs
            .update_selected_ledger_id(Some("not-a-real-id".to_string()))
            .await
            .unwrap();
        let effective = service.resolve_effective_ledger("u1").await.unwrap();
        assert_eq!(effective.ledger.id, first.id);

        let stored = prefs.get_ui_preferences().await.unwrap();
        assert_eq!(stored.selected_ledger_id, Some(first.id));
    }

    // =============================================================================
    // IDEMPOTENT CREATION
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ensure_creates_one_default() {
        let (service, ledgers, _) = setup();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.ensure_default_ledger("u1").await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);

        let defaults = ledgers.snapshot().iter().filter(|l| l.is_default).count();
        assert_eq!(defaults, 1);
    }

    // =============================================================================
    // DISPLAY ORDER
    // =============================================================================

    proptest! {
        #[test]
        fn prop_default_listed_first(count in 1usize..6, pick in any::<prop::sample::Index>()) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let (service, _, _) = setup();
                service.ensure_default_ledger("u1").await.unwrap();
                let mut created = Vec::new();
                for i in 0..count {
                    let ledger = service
                        .create_ledger("u1", NewLedger::named(format!("Book {}", i)))
                        .await
                        .unwrap();
                    created.push(ledger);
                }

                let chosen = pick.get(&created).id.clone();
                service.set_default_ledger("u1", &chosen).await.unwrap();

                let listed = service.list_ledgers("u1").await.unwrap();
                assert_eq!(listed[0].id, chosen);
                assert_eq!(listed.iter().filter(|l| l.is_default).count(), 1);
            });
        }
    }

    // =============================================================================
    // SELF-HEALING
    // =============================================================================

    #[tokio::test]
    async fn test_dangling_preference_heals_to_default() {
        let (service, _, prefs) = setup();
        let default = service.ensure_default_ledger("u1").await.unwrap();
        prefs
            .update_selected_ledger_id(Some("deleted-elsewhere".to_string()))
            .await
            .unwrap();

        let effective = service.resolve_effective_ledger("u1").await.unwrap();

        assert_eq!(effective.ledger.id, default.id);
        assert_eq!(
            effective.source,
            SelectionSource::HealedInvalidReference {
                stale_id: "deleted-elsewhere".into()
            }
        );
        assert_eq!(prefs.current().selected_ledger_id, Some(default.id));
    }

    #[tokio::test]
    async fn test_selection_of_other_users_ledger_heals() {
        let (service, ledgers, prefs) = setup();
        let theirs = Ledger::new("u2", "Theirs").with_default(true);
        ledgers.insert_raw(theirs.clone());
        prefs
            .update_selected_ledger_id(Some(theirs.id.clone()))
            .await
            .unwrap();

        let effective = service.resolve_effective_ledger("u1").await.unwrap();

        assert_eq!(effective.ledger.user_id, "u1");
        assert!(effective.was_healed());
    }

    // =============================================================================
    // NULL BOOTSTRAP
    // =============================================================================

    #[tokio::test]
    async fn test_null_preference_bootstraps_default() {
        let (service, ledgers, prefs) = setup();

        let effective = service.resolve_effective_ledger("u1").await.unwrap();

        assert_eq!(effective.source, SelectionSource::DefaultForEmptySelection);
        assert!(effective.ledger.is_default);
        assert_eq!(ledgers.snapshot().len(), 1);
        assert_eq!(prefs.current(), UiPreferences::default());
    }

    // =============================================================================
    // DELETION FALLBACK
    // =============================================================================

    #[tokio::test]
    async fn test_deleting_selected_ledger_repoints_to_default() {
        let (service, _, prefs) = setup();
        let default = service.ensure_default_ledger("u1").await.unwrap();
        let travel = service
            .create_ledger("u1", NewLedger::named("Travel"))
            .await
            .unwrap();
        service.select_ledger("u1", &travel.id).await.unwrap();

        service.delete_ledger("u1", &travel.id).await.unwrap();

        assert_eq!(prefs.current().selected_ledger_id, Some(default.id.clone()));
        let effective = service.resolve_effective_ledger("u1").await.unwrap();
        assert_eq!(effective.ledger.id, default.id);
        assert_eq!(effective.source, SelectionSource::Selected);
    }

    #[tokio::test]
    async fn test_deleting_selected_default_promotes_survivor() {
        let (service, _, prefs) = setup();
        let default = service.ensure_default_ledger("u1").await.unwrap();
        let travel = service
            .create_ledger("u1", NewLedger::named("Travel"))
            .await
            .unwrap();
        service.select_ledger("u1", &default.id).await.unwrap();

        service.delete_ledger("u1", &default.id).await.unwrap();

        let promoted = service.get_default_ledger("u1").await.unwrap();
        assert_eq!(promoted.id, travel.id);
        assert_eq!(prefs.current().selected_ledger_id, Some(travel.id));
    }

    #[tokio::test]
    async fn test_last_ledger_cannot_be_deleted() {
        let (service, _, _) = setup();
        let only = service.ensure_default_ledger("u1").await.unwrap();

        let result = service.delete_ledger("u1", &only.id).await;

        assert!(matches!(
            result,
            Err(ResolutionError::DefaultLedgerRequired { .. })
        ));
    }

    // =============================================================================
    // UNIQUENESS ALARM
    // =============================================================================

    #[tokio::test]
    async fn test_two_defaults_are_reported_not_merged() {
        let (service, ledgers, _) = setup();
        ledgers.insert_raw(Ledger::new("u1", "One").with_id("a").with_default(true));
        ledgers.insert_raw(Ledger::new("u1", "Two").with_id("b").with_default(true));

        let report = service.check_consistency("u1").await.unwrap();
        assert!(report.has_multiple_defaults());
        assert!(!report.is_consistent());

        let result = service.get_default_ledger("u1").await;
        match result {
            Err(ResolutionError::DataConsistency(violations)) => {
                assert!(violations.contains(&ConsistencyViolation::MultipleDefaults {
                    ledger_ids: vec!["a".into(), "b".into()],
                }));
            }
            other => panic!("expected DataConsistency, got {:?}", other),
        }

        let defaults = ledgers.snapshot().iter().filter(|l| l.is_default).count();
        assert_eq!(defaults, 2);
    }
}
