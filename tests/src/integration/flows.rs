//! # Integration Flows
//!
//! The view handler and the validation coordinator running on top of the
//! resolution service, with both in-memory and JSON-file stores.
//!
//! ## Flows Tested:
//!
//! 1. **View → Service → Preference store**: selection through the handler persists
//! 2. **Preference stream**: subscribers observe every write
//! 3. **Coordinator over file stores**: validation leaves the user's selection as it found it

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lb_01_ledger_resolution::adapters::{
        InMemoryLedgerRepository, InMemoryPreferenceStore, JsonFileLedgerRepository,
        JsonFilePreferenceStore,
    };
    use lb_01_ledger_resolution::{
        DefaultLedgerService, LedgerResolutionApi, LedgerSelectionHandler, NewLedger,
        PreferenceStore, StateDescription,
    };
    use lb_02_ledger_validation::{
        CoordinatorState, Recommendation, ValidationCoordinator, ValidationTarget,
    };
    use tempfile::TempDir;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn memory_service() -> (
        Arc<DefaultLedgerService<InMemoryLedgerRepository, InMemoryPreferenceStore>>,
        Arc<InMemoryPreferenceStore>,
    ) {
        let prefs = Arc::new(InMemoryPreferenceStore::new());
        let service = Arc::new(DefaultLedgerService::new(
            Arc::new(InMemoryLedgerRepository::new()),
            prefs.clone(),
        ));
        (service, prefs)
    }

    // =============================================================================
    // VIEW HANDLER
    // =============================================================================

    #[tokio::test]
    async fn test_view_selection_round_trip() {
        let (service, prefs) = memory_service();
        let view = LedgerSelectionHandler::new(service.clone(), "u1");

        let state = view.load().await;
        let default = state.current_ledger.clone().unwrap();
        assert!(default.is_default);
        assert_eq!(state.selected_ledger_id, None);
        assert!(!state.is_ledger_loading);
        assert!(state.is_coherent());

        let state = view.create_ledger(NewLedger::named("Travel")).await;
        assert_eq!(state.ledgers.len(), 2);
        assert_eq!(state.ledgers[0].id, default.id);
        let travel = state.ledgers[1].clone();

        let state = view.select_ledger(&travel.id).await;
        assert_eq!(state.selected_ledger_id.as_deref(), Some(travel.id.as_str()));
        assert_eq!(state.current_ledger.as_ref().map(|l| &l.id), Some(&travel.id));
        assert_eq!(prefs.current().selected_ledger_id, Some(travel.id.clone()));

        let state = view.select_ledger("bogus").await;
        assert!(state.last_error.is_some());
        assert_eq!(state.current_ledger.as_ref().map(|l| &l.id), Some(&travel.id));
        assert_eq!(prefs.current().selected_ledger_id, Some(travel.id.clone()));

        let state = view.delete_ledger(&travel.id).await;
        assert_eq!(state.current_ledger.map(|l| l.id), Some(default.id.clone()));
        assert_eq!(state.ledgers.len(), 1);
        assert_eq!(prefs.current().selected_ledger_id, Some(default.id));
    }

    #[tokio::test]
    async fn test_preference_stream_sees_healing() {
        let (service, prefs) = memory_service();
        let default = service.ensure_default_ledger("u1").await.unwrap();
        let mut rx = prefs.subscribe();

        prefs
            .update_selected_ledger_id(Some("stale".to_string()))
            .await
            .unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().selected_ledger_id.as_deref(), Some("stale"));

        service.resolve_effective_ledger("u1").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().selected_ledger_id, Some(default.id));
    }

    #[tokio::test]
    async fn test_two_views_share_one_store() {
        let (service, _) = memory_service();
        let first = LedgerSelectionHandler::new(service.clone(), "u1");
        let second = LedgerSelectionHandler::new(service.clone(), "u1");

        first.load().await;
        let travel = service
            .create_ledger("u1", NewLedger::named("Travel"))
            .await
            .unwrap();
        first.select_ledger(&travel.id).await;

        let state = second.load().await;
        assert_eq!(state.current_ledger.map(|l| l.id), Some(travel.id));
    }

    // =============================================================================
    // FILE STORES
    // =============================================================================

    #[tokio::test]
    async fn test_selection_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let travel_id = {
            let service = DefaultLedgerService::new(
                Arc::new(JsonFileLedgerRepository::new(dir.path())),
                Arc::new(JsonFilePreferenceStore::open(dir.path()).unwrap()),
            );
            service.ensure_default_ledger("u1").await.unwrap();
            let travel = service
                .create_ledger("u1", NewLedger::named("Travel"))
                .await
                .unwrap();
            service.select_ledger("u1", &travel.id).await.unwrap();
            travel.id
        };

        let reopened = DefaultLedgerService::new(
            Arc::new(JsonFileLedgerRepository::new(dir.path())),
            Arc::new(JsonFilePreferenceStore::open(dir.path()).unwrap()),
        );
        let effective = reopened.resolve_effective_ledger("u1").await.unwrap();
        assert_eq!(effective.ledger.id, travel_id);
        assert!(reopened.check_consistency("u1").await.unwrap().violations.is_empty());
    }

    #[tokio::test]
    async fn test_quick_validation_over_file_stores() {
        let dir = TempDir::new().unwrap();
        let prefs = Arc::new(JsonFilePreferenceStore::open(dir.path()).unwrap());
        let service = Arc::new(DefaultLedgerService::new(
            Arc::new(JsonFileLedgerRepository::new(dir.path())),
            prefs.clone(),
        ));
        service.ensure_default_ledger("u1").await.unwrap();
        let travel = service
            .create_ledger("u1", NewLedger::named("Travel"))
            .await
            .unwrap();
        service.select_ledger("u1", &travel.id).await.unwrap();

        let coordinator =
            ValidationCoordinator::new(ValidationTarget::new("u1", service.clone(), prefs.clone()));
        let report = coordinator.run_quick().await;

        assert!(report.success(), "{}", report.render_text());
        assert_eq!(report.recommendation, Recommendation::ReadyForRelease);
        assert!(report.preference_restored);
        assert_eq!(
            prefs.get_ui_preferences().await.unwrap().selected_ledger_id,
            Some(travel.id)
        );
        assert!(matches!(coordinator.state(), CoordinatorState::Completed(_)));
    }

    #[tokio::test]
    async fn test_comprehensive_validation_reports_all_phases() {
        let (service, prefs) = memory_service();
        service.ensure_default_ledger("u1").await.unwrap();
        service
            .create_ledger("u1", NewLedger::named("Travel"))
            .await
            .unwrap();

        let report = ValidationCoordinator::new(ValidationTarget::new("u1", service, prefs))
            .run_comprehensive()
            .await;

        assert_eq!(report.phases.len(), 6);
        assert!(report.summaries.default_ledger.is_some());
        assert!(report.summaries.integration.is_some());
        assert!(report.preference_restored);
    }
}
