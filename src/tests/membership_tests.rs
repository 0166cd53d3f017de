#[cfg(test)]
mod tests {
    use crate::models::{ServiceError, ROLE_MEMBER, ROLE_OWNER};
    use crate::services::{directory, identity, membership};
    use crate::storage::{KeyLockRegistry, Store, TEAMS};
    use crate::tests::support::{register_user, BrokenTeamScanStore, TestStore};

    #[test]
    fn owner_is_sole_member_with_owner_role_after_creation() {
        let ts = TestStore::new();

        let ana = register_user(&ts.store, "Ana");
        let team = directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();

        assert_eq!(team.owner_id, ana.id);
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.member(&ana.id).unwrap().role, ROLE_OWNER);
        assert!(team.pending_requests.is_empty());
        assert_eq!(team.roles, vec!["Owner", "Manager", "Member", "Assistant"]);
    }

    #[test]
    fn create_team_rejects_empty_fields() {
        let ts = TestStore::new();
        let ana = register_user(&ts.store, "Ana");

        let no_name = directory::create_team(&ts.store, &ana, "  ", "Acme", None);
        let no_company = directory::create_team(&ts.store, &ana, "Rocket", "", None);

        assert!(matches!(no_name, Err(ServiceError::InvalidInput(_))));
        assert!(matches!(no_company, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn create_team_rejects_user_already_on_a_roster() {
        let ts = TestStore::new();
        let ana = register_user(&ts.store, "Ana");

        directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();
        let second = directory::create_team(&ts.store, &ana, "Comet", "Acme", None);

        assert!(matches!(second, Err(ServiceError::AlreadyMember)));
    }

    #[test]
    fn create_team_surfaces_store_failure_instead_of_proceeding() {
        let bs = BrokenTeamScanStore::new();
        let ana = identity::register(bs.inner(), "Ana", "ana@example.com", "secret99").unwrap();

        let result = directory::create_team(&bs, &ana, "Rocket", "Acme", None);

        assert!(matches!(result, Err(ServiceError::StoreUnavailable)));

        // Nothing was persisted on the failing path.
        assert!(bs.inner().scan(TEAMS).unwrap().is_empty());
    }

    #[test]
    fn join_request_surfaces_store_failure() {
        let bs = BrokenTeamScanStore::new();
        let locks = KeyLockRegistry::new();
        let bo = identity::register(bs.inner(), "Bo", "bo@example.com", "secret99").unwrap();

        let result = membership::request_to_join(&bs, &locks, "team-1", &bo);

        assert!(matches!(result, Err(ServiceError::StoreUnavailable)));
    }

    #[test]
    fn search_matches_name_and_company_case_insensitively() {
        let ts = TestStore::new();
        let ana = register_user(&ts.store, "Ana");
        let bo = register_user(&ts.store, "Bo");

        directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();
        directory::create_team(&ts.store, &bo, "Comet", "Globex", None).unwrap();

        assert_eq!(directory::search(&ts.store, "rock").unwrap().len(), 1);
        assert_eq!(directory::search(&ts.store, "GLOBEX").unwrap().len(), 1);
        assert_eq!(directory::search(&ts.store, "o").unwrap().len(), 2);
        assert!(directory::search(&ts.store, "zzz").unwrap().is_empty());
    }

    #[test]
    fn accepting_a_request_moves_user_onto_the_roster() {
        let ts = TestStore::new();
        let locks = KeyLockRegistry::new();

        let ana = register_user(&ts.store, "Ana");
        let bo = register_user(&ts.store, "Bo");
        let team = directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();

        membership::request_to_join(&ts.store, &locks, &team.id, &bo).unwrap();
        let resolved =
            membership::resolve(&ts.store, &locks, &team.id, &ana.id, &bo.id, true).unwrap();

        assert_eq!(resolved.members.len(), 2);
        assert_eq!(resolved.member(&bo.id).unwrap().role, ROLE_MEMBER);
        assert!(resolved.pending_requests.is_empty());

        // The accepted member is discoverable through the directory.
        let found = directory::find_by_member(&ts.store, &bo.id).unwrap();
        assert_eq!(found.id, team.id);
    }

    #[test]
    fn rejecting_a_request_leaves_the_roster_unchanged() {
        let ts = TestStore::new();
        let locks = KeyLockRegistry::new();

        let ana = register_user(&ts.store, "Ana");
        let bo = register_user(&ts.store, "Bo");
        let team = directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();

        membership::request_to_join(&ts.store, &locks, &team.id, &bo).unwrap();
        let resolved =
            membership::resolve(&ts.store, &locks, &team.id, &ana.id, &bo.id, false).unwrap();

        assert_eq!(resolved.members.len(), 1);
        assert!(resolved.pending_requests.is_empty());
    }

    #[test]
    fn second_resolution_of_the_same_request_fails() {
        let ts = TestStore::new();
        let locks = KeyLockRegistry::new();

        let ana = register_user(&ts.store, "Ana");
        let bo = register_user(&ts.store, "Bo");
        let team = directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();

        membership::request_to_join(&ts.store, &locks, &team.id, &bo).unwrap();
        membership::resolve(&ts.store, &locks, &team.id, &ana.id, &bo.id, true).unwrap();
        let again = membership::resolve(&ts.store, &locks, &team.id, &ana.id, &bo.id, true);

        assert!(matches!(again, Err(ServiceError::RequestNotFound)));
    }

    #[test]
    fn duplicate_pending_request_is_rejected() {
        let ts = TestStore::new();
        let locks = KeyLockRegistry::new();

        let ana = register_user(&ts.store, "Ana");
        let bo = register_user(&ts.store, "Bo");
        let team = directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();

        membership::request_to_join(&ts.store, &locks, &team.id, &bo).unwrap();
        let again = membership::request_to_join(&ts.store, &locks, &team.id, &bo);

        assert!(matches!(again, Err(ServiceError::AlreadyRequested)));
    }

    #[test]
    fn member_cannot_request_to_join_again() {
        let ts = TestStore::new();
        let locks = KeyLockRegistry::new();

        let ana = register_user(&ts.store, "Ana");
        let bo = register_user(&ts.store, "Bo");
        let team = directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();

        membership::request_to_join(&ts.store, &locks, &team.id, &bo).unwrap();
        membership::resolve(&ts.store, &locks, &team.id, &ana.id, &bo.id, true).unwrap();

        let again = membership::request_to_join(&ts.store, &locks, &team.id, &bo);

        assert!(matches!(again, Err(ServiceError::AlreadyMember)));
    }

    #[test]
    fn only_the_owner_may_resolve_requests() {
        let ts = TestStore::new();
        let locks = KeyLockRegistry::new();

        let ana = register_user(&ts.store, "Ana");
        let bo = register_user(&ts.store, "Bo");
        let cam = register_user(&ts.store, "Cam");
        let team = directory::create_team(&ts.store, &ana, "Rocket", "Acme", None).unwrap();

        membership::request_to_join(&ts.store, &locks, &team.id, &bo).unwrap();
        let result = membership::resolve(&ts.store, &locks, &team.id, &cam.id, &bo.id, true);

        assert!(matches!(result, Err(ServiceError::Forbidden)));

        // The request survives the refused resolution.
        let reloaded = directory::load_team(&ts.store, &team.id).unwrap();
        assert!(reloaded.has_pending_request(&bo.id));
    }

    #[test]
    fn resolving_on_a_missing_team_fails() {
        let ts = TestStore::new();
        let locks = KeyLockRegistry::new();
        let ana = register_user(&ts.store, "Ana");

        let result = membership::resolve(&ts.store, &locks, "no-such-team", &ana.id, "x", true);

        assert!(matches!(result, Err(ServiceError::TeamNotFound)));
    }
}
