//! # Rotation Flow
//!
//! Typed API, real ECDSA verification, in-memory state:
//!
//! ```text
//! setup(h=10) → register(h=10) → register(h=11) → setNext(h=11)
//!      → promotion(h=12) → dapp_schedule(h=12..)
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{admin, node1, nodes, setup_request, Identity};
    use ir_02_verifier_rotation::{
        EcdsaSignatureAdapter, InMemoryKVStore, RotationConfig, RotationDependencies,
        RotationError, RotationService, VerifierRotationApi,
    };
    use shared_types::ProcessContext;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    type Service = RotationService<InMemoryKVStore, EcdsaSignatureAdapter>;

    const SEED: i64 = 130;

    fn service() -> Service {
        RotationService::new(RotationDependencies {
            store: InMemoryKVStore::new(),
            sig_verifier: Arc::new(EcdsaSignatureAdapter::new()),
            config: RotationConfig::default(),
        })
    }

    fn at(height: u64) -> ProcessContext {
        ProcessContext::new(height, SEED)
    }

    fn register_all(service: &Service, nodes: &[Identity], data: &str, height: u64) {
        for node in nodes {
            service
                .register(&at(height), node.registration(data, height))
                .unwrap();
        }
    }

    /// Four nodes set up at 10, registered at 10 and 11, batch scheduled at 11.
    fn scheduled() -> (Service, Vec<Identity>) {
        let service = service();
        let nodes = nodes(4);
        service
            .setup(&at(10), setup_request(&admin(), &nodes))
            .unwrap();
        register_all(&service, &nodes, "fw-1.0", 10);
        register_all(&service, &nodes, "fw-1.0", 11);
        service.set_next_verify_targets_batch(&at(11)).unwrap();
        (service, nodes)
    }

    // =========================================================================
    // SETUP AND REGISTRATION
    // =========================================================================

    #[test]
    fn test_published_identities_register() {
        let service = service();
        let node = node1();
        service
            .setup(&at(1), setup_request(&admin(), std::slice::from_ref(&node)))
            .unwrap();

        service
            .register(&at(2), node.registration("hello world", 2))
            .unwrap();

        assert!(service.check(&at(2), &node.address).unwrap());
        assert!(service.check(&at(3), &node.address).unwrap());
        assert!(!service.check(&at(4), &node.address).unwrap());
    }

    #[test]
    fn test_setup_is_write_once() {
        let service = service();
        let nodes = nodes(2);
        service.setup(&at(1), setup_request(&admin(), &nodes)).unwrap();

        let other = Identity::random();
        assert_eq!(
            service.setup(&at(1), setup_request(&other, &nodes)),
            Err(RotationError::AlreadyConfigured)
        );
    }

    #[test]
    fn test_replay_and_stale_heights_rejected() {
        let service = service();
        let nodes = nodes(1);
        service.setup(&at(5), setup_request(&admin(), &nodes)).unwrap();
        let node = &nodes[0];

        let request = node.registration("d", 5);
        service.register(&at(5), request.clone()).unwrap();

        assert!(matches!(
            service.register(&at(5), request.clone()),
            Err(RotationError::EpochViolation { .. })
        ));
        assert!(matches!(
            service.register(&at(6), request),
            Err(RotationError::EpochViolation { .. })
        ));
        assert!(matches!(
            service.register(&at(6), node.registration("d", 7)),
            Err(RotationError::EpochViolation { .. })
        ));
        service.register(&at(6), node.registration("d", 6)).unwrap();
    }

    #[test]
    fn test_first_key_binds_address() {
        let service = service();
        let nodes = nodes(1);
        service.setup(&at(1), setup_request(&admin(), &nodes)).unwrap();
        service
            .register(&at(1), nodes[0].registration("d", 1))
            .unwrap();

        let mut claim = Identity::random().registration("d", 2);
        claim.address = nodes[0].address.clone();
        assert_eq!(
            service.register(&at(2), claim),
            Err(RotationError::IdentityMismatch(nodes[0].address.clone()))
        );
        assert!(!service.check(&at(3), &nodes[0].address).unwrap());
    }

    #[test]
    fn test_foreign_key_cannot_claim_unregistered_address() {
        let service = service();
        let node = node1();
        service
            .setup(&at(1), setup_request(&admin(), std::slice::from_ref(&node)))
            .unwrap();

        // Correctly signed by another key, naming node1's address
        let mut claim = Identity::random().registration("d", 2);
        claim.address = node.address.clone();
        assert_eq!(
            service.register(&at(2), claim),
            Err(RotationError::IdentityMismatch(node.address.clone()))
        );

        service.register(&at(3), node.registration("d", 3)).unwrap();
        assert!(service.check(&at(3), &node.address).unwrap());
    }

    #[test]
    fn test_changed_data_fails_check_until_stable() {
        let service = service();
        let nodes = nodes(1);
        let node = &nodes[0];
        service.setup(&at(1), setup_request(&admin(), &nodes)).unwrap();

        service.register(&at(1), node.registration("v1", 1)).unwrap();
        service.register(&at(2), node.registration("v2", 2)).unwrap();
        assert!(!service.check(&at(2), &node.address).unwrap());

        service.register(&at(3), node.registration("v2", 3)).unwrap();
        assert!(service.check(&at(3), &node.address).unwrap());
    }

    #[test]
    fn test_concurrent_registrations_all_land() {
        let service = service();
        let nodes = nodes(8);
        service.setup(&at(1), setup_request(&admin(), &nodes)).unwrap();

        std::thread::scope(|scope| {
            for node in &nodes {
                let service = &service;
                scope.spawn(move || {
                    service
                        .register(&at(1), node.registration("d", 1))
                        .unwrap();
                });
            }
        });

        for node in &nodes {
            assert!(service.check(&at(1), &node.address).unwrap());
        }
    }

    // =========================================================================
    // ROTATION
    // =========================================================================

    #[test]
    fn test_batch_promotes_on_next_height() {
        let (service, nodes) = scheduled();

        let pending = service.get_next_verify_target_batch(&at(11)).unwrap().unwrap();
        assert_eq!(pending.batch_count(), 4);
        assert_eq!(pending.member_count(), 4);
        assert!(service.get_next_verifier_batch(&at(11)).unwrap().is_empty());

        let members = service.get_next_verifier_batch(&at(12)).unwrap();
        let expected: BTreeSet<_> = nodes.iter().map(|n| n.address.clone()).collect();
        assert_eq!(members.into_iter().collect::<BTreeSet<_>>(), expected);
        assert_eq!(
            service.get_next_verify_target_batch(&at(12)).unwrap(),
            Some(pending)
        );
    }

    #[test]
    fn test_duty_rotates_through_members() {
        let (service, _) = scheduled();
        let members = service.get_next_verifier_batch(&at(12)).unwrap();

        for (offset, verifier) in members.iter().enumerate() {
            let height = 12 + offset as u64;
            for member in &members {
                let report = service
                    .dapp_schedule(&at(height).with_caller(member.clone()))
                    .unwrap();
                assert_eq!(report.on_duty, member == verifier, "height {height}");
            }
        }
    }

    #[test]
    fn test_duty_flags_node_with_changed_data() {
        let (service, nodes) = scheduled();
        let members = service.get_next_verifier_batch(&at(12)).unwrap();
        let targets = service.current_verify_targets(&at(12)).unwrap();
        assert_eq!(targets.len(), 1);

        let target = nodes.iter().find(|n| n.address == targets[0]).unwrap();
        service
            .register(&at(12), target.registration("fw-tampered", 12))
            .unwrap();

        let report = service
            .dapp_schedule(&at(12).with_caller(members[0].clone()))
            .unwrap();
        assert!(report.on_duty);
        assert_eq!(report.suspicious, targets);
    }

    #[test]
    fn test_duty_flags_silent_nodes() {
        let (service, _) = scheduled();
        let members = service.get_next_verifier_batch(&at(12)).unwrap();

        // Nobody registered after 11, so by 14 every target is stale
        let report = service
            .dapp_schedule(&at(14).with_caller(members[2].clone()))
            .unwrap();
        assert!(report.on_duty);
        assert_eq!(report.suspicious, service.current_verify_targets(&at(14)).unwrap());
        assert_eq!(report.suspicious.len(), 1);
    }

    #[test]
    fn test_unqualified_nodes_left_out_of_next_batch() {
        let service = service();
        let nodes = nodes(4);
        service.setup(&at(1), setup_request(&admin(), &nodes)).unwrap();
        register_all(&service, &nodes[..3], "d", 1);

        let partition = service.set_next_verify_targets_batch(&at(1)).unwrap();
        assert_eq!(partition.member_count(), 3);
        assert!(partition.members().all(|a| *a != nodes[3].address));
    }

    #[test]
    fn test_rescheduling_replaces_pending_not_active() {
        let (service, _) = scheduled();
        let active = service.get_next_verifier_batch(&at(12)).unwrap();

        service.set_next_verify_targets_batch(&at(12)).unwrap();
        assert_eq!(service.get_next_verifier_batch(&at(12)).unwrap(), active);
    }

    #[test]
    fn test_schedule_without_caller_rejected() {
        let (service, _) = scheduled();
        assert_eq!(
            service.dapp_schedule(&at(12)),
            Err(RotationError::MissingCallerIdentity)
        );
    }
}
