//! # Command Flow
//!
//! The same protocol driven through method names and JSON argument strings,
//! the way hosts forward node calls.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{admin, node1, nodes, setup_arg, Identity};
    use ir_02_verifier_rotation::state::keys;
    use ir_02_verifier_rotation::{
        CommandError, CommandHandler, EcdsaSignatureAdapter, InMemoryKVStore, KeyValueStore,
        RegistrationInfo, RotationConfig, RotationDependencies, RotationService,
        VerifierBatchSet,
    };
    use shared_types::ProcessContext;
    use std::sync::Arc;

    type Handler = CommandHandler<RotationService<InMemoryKVStore, EcdsaSignatureAdapter>>;

    fn handler() -> Handler {
        CommandHandler::new(Arc::new(RotationService::new(RotationDependencies {
            store: InMemoryKVStore::new(),
            sig_verifier: Arc::new(EcdsaSignatureAdapter::new()),
            config: RotationConfig::default(),
        })))
    }

    fn call(handler: &Handler, height: u64, method: &str, arg: &str) -> String {
        handler
            .execute(&ProcessContext::new(height, 7), method, arg)
            .unwrap()
    }

    fn call_as(handler: &Handler, height: u64, caller: &str, method: &str) -> String {
        handler
            .execute(&ProcessContext::new(height, 7).with_caller(caller), method, "")
            .unwrap()
    }

    #[test]
    fn test_published_node_registers_by_command() {
        let handler = handler();
        let node = node1();
        let nodes = std::slice::from_ref(&node);

        assert_eq!(call(&handler, 1, "setup", &setup_arg(&admin(), nodes)), "true");
        assert_eq!(call(&handler, 2, "register", &node.register_arg("hello world", 2)), "true");
        assert_eq!(
            call(&handler, 2, "check", &format!("\"{}\"", node.address)),
            "true"
        );
    }

    #[test]
    fn test_quoted_payload_signed_as_inner_text() {
        let handler = handler();
        let nodes = nodes(1);
        call(&handler, 1, "setup", &setup_arg(&admin(), &nodes));

        let node = &nodes[0];
        let payload = RegistrationInfo::new("a,b", 3).to_payload();
        let arg = format!(
            "{},\"{}\",\"{}\",\"{}\"",
            serde_json::to_string(&payload).unwrap(),
            node.address,
            node.public_key_hex(),
            node.sign_hex(&payload)
        );

        assert_eq!(call(&handler, 3, "register", &arg), "true");
        assert_eq!(call(&handler, 3, "register", &arg), "false");
    }

    #[test]
    fn test_setup_from_wrong_admin_then_right_admin() {
        let handler = handler();
        let nodes = nodes(2);
        // Signature no longer covers the list
        let swapped = Identity::random().address.to_string();
        let forged =
            setup_arg(&admin(), &nodes).replacen(nodes[1].address.as_str(), &swapped, 1);

        assert_eq!(call(&handler, 1, "setup", &forged), "false");
        assert_eq!(call(&handler, 1, "setup", &setup_arg(&admin(), &nodes)), "true");
        assert_eq!(
            call(&handler, 1, "setup", &setup_arg(&Identity::random(), &nodes)),
            "false"
        );
    }

    #[test]
    fn test_full_rotation_by_command() {
        let handler = handler();
        let nodes = nodes(4);
        call(&handler, 10, "setup", &setup_arg(&admin(), &nodes));
        for height in [10, 11] {
            for node in &nodes {
                assert_eq!(
                    call(&handler, height, "register", &node.register_arg("d", height)),
                    "true"
                );
            }
        }

        assert_eq!(call(&handler, 11, "setNextVerifyTargetsBatch", ""), "");
        let targets = call(&handler, 11, "getNextVerifyTargetBatch", "");
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&targets).unwrap();
        assert_eq!(parsed.len(), 4);
        assert_eq!(call(&handler, 11, "getNextVerifierBatch", ""), "");

        let verifiers = call(&handler, 12, "getNextVerifierBatch", "");
        let order: Vec<&str> = verifiers.split(',').collect();
        assert_eq!(order.len(), 4);

        assert_eq!(call_as(&handler, 12, order[0], "dapp_schedule"), "true");
        assert_eq!(call_as(&handler, 12, order[1], "dapp_schedule"), "false");
        assert_eq!(call_as(&handler, 13, order[1], "dapp_schedule"), "true");
    }

    #[test]
    fn test_target_batch_stable_then_promoted() {
        let handler = handler();
        let nodes = nodes(3);
        call(&handler, 20, "setup", &setup_arg(&admin(), &nodes));
        for node in &nodes {
            call(&handler, 20, "register", &node.register_arg("d", 20));
        }
        call(&handler, 20, "setNextVerifyTargetsBatch", "");

        let first = call(&handler, 20, "getNextVerifyTargetBatch", "");
        let second = call(&handler, 20, "getNextVerifyTargetBatch", "");
        assert!(!first.is_empty());
        assert_eq!(first, second);

        let promoted = call(&handler, 21, "getNextVerifyTargetBatch", "");
        let stored = handler.service().store().get(keys::BATCHES).unwrap().unwrap();
        let batches: VerifierBatchSet = serde_json::from_str(&stored).unwrap();
        assert!(batches.pending.is_none());
        let active = batches.active.unwrap();
        assert_eq!(active.start_height, 21);
        assert_eq!(promoted, active.partition.to_json_string());
        assert_eq!(promoted, first);
    }

    #[test]
    fn test_randomize_batch_is_seeded() {
        let handler = handler();
        let arg = r#"["a","b","c","d","e","f"],3"#;

        let first = handler
            .execute(&ProcessContext::new(0, 42), "randomizeBatch", arg)
            .unwrap();
        let again = handler
            .execute(&ProcessContext::new(99, 42), "randomizeBatch", arg)
            .unwrap();
        assert_eq!(first, again);

        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&first).unwrap();
        let mut members: Vec<String> = parsed
            .values()
            .flat_map(|v| v.as_str().unwrap().split(',').map(str::to_string).collect::<Vec<_>>())
            .collect();
        members.sort();
        assert_eq!(members, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_malformed_command_is_not_false() {
        let handler = handler();
        let err = handler
            .execute(&ProcessContext::new(1, 0), "register", "{\"Data\":")
            .unwrap_err();
        assert!(matches!(err, CommandError::Parse(_)));
    }
}
