//! # Runtime Flow
//!
//! One process per call: every step reopens the state file, so accepted
//! writes must survive between invocations and rejected ones must not land.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{admin, nodes, setup_arg, Identity};
    use ir_02_verifier_rotation::KeyValueStore;
    use rotation_runtime::{run, FileBackedKVStore, Invocation, RuntimeConfig};
    use shared_types::ProcessContext;

    struct Host {
        _dir: tempfile::TempDir,
        config: RuntimeConfig,
    }

    impl Host {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = RuntimeConfig {
                state_file: dir.path().join("state").join("rotation.json"),
                ..Default::default()
            };
            Self { _dir: dir, config }
        }

        fn call(&self, ctx: ProcessContext, method: &str, arg: &str) -> String {
            run(
                &self.config,
                &Invocation {
                    ctx,
                    method: method.to_string(),
                    arg: arg.to_string(),
                },
            )
            .unwrap()
        }

        fn at(&self, height: u64, method: &str, arg: &str) -> String {
            self.call(ProcessContext::new(height, 130), method, arg)
        }

        fn state(&self) -> FileBackedKVStore {
            FileBackedKVStore::open(&self.config.state_file).unwrap()
        }
    }

    fn register_all(host: &Host, nodes: &[Identity], height: u64) {
        for node in nodes {
            assert_eq!(
                host.at(height, "register", &node.register_arg("d", height)),
                "true"
            );
        }
    }

    #[test]
    fn test_state_persists_across_invocations() {
        let host = Host::new();
        let nodes = nodes(3);

        assert_eq!(host.at(1, "setup", &setup_arg(&admin(), &nodes)), "true");
        register_all(&host, &nodes, 1);

        let state = host.state();
        assert!(state.exists("admin").unwrap());
        assert!(state.exists(&format!("node:{}", nodes[0].address)).unwrap());
        assert_eq!(
            host.at(1, "check", &format!("\"{}\"", nodes[2].address)),
            "true"
        );
        assert_eq!(host.at(1, "setup", &setup_arg(&admin(), &nodes)), "false");
    }

    #[test]
    fn test_rejection_leaves_file_untouched() {
        let host = Host::new();
        let nodes = nodes(2);
        host.at(1, "setup", &setup_arg(&admin(), &nodes));
        register_all(&host, &nodes, 1);
        let before = std::fs::read_to_string(&host.config.state_file).unwrap();

        // Replay at the same height
        assert_eq!(
            host.at(1, "register", &nodes[0].register_arg("d", 1)),
            "false"
        );
        assert_eq!(
            std::fs::read_to_string(&host.config.state_file).unwrap(),
            before
        );
    }

    #[test]
    fn test_promotion_persisted_by_first_query() {
        let host = Host::new();
        let nodes = nodes(4);
        host.at(10, "setup", &setup_arg(&admin(), &nodes));
        register_all(&host, &nodes, 10);
        assert_eq!(host.at(10, "setNextVerifyTargetsBatch", ""), "");

        let verifiers = host.at(11, "getNextVerifierBatch", "");
        assert_eq!(verifiers.split(',').count(), 4);

        let first = verifiers.split(',').next().unwrap();
        let on_duty = host.call(
            ProcessContext::new(11, 130).with_caller(first),
            "dapp_schedule",
            "",
        );
        assert_eq!(on_duty, "true");
        assert_eq!(host.at(12, "getNextVerifierBatch", ""), verifiers);
    }
}
