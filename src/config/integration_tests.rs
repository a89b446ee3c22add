#[cfg(test)]
mod integration_tests {
    use crate::config::{load_and_validate_config, Permission, RuntimeBuilder};
    use std::time::Duration;

    /// Test that the demo configuration loads and validates
    #[test]
    fn test_demo_yaml_loading() {
        let config = load_and_validate_config("configs/demo.yaml").unwrap();

        assert_eq!(config.agent_system.timeout(), Duration::from_secs(5));
        assert_eq!(config.agent_system.history_length(), 10);
        assert_eq!(config.agents.len(), 3);
        assert_eq!(config.agents[0].name, "storage");
        assert_eq!(config.agents[1].class, "publisher");
        assert_eq!(
            config.agents[1].option_str("path"),
            Some("Objects/House/LivingRoom/temperature")
        );

        let owned = config.agents[0].owned_paths().unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].0.to_string(), "Objects/House");
        assert_eq!(owned[0].1, Permission::WRITE_CALL);
    }

    /// Test that write and call ownership of one path may be split across agents
    #[test]
    fn test_split_ownership_yaml_loading() {
        let config = load_and_validate_config("configs/split-ownership.yaml").unwrap();

        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[0].responsible.len(), 2);
        assert_eq!(config.agents[1].responsible["Objects/House/Lights"], "c");
    }

    /// Test building the agent system runtime from YAML configuration
    #[tokio::test]
    async fn test_build_runtime_from_yaml() {
        let config = load_and_validate_config("configs/demo.yaml").unwrap();
        let system = RuntimeBuilder::from_config(&config).await.unwrap();

        assert_eq!(system.agents().len(), 3);
        assert!(system.agent("storage").unwrap().is_responsible());
        assert!(!system.agent("thermometer").unwrap().is_responsible());
        assert!(system.agent("echo").unwrap().is_responsible());

        system.shutdown().await.unwrap();
    }
}
