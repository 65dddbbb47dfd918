//! Registry construction from configuration.

use qbridge_adapter_exact::ExactAdapter;
use qbridge_adapter_moment::MomentAdapter;
use qbridge_adapter_sim::SimAdapter;
use qbridge_adapter_stabilizer::StabilizerAdapter;
use qbridge_hal::{EngineRegistry, HalResult};
use tracing::debug;

use crate::config::Config;

/// Every engine this binary can register, in registration order.
pub const ENGINE_IDS: [&str; 4] = [
    qbridge_adapter_sim::ENGINE,
    qbridge_adapter_moment::ENGINE,
    qbridge_adapter_stabilizer::ENGINE,
    qbridge_adapter_exact::ENGINE,
];

/// Register every enabled engine with its configured limits and seed.
pub fn build_registry(config: &Config) -> HalResult<EngineRegistry> {
    let mut builder = EngineRegistry::builder();
    for id in ENGINE_IDS {
        if !config.is_enabled(id) {
            debug!(engine = id, "engine disabled by configuration");
            continue;
        }
        let engine_config = config.engine_config(id);
        builder = match id {
            qbridge_adapter_sim::ENGINE => builder.register(SimAdapter::from_config(&engine_config)),
            qbridge_adapter_moment::ENGINE => builder.register(MomentAdapter::from_config(&engine_config)),
            qbridge_adapter_stabilizer::ENGINE => {
                builder.register(StabilizerAdapter::from_config(&engine_config))
            }
            qbridge_adapter_exact::ENGINE => builder.register(ExactAdapter::from_config(&engine_config)),
            _ => builder,
        };
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use qbridge_hal::Backend;

    use super::*;
    use crate::config::EngineSettings;

    #[test]
    fn test_registers_all_by_default() {
        let registry = build_registry(&Config::default()).unwrap();
        assert_eq!(registry.names(), ENGINE_IDS.to_vec());
    }

    #[test]
    fn test_disabled_and_limited() {
        let mut config = Config::default();
        config.engine_settings.insert(
            "exact".to_string(),
            EngineSettings {
                enabled: false,
                ..EngineSettings::default()
            },
        );
        config.engine_settings.insert(
            "stabilizer".to_string(),
            EngineSettings {
                max_qubits: Some(8),
                ..EngineSettings::default()
            },
        );
        let registry = build_registry(&config).unwrap();
        assert!(!registry.contains("exact"));
        let stabilizer = registry.get("stabilizer").unwrap();
        assert_eq!(stabilizer.capabilities().max_qubits, 8);
    }
}
