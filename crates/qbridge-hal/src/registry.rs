//! Engine registry.
//!
//! An [`EngineRegistry`] is assembled once through a [`RegistryBuilder`] and is
//! immutable afterwards, so it can be shared across threads behind an `Arc`.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::adapter::{Adapter, Backend};
use crate::error::{HalError, HalResult};
use crate::probe::AvailabilitySnapshot;

/// Immutable set of engines keyed by id.
pub struct EngineRegistry {
    engines: Vec<Arc<dyn Backend>>,
    index: FxHashMap<String, usize>,
}

impl EngineRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up an engine by id.
    pub fn get(&self, name: &str) -> HalResult<Arc<dyn Backend>> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.engines[i]))
            .ok_or_else(|| HalError::UnknownEngine(name.to_string()))
    }

    /// Whether an engine is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Engine ids in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Engines in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Backend>> {
        self.engines.iter()
    }

    /// Number of engines.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Probe every engine. The registry itself is not modified.
    pub fn probe(&self) -> AvailabilitySnapshot {
        let mut snapshot = AvailabilitySnapshot::default();
        for engine in &self.engines {
            let availability = engine.probe();
            debug!(
                engine = engine.name(),
                available = availability.available,
                "probed engine"
            );
            snapshot.push(engine.name(), availability);
        }
        snapshot
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.names())
            .finish()
    }
}

/// Builder for [`EngineRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    engines: Vec<Arc<dyn Backend>>,
}

impl RegistryBuilder {
    /// Register an adapter.
    #[must_use]
    pub fn register<A: Adapter + 'static>(self, adapter: A) -> Self {
        self.register_backend(Arc::new(adapter))
    }

    /// Register an already type-erased engine.
    #[must_use]
    pub fn register_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        debug!("Registering engine: {}", backend.name());
        self.engines.push(backend);
        self
    }

    /// Freeze the registry. Fails if two engines share an id.
    pub fn build(self) -> HalResult<EngineRegistry> {
        let mut index = FxHashMap::default();
        for (i, engine) in self.engines.iter().enumerate() {
            if index.insert(engine.name().to_string(), i).is_some() {
                return Err(HalError::Configuration(format!(
                    "engine '{}' registered twice",
                    engine.name()
                )));
            }
        }
        Ok(EngineRegistry {
            engines: self.engines,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::normalize::{BitOrder, NativeHistogram};
    use qbridge_ir::{CircuitInfo, CircuitSpec, GateType};

    struct Fixed {
        name: &'static str,
        caps: Capabilities,
    }

    impl Fixed {
        fn new(name: &'static str, gates: &[GateType]) -> Self {
            Self {
                name,
                caps: Capabilities::new(name, 8, BitOrder::QubitZeroLeft)
                    .with_gates(gates.iter().copied()),
            }
        }
    }

    impl Adapter for Fixed {
        type Native = usize;
        const BIT_ORDER: BitOrder = BitOrder::QubitZeroLeft;

        fn name(&self) -> &str {
            self.name
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn translate(&self, spec: &CircuitSpec) -> HalResult<usize> {
            match self.caps.unsupported_gates(spec).first() {
                Some(&gate) => Err(self.unsupported_gate(gate)),
                None => Ok(spec.num_qubits()),
            }
        }

        fn width(&self, native: &usize) -> usize {
            *native
        }

        fn sample(&self, native: &usize, shots: u32) -> HalResult<NativeHistogram> {
            Ok(NativeHistogram::Indices {
                counts: [(0, u64::from(shots))].into_iter().collect(),
                width: *native,
            })
        }

        fn info(&self, native: &usize) -> CircuitInfo {
            CircuitInfo::builder(self.name, *native).build()
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let registry = EngineRegistry::builder()
            .register(Fixed::new("b", &[GateType::X]))
            .register(Fixed::new("a", &[GateType::X]))
            .build()
            .unwrap();
        assert_eq!(registry.names(), vec!["b", "a"]);
        assert!(registry.contains("a"));
        assert_eq!(registry.get("a").unwrap().name(), "a");
        assert!(matches!(registry.get("zz"), Err(HalError::UnknownEngine(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = EngineRegistry::builder()
            .register(Fixed::new("a", &[]))
            .register(Fixed::new("a", &[]))
            .build();
        assert!(matches!(result, Err(HalError::Configuration(_))));
    }

    #[test]
    fn test_probe_marks_engines_without_probe_gate() {
        let registry = EngineRegistry::builder()
            .register(Fixed::new("full", &[GateType::X]))
            .register(Fixed::new("empty", &[]))
            .build()
            .unwrap();
        let snapshot = registry.probe();
        assert!(snapshot.is_available("full"));
        assert!(!snapshot.is_available("empty"));
        assert_eq!(registry.len(), 2);
    }
}
