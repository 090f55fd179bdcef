pub mod types;

pub use types::*;

const SCENARIO_SEED: &str = include_str!("../../../data/scenarios.json");

/// The full authored scenario catalog, loaded once at startup and shared
/// read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ScenarioSet {
    scenarios: Vec<TrainingScenario>,
}

impl ScenarioSet {
    /// Build a set from already-parsed definitions, dropping any that fail
    /// validation. Invalid content is an authoring bug; it is logged and
    /// excluded rather than taking the catalog down.
    pub fn new(scenarios: Vec<TrainingScenario>) -> Self {
        let scenarios = scenarios
            .into_iter()
            .filter(|s| match s.validate() {
                Ok(()) => true,
                Err(reason) => {
                    log::error!("Rejecting scenario: {reason}");
                    false
                }
            })
            .collect();
        ScenarioSet { scenarios }
    }

    /// Load the bundled scenario catalog.
    pub fn load_builtin() -> Self {
        let scenarios: Vec<TrainingScenario> = serde_json::from_str(SCENARIO_SEED)
            .unwrap_or_else(|e| panic!("Bad scenario seed JSON: {e}"));
        let set = Self::new(scenarios);
        log::info!("Loaded {} training scenarios", set.len());
        set
    }

    pub fn all(&self) -> &[TrainingScenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&TrainingScenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
