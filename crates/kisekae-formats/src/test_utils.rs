//! Shared fixtures for unit tests

use crate::registry::Registry;
use std::sync::Arc;

const SUBCODES: &str = include_str!("../test_fixtures/subcodes.json");
const COMPONENTS: &str = include_str!("../test_fixtures/components.json");

/// Registry built from the bundled fixture definitions
pub fn fixture_registry() -> Arc<Registry> {
    Arc::new(Registry::from_json(SUBCODES, COMPONENTS).expect("fixture registry should load"))
}
