//! Shared fixtures for unit tests

use crate::error::{MixerError, Result};
use crate::program::Source;
use crate::resolver::CodeResolver;
use crate::session::{CaptureRequest, Session};
use async_trait::async_trait;
use kisekae_formats::{Code, FastloadEntry, Registry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SUBCODES: &str = include_str!("../test_fixtures/subcodes.json");
const COMPONENTS: &str = include_str!("../test_fixtures/components.json");

/// Registry built from the bundled fixture definitions
pub fn fixture_registry() -> Arc<Registry> {
    Arc::new(Registry::from_json(SUBCODES, COMPONENTS).expect("fixture registry should load"))
}

/// Resolves sources by name from an in-memory table, counting lookups
pub struct MapResolver {
    registry: Arc<Registry>,
    codes: HashMap<String, Vec<String>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MapResolver {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            codes: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn with(mut self, name: &str, codes: &[&str]) -> Self {
        self.codes.insert(
            name.to_string(),
            codes.iter().map(|c| (*c).to_string()).collect(),
        );
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

impl CodeResolver for MapResolver {
    fn resolve(&self, source: &Source) -> Result<Vec<Code>> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(source.name.clone())
            .or_insert(0) += 1;
        self.codes
            .get(&source.name)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|text| Ok(Code::parse(text, &self.registry)?))
            .collect()
    }
}

/// Session double recording every request
#[derive(Default)]
pub struct MockSession {
    pub applied: Vec<String>,
    pub captures: Vec<CaptureRequest>,
    pub fastloads: Vec<(usize, Vec<FastloadEntry>, i32)>,
    pub closed: bool,
    /// Codes containing this text are refused
    pub refuse: Option<String>,
    /// Captures of this character fail with a transport error
    pub broken_character: Option<usize>,
}

#[async_trait]
impl Session for MockSession {
    async fn apply_code(&mut self, code: &str) -> Result<bool> {
        self.applied.push(code.to_string());
        Ok(!self
            .refuse
            .as_deref()
            .is_some_and(|needle| code.contains(needle)))
    }

    async fn apply_to_character(
        &mut self,
        character: usize,
        entries: &[FastloadEntry],
        version: i32,
    ) -> Result<bool> {
        self.fastloads.push((character, entries.to_vec(), version));
        Ok(true)
    }

    async fn capture_image(&mut self, request: &CaptureRequest) -> Result<Vec<u8>> {
        self.captures.push(request.clone());
        if self.broken_character == Some(request.character) {
            return Err(MixerError::Session("connection reset".to_string()));
        }
        Ok(format!("png:{}", self.applied.len()).into_bytes())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
