use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use anyhow::{anyhow, Result};

use super::traits::PopsicleRepository;
use crate::types::{Popsicle, PopsicleId};

/// Process-lifetime store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPopsicleRepository {
    popsicles: Arc<RwLock<HashMap<PopsicleId, Popsicle>>>,
}

impl InMemoryPopsicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        let guard = self.popsicles.read().map_err(poisoned)?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn insert(&self, popsicle: Popsicle) -> Result<()> {
        let mut guard = self.popsicles.write().map_err(poisoned)?;
        guard.insert(popsicle.id, popsicle);
        Ok(())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> anyhow::Error {
    anyhow!("popsicle store lock poisoned")
}

impl PopsicleRepository for InMemoryPopsicleRepository {
    fn get_by_id(&self, id: &PopsicleId) -> Result<Option<Popsicle>> {
        let guard = self.popsicles.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn get_all(&self) -> Result<Vec<Popsicle>> {
        let guard = self.popsicles.read().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn add(&self, popsicle: Popsicle) -> Result<()> {
        self.insert(popsicle)
    }

    fn update(&self, popsicle: Popsicle) -> Result<()> {
        self.insert(popsicle)
    }

    fn delete(&self, id: &PopsicleId) -> Result<()> {
        let mut guard = self.popsicles.write().map_err(poisoned)?;
        guard.remove(id);
        Ok(())
    }
}
