use crate::types::{Popsicle, PopsicleId};

/// Keyed store of popsicles.
///
/// Absence is a normal result, never an error. `add` and `update` share
/// overwrite semantics; callers that need "update only if present" check with
/// `get_by_id` first.
pub trait PopsicleRepository {
    fn get_by_id(&self, id: &PopsicleId) -> anyhow::Result<Option<Popsicle>>;
    fn get_all(&self) -> anyhow::Result<Vec<Popsicle>>;
    fn add(&self, popsicle: Popsicle) -> anyhow::Result<()>;
    fn update(&self, popsicle: Popsicle) -> anyhow::Result<()>;
    fn delete(&self, id: &PopsicleId) -> anyhow::Result<()>;
}
