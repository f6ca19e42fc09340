mod patch;
mod providers;
pub mod validation;

use std::sync::Arc;

use crate::{
    storage::PopsicleRepository,
    types::{Popsicle, PopsicleError, PopsicleFields, PopsicleId},
};

pub use patch::{parse_document, JsonPatchOperation, PatchError, PatchOperation};
pub use providers::{Clock, IdGenerator, SystemClock, UuidGenerator};

/// Transport-independent popsicle operations.
///
/// Reads go straight to the repository. Writes validate first and only touch
/// the repository once the new state is known to be valid.
#[derive(Clone)]
pub struct PopsicleService<R> {
    repository: R,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<R: PopsicleRepository> PopsicleService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn search(&self) -> Result<Vec<Popsicle>, PopsicleError> {
        Ok(self.repository.get_all()?)
    }

    pub fn get(&self, id: PopsicleId) -> Result<Popsicle, PopsicleError> {
        self.repository
            .get_by_id(&id)?
            .ok_or(PopsicleError::NotFound(id))
    }

    pub fn create(&self, fields: PopsicleFields) -> Result<Popsicle, PopsicleError> {
        validation::validate(&fields)?;

        let popsicle = Popsicle::new(self.ids.next_id(), fields, self.clock.now());
        self.repository.add(popsicle.clone())?;
        log::info!("created popsicle {}", popsicle.id);
        Ok(popsicle)
    }

    pub fn replace(&self, id: PopsicleId, fields: PopsicleFields) -> Result<Popsicle, PopsicleError> {
        let mut popsicle = self.get(id)?;
        validation::validate(&fields)?;

        popsicle.apply(fields);
        self.repository.update(popsicle.clone())?;
        log::info!("replaced popsicle {}", id);
        Ok(popsicle)
    }

    /// Applies `operations` to the popsicle's projection and stores the result.
    /// The whole projection is revalidated, so a field the patch did not touch
    /// can still cause a rejection.
    pub fn update(&self, id: PopsicleId, operations: &[PatchOperation]) -> Result<(), PopsicleError> {
        let popsicle = self.get(id)?;
        self.store_patched(popsicle, operations)
    }

    /// Same as [`update`](Self::update) for a raw JSON Patch document. The
    /// lookup comes first: an unknown id is `NotFound` however the document
    /// is malformed.
    pub fn update_from_document(
        &self,
        id: PopsicleId,
        document: Vec<JsonPatchOperation>,
    ) -> Result<(), PopsicleError> {
        let popsicle = self.get(id)?;
        let operations = parse_document(document)?;
        self.store_patched(popsicle, &operations)
    }

    fn store_patched(&self, mut popsicle: Popsicle, operations: &[PatchOperation]) -> Result<(), PopsicleError> {
        let patched = patch::apply(&popsicle.fields(), operations)?;
        validation::validate(&patched)?;

        let id = popsicle.id;
        popsicle.apply(patched);
        self.repository.update(popsicle)?;
        log::info!("patched popsicle {} ({} operations)", id, operations.len());
        Ok(())
    }

    pub fn delete(&self, id: PopsicleId) -> Result<(), PopsicleError> {
        self.get(id)?;
        self.repository.delete(&id)?;
        log::info!("deleted popsicle {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryPopsicleRepository;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Default)]
    struct SequentialIds(AtomicU64);

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> PopsicleId {
            Uuid::from_u128(u128::from(self.0.fetch_add(1, Ordering::SeqCst) + 1))
        }
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn service() -> PopsicleService<InMemoryPopsicleRepository> {
        PopsicleService::new(InMemoryPopsicleRepository::new())
            .with_clock(FixedClock(created_at()))
            .with_id_generator(SequentialIds::default())
    }

    fn grape() -> PopsicleFields {
        PopsicleFields::new("Grape", "Grape Flavor", Decimal::new(150, 2))
    }

    #[test]
    fn create_assigns_id_and_created_at() {
        let service = service();

        let created = service.create(grape()).unwrap();

        assert_eq!(created.id, Uuid::from_u128(1));
        assert_eq!(created.created_at, created_at());
        assert_eq!(created.price, Decimal::new(150, 2));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn create_rejects_invalid_payload_without_storing() {
        let service = service();

        let err = service
            .create(PopsicleFields::new("Grape", "Grape", Decimal::ZERO))
            .unwrap_err();

        assert!(matches!(err, PopsicleError::Validation(ref e) if e.has_field("price")));
        assert!(service.search().unwrap().is_empty());
    }

    #[test]
    fn search_lists_every_popsicle() {
        let service = service();
        assert!(service.search().unwrap().is_empty());

        service.create(grape()).unwrap();
        service
            .create(PopsicleFields::new("Orange", "Orange", Decimal::ONE))
            .unwrap();

        assert_eq!(service.search().unwrap().len(), 2);
    }

    #[test]
    fn unknown_id_is_not_found_for_every_operation() {
        let service = service();
        let id = Uuid::new_v4();

        assert_eq!(service.get(id), Err(PopsicleError::NotFound(id)));
        assert_eq!(service.replace(id, grape()), Err(PopsicleError::NotFound(id)));
        assert_eq!(service.update(id, &[]), Err(PopsicleError::NotFound(id)));
        assert_eq!(service.delete(id), Err(PopsicleError::NotFound(id)));
        assert!(service.search().unwrap().is_empty());
    }

    #[test]
    fn replace_overwrites_mutable_fields() {
        let service = service();
        let created = service.create(grape()).unwrap();

        let replaced = service
            .replace(
                created.id,
                PopsicleFields::new("Updated", "Updated Flavor", Decimal::new(200, 2)),
            )
            .unwrap();

        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.created_at, created.created_at);
        assert_eq!(replaced.name, "Updated");
        assert_eq!(replaced.flavor, "Updated Flavor");
        assert_eq!(replaced.price, Decimal::new(200, 2));
        assert_eq!(service.get(created.id).unwrap(), replaced);
    }

    #[test]
    fn replace_rejects_invalid_payload() {
        let service = service();
        let created = service.create(grape()).unwrap();

        let err = service
            .replace(created.id, PopsicleFields::new("", "Grape", Decimal::ONE))
            .unwrap_err();

        assert!(matches!(err, PopsicleError::Validation(_)));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn update_price_leaves_other_fields() {
        let service = service();
        let created = service
            .create(PopsicleFields::new("Original", "Vanilla", Decimal::ONE))
            .unwrap();

        service
            .update(created.id, &[PatchOperation::ReplacePrice(Decimal::new(399, 2))])
            .unwrap();

        let stored = service.get(created.id).unwrap();
        assert_eq!(stored.price, Decimal::new(399, 2));
        assert_eq!(stored.name, created.name);
        assert_eq!(stored.flavor, created.flavor);
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.created_at, created.created_at);
    }

    #[test]
    fn update_to_non_positive_price_is_rejected_in_full() {
        let service = service();
        let created = service.create(grape()).unwrap();

        let err = service
            .update(
                created.id,
                &[
                    PatchOperation::ReplaceName("Renamed".to_string()),
                    PatchOperation::ReplacePrice(Decimal::new(-5, 1)),
                ],
            )
            .unwrap_err();

        assert!(matches!(err, PopsicleError::Validation(ref e) if e.has_field("price")));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn update_with_unsupported_operation_is_malformed() {
        let service = service();
        let created = service.create(grape()).unwrap();

        let err = service
            .update(
                created.id,
                &[PatchOperation::Unsupported {
                    op: "remove".to_string(),
                    path: "/name".to_string(),
                }],
            )
            .unwrap_err();

        assert!(matches!(err, PopsicleError::MalformedPatch(_)));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    fn patch_entry(op: &str, path: &str, value: Option<serde_json::Value>) -> JsonPatchOperation {
        JsonPatchOperation {
            op: op.to_string(),
            path: path.to_string(),
            value,
        }
    }

    #[test]
    fn update_from_document_looks_up_before_parsing() {
        let service = service();
        let id = Uuid::new_v4();

        let documents = [
            vec![patch_entry("replace", "/price", Some(serde_json::json!("cheap")))],
            vec![patch_entry("replace", "/name", None)],
            vec![patch_entry("remove", "/price", None)],
        ];

        for document in documents {
            assert_eq!(
                service.update_from_document(id, document),
                Err(PopsicleError::NotFound(id))
            );
        }
    }

    #[test]
    fn update_from_document_rejects_bad_value_on_existing_popsicle() {
        let service = service();
        let created = service.create(grape()).unwrap();

        let err = service
            .update_from_document(
                created.id,
                vec![
                    patch_entry("replace", "/name", Some(serde_json::json!("Renamed"))),
                    patch_entry("replace", "/price", Some(serde_json::json!("cheap"))),
                ],
            )
            .unwrap_err();

        assert!(matches!(err, PopsicleError::MalformedPatch(PatchError::InvalidValue { .. })));
        assert_eq!(service.get(created.id).unwrap(), created);
    }

    #[test]
    fn update_from_document_applies_parsed_operations() {
        let service = service();
        let created = service.create(grape()).unwrap();

        service
            .update_from_document(
                created.id,
                vec![patch_entry("replace", "/price", Some(serde_json::json!(3.99)))],
            )
            .unwrap();

        assert_eq!(service.get(created.id).unwrap().price, Decimal::new(399, 2));
    }

    #[test]
    fn update_revalidates_untouched_fields() {
        let service = service();
        let created = service.create(grape()).unwrap();
        let mut broken = created.clone();
        broken.flavor = String::new();
        service.repository().update(broken).unwrap();

        let err = service
            .update(created.id, &[PatchOperation::ReplacePrice(Decimal::new(2, 0))])
            .unwrap_err();

        assert!(matches!(err, PopsicleError::Validation(ref e) if e.has_field("flavor")));
    }

    #[test]
    fn delete_removes_popsicle() {
        let service = service();
        let created = service.create(grape()).unwrap();

        service.delete(created.id).unwrap();

        assert_eq!(service.get(created.id), Err(PopsicleError::NotFound(created.id)));
        assert_eq!(service.delete(created.id), Err(PopsicleError::NotFound(created.id)));
    }
}
