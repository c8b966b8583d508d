//! Generic CRUD engine over entity descriptors.
//!
//! [`RecordService`] implements the five record operations once, driven by
//! an [`EntityDescriptor`], plus the owner listing used by leaves. It holds
//! no record state between calls; every operation goes to the
//! [`RecordStore`] as the source of truth.
//!
//! Update runs in a fixed order: parse the key and payload, probe for
//! existence, reject an empty change set, stamp the touch field, write, then
//! re-read.

mod error;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use serde_json::Value;
use tracing::debug;

pub use self::error::CrudError;
use super::entity::{EntityDescriptor, lookup};
use super::payload::{parse_create, parse_filters, parse_key, parse_owner, parse_update};
use super::ports::{EntityRecords, ListQuery, RecordStore, RecordStoreError};
use super::{Error, FieldBinding, FieldValue, Record};

/// CRUD use-cases backed by a [`RecordStore`].
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl RecordService {
    /// Build the engine over `store`, stamping touch fields with `clock`.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validate `payload`, insert it and return the persisted record.
    ///
    /// # Errors
    ///
    /// [`CrudError::ValidationFailed`] for invalid payloads,
    /// [`CrudError::DuplicateIdentity`] when a supplied key collides,
    /// [`CrudError::InsertFailed`] when the read-back finds nothing and
    /// [`CrudError::Store`] for any other store failure.
    pub async fn create(
        &self,
        descriptor: &'static EntityDescriptor,
        payload: &Value,
    ) -> Result<Record, CrudError> {
        let bindings = parse_create(descriptor, payload)?;
        match self.store.insert(descriptor, &bindings).await {
            Ok(Some(record)) => {
                debug!(entity = descriptor.path, "record created");
                Ok(record)
            }
            Ok(None) => Err(CrudError::InsertFailed {
                entity: descriptor.label,
            }),
            Err(RecordStoreError::UniqueViolation { message }) if !descriptor.key_is_generated() => {
                debug!(entity = descriptor.path, %message, "duplicate identity on insert");
                Err(CrudError::DuplicateIdentity {
                    field: descriptor.key.name,
                    value: supplied_key(descriptor, &bindings),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// One page of records ordered by the descriptor's ordering field.
    ///
    /// Declared filters present in `params` are ANDed before pagination;
    /// other parameters are ignored.
    ///
    /// # Errors
    ///
    /// [`CrudError::ValidationFailed`] for unparsable filter values and
    /// [`CrudError::Store`] for store failures.
    pub async fn list_page(
        &self,
        descriptor: &'static EntityDescriptor,
        page: PageRequest,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<Record>, CrudError> {
        let filters = parse_filters(descriptor, params)?;
        let query = ListQuery::page(descriptor, filters, page);
        Ok(self.store.list(descriptor, &query).await?)
    }

    /// Every record owned by `owner`, unpaginated.
    ///
    /// # Errors
    ///
    /// [`CrudError::NotFound`] when the entity has no owner listing,
    /// [`CrudError::ValidationFailed`] for a malformed owner and
    /// [`CrudError::Store`] for store failures.
    pub async fn list_by_owner(
        &self,
        descriptor: &'static EntityDescriptor,
        owner: &str,
    ) -> Result<Vec<Record>, CrudError> {
        let listing = descriptor
            .owner_listing
            .as_ref()
            .ok_or_else(|| CrudError::not_found(descriptor.label))?;
        let value = parse_owner(&listing.owner, owner)?;
        let query = ListQuery::owned_by(listing, value);
        Ok(self.store.list(descriptor, &query).await?)
    }

    /// Fetch the record whose lookup key equals `key`.
    ///
    /// # Errors
    ///
    /// [`CrudError::ValidationFailed`] for a malformed key,
    /// [`CrudError::NotFound`] when nothing matches and [`CrudError::Store`]
    /// for store failures.
    pub async fn get_one(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &str,
    ) -> Result<Record, CrudError> {
        let key_value = parse_key(descriptor, key)?;
        self.store
            .find(descriptor, &key_value)
            .await?
            .ok_or_else(|| CrudError::not_found(descriptor.label))
    }

    /// Apply the fields present in `payload` and return the updated record.
    ///
    /// # Errors
    ///
    /// [`CrudError::ValidationFailed`] for malformed keys or payloads,
    /// [`CrudError::NotFound`] when the key does not resolve (checked before
    /// writing), [`CrudError::NoFieldsProvided`] for an empty change set and
    /// [`CrudError::Store`] for store failures.
    pub async fn update_partial(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &str,
        payload: &Value,
    ) -> Result<Record, CrudError> {
        let key_value = parse_key(descriptor, key)?;
        let mut update = parse_update(descriptor, payload)?;

        if !self.store.exists(descriptor, &key_value).await? {
            return Err(CrudError::not_found(descriptor.label));
        }
        if update.is_empty() {
            return Err(CrudError::NoFieldsProvided);
        }
        if let Some(touch) = descriptor.touch.as_ref() {
            let stamp = self.clock.utc().format(touch.format).to_string();
            update.stamp(&touch.field, FieldValue::Text(stamp));
        }

        let bindings = update.into_bindings();
        let affected = self.store.update(descriptor, &key_value, &bindings).await?;
        if affected == 0 {
            return Err(CrudError::not_found(descriptor.label));
        }
        self.store
            .find(descriptor, &key_value)
            .await?
            .ok_or_else(|| CrudError::not_found(descriptor.label))
    }

    /// Delete the record whose lookup key equals `key`.
    ///
    /// # Errors
    ///
    /// [`CrudError::ValidationFailed`] for a malformed key,
    /// [`CrudError::NotFound`] when no row was deleted and
    /// [`CrudError::Store`] for store failures.
    pub async fn delete(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &str,
    ) -> Result<(), CrudError> {
        let key_value = parse_key(descriptor, key)?;
        let affected = self.store.delete(descriptor, &key_value).await?;
        if affected == 0 {
            return Err(CrudError::not_found(descriptor.label));
        }
        debug!(entity = descriptor.path, key, "record deleted");
        Ok(())
    }
}

fn supplied_key(descriptor: &EntityDescriptor, bindings: &[FieldBinding]) -> FieldValue {
    bindings
        .iter()
        .find(|binding| binding.field.name == descriptor.key.name)
        .map_or(FieldValue::Null, |binding| binding.value.clone())
}

fn resolve(entity: &str) -> Result<&'static EntityDescriptor, Error> {
    lookup(entity).map_err(|err| Error::from(CrudError::from(err)))
}

#[async_trait]
impl EntityRecords for RecordService {
    async fn create(&self, entity: &str, payload: &Value) -> Result<Record, Error> {
        let descriptor = resolve(entity)?;
        Ok(Self::create(self, descriptor, payload).await?)
    }

    async fn list_page(
        &self,
        entity: &str,
        page: PageRequest,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<Record>, Error> {
        let descriptor = resolve(entity)?;
        Ok(Self::list_page(self, descriptor, page, params).await?)
    }

    async fn list_by_owner(&self, entity: &str, owner: &str) -> Result<Vec<Record>, Error> {
        let descriptor = resolve(entity)?;
        Ok(Self::list_by_owner(self, descriptor, owner).await?)
    }

    async fn get_one(&self, entity: &str, key: &str) -> Result<Record, Error> {
        let descriptor = resolve(entity)?;
        Ok(Self::get_one(self, descriptor, key).await?)
    }

    async fn update_partial(
        &self,
        entity: &str,
        key: &str,
        payload: &Value,
    ) -> Result<Record, Error> {
        let descriptor = resolve(entity)?;
        Ok(Self::update_partial(self, descriptor, key, payload).await?)
    }

    async fn delete(&self, entity: &str, key: &str) -> Result<&'static str, Error> {
        let descriptor = resolve(entity)?;
        Self::delete(self, descriptor, key).await?;
        Ok(descriptor.label)
    }
}

#[cfg(test)]
mod tests;
