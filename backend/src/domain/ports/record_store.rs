//! Driven port for entity record persistence.
//!
//! The [`RecordStore`] executes exactly one logical statement per call
//! against the relation named by an [`EntityDescriptor`]. Insert is the one
//! exception: it runs the insert and the read-back of the new row as a pair
//! on the same connection, with no statement in between.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::entity::{EntityDescriptor, FieldSpec, OwnerListing, SortDirection};
use crate::domain::{FieldBinding, FieldValue, Record};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum RecordStoreError {
        /// A connection could not be checked out of the pool.
        Connection { message: String } =>
            "record store connection failed: {message}",
        /// A statement failed during execution.
        Query { message: String } =>
            "record store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        UniqueViolation { message: String } =>
            "record store uniqueness violated: {message}",
        /// A row could not be decoded against its descriptor.
        Decode { message: String } =>
            "record store row could not be decoded: {message}",
    }
}

/// Selection, ordering and window of a list statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Equality predicates, ANDed together.
    pub filters: Vec<FieldBinding>,
    /// Ordering field.
    pub order_by: &'static FieldSpec,
    /// Ordering direction.
    pub direction: SortDirection,
    /// Offset window; `None` returns every matching row.
    pub page: Option<PageRequest>,
}

impl ListQuery {
    /// Paginated listing ordered by the descriptor's ordering field.
    #[must_use]
    pub const fn page(
        descriptor: &'static EntityDescriptor,
        filters: Vec<FieldBinding>,
        page: PageRequest,
    ) -> Self {
        Self {
            filters,
            order_by: &descriptor.order_by,
            direction: SortDirection::Ascending,
            page: Some(page),
        }
    }

    /// Every row owned by `owner`, in the listing's order.
    #[must_use]
    pub fn owned_by(listing: &'static OwnerListing, owner: FieldValue) -> Self {
        Self {
            filters: vec![FieldBinding::new(&listing.owner, owner)],
            order_by: &listing.order_by,
            direction: listing.direction,
            page: None,
        }
    }
}

/// Port for entity record storage.
///
/// Every method acquires a connection for the duration of the call and
/// releases it on every exit path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one row and read it back on the same connection.
    ///
    /// `bindings` lists every insertable field in declaration order. Returns
    /// `None` when the read-back finds no row.
    async fn insert(
        &self,
        descriptor: &'static EntityDescriptor,
        bindings: &[FieldBinding],
    ) -> Result<Option<Record>, RecordStoreError>;

    /// Select rows matching `query`.
    async fn list(
        &self,
        descriptor: &'static EntityDescriptor,
        query: &ListQuery,
    ) -> Result<Vec<Record>, RecordStoreError>;

    /// Select the row whose lookup key equals `key`.
    async fn find(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<Option<Record>, RecordStoreError>;

    /// Existence probe by lookup key.
    async fn exists(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<bool, RecordStoreError>;

    /// Apply `bindings` to the row whose lookup key equals `key`.
    ///
    /// Returns the number of affected rows.
    async fn update(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
        bindings: &[FieldBinding],
    ) -> Result<u64, RecordStoreError>;

    /// Delete the row whose lookup key equals `key`.
    ///
    /// Returns the number of affected rows.
    async fn delete(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<u64, RecordStoreError>;
}
