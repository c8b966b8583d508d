//! Entity descriptors: the static schema of every record kind.
//!
//! Each record kind served by the backend is described once as data. The
//! CRUD engine, the statement builder and the HTTP adapter are generic over
//! an [`EntityDescriptor`]; nothing is generated or duplicated per entity.
//!
//! ## Invariants
//! - The lookup key is immutable after creation and never updatable.
//! - A generated identity is read-only and never bound on insert.
//! - The ordering field is unique per row so pagination is deterministic.

mod registry;

pub use registry::{UnknownEntity, describe, lookup};

/// Semantic type of a field, shared by payload parsing and statement binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Free text; flags such as `IsActive` are stored as text too.
    Text,
    /// 64-bit signed integer.
    Integer,
    /// Double-precision number used for amounts and day counts.
    Decimal,
    /// Calendar date serialised as `YYYY-MM-DD`.
    Date,
}

impl FieldType {
    /// Human-readable type name used in validation messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Decimal => "number",
            Self::Date => "date (YYYY-MM-DD)",
        }
    }
}

/// Which operations may write a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Written on create and on update.
    ReadWrite,
    /// Written on create only; immutable afterwards.
    CreateOnly,
    /// Produced by the store; never written by callers.
    ReadOnly,
}

/// One column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name used in JSON payloads and responses.
    pub name: &'static str,
    /// Column name in the backing relation.
    pub column: &'static str,
    /// Semantic type.
    pub ty: FieldType,
    /// Whether the field must be supplied on create.
    pub required: bool,
    /// Write access.
    pub access: Access,
}

impl FieldSpec {
    /// Optional read-write field.
    #[must_use]
    pub const fn new(name: &'static str, column: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            column,
            ty,
            required: false,
            access: Access::ReadWrite,
        }
    }

    /// Mark the field as required on create.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as writable on create only.
    #[must_use]
    pub const fn create_only(mut self) -> Self {
        self.access = Access::CreateOnly;
        self
    }

    /// Mark the field as store-produced.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    /// Whether the field appears in the insert column list.
    #[must_use]
    pub const fn is_insertable(&self) -> bool {
        !matches!(self.access, Access::ReadOnly)
    }

    /// Whether the field may appear in an update clause.
    #[must_use]
    pub const fn is_updatable(&self) -> bool {
        matches!(self.access, Access::ReadWrite)
    }
}

/// Sort direction for list statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// SQL keyword for the direction.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Equality filter accepted by the list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Query-string parameter name.
    pub param: &'static str,
    /// Field compared for equality.
    pub field: FieldSpec,
}

/// Unpaginated listing of every record owned by one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerListing {
    /// Field holding the owner identifier.
    pub owner: FieldSpec,
    /// Field used to order the listing.
    pub order_by: FieldSpec,
    /// Direction of the ordering.
    pub direction: SortDirection,
}

/// Field stamped with the request time on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    /// Field receiving the timestamp.
    pub field: FieldSpec,
    /// `chrono` format string applied to the UTC request time.
    pub format: &'static str,
}

/// Closed set of record kinds served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Staff master records.
    Employee,
    /// Leave applications.
    Leave,
    /// Recurring allowances.
    Allowance,
    /// Key/value configuration entries.
    Configuration,
    /// Recurring deductions.
    Deduction,
    /// Departments.
    Department,
    /// Per-employee leave balances.
    LeaveSummary,
    /// Monthly tax records.
    EmployeeTax,
    /// Public holidays keyed by date.
    GazettedHoliday,
    /// Yearly leave allowances per leave type.
    LeaveQuota,
    /// Login accounts.
    Login,
    /// Promotions.
    Promotion,
    /// Monthly salary payments.
    SalaryPayment,
    /// Income tax slabs.
    TaxSlab,
    /// Application users.
    User,
}

impl EntityKind {
    /// Every registered kind, in registry order.
    pub const ALL: [Self; 15] = [
        Self::Employee,
        Self::Leave,
        Self::Allowance,
        Self::Configuration,
        Self::Deduction,
        Self::Department,
        Self::LeaveSummary,
        Self::EmployeeTax,
        Self::GazettedHoliday,
        Self::LeaveQuota,
        Self::Login,
        Self::Promotion,
        Self::SalaryPayment,
        Self::TaxSlab,
        Self::User,
    ];
}

/// Static schema of one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Kind described.
    pub kind: EntityKind,
    /// Singular display name used in messages, e.g. `Employee`.
    pub label: &'static str,
    /// URL path segment, e.g. `employees`.
    pub path: &'static str,
    /// Backing relation.
    pub table: &'static str,
    /// Field used by get, update and delete.
    pub key: FieldSpec,
    /// Store-generated identity, when the relation has one.
    pub generated: Option<FieldSpec>,
    /// Field ordering list results.
    pub order_by: FieldSpec,
    /// Every column in record order.
    pub fields: &'static [FieldSpec],
    /// Equality filters accepted by the list operation.
    pub filters: &'static [FilterSpec],
    /// Optional per-owner listing.
    pub owner_listing: Option<OwnerListing>,
    /// Optional last-modified stamp applied on update.
    pub touch: Option<Touch>,
}

impl EntityDescriptor {
    /// Find a field by its wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields bound by the insert statement, in declaration order.
    pub fn insertable_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + use<> {
        self.fields.iter().filter(|field| field.is_insertable())
    }

    /// Whether the lookup key is produced by the store.
    #[must_use]
    pub fn key_is_generated(&self) -> bool {
        self.generated
            .is_some_and(|generated| generated.column == self.key.column)
    }
}
