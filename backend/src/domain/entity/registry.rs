//! Static registry of every entity descriptor.

use super::FieldType::{Date, Decimal, Integer, Text};
use super::{EntityDescriptor, EntityKind, FieldSpec, FilterSpec, OwnerListing, SortDirection, Touch};

/// Raised when a transport-supplied entity name is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity `{name}`")]
pub struct UnknownEntity {
    /// Name that failed to resolve.
    pub name: String,
}

/// Descriptor for a registered kind.
///
/// Total over [`EntityKind`]; every variant has exactly one descriptor.
#[must_use]
pub fn describe(kind: EntityKind) -> &'static EntityDescriptor {
    match kind {
        EntityKind::Employee => &EMPLOYEE,
        EntityKind::Leave => &LEAVE,
        EntityKind::Allowance => &ALLOWANCE,
        EntityKind::Configuration => &CONFIGURATION,
        EntityKind::Deduction => &DEDUCTION,
        EntityKind::Department => &DEPARTMENT,
        EntityKind::LeaveSummary => &LEAVE_SUMMARY,
        EntityKind::EmployeeTax => &EMPLOYEE_TAX,
        EntityKind::GazettedHoliday => &GAZETTED_HOLIDAY,
        EntityKind::LeaveQuota => &LEAVE_QUOTA,
        EntityKind::Login => &LOGIN,
        EntityKind::Promotion => &PROMOTION,
        EntityKind::SalaryPayment => &SALARY_PAYMENT,
        EntityKind::TaxSlab => &TAX_SLAB,
        EntityKind::User => &USER,
    }
}

/// Resolve a URL path segment such as `employees` to its descriptor.
///
/// # Errors
///
/// Returns [`UnknownEntity`] when no descriptor uses `path`.
pub fn lookup(path: &str) -> Result<&'static EntityDescriptor, UnknownEntity> {
    EntityKind::ALL
        .into_iter()
        .map(describe)
        .find(|descriptor| descriptor.path == path)
        .ok_or_else(|| UnknownEntity {
            name: path.to_owned(),
        })
}

// Employees -----------------------------------------------------------------

const EMPLOYEE_UID: FieldSpec = FieldSpec::new("uid", "uid", Integer).read_only();
const EMPLOYEE_ID: FieldSpec = FieldSpec::new("EmployeeID", "employee_id", Text)
    .required()
    .create_only();
const EMPLOYEE_MODIFIED_ON: FieldSpec = FieldSpec::new("ModifiedOn", "modified_on", Text);

static EMPLOYEE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Employee,
    label: "Employee",
    path: "employees",
    table: "employees",
    key: EMPLOYEE_ID,
    generated: Some(EMPLOYEE_UID),
    order_by: EMPLOYEE_UID,
    fields: &[
        EMPLOYEE_UID,
        EMPLOYEE_ID,
        FieldSpec::new("EmployeeName", "employee_name", Text),
        FieldSpec::new("CNIC", "cnic", Text),
        FieldSpec::new("FatherName", "father_name", Text),
        FieldSpec::new("DOB", "dob", Text),
        FieldSpec::new("MobileNo", "mobile_no", Text),
        FieldSpec::new("Department", "department", Text),
        FieldSpec::new("Designation", "designation", Text),
        FieldSpec::new("DateOfJoining", "date_of_joining", Date),
        FieldSpec::new("EmployeeStatus", "employee_status", Text),
        FieldSpec::new("ModifiedBy", "modified_by", Text),
        EMPLOYEE_MODIFIED_ON,
        FieldSpec::new("Details", "details", Text),
        FieldSpec::new("Project", "project", Text),
        FieldSpec::new("CarryForwardLeaves", "carry_forward_leaves", Decimal),
        FieldSpec::new("Year2022", "year_2022", Decimal),
        FieldSpec::new("Year2023", "year_2023", Decimal),
        FieldSpec::new("AdjustedAjusted", "adjusted_ajusted", Integer),
        FieldSpec::new("Year2024", "year_2024", Integer),
        FieldSpec::new("CarryForwardLeaves1", "carry_forward_leaves_1", Decimal),
        FieldSpec::new("Year2023New", "year_2023_new", Decimal),
        FieldSpec::new("BasicSalary", "basic_salary", Decimal),
        FieldSpec::new("ApplyTax", "apply_tax", Text),
    ],
    filters: &[],
    owner_listing: None,
    touch: Some(Touch {
        field: EMPLOYEE_MODIFIED_ON,
        format: "%Y-%m-%d %H:%M:%S",
    }),
};

// Leaves --------------------------------------------------------------------

const LEAVE_UID: FieldSpec = FieldSpec::new("uid", "uid", Integer).read_only();
const LEAVE_EMPLOYEE_ID: FieldSpec =
    FieldSpec::new("EmployeeID", "employee_id", Text).required();
const LEAVE_START_DATE: FieldSpec = FieldSpec::new("StartDate", "start_date", Date).required();
const LEAVE_STATUS: FieldSpec = FieldSpec::new("Status", "status", Text);
const LEAVE_YEAR: FieldSpec = FieldSpec::new("Year", "year", Text);

static LEAVE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Leave,
    label: "Leave",
    path: "leaves",
    table: "employee_leaves",
    key: LEAVE_UID,
    generated: Some(LEAVE_UID),
    order_by: LEAVE_UID,
    fields: &[
        LEAVE_UID,
        LEAVE_EMPLOYEE_ID,
        FieldSpec::new("LeaveTypeName", "leave_type_name", Text).required(),
        LEAVE_START_DATE,
        FieldSpec::new("EndDate", "end_date", Date).required(),
        FieldSpec::new("TotalDays", "total_days", Decimal),
        FieldSpec::new("AddDays", "add_days", Integer),
        FieldSpec::new("ExcludeDays", "exclude_days", Integer),
        FieldSpec::new("Short_Adj", "short_adj", Text),
        FieldSpec::new("DepSupervisorComments", "dep_supervisor_comments", Text),
        LEAVE_YEAR,
        LEAVE_STATUS,
        FieldSpec::new("ApprovedBy", "approved_by", Text),
        FieldSpec::new("ApprovedOn", "approved_on", Date),
        FieldSpec::new("AppliedDate", "applied_date", Date),
    ],
    filters: &[
        FilterSpec {
            param: "employee_id",
            field: LEAVE_EMPLOYEE_ID,
        },
        FilterSpec {
            param: "status",
            field: LEAVE_STATUS,
        },
        FilterSpec {
            param: "year",
            field: LEAVE_YEAR,
        },
    ],
    owner_listing: Some(OwnerListing {
        owner: LEAVE_EMPLOYEE_ID,
        order_by: LEAVE_START_DATE,
        direction: SortDirection::Descending,
    }),
    touch: None,
};

// Allowances and deductions -------------------------------------------------

const ALLOWANCE_ID: FieldSpec = FieldSpec::new("AllowanceID", "allowance_id", Integer).read_only();

static ALLOWANCE: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Allowance,
    label: "Allowance",
    path: "allowances",
    table: "allowances",
    key: ALLOWANCE_ID,
    generated: Some(ALLOWANCE_ID),
    order_by: ALLOWANCE_ID,
    fields: &[
        ALLOWANCE_ID,
        FieldSpec::new("EmployeeID", "employee_id", Text).required(),
        FieldSpec::new("AllowanceType", "allowance_type", Text).required(),
        FieldSpec::new("Amount", "amount", Decimal).required(),
        FieldSpec::new("IsActive", "is_active", Text),
        FieldSpec::new("Frequency", "frequency", Text),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const DEDUCTION_ID: FieldSpec = FieldSpec::new("DeductionID", "deduction_id", Integer).read_only();

static DEDUCTION: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Deduction,
    label: "Deduction",
    path: "deductions",
    table: "deductions",
    key: DEDUCTION_ID,
    generated: Some(DEDUCTION_ID),
    order_by: DEDUCTION_ID,
    fields: &[
        DEDUCTION_ID,
        FieldSpec::new("EmployeeID", "employee_id", Text).required(),
        FieldSpec::new("DeductionType", "deduction_type", Text).required(),
        FieldSpec::new("Amount", "amount", Decimal).required(),
        FieldSpec::new("IsActive", "is_active", Text),
        FieldSpec::new("Frequency", "frequency", Text),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

// Reference data ------------------------------------------------------------

const CONFIGURATION_UID: FieldSpec = FieldSpec::new("UID", "uid", Integer).read_only();

static CONFIGURATION: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Configuration,
    label: "Configuration",
    path: "configurations",
    table: "configurations",
    key: CONFIGURATION_UID,
    generated: Some(CONFIGURATION_UID),
    order_by: CONFIGURATION_UID,
    fields: &[
        CONFIGURATION_UID,
        FieldSpec::new("ConfigKey", "config_key", Text).required(),
        FieldSpec::new("ConfigValue", "config_value", Text).required(),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const DEPARTMENT_ID: FieldSpec =
    FieldSpec::new("DepartmentID", "department_id", Integer).read_only();

static DEPARTMENT: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Department,
    label: "Department",
    path: "departments",
    table: "departments",
    key: DEPARTMENT_ID,
    generated: Some(DEPARTMENT_ID),
    order_by: DEPARTMENT_ID,
    fields: &[
        DEPARTMENT_ID,
        FieldSpec::new("DepartmentName", "department_name", Text).required(),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const HOLIDAY_DATE: FieldSpec = FieldSpec::new("HolidayDate", "holiday_date", Date)
    .required()
    .create_only();

static GAZETTED_HOLIDAY: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::GazettedHoliday,
    label: "Gazetted holiday",
    path: "gazetted-holidays",
    table: "gazetted_holidays",
    key: HOLIDAY_DATE,
    generated: None,
    order_by: HOLIDAY_DATE,
    fields: &[HOLIDAY_DATE, FieldSpec::new("Description", "description", Text)],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const LEAVE_QUOTA_UID: FieldSpec = FieldSpec::new("UID", "uid", Integer).read_only();

static LEAVE_QUOTA: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::LeaveQuota,
    label: "Leave quota",
    path: "leave-quota",
    table: "leave_quotas",
    key: LEAVE_QUOTA_UID,
    generated: Some(LEAVE_QUOTA_UID),
    order_by: LEAVE_QUOTA_UID,
    fields: &[
        LEAVE_QUOTA_UID,
        FieldSpec::new("LeaveTypeName", "leave_type_name", Text).required(),
        FieldSpec::new("TotalLeaves", "total_leaves", Integer).required(),
        FieldSpec::new("Year", "year", Text).required(),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

// Leave balances ------------------------------------------------------------

const SUMMARY_EMPLOYEE_ID: FieldSpec = FieldSpec::new("EmployeeID", "employee_id", Integer)
    .required()
    .create_only();

static LEAVE_SUMMARY: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::LeaveSummary,
    label: "Leave summary",
    path: "leave-summary",
    table: "employee_leave_summaries",
    key: SUMMARY_EMPLOYEE_ID,
    generated: None,
    order_by: SUMMARY_EMPLOYEE_ID,
    fields: &[
        SUMMARY_EMPLOYEE_ID,
        FieldSpec::new("TotalYear2022", "total_year_2022", Integer),
        FieldSpec::new("RemainingYear2022", "remaining_year_2022", Integer),
        FieldSpec::new("TotalYear2023", "total_year_2023", Integer),
        FieldSpec::new("RemainingYear2023", "remaining_year_2023", Integer),
        FieldSpec::new("TotalYear2024", "total_year_2024", Integer),
        FieldSpec::new("RemainingYear2024", "remaining_year_2024", Integer),
        FieldSpec::new("TotalAllYears", "total_all_years", Integer),
        FieldSpec::new("RemainingAllYears", "remaining_all_years", Integer),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

// Payroll -------------------------------------------------------------------

const TAX_ID: FieldSpec = FieldSpec::new("TaxID", "tax_id", Integer).read_only();

static EMPLOYEE_TAX: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::EmployeeTax,
    label: "Employee tax",
    path: "employee-tax",
    table: "employee_taxes",
    key: TAX_ID,
    generated: Some(TAX_ID),
    order_by: TAX_ID,
    fields: &[
        TAX_ID,
        FieldSpec::new("EmployeeID", "employee_id", Text),
        FieldSpec::new("SalaryYear", "salary_year", Integer),
        FieldSpec::new("SalaryMonth", "salary_month", Text),
        FieldSpec::new("SlabID", "slab_id", Integer),
        FieldSpec::new("TaxAmount", "tax_amount", Decimal),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const PROMOTION_ID: FieldSpec = FieldSpec::new("PromotionID", "promotion_id", Integer).read_only();

static PROMOTION: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Promotion,
    label: "Promotion",
    path: "promotions",
    table: "promotions",
    key: PROMOTION_ID,
    generated: Some(PROMOTION_ID),
    order_by: PROMOTION_ID,
    fields: &[
        PROMOTION_ID,
        FieldSpec::new("EmployeeID", "employee_id", Text),
        FieldSpec::new("Title", "title", Text),
        FieldSpec::new("EffectiveDate", "effective_date", Date),
        FieldSpec::new("NewSalary", "new_salary", Decimal),
        FieldSpec::new("Remarks", "remarks", Text),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const PAYMENT_ID: FieldSpec = FieldSpec::new("PaymentID", "payment_id", Integer).read_only();

static SALARY_PAYMENT: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::SalaryPayment,
    label: "Salary payment",
    path: "salary-payments",
    table: "salary_payments",
    key: PAYMENT_ID,
    generated: Some(PAYMENT_ID),
    order_by: PAYMENT_ID,
    fields: &[
        PAYMENT_ID,
        FieldSpec::new("EmployeeID", "employee_id", Text).required(),
        FieldSpec::new("SalaryYear", "salary_year", Integer).required(),
        FieldSpec::new("SalaryMonth", "salary_month", Text).required(),
        FieldSpec::new("BasicSalary", "basic_salary", Decimal).required(),
        FieldSpec::new("TotalAllowances", "total_allowances", Decimal),
        FieldSpec::new("TotalDeductions", "total_deductions", Decimal),
        FieldSpec::new("TaxAmount", "tax_amount", Decimal),
        FieldSpec::new("PaymentDate", "payment_date", Date),
        FieldSpec::new("SlabID", "slab_id", Integer),
        FieldSpec::new("GrossSalary", "gross_salary", Decimal),
        FieldSpec::new("NetSalary", "net_salary", Decimal).read_only(),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const SLAB_ID: FieldSpec = FieldSpec::new("SlabID", "slab_id", Integer).read_only();

static TAX_SLAB: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::TaxSlab,
    label: "Tax slab",
    path: "taxslabs",
    table: "tax_slabs",
    key: SLAB_ID,
    generated: Some(SLAB_ID),
    order_by: SLAB_ID,
    fields: &[
        SLAB_ID,
        FieldSpec::new("FiscalYearStart", "fiscal_year_start", Date),
        FieldSpec::new("FiscalYearEnd", "fiscal_year_end", Date),
        FieldSpec::new("LowerLimit", "lower_limit", Decimal),
        FieldSpec::new("UpperLimit", "upper_limit", Decimal),
        FieldSpec::new("TaxRate", "tax_rate", Decimal),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

// Accounts ------------------------------------------------------------------

const LOGIN_UID: FieldSpec = FieldSpec::new("uid", "uid", Integer).read_only();

static LOGIN: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Login,
    label: "Login",
    path: "logins",
    table: "logins",
    key: LOGIN_UID,
    generated: Some(LOGIN_UID),
    order_by: LOGIN_UID,
    fields: &[
        LOGIN_UID,
        FieldSpec::new("UserID", "user_id", Text)
            .required()
            .create_only(),
        FieldSpec::new("Username", "username", Text),
        FieldSpec::new("Password", "password", Text),
        FieldSpec::new("Role", "role", Text),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};

const USER_UID: FieldSpec = FieldSpec::new("uid", "uid", Integer).read_only();

static USER: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::User,
    label: "User",
    path: "users",
    table: "users",
    key: USER_UID,
    generated: Some(USER_UID),
    order_by: USER_UID,
    fields: &[
        USER_UID,
        FieldSpec::new("Username", "username", Text),
        FieldSpec::new("PasswordHash", "password_hash", Text).required(),
        FieldSpec::new("Role", "role", Text).required(),
    ],
    filters: &[],
    owner_listing: None,
    touch: None,
};
