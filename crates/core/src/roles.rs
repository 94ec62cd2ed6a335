//! Well-known role names and the capability matrix.
//!
//! Role storage and assignment live outside this core; handlers receive an
//! already-authenticated role name and consult [`role_has_permission`]
//! rather than comparing role strings inline.

/// Full administrative access.
pub const ROLE_ADMIN: &str = "admin";
/// Gate staff: records vehicle entries and exits.
pub const ROLE_ATTENDANT: &str = "attendant";
/// A parking customer: owns vehicles and slot requests.
pub const ROLE_CUSTOMER: &str = "customer";

/// Capabilities guarded at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Create, update, and delete facilities.
    ManageFacilities,
    /// Create, update, and delete slots.
    ManageSlots,
    /// Approve and reject slot requests.
    ResolveRequests,
    /// Record vehicle entries and exits.
    RecordEntries,
    /// Submit and cancel own slot requests.
    RequestSlot,
    /// Read facilities, slots, requests, and entries.
    ViewReports,
}

/// Whether `role` carries `permission`.
///
/// Unknown role names carry nothing.
pub fn role_has_permission(role: &str, permission: Permission) -> bool {
    use Permission::*;
    match role {
        ROLE_ADMIN => true,
        ROLE_ATTENDANT => matches!(permission, RecordEntries | ViewReports),
        ROLE_CUSTOMER => matches!(permission, RequestSlot | ViewReports),
        _ => false,
    }
}
