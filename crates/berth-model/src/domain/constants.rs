//! Well-known label keys.

/// Label attached by `berthctl` to every instance it creates.
///
/// Lets operators list only berth-managed instances with a key-present filter.
pub const LABEL_MANAGED_BY: &str = "berth.managed-by";
