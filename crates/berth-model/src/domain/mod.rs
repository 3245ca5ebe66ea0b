mod labels;
pub use labels::Labels;

mod filter;
pub use filter::LabelFilter;

mod constants;
pub use constants::LABEL_MANAGED_BY;

/// Opaque instance identifier assigned by the runtime.
pub type InstanceId = String;
