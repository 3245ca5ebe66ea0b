mod domain;
pub use domain::{LABEL_MANAGED_BY, InstanceId};
pub use domain::{LabelFilter, Labels};

mod error;
pub use error::{ModelError, ModelResult};

mod instance;
pub use instance::Instance;

mod spec;
pub use spec::ServiceSpec;
