pub mod record;
pub mod validation;

pub use record::{AgentField, AgentRecord};
pub use validation::{validate, AgentForm};
