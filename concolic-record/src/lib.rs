//! Path condition buffer and comparison/branch/switch recorder
//! (components C3, C4).

pub mod constraint;
pub mod operand;
pub mod pathcond;
pub mod recorder;
pub mod session;

pub use constraint::{CompareKind, Constraint, Sign};
pub use operand::Operand;
pub use pathcond::PathCondition;
pub use session::{RecorderConfig, Session};
