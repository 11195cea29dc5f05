pub mod info;
pub mod issue;
pub mod transaction;

pub use info::TraceInfo;
pub use issue::{TraceError, TraceIssue};
pub use transaction::{TraceSplitResults, TraceTransaction};
