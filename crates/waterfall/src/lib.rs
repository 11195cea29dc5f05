pub mod bounds;
pub mod flatten;
pub mod row;
pub mod state;

pub use bounds::{BarPosition, TimelineBounds};
pub use flatten::{FlattenedTrace, flatten_trace};
pub use row::{ContinuingDepth, Row, RowEntry};
pub use state::{ViewAction, ViewState};
