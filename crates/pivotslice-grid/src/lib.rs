pub mod aggregate;
pub mod axis;
pub mod cell;
pub mod config;
pub mod constraint;
pub mod edges;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod index;
pub mod layout;
pub mod overlay;
pub mod partition;
pub mod query;
pub mod session;
pub mod snapshot;

pub use aggregate::{AggregationMode, CellView};
pub use axis::{AxisEdit, GridAxis};
pub use cell::{Cell, CellStats, NodeVisual, Point, ScatterBasis};
pub use config::{LayoutSettings, SessionConfig};
pub use constraint::{Constraint, NumericRange};
pub use edges::{EdgeKey, EdgeVisual};
pub use error::{InvariantViolation, QueryError};
pub use filter::Filter;
pub use highlight::Highlight;
pub use index::{VisualIndex, VisualLocation};
pub use layout::{CellLayouter, CellLinks, DiagonalLayouter, ForceDirectedLayouter, FreeAxes};
pub use overlay::HeatMetric;
pub use partition::{CellMatrix, assignment};
pub use query::parse_constraint;
pub use session::GridSession;
pub use snapshot::{CellSnapshot, GridSnapshot, LineSnapshot};
