mod copy;
mod error;
mod field;
mod metrics;
mod node;
mod offset;
mod post;
mod queue;
mod report;
mod scalar;
mod timestamp;
mod tree;

/// Error and result aliases.
pub use error::{PvError, Result};
/// Type descriptor representation: kinds, declarations, and fields.
pub use field::{Field, FieldDecl, Kind, ScalarKind, StructDecl, UnionDecl};
/// Injectable lifecycle accounting.
pub use metrics::{CountingMetrics, LifecycleMetrics};
/// Value tree node types and handles.
pub use node::{NodeId, PvNode, UnionValue};
/// Mutation notification seam.
pub use post::PostHandler;
/// Bounded diagnostic message queue.
pub use queue::{Message, MessageKind, MessageQueue, QUEUE_METRICS_LABEL};
/// Serializable tree snapshots.
pub use report::TreeReport;
/// Scalar and scalar-array payload containers.
pub use scalar::{ScalarArrayValue, ScalarValue};
/// Time-stamp convenience structure and accessor.
pub use timestamp::{PvTimeStamp, TimeStamp};
/// The value tree itself and its construction limits.
pub use tree::{PvTree, TREE_METRICS_LABEL, TreeOptions};
