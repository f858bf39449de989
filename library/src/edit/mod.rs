pub mod constraints;
pub mod drag;
pub mod edit_point;
pub mod linked;
pub mod ripple;
pub mod roll;
pub mod slip;
pub mod snap;
pub mod split;
pub mod time;

pub use constraints::{ConstraintReason, RollBounds, RollResult, roll_bounds, solve_roll};
pub use drag::{
    ClipDragSession, DragContext, DragInterrupt, DragOutcome, DragPhase, DragPreview, DragType,
};
pub use edit_point::{EditPoint, edit_point_at, edit_points, find_edit_point};
pub use linked::{LinkedSelection, find_companions};
pub use ripple::{AffectedClip, RippleOperation, RippleResult, apply_ripple, ripple};
pub use roll::RollEditor;
pub use slip::{SlipEditor, SlipOriginal, SlipResult, compute_slip};
pub use snap::{SnapKind, SnapPoint, collect_snap_points, nearest_snap_point, snap_clip_edges};
pub use split::{SplitResult, split_clip};
