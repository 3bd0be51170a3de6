use itertools::Itertools;

use crate::util::{self, PtC};
use crate::panel::NodeId;

pub const TRACK_WIDTH :f32 = 5.0;

/// Drawable polyline of track. `connections` names the node attached at
/// each logical end (0..=2; plumbing segments used for chaining may have
/// only one). Wiring is set once by `Layout::wire_track` and never
/// changes afterwards.
pub struct TrackSegment {
    pub verts :Vec<PtC>,
    pub connections :Vec<NodeId>,
}

impl TrackSegment {
    pub fn new(verts :Vec<PtC>) -> Self {
        debug_assert!(verts.len() >= 2);
        TrackSegment { verts: verts, connections: Vec::new() }
    }

    /// Mouse-position hit test against the polyline.
    pub fn hit(&self, p :PtC) -> bool {
        let r = TRACK_WIDTH / 2.0 + 1.5;
        self.verts.iter().cloned().tuple_windows()
            .any(|(a,b)| util::dist_to_line_sqr(p, a, b).0 <= r * r)
    }
}
