use std::collections::{HashSet, VecDeque};

use crate::panel::{Layout, Node, NodeId, Port};

/// Result of one traversal pass. Recomputed fresh every tick, indexed
/// by arena node id.
#[derive(Debug, Clone)]
pub struct RouteStatus {
    pub in_route :Vec<bool>,
    pub unoccupied :Vec<bool>,
    pub conflicts :Vec<Vec<Port>>,
}

impl RouteStatus {
    pub fn empty(n :usize) -> Self {
        RouteStatus {
            in_route: vec![false; n],
            unoccupied: vec![false; n],
            conflicts: vec![Vec::new(); n],
        }
    }
}

/// Breadth-first walk from the hovered root segment, following only the
/// through-connections implied by current point states.
///
/// Marks `in_route` on every reachable segment. A simple point entered
/// from a port outside its current through-pair is flagged
/// `unoccupied`; a crossover or triple gets a `conflict` at the
/// offending port. The visited set is keyed by `(node, arrived_from)`
/// so even layouts with point-only cycles terminate.
pub fn trace(layout :&Layout, root :NodeId) -> RouteStatus {
    let mut status = RouteStatus::empty(layout.nodes.len());
    let root_track = match &layout.nodes[root] {
        Node::Track(t) => t,
        _ => { return status; },  // hover roots are always tracks
    };

    status.in_route[root] = true;
    let mut visited :HashSet<(NodeId,NodeId)> = HashSet::new();
    let mut queue :VecDeque<(NodeId,NodeId)> = VecDeque::new();
    for &c in &root_track.connections {
        if visited.insert((c, root)) { queue.push_back((c, root)); }
    }

    while let Some((node, from)) = queue.pop_front() {
        let next = match &layout.nodes[node] {
            Node::Track(t) => {
                if !status.in_route[node] {
                    status.in_route[node] = true;
                    for &c in &t.connections {
                        if visited.insert((c, node)) { queue.push_back((c, node)); }
                    }
                }
                continue;
            },
            Node::Point(p) => {
                match p.connected() {
                    Some((a,b)) if from == a => Some(b),
                    Some((a,b)) if from == b => Some(a),
                    _ => {
                        status.unoccupied[node] = true;
                        None
                    },
                }
            },
            Node::Crossover(c) => {
                match other_side(&c.connected_pairs(), from) {
                    Some(n) => Some(n),
                    None => {
                        status.conflicts[node].push(c.port_of(from));
                        None
                    },
                }
            },
            Node::Triple(t) => {
                match t.connected() {
                    Some((a,b)) if from == a => Some(b),
                    Some((a,b)) if from == b => Some(a),
                    _ => {
                        status.conflicts[node].push(t.port_of(from));
                        None
                    },
                }
            },
        };

        if let Some(n) = next {
            if visited.insert((n, node)) { queue.push_back((n, node)); }
        }
    }

    status
}

fn other_side(pairs :&[(NodeId,NodeId)], from :NodeId) -> Option<NodeId> {
    for &(a,b) in pairs {
        if from == a { return Some(b); }
        if from == b { return Some(a); }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;
    use crate::panel::Layout;
    use crate::panel::points::*;
    use crate::panel::track::TrackSegment;

    fn track(layout :&mut Layout, x0 :f32, x1 :f32) -> NodeId {
        layout.add_track(vec![glm::vec2(x0, 100.0), glm::vec2(x1, 100.0)])
    }

    /// seg0 -p0- seg1 -p1- seg2, both points ahead.
    fn linear_layout() -> (Layout, [NodeId;3], [NodeId;2]) {
        let mut l = Layout::new("test");
        let s0 = track(&mut l, 0.0, 50.0);
        let s1 = track(&mut l, 100.0, 150.0);
        let s2 = track(&mut l, 200.0, 250.0);
        let p0 = l.add_point("0", 0, glm::vec2(50.0,100.0), Facing::LeftUp);
        let p1 = l.add_point("1", 1, glm::vec2(150.0,100.0), Facing::LeftUp);
        l.wire_track(s0, vec![p0]);
        l.wire_track(s1, vec![p0, p1]);
        l.wire_track(s2, vec![p1]);
        l.wire_point(p0, PointConns { enter: s0, exit: s1, diverge: None });
        l.wire_point(p1, PointConns { enter: s1, exit: s2, diverge: None });
        (l, [s0,s1,s2], [p0,p1])
    }

    #[test]
    fn linear_route_marks_all_segments() {
        let (l, segs, points) = linear_layout();
        let status = trace(&l, segs[0]);
        for s in segs.iter() { assert!(status.in_route[*s]); }
        for p in points.iter() {
            assert!(!status.unoccupied[*p]);
            assert!(status.conflicts[*p].is_empty());
        }
    }

    #[test]
    fn route_stops_at_diverged_point() {
        let (mut l, segs, points) = linear_layout();
        // p1 diverges (no diverge leg wired), cutting seg1 off from seg2
        match &mut l.nodes[points[1]] {
            Node::Point(p) => { p.state = PointState::Diverge; },
            _ => unreachable!(),
        }
        let status = trace(&l, segs[0]);
        assert!(status.in_route[segs[0]]);
        assert!(status.in_route[segs[1]]);
        assert!(!status.in_route[segs[2]]);
        assert!(status.unoccupied[points[1]]);
        assert!(!status.unoccupied[points[0]]);
    }

    #[test]
    fn entry_from_unconnected_port_flags_unoccupied() {
        let mut l = Layout::new("test");
        let main = track(&mut l, 0.0, 50.0);
        let ahead = track(&mut l, 100.0, 150.0);
        let div = l.add_track(vec![glm::vec2(100.0,80.0), glm::vec2(150.0,80.0)]);
        let beyond = track(&mut l, 150.0, 200.0);
        let p = l.add_point("0", 0, glm::vec2(50.0,100.0), Facing::LeftUp);
        l.wire_track(main, vec![p]);
        l.wire_track(ahead, vec![p]);
        l.wire_track(div, vec![p, beyond]);
        l.wire_track(beyond, vec![div]);
        l.wire_point(p, PointConns { enter: main, exit: ahead, diverge: Some(div) });

        // point is ahead; hovering the diverge leg enters from the
        // unconnected port
        let status = trace(&l, div);
        assert!(status.in_route[div]);
        assert!(status.in_route[beyond]);
        assert!(status.unoccupied[p]);
        // nothing was forwarded through the point
        assert!(!status.in_route[main]);
        assert!(!status.in_route[ahead]);
    }

    #[test]
    fn crossover_routes_both_tracks_when_ahead() {
        let mut l = Layout::new("test");
        let te = track(&mut l, 0.0, 50.0);
        let tx = track(&mut l, 100.0, 150.0);
        let be = l.add_track(vec![glm::vec2(0.0,150.0), glm::vec2(50.0,150.0)]);
        let bx = l.add_track(vec![glm::vec2(100.0,150.0), glm::vec2(150.0,150.0)]);
        let c = l.add_crossover("x", 2, glm::vec2(50.0,100.0), 50.0, CrossKind::TopBottom);
        l.wire_track(te, vec![c]);
        l.wire_track(tx, vec![c]);
        l.wire_track(be, vec![c]);
        l.wire_track(bx, vec![c]);
        l.wire_crossover(c, CrossoverConns {
            top_enter: te, top_exit: tx, bottom_enter: be, bottom_exit: bx,
        });

        let status = trace(&l, te);
        assert!(status.in_route[te] && status.in_route[tx]);
        // the bottom track is a separate route
        assert!(!status.in_route[be] && !status.in_route[bx]);
        assert!(status.conflicts[c].is_empty());

        // diverge: top enter now crosses to bottom exit
        match &mut l.nodes[c] { Node::Crossover(x) => { x.state = PointState::Diverge; }, _ => unreachable!() }
        let status = trace(&l, te);
        assert!(status.in_route[te] && status.in_route[bx]);
        assert!(!status.in_route[tx] && !status.in_route[be]);

        // and the cut-off bottom enter conflicts at its port
        let status = trace(&l, be);
        assert_eq!(status.conflicts[c], vec![Port::BottomEnter]);
        assert!(!status.in_route[te] && !status.in_route[tx] && !status.in_route[bx]);
    }

    #[test]
    fn triple_routes_selected_road_only() {
        let mut l = Layout::new("test");
        let trunk = track(&mut l, 0.0, 50.0);
        let r0 = track(&mut l, 100.0, 150.0);
        let r1 = l.add_track(vec![glm::vec2(100.0,120.0), glm::vec2(150.0,120.0)]);
        let r2 = l.add_track(vec![glm::vec2(100.0,140.0), glm::vec2(150.0,140.0)]);
        let t = l.add_triple("t", 6, glm::vec2(50.0,100.0), Facing::LeftUp);
        l.wire_track(trunk, vec![t]);
        for r in [r0,r1,r2].iter() { l.wire_track(*r, vec![t]); }
        l.wire_triple(t, TripleConns { trunk: trunk, roads: [r0,r1,r2] });

        let status = trace(&l, trunk);
        assert!(status.in_route[r1]);
        assert!(!status.in_route[r0] && !status.in_route[r2]);

        // hovering an unselected road conflicts at that road's port
        let status = trace(&l, r2);
        assert_eq!(status.conflicts[t], vec![Port::Road(2)]);
    }

    #[test]
    fn point_only_cycle_terminates() {
        // c1 is an ahead crossover whose bottom pair loops back through
        // two ahead points, so the walk orbits c1 -> p2 -> p3 -> c1
        // forever without the (node, arrived_from) visited guard.
        let mut l = Layout::new("test");
        let root = track(&mut l, 0.0, 50.0);
        let c1 = l.add_crossover("c", 2, glm::vec2(50.0,100.0), 50.0, CrossKind::TopBottom);
        let p2 = l.add_point("2", 3, glm::vec2(150.0,100.0), Facing::LeftUp);
        let p3 = l.add_point("3", 4, glm::vec2(250.0,100.0), Facing::LeftUp);
        l.wire_track(root, vec![c1]);
        l.wire_crossover(c1, CrossoverConns {
            top_enter: root, top_exit: p2, bottom_enter: p2, bottom_exit: p3,
        });
        l.wire_point(p2, PointConns { enter: c1, exit: p3, diverge: None });
        l.wire_point(p3, PointConns { enter: p2, exit: c1, diverge: None });

        let status = trace(&l, root);
        assert!(status.in_route[root]);
    }

    #[test]
    fn empty_hover_is_an_empty_status() {
        let (l, segs, _) = linear_layout();
        let status = RouteStatus::empty(l.nodes.len());
        assert!(!status.in_route[segs[0]]);
        assert!(status.unoccupied.iter().all(|u| !u));
    }
}
