pub mod track;
pub mod points;
pub mod signal;
pub mod route;
pub mod bowmont;

use boolinator::Boolinator;
use log::*;

use crate::link::{self, Link};
use crate::util::PtC;
use crate::panel::track::TrackSegment;
use crate::panel::points::*;
use crate::panel::signal::Signal;
use crate::panel::route::RouteStatus;

pub type NodeId = usize;

/// Ports of the various point kinds, used for conflict reporting.
/// `Err` means the arrival could not be resolved to a port at all
/// (asymmetric wiring).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Port {
    Enter, Exit, Diverge,
    TopEnter, TopExit, BottomEnter, BottomExit,
    Trunk, Road(usize),
    Err,
}

pub enum Node {
    Track(TrackSegment),
    Point(StraightPoint),
    Crossover(CrossOver),
    Triple(TriplePoint),
}

/// Per-tick input sampled by the shell: mouse in panel-local
/// coordinates, and whether the primary button was released this tick.
pub struct Input {
    pub mouse :PtC,
    pub mouse_up :bool,
}

#[derive(Debug)]
pub enum WiringIssue {
    /// Node a declares node b, but b does not declare a back.
    Asymmetric { a :NodeId, b :NodeId },
    /// A point was never given its port map.
    Unwired { node :NodeId },
    /// A track lists more than its two logical ends.
    TooManyConnections { node :NodeId },
}

impl std::fmt::Display for WiringIssue {
    fn fmt(&self, f :&mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WiringIssue::Asymmetric { a, b } =>
                write!(f, "node {} connects to node {}, but not the other way around", a, b),
            WiringIssue::Unwired { node } =>
                write!(f, "point node {} has no port wiring", node),
            WiringIssue::TooManyConnections { node } =>
                write!(f, "track node {} has more than two connections", node),
        }
    }
}

/// The aggregate root: arena of track and point nodes, the signals,
/// and the transient per-tick hover/route state. Construction and
/// wiring happen once at startup; afterwards only point states and the
/// per-tick flags change.
pub struct Layout {
    pub name :String,
    pub nodes :Vec<Node>,
    pub signals :Vec<Signal>,
    /// Fixed feedback application order (point creation order).
    pub points_order :Vec<NodeId>,
    pub hover :Option<NodeId>,
    pub route :RouteStatus,
}

impl Layout {
    pub fn new(name :&str) -> Self {
        Layout {
            name: name.to_string(),
            nodes: Vec::new(),
            signals: Vec::new(),
            points_order: Vec::new(),
            hover: None,
            route: RouteStatus::empty(0),
        }
    }

    fn add_node(&mut self, node :Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_track(&mut self, verts :Vec<PtC>) -> NodeId {
        self.add_node(Node::Track(TrackSegment::new(verts)))
    }

    pub fn add_point(&mut self, name :&str, servo :usize, hinge :PtC, facing :Facing) -> NodeId {
        let id = self.add_node(Node::Point(StraightPoint::new(name, servo, hinge, facing)));
        self.points_order.push(id);
        id
    }

    pub fn add_crossover(&mut self, name :&str, servo :usize, hinge :PtC, gap :f32, kind :CrossKind) -> NodeId {
        let id = self.add_node(Node::Crossover(CrossOver::new(name, servo, hinge, gap, kind)));
        self.points_order.push(id);
        id
    }

    pub fn add_triple(&mut self, name :&str, servo :usize, hinge :PtC, facing :Facing) -> NodeId {
        let id = self.add_node(Node::Triple(TriplePoint::new(name, servo, hinge, facing)));
        self.points_order.push(id);
        id
    }

    pub fn add_signal(&mut self, pos :PtC) {
        self.signals.push(Signal::new(pos));
    }

    pub fn wire_track(&mut self, id :NodeId, connections :Vec<NodeId>) {
        match &mut self.nodes[id] {
            Node::Track(t) => { t.connections = connections; },
            _ => { error!("wire_track: node {} is not a track", id); },
        }
    }

    pub fn wire_point(&mut self, id :NodeId, conns :PointConns) {
        match &mut self.nodes[id] {
            Node::Point(p) => { p.conns = Some(conns); },
            _ => { error!("wire_point: node {} is not a point", id); },
        }
    }

    pub fn wire_crossover(&mut self, id :NodeId, conns :CrossoverConns) {
        match &mut self.nodes[id] {
            Node::Crossover(c) => { c.conns = Some(conns); },
            _ => { error!("wire_crossover: node {} is not a crossover", id); },
        }
    }

    pub fn wire_triple(&mut self, id :NodeId, conns :TripleConns) {
        match &mut self.nodes[id] {
            Node::Triple(t) => { t.conns = Some(conns); },
            _ => { error!("wire_triple: node {} is not a triple", id); },
        }
    }

    /// All node ids this node declares adjacency to.
    fn declared(&self, id :NodeId) -> Vec<NodeId> {
        match &self.nodes[id] {
            Node::Track(t) => t.connections.clone(),
            Node::Point(p) => match p.conns.as_ref() {
                Some(c) => {
                    let mut v = vec![c.enter, c.exit];
                    v.extend(c.diverge);
                    v
                },
                None => Vec::new(),
            },
            Node::Crossover(x) => match x.conns.as_ref() {
                Some(c) => vec![c.top_enter, c.top_exit, c.bottom_enter, c.bottom_exit],
                None => Vec::new(),
            },
            Node::Triple(t) => match t.conns.as_ref() {
                Some(c) => {
                    let mut v = vec![c.trunk];
                    v.extend(c.roads.iter().cloned());
                    v
                },
                None => Vec::new(),
            },
        }
    }

    /// Startup consistency check: symmetric adjacency, unwired points,
    /// connection-count limits. Issues are warnings, never fatal; a
    /// broken edge just becomes uncrossable for the traversal.
    pub fn check_wiring(&self) -> Vec<WiringIssue> {
        let mut issues = Vec::new();
        for id in 0..self.nodes.len() {
            match &self.nodes[id] {
                Node::Track(t) => {
                    if t.connections.len() > 2 {
                        issues.push(WiringIssue::TooManyConnections { node: id });
                    }
                },
                Node::Point(p) => if p.conns.is_none() {
                    issues.push(WiringIssue::Unwired { node: id });
                },
                Node::Crossover(c) => if c.conns.is_none() {
                    issues.push(WiringIssue::Unwired { node: id });
                },
                Node::Triple(t) => if t.conns.is_none() {
                    issues.push(WiringIssue::Unwired { node: id });
                },
            }
            for other in self.declared(id) {
                if !self.declared(other).contains(&id) {
                    issues.push(WiringIssue::Asymmetric { a: id, b: other });
                }
            }
        }
        issues
    }

    pub fn node_name(&self, id :NodeId) -> &str {
        match &self.nodes[id] {
            Node::Track(_) => "track",
            Node::Point(p) => &p.name,
            Node::Crossover(c) => &c.name,
            Node::Triple(t) => &t.name,
        }
    }

    /// One tick: sample hover, handle clicks (sending outbound point
    /// commands), advance settling blades, and recompute the route
    /// from the hovered segment.
    pub fn update(&mut self, input :&Input, link :&mut Link) {
        self.hover = self.nodes.iter().enumerate().find_map(|(id,n)| match n {
            Node::Track(t) => t.hit(input.mouse).as_some(id),
            _ => None,
        });

        if input.mouse_up {
            let mut thrown = Vec::new();
            for node in self.nodes.iter_mut() {
                match node {
                    Node::Point(p) => {
                        let (lo,hi) = p.boundary();
                        if crate::util::in_rect(input.mouse, lo, hi) {
                            p.click();
                            thrown.push(p.servo);
                        }
                    },
                    Node::Crossover(c) => {
                        let (lo,hi) = c.boundary();
                        if crate::util::in_rect(input.mouse, lo, hi) {
                            c.click();
                            thrown.push(c.servo);
                        }
                    },
                    Node::Triple(t) => {
                        let (lo,hi) = t.boundary();
                        if crate::util::in_rect(input.mouse, lo, hi) {
                            t.click();
                            thrown.push(t.servo);
                        }
                    },
                    Node::Track(_) => {},
                }
            }
            for servo in thrown {
                link.write(&link::point_command(servo));
            }
            for sig in self.signals.iter_mut() {
                if sig.hit(input.mouse) { sig.toggle(); }
            }
        }

        for node in self.nodes.iter_mut() {
            match node {
                Node::Point(p) => p.advance(),
                Node::Crossover(c) => c.advance(),
                Node::Triple(t) => t.advance(),
                Node::Track(_) => {},
            }
        }

        let status = match self.hover {
            Some(root) => route::trace(self, root),
            None => RouteStatus::empty(self.nodes.len()),
        };
        self.route = status;
    }

    /// Apply a decoded feedback vector, one target state per point in
    /// `points_order`. Validation happens before any point is touched:
    /// a bad vector leaves every state unchanged.
    pub fn apply_feedback(&mut self, states :&[u8]) {
        if states.len() != self.points_order.len() {
            error!("Feedback has {} states, layout has {} points; ignoring.",
                   states.len(), self.points_order.len());
            return;
        }
        for (i, &s) in states.iter().enumerate() {
            let id = self.points_order[i];
            let arity = match &self.nodes[id] {
                Node::Point(_) | Node::Crossover(_) => 2,
                Node::Triple(_) => 3,
                Node::Track(_) => 0,
            };
            if (s as usize) >= arity {
                error!("Feedback state {} out of range for point {}; ignoring line.",
                       s, self.node_name(id));
                return;
            }
        }
        for (i, &s) in states.iter().enumerate() {
            match &mut self.nodes[self.points_order[i]] {
                Node::Point(p) => p.set_target(s),
                Node::Crossover(c) => c.set_target(s),
                Node::Triple(t) => t.set_target(s as usize),
                Node::Track(_) => {},
            }
        }
    }
}
