use matches::matches;
use nalgebra_glm as glm;

use crate::util::PtC;
use crate::panel::{NodeId, Port};

pub const POINT_LENGTH :f32 = 50.0;
pub const POINT_THROW :f32 = 20.0;
pub const BOUNDARY_MARGIN :f32 = 10.0;

/// Blade movement per tick while a point is settling.
pub const TRAVEL_STEP :f32 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointState {
    Ahead,
    Diverge,
    MovingToAhead,
    MovingToDiverge,
}

impl PointState {
    /// Routing connectivity follows the physical blade position, which
    /// lags the commanded direction: a point moving toward diverge is
    /// still ahead-connected until it settles.
    pub fn ahead_like(&self) -> bool {
        matches!(self, PointState::Ahead | PointState::MovingToDiverge)
    }

    pub fn moving(&self) -> bool {
        matches!(self, PointState::MovingToAhead | PointState::MovingToDiverge)
    }

    /// A click starts the opposite transition; a click mid-transition
    /// reverses the target. Never jumps settled-to-settled.
    pub fn click(&self) -> PointState {
        match self {
            PointState::Ahead => PointState::MovingToDiverge,
            PointState::Diverge => PointState::MovingToAhead,
            PointState::MovingToAhead => PointState::MovingToDiverge,
            PointState::MovingToDiverge => PointState::MovingToAhead,
        }
    }
}

/// Orientation of a point on the diagram: where the blade runs from its
/// hinge, and which way it deflects when diverging.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Facing {
    LeftUp, LeftDown,
    RightUp, RightDown,
    UpRight, UpLeft,
    DownRight, DownLeft,
}

impl Facing {
    /// Unit direction from the hinge to the free end of the blade.
    pub fn run(&self) -> PtC {
        match self {
            Facing::LeftUp | Facing::LeftDown => glm::vec2(1.0, 0.0),
            Facing::RightUp | Facing::RightDown => glm::vec2(-1.0, 0.0),
            Facing::UpRight | Facing::UpLeft => glm::vec2(0.0, -1.0),
            Facing::DownRight | Facing::DownLeft => glm::vec2(0.0, 1.0),
        }
    }

    /// Unit direction the blade end moves when diverging.
    pub fn deflect(&self) -> PtC {
        match self {
            Facing::LeftUp | Facing::RightUp => glm::vec2(0.0, -1.0),
            Facing::LeftDown | Facing::RightDown => glm::vec2(0.0, 1.0),
            Facing::UpRight | Facing::DownRight => glm::vec2(1.0, 0.0),
            Facing::UpLeft | Facing::DownLeft => glm::vec2(-1.0, 0.0),
        }
    }

    /// Click boundary box: the blade sweep, inflated on the deflection
    /// axis.
    pub fn boundary(&self, hinge :PtC, spread :f32) -> (PtC, PtC) {
        let a = hinge;
        let b = hinge + self.run() * POINT_LENGTH + self.deflect() * spread;
        let lo = glm::vec2(a.x.min(b.x), a.y.min(b.y));
        let hi = glm::vec2(a.x.max(b.x), a.y.max(b.y));
        let d = self.deflect();
        let m = glm::vec2(d.x.abs(), d.y.abs()) * BOUNDARY_MARGIN;
        (lo - m, hi + m)
    }
}

/// Port map of a simple point, filled by the one-time wiring call. A
/// point may legitimately diverge into a stub that is not modelled.
pub struct PointConns {
    pub enter :NodeId,
    pub exit :NodeId,
    pub diverge :Option<NodeId>,
}

pub struct StraightPoint {
    pub name :String,
    pub servo :usize,
    pub hinge :PtC,
    pub facing :Facing,
    pub state :PointState,
    travel :f32,
    pub conns :Option<PointConns>,
}

impl StraightPoint {
    pub fn new(name :&str, servo :usize, hinge :PtC, facing :Facing) -> Self {
        StraightPoint {
            name: name.to_string(),
            servo: servo,
            hinge: hinge,
            facing: facing,
            state: PointState::Ahead,
            travel: 0.0,
            conns: None,
        }
    }

    pub fn click(&mut self) { self.state = self.state.click(); }

    /// Externally commanded target (hardware feedback): 0 = ahead,
    /// 1 = diverge. The caller validates range before touching any
    /// point.
    pub fn set_target(&mut self, s :u8) {
        self.state = if s == 0 { PointState::MovingToAhead }
                     else { PointState::MovingToDiverge };
    }

    /// One settling step per tick; settles the state on arrival.
    pub fn advance(&mut self) {
        match self.state {
            PointState::MovingToAhead => {
                self.travel -= TRAVEL_STEP;
                if self.travel <= 0.0 { self.travel = 0.0; self.state = PointState::Ahead; }
            },
            PointState::MovingToDiverge => {
                self.travel += TRAVEL_STEP;
                if self.travel >= POINT_THROW { self.travel = POINT_THROW; self.state = PointState::Diverge; }
            },
            _ => {},
        }
    }

    /// The pair of through-connected ports under the current state, or
    /// `None` when unwired (or diverging into an unmodelled stub).
    pub fn connected(&self) -> Option<(NodeId, NodeId)> {
        let c = self.conns.as_ref()?;
        if self.state.ahead_like() {
            Some((c.enter, c.exit))
        } else {
            c.diverge.map(|d| (c.enter, d))
        }
    }

    pub fn boundary(&self) -> (PtC, PtC) {
        self.facing.boundary(self.hinge, POINT_THROW)
    }

    pub fn blade_end(&self) -> PtC {
        self.hinge + self.facing.run() * POINT_LENGTH + self.facing.deflect() * self.travel
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CrossKind {
    /// Diverging connects top enter to bottom exit.
    TopBottom,
    /// Diverging connects bottom enter to top exit.
    BottomTop,
}

pub struct CrossoverConns {
    pub top_enter :NodeId,
    pub top_exit :NodeId,
    pub bottom_enter :NodeId,
    pub bottom_exit :NodeId,
}

/// Two parallel tracks with a switched diagonal between them. Ahead,
/// both tracks pass straight through; diverging forms the single
/// diagonal selected by `kind`.
pub struct CrossOver {
    pub name :String,
    pub servo :usize,
    /// Hinge of the top track; the bottom track runs `gap` below it.
    pub hinge :PtC,
    pub gap :f32,
    pub kind :CrossKind,
    pub state :PointState,
    travel :f32,
    pub conns :Option<CrossoverConns>,
}

impl CrossOver {
    pub fn new(name :&str, servo :usize, hinge :PtC, gap :f32, kind :CrossKind) -> Self {
        CrossOver {
            name: name.to_string(),
            servo: servo,
            hinge: hinge,
            gap: gap,
            kind: kind,
            state: PointState::Ahead,
            travel: 0.0,
            conns: None,
        }
    }

    pub fn click(&mut self) { self.state = self.state.click(); }

    pub fn set_target(&mut self, s :u8) {
        self.state = if s == 0 { PointState::MovingToAhead }
                     else { PointState::MovingToDiverge };
    }

    pub fn advance(&mut self) {
        match self.state {
            PointState::MovingToAhead => {
                self.travel -= TRAVEL_STEP;
                if self.travel <= 0.0 { self.travel = 0.0; self.state = PointState::Ahead; }
            },
            PointState::MovingToDiverge => {
                self.travel += TRAVEL_STEP;
                if self.travel >= POINT_THROW { self.travel = POINT_THROW; self.state = PointState::Diverge; }
            },
            _ => {},
        }
    }

    /// Both straight pairs when ahead-like, one diagonal when
    /// diverge-like. Empty when unwired.
    pub fn connected_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let c = match self.conns.as_ref() { Some(c) => c, None => return Vec::new() };
        if self.state.ahead_like() {
            vec![(c.top_enter, c.top_exit), (c.bottom_enter, c.bottom_exit)]
        } else {
            match self.kind {
                CrossKind::TopBottom => vec![(c.top_enter, c.bottom_exit)],
                CrossKind::BottomTop => vec![(c.bottom_enter, c.top_exit)],
            }
        }
    }

    /// Which port a node arrives at, for conflict reporting.
    pub fn port_of(&self, node :NodeId) -> Port {
        match self.conns.as_ref() {
            Some(c) if c.top_enter == node => Port::TopEnter,
            Some(c) if c.top_exit == node => Port::TopExit,
            Some(c) if c.bottom_enter == node => Port::BottomEnter,
            Some(c) if c.bottom_exit == node => Port::BottomExit,
            _ => Port::Err,
        }
    }

    pub fn boundary(&self) -> (PtC, PtC) {
        (self.hinge - glm::vec2(0.0, BOUNDARY_MARGIN),
         self.hinge + glm::vec2(POINT_LENGTH, self.gap + BOUNDARY_MARGIN))
    }

    /// Fixed ends of the moving diagonal, by kind.
    pub fn diagonal(&self) -> (PtC, PtC) {
        match self.kind {
            CrossKind::TopBottom => (self.hinge,
                                     self.hinge + glm::vec2(POINT_LENGTH, self.gap)),
            CrossKind::BottomTop => (self.hinge + glm::vec2(0.0, self.gap),
                                     self.hinge + glm::vec2(POINT_LENGTH, 0.0)),
        }
    }

    /// 0.0 fully ahead, 1.0 fully diverged.
    pub fn travel_fraction(&self) -> f32 { self.travel / POINT_THROW }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TripleState {
    Road(usize),
    MovingToRoad(usize),
}

pub struct TripleConns {
    pub trunk :NodeId,
    pub roads :[NodeId; 3],
}

/// Three-way stub point: the trunk always connects to exactly one of
/// three roads. Clicking cycles the target road.
pub struct TriplePoint {
    pub name :String,
    pub servo :usize,
    pub hinge :PtC,
    pub facing :Facing,
    pub state :TripleState,
    travel :f32,
    pub conns :Option<TripleConns>,
}

impl TriplePoint {
    pub fn new(name :&str, servo :usize, hinge :PtC, facing :Facing) -> Self {
        TriplePoint {
            name: name.to_string(),
            servo: servo,
            hinge: hinge,
            facing: facing,
            state: TripleState::Road(1),
            travel: 0.0,
            conns: None,
        }
    }

    /// The settled or target road.
    pub fn selected_road(&self) -> usize {
        match self.state {
            TripleState::Road(r) | TripleState::MovingToRoad(r) => r,
        }
    }

    pub fn click(&mut self) {
        self.state = TripleState::MovingToRoad((self.selected_road() + 1) % 3);
    }

    pub fn set_target(&mut self, road :usize) {
        if self.state != TripleState::Road(road) {
            self.state = TripleState::MovingToRoad(road);
        }
    }

    fn road_offset(road :usize) -> f32 { (road as f32 - 1.0) * POINT_THROW }

    pub fn advance(&mut self) {
        if let TripleState::MovingToRoad(r) = self.state {
            let target = Self::road_offset(r);
            if (target - self.travel).abs() <= TRAVEL_STEP {
                self.travel = target;
                self.state = TripleState::Road(r);
            } else if target > self.travel {
                self.travel += TRAVEL_STEP;
            } else {
                self.travel -= TRAVEL_STEP;
            }
        }
    }

    /// Trunk to the selected road. The target road connects while
    /// moving.
    pub fn connected(&self) -> Option<(NodeId, NodeId)> {
        let c = self.conns.as_ref()?;
        Some((c.trunk, c.roads[self.selected_road()]))
    }

    pub fn port_of(&self, node :NodeId) -> Port {
        match self.conns.as_ref() {
            Some(c) if c.trunk == node => Port::Trunk,
            Some(c) => match c.roads.iter().position(|&r| r == node) {
                Some(i) => Port::Road(i),
                None => Port::Err,
            },
            None => Port::Err,
        }
    }

    pub fn boundary(&self) -> (PtC, PtC) {
        let a = self.hinge - self.facing.deflect() * POINT_THROW;
        let b = self.hinge + self.facing.run() * POINT_LENGTH + self.facing.deflect() * POINT_THROW;
        let lo = glm::vec2(a.x.min(b.x), a.y.min(b.y));
        let hi = glm::vec2(a.x.max(b.x), a.y.max(b.y));
        let d = self.facing.deflect();
        let m = glm::vec2(d.x.abs(), d.y.abs()) * BOUNDARY_MARGIN;
        (lo - m, hi + m)
    }

    pub fn blade_end(&self) -> PtC {
        self.hinge + self.facing.run() * POINT_LENGTH + self.facing.deflect() * self.travel
    }

    pub fn moving(&self) -> bool { matches!(self.state, TripleState::MovingToRoad(_)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::in_rect;

    fn wired_point() -> StraightPoint {
        let mut p = StraightPoint::new("1", 0, glm::vec2(50.0,100.0), Facing::LeftUp);
        p.conns = Some(PointConns { enter: 10, exit: 11, diverge: Some(12) });
        p
    }

    #[test]
    fn point_connectivity_follows_blade_position() {
        let mut p = wired_point();
        p.state = PointState::Ahead;
        assert_eq!(p.connected(), Some((10,11)));
        p.state = PointState::Diverge;
        assert_eq!(p.connected(), Some((10,12)));
        // mid-transition connectivity reflects where the blade still is
        p.state = PointState::MovingToAhead;
        assert_eq!(p.connected(), Some((10,12)));
        p.state = PointState::MovingToDiverge;
        assert_eq!(p.connected(), Some((10,11)));
    }

    #[test]
    fn click_never_jumps_between_settled_states() {
        let mut p = wired_point();
        assert_eq!(p.state, PointState::Ahead);
        p.click();
        assert_eq!(p.state, PointState::MovingToDiverge);
        // second click before settling reverses the target
        p.click();
        assert_eq!(p.state, PointState::MovingToAhead);
        p.click();
        assert_eq!(p.state, PointState::MovingToDiverge);
    }

    #[test]
    fn point_settles_after_full_travel() {
        let mut p = wired_point();
        p.click();
        for _ in 0..(POINT_THROW as usize - 1) {
            p.advance();
            assert_eq!(p.state, PointState::MovingToDiverge);
        }
        p.advance();
        assert_eq!(p.state, PointState::Diverge);
        // and back again
        p.set_target(0);
        for _ in 0..(POINT_THROW as usize) { p.advance(); }
        assert_eq!(p.state, PointState::Ahead);
        assert_eq!(p.blade_end(), glm::vec2(100.0, 100.0));
    }

    #[test]
    fn external_target_matches_click_result() {
        let mut p = wired_point();
        p.set_target(1);
        assert_eq!(p.state, PointState::MovingToDiverge);
        p.set_target(0);
        assert_eq!(p.state, PointState::MovingToAhead);
    }

    #[test]
    fn boundary_covers_the_blade_sweep() {
        let p = wired_point();
        let (lo,hi) = p.boundary();
        // LeftUp: blade runs right, deflects up
        assert_eq!(lo, glm::vec2(50.0, 100.0 - POINT_THROW - BOUNDARY_MARGIN));
        assert_eq!(hi, glm::vec2(50.0 + POINT_LENGTH, 100.0 + BOUNDARY_MARGIN));
        assert!(in_rect(glm::vec2(75.0, 95.0), lo, hi));
        assert!(!in_rect(glm::vec2(75.0, 130.0), lo, hi));
    }

    fn wired_crossover(kind :CrossKind) -> CrossOver {
        let mut c = CrossOver::new("x", 2, glm::vec2(0.0,0.0), 50.0, kind);
        c.conns = Some(CrossoverConns {
            top_enter: 20, top_exit: 21, bottom_enter: 22, bottom_exit: 23,
        });
        c
    }

    #[test]
    fn crossover_ahead_has_both_straight_pairs() {
        let c = wired_crossover(CrossKind::TopBottom);
        assert_eq!(c.connected_pairs(), vec![(20,21),(22,23)]);
        let mut c = wired_crossover(CrossKind::TopBottom);
        c.state = PointState::MovingToDiverge;
        assert_eq!(c.connected_pairs(), vec![(20,21),(22,23)]);
    }

    #[test]
    fn crossover_diverge_forms_one_diagonal() {
        let mut c = wired_crossover(CrossKind::TopBottom);
        c.state = PointState::Diverge;
        assert_eq!(c.connected_pairs(), vec![(20,23)]);
        let mut c = wired_crossover(CrossKind::BottomTop);
        c.state = PointState::Diverge;
        assert_eq!(c.connected_pairs(), vec![(22,21)]);
        // moving back to ahead is still diverge-connected
        c.state = PointState::MovingToAhead;
        assert_eq!(c.connected_pairs(), vec![(22,21)]);
    }

    #[test]
    fn crossover_ports() {
        let c = wired_crossover(CrossKind::TopBottom);
        assert_eq!(c.port_of(20), Port::TopEnter);
        assert_eq!(c.port_of(23), Port::BottomExit);
        assert_eq!(c.port_of(99), Port::Err);
    }

    fn wired_triple() -> TriplePoint {
        let mut t = TriplePoint::new("5", 6, glm::vec2(0.0,0.0), Facing::LeftUp);
        t.conns = Some(TripleConns { trunk: 30, roads: [31,32,33] });
        t
    }

    #[test]
    fn triple_click_cycles_roads() {
        let mut t = wired_triple();
        assert_eq!(t.state, TripleState::Road(1));
        t.click();
        assert_eq!(t.state, TripleState::MovingToRoad(2));
        t.click();
        assert_eq!(t.state, TripleState::MovingToRoad(0));
        t.click();
        assert_eq!(t.state, TripleState::MovingToRoad(1));
    }

    #[test]
    fn triple_connects_trunk_to_target_road() {
        let mut t = wired_triple();
        assert_eq!(t.connected(), Some((30,32)));
        t.set_target(0);
        assert_eq!(t.connected(), Some((30,31)));
        // settle
        for _ in 0..(POINT_THROW as usize + 1) { t.advance(); }
        assert_eq!(t.state, TripleState::Road(0));
        assert_eq!(t.connected(), Some((30,31)));
    }

    #[test]
    fn triple_target_at_settled_road_is_a_noop() {
        let mut t = wired_triple();
        t.set_target(1);
        assert_eq!(t.state, TripleState::Road(1));
    }
}
