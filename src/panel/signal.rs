use nalgebra_glm as glm;

use crate::util::{self, PtC};

pub const SIGNAL_WIDTH :f32 = 22.0;
pub const SIGNAL_HEIGHT :f32 = 40.0;
pub const LIGHT_RADIUS :f32 = 5.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignalState {
    Stop,
    Proceed,
}

/// Two-aspect signal head. Clickable, but not part of the route graph.
pub struct Signal {
    pub pos :PtC,
    pub state :SignalState,
}

impl Signal {
    pub fn new(pos :PtC) -> Self {
        Signal { pos: pos, state: SignalState::Stop }
    }

    pub fn hit(&self, p :PtC) -> bool {
        util::in_rect(p, self.pos, self.pos + glm::vec2(SIGNAL_WIDTH, SIGNAL_HEIGHT))
    }

    pub fn toggle(&mut self) {
        self.state = match self.state {
            SignalState::Stop => SignalState::Proceed,
            SignalState::Proceed => SignalState::Stop,
        };
    }

    pub fn stop_light(&self) -> PtC {
        self.pos + glm::vec2(SIGNAL_WIDTH / 2.0, 12.0)
    }

    pub fn proceed_light(&self) -> PtC {
        self.pos + glm::vec2(SIGNAL_WIDTH / 2.0, SIGNAL_HEIGHT - 12.0)
    }
}
