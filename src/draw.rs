use itertools::Itertools;
use nalgebra_glm as glm;

use crate::config::{Config, PanelColorName};
use crate::monitor::Monitor;
use crate::panel::{Layout, Node, NodeId};
use crate::panel::points::*;
use crate::panel::signal::*;
use crate::panel::track::TRACK_WIDTH;
use crate::util::PtC;

/// Drawable extent of the panel diagram, in design coordinates.
pub const PANEL_SIZE :(f32,f32) = (520.0, 300.0);

/// Primitive draw commands in panel-local coordinates with packed RGBA
/// colors. Rebuilt every tick; the embedding shell renders them.
pub enum DrawCmd {
    Line { a :PtC, b :PtC, width :f32, color :u32 },
    Rect { a :PtC, b :PtC, color :u32 },
    RectFilled { a :PtC, b :PtC, color :u32 },
    Circle { center :PtC, radius :f32, color :u32 },
    Text { pos :PtC, text :String, color :u32 },
}

pub struct Draw {
    pub cmds :Vec<DrawCmd>,
}

impl Draw {
    pub fn new() -> Self { Draw { cmds: Vec::new() } }

    pub fn line(&mut self, a :PtC, b :PtC, width :f32, color :u32) {
        self.cmds.push(DrawCmd::Line { a: a, b: b, width: width, color: color });
    }
    pub fn rect(&mut self, a :PtC, b :PtC, color :u32) {
        self.cmds.push(DrawCmd::Rect { a: a, b: b, color: color });
    }
    pub fn circle(&mut self, center :PtC, radius :f32, color :u32) {
        self.cmds.push(DrawCmd::Circle { center: center, radius: radius, color: color });
    }
    pub fn text(&mut self, pos :PtC, text :String, color :u32) {
        self.cmds.push(DrawCmd::Text { pos: pos, text: text, color: color });
    }
}

fn flag(v :&[bool], id :NodeId) -> bool {
    v.get(id).cloned().unwrap_or(false)
}

/// Build the draw list for one tick of the panel diagram.
pub fn panel(layout :&Layout, config :&Config, mouse :PtC) -> Draw {
    let mut draw = Draw::new();
    draw.rect(glm::vec2(0.0,0.0), glm::vec2(PANEL_SIZE.0, PANEL_SIZE.1),
              config.color_u32(PanelColorName::Frame));

    let color_boundary = config.color_u32(PanelColorName::Boundary);
    let color_label = config.color_u32(PanelColorName::Label);

    for (id, node) in layout.nodes.iter().enumerate() {
        match node {
            Node::Track(t) => {
                let color = if flag(&layout.route.in_route, id) {
                    config.color_u32(PanelColorName::TrackInRoute)
                } else if layout.hover == Some(id) {
                    config.color_u32(PanelColorName::TrackHover)
                } else {
                    config.color_u32(PanelColorName::Track)
                };
                for (a,b) in t.verts.iter().cloned().tuple_windows() {
                    draw.line(a, b, TRACK_WIDTH, color);
                }
            },
            Node::Point(p) => {
                let (lo,hi) = p.boundary();
                let color = point_color(config, layout, id,
                                        p.state.moving(), p.state.ahead_like(),
                                        crate::util::in_rect(mouse, lo, hi));
                draw.line(p.hinge, p.blade_end(), TRACK_WIDTH, color);
                draw.rect(lo, hi, color_boundary);
                draw.text(lo + glm::vec2(2.0, 2.0), p.name.clone(), color_label);
            },
            Node::Crossover(c) => {
                let (lo,hi) = c.boundary();
                let color = point_color(config, layout, id,
                                        c.state.moving(), c.state.ahead_like(),
                                        crate::util::in_rect(mouse, lo, hi));
                let color_track = config.color_u32(PanelColorName::Track);
                draw.line(c.hinge, c.hinge + glm::vec2(POINT_LENGTH, 0.0),
                          TRACK_WIDTH, color_track);
                draw.line(c.hinge + glm::vec2(0.0, c.gap),
                          c.hinge + glm::vec2(POINT_LENGTH, c.gap),
                          TRACK_WIDTH, color_track);
                // the diagonal blade grows with travel
                if c.travel_fraction() > 0.0 {
                    let (a,b) = c.diagonal();
                    draw.line(a, glm::lerp(&a, &b, c.travel_fraction()), TRACK_WIDTH, color);
                }
                draw.rect(lo, hi, color_boundary);
                draw.text(lo + glm::vec2(2.0, 2.0), c.name.clone(), color_label);
            },
            Node::Triple(t) => {
                let (lo,hi) = t.boundary();
                let color = point_color(config, layout, id,
                                        t.moving(), t.selected_road() == 1,
                                        crate::util::in_rect(mouse, lo, hi));
                draw.line(t.hinge, t.blade_end(), TRACK_WIDTH, color);
                draw.rect(lo, hi, color_boundary);
                draw.text(lo + glm::vec2(2.0, 2.0), t.name.clone(), color_label);
            },
        }
    }

    for sig in layout.signals.iter() {
        draw.rect(sig.pos, sig.pos + glm::vec2(SIGNAL_WIDTH, SIGNAL_HEIGHT),
                  config.color_u32(PanelColorName::SignalCase));
        let (stop, proceed) = match sig.state {
            SignalState::Stop => (PanelColorName::SignalStop, PanelColorName::SignalProceedDim),
            SignalState::Proceed => (PanelColorName::SignalStopDim, PanelColorName::SignalProceed),
        };
        draw.circle(sig.stop_light(), LIGHT_RADIUS, config.color_u32(stop));
        draw.circle(sig.proceed_light(), LIGHT_RADIUS, config.color_u32(proceed));
    }

    draw
}

fn point_color(config :&Config, layout :&Layout, id :NodeId,
               moving :bool, ahead_like :bool, hovered :bool) -> u32 {
    let name = if !layout.route.conflicts.get(id).map(|c| c.is_empty()).unwrap_or(true) {
        PanelColorName::PointConflict
    } else if flag(&layout.route.unoccupied, id) {
        PanelColorName::PointUnoccupied
    } else if moving {
        PanelColorName::PointMoving
    } else if hovered {
        PanelColorName::PointHover
    } else if ahead_like {
        PanelColorName::PointAhead
    } else {
        PanelColorName::PointDiverge
    };
    config.color_u32(name)
}

/// Append the serial monitor lines below the diagram.
pub fn monitor_text(draw :&mut Draw, monitor :&Monitor, config :&Config) {
    let color = config.color_u32(PanelColorName::MonitorText);
    let base = glm::vec2(5.0, PANEL_SIZE.1 + 10.0);
    for (i, line) in monitor.lines().enumerate() {
        draw.text(base + glm::vec2(0.0, 12.0 * i as f32), line.to_string(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::matches;
    use crate::panel::bowmont;

    #[test]
    fn panel_draws_every_node_and_signal() {
        let config :Config = Default::default();
        let layout = bowmont::bowmont_town();
        let draw = panel(&layout, &config, glm::vec2(-10.0,-10.0));
        // one label per point
        let labels = draw.cmds.iter().filter(|c| matches!(c, DrawCmd::Text { .. })).count();
        assert_eq!(labels, layout.points_order.len());
        // two lights per signal
        let lights = draw.cmds.iter().filter(|c| matches!(c, DrawCmd::Circle { .. })).count();
        assert_eq!(lights, 2 * layout.signals.len());
        let lines = draw.cmds.iter().filter(|c| matches!(c, DrawCmd::Line { .. })).count();
        assert!(lines > layout.points_order.len());
    }

    #[test]
    fn monitor_lines_are_appended_as_text() {
        let config :Config = Default::default();
        let mut m = Monitor::new(5);
        m.push("<booted".to_string());
        m.push("S1011000000000".to_string());
        let mut draw = Draw::new();
        monitor_text(&mut draw, &m, &config);
        assert_eq!(draw.cmds.len(), 2);
        match &draw.cmds[1] {
            DrawCmd::Text { text, .. } => assert_eq!(text, "S1011000000000"),
            _ => unreachable!(),
        }
    }
}
