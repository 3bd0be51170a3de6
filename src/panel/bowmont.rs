use nalgebra_glm as glm;

use crate::panel::Layout;
use crate::panel::points::*;

/// The Bowmont Town panel: double-track main line (up over down), two
/// crossovers between the mains, a bay and carriage siding off the up
/// line, a refuge off the down line, a release stub, and a goods yard
/// fanned by the three-way point.
///
/// All wiring is hand-specified design data. Feedback order and servo
/// indices follow the hardware: the crossovers and the triple occupy
/// two raw servo positions each, so the servo numbering has gaps.
pub fn bowmont_town() -> Layout {
    let mut l = Layout::new("Bowmont Town");
    let v = |x :f32, y :f32| glm::vec2(x, y);

    // Up main, west to east (y = 150).
    let u0 = l.add_track(vec![v(10.0,150.0), v(60.0,150.0)]);
    let u1 = l.add_track(vec![v(110.0,150.0), v(150.0,150.0)]);
    let u2 = l.add_track(vec![v(200.0,150.0), v(250.0,150.0)]);
    let u3 = l.add_track(vec![v(300.0,150.0), v(330.0,150.0)]);
    let u4 = l.add_track(vec![v(380.0,150.0), v(430.0,150.0)]);

    // Down main (y = 200).
    let d0 = l.add_track(vec![v(10.0,200.0), v(60.0,200.0)]);
    let d1a = l.add_track(vec![v(110.0,200.0), v(160.0,200.0)]);
    let d1b = l.add_track(vec![v(210.0,200.0), v(250.0,200.0)]);
    let d2 = l.add_track(vec![v(300.0,200.0), v(330.0,200.0)]);
    let d3 = l.add_track(vec![v(380.0,200.0), v(400.0,200.0)]);
    let d4 = l.add_track(vec![v(450.0,200.0), v(470.0,200.0)]);

    // Bay platform and release stub, above the up main.
    let bay_a = l.add_track(vec![v(110.0,130.0), v(200.0,130.0)]);
    let bay_b = l.add_track(vec![v(250.0,130.0), v(330.0,130.0)]);
    let rel = l.add_track(vec![v(250.0,110.0), v(290.0,110.0)]);

    // Carriage sidings.
    let cs_a = l.add_track(vec![v(200.0,105.0), v(290.0,105.0)]);
    let cs_b = l.add_track(vec![v(340.0,105.0), v(430.0,105.0)]);
    let cs2 = l.add_track(vec![v(340.0,85.0), v(410.0,85.0)]);

    // Refuge siding off the down line.
    let refuge = l.add_track(vec![v(130.0,235.0), v(260.0,235.0)]);

    // Goods yard: approach from the down line, three roads off the
    // triple.
    let gy_app = l.add_track(vec![v(210.0,220.0), v(240.0,260.0)]);
    let gy1 = l.add_track(vec![v(290.0,240.0), v(380.0,240.0)]);
    let gy2 = l.add_track(vec![v(290.0,260.0), v(380.0,260.0)]);
    let gy3 = l.add_track(vec![v(290.0,280.0), v(380.0,280.0)]);

    // Headshunt beyond the east crossover.
    let hs = l.add_track(vec![v(450.0,235.0), v(500.0,235.0)]);

    // Points, in feedback order.
    let p0 = l.add_point("P0", 0, v(60.0,150.0), Facing::LeftUp);
    let p1 = l.add_point("P1", 1, v(150.0,150.0), Facing::LeftUp);
    let c2 = l.add_crossover("C2", 2, v(250.0,150.0), 50.0, CrossKind::TopBottom);
    let p3 = l.add_point("P3", 4, v(60.0,200.0), Facing::LeftDown);
    let p4 = l.add_point("P4", 5, v(200.0,130.0), Facing::LeftUp);
    let t5 = l.add_triple("T5", 6, v(240.0,260.0), Facing::LeftDown);
    let c6 = l.add_crossover("C6", 8, v(330.0,150.0), 50.0, CrossKind::BottomTop);
    let p7 = l.add_point("P7", 10, v(160.0,200.0), Facing::LeftDown);
    let p8 = l.add_point("P8", 11, v(290.0,105.0), Facing::LeftUp);
    let p9 = l.add_point("P9", 12, v(400.0,200.0), Facing::LeftDown);

    // Track sides of the adjacency.
    l.wire_track(u0, vec![p0]);
    l.wire_track(u1, vec![p0, p1]);
    l.wire_track(u2, vec![p1, c2]);
    l.wire_track(u3, vec![c2, c6]);
    l.wire_track(u4, vec![c6]);
    l.wire_track(d0, vec![p3]);
    l.wire_track(d1a, vec![p3, p7]);
    l.wire_track(d1b, vec![p7, c2]);
    l.wire_track(d2, vec![c2, c6]);
    l.wire_track(d3, vec![c6, p9]);
    l.wire_track(d4, vec![p9]);
    l.wire_track(bay_a, vec![p0, p4]);
    l.wire_track(bay_b, vec![p4]);
    l.wire_track(rel, vec![p4]);
    l.wire_track(cs_a, vec![p1, p8]);
    l.wire_track(cs_b, vec![p8]);
    l.wire_track(cs2, vec![p8]);
    l.wire_track(refuge, vec![p3]);
    l.wire_track(gy_app, vec![p7, t5]);
    l.wire_track(gy1, vec![t5]);
    l.wire_track(gy2, vec![t5]);
    l.wire_track(gy3, vec![t5]);
    l.wire_track(hs, vec![p9]);

    // Point sides.
    l.wire_point(p0, PointConns { enter: u0, exit: u1, diverge: Some(bay_a) });
    l.wire_point(p1, PointConns { enter: u1, exit: u2, diverge: Some(cs_a) });
    l.wire_crossover(c2, CrossoverConns {
        top_enter: u2, top_exit: u3, bottom_enter: d1b, bottom_exit: d2,
    });
    l.wire_point(p3, PointConns { enter: d0, exit: d1a, diverge: Some(refuge) });
    l.wire_point(p4, PointConns { enter: bay_a, exit: bay_b, diverge: Some(rel) });
    l.wire_triple(t5, TripleConns { trunk: gy_app, roads: [gy1, gy2, gy3] });
    l.wire_crossover(c6, CrossoverConns {
        top_enter: u3, top_exit: u4, bottom_enter: d2, bottom_exit: d3,
    });
    l.wire_point(p7, PointConns { enter: d1a, exit: d1b, diverge: Some(gy_app) });
    l.wire_point(p8, PointConns { enter: cs_a, exit: cs_b, diverge: Some(cs2) });
    l.wire_point(p9, PointConns { enter: d3, exit: d4, diverge: Some(hs) });

    // Signals.
    l.add_signal(v(14.0, 155.0));
    l.add_signal(v(395.0, 110.0));
    l.add_signal(v(14.0, 205.0));
    l.add_signal(v(455.0, 240.0));

    l
}
