use nalgebra_glm as glm;

pub type Pt = glm::I32Vec2;
pub type PtC = glm::Vec2;

pub fn in_rect(pt :PtC, a :PtC, b :PtC) -> bool {
    let (x_lo,x_hi) = (a.x.min(b.x), a.x.max(b.x));
    let (y_lo,y_hi) = (a.y.min(b.y), a.y.max(b.y));
    x_lo <= pt.x && pt.x <= x_hi && y_lo <= pt.y && pt.y <= y_hi
}

pub fn project_to_line(p :PtC, a :PtC, b :PtC) -> (PtC,f32) {
    let t = glm::clamp_scalar(glm::dot(&(p-a),&(b-a)) / glm::distance2(&a,&b), 0.0, 1.0);
    (glm::lerp(&a,&b,t), t)
}

pub fn dist_to_line_sqr(p0 :PtC, a :PtC, b :PtC) -> (f32,f32) {
    let (p,param) = project_to_line(p0,a,b);
    (glm::length2(&(p - p0)), param)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;

    #[test]
    fn rect_contains_point() {
        // corners in either order
        assert!(in_rect(glm::vec2(5.0,5.0), glm::vec2(0.0,0.0), glm::vec2(10.0,10.0)));
        assert!(in_rect(glm::vec2(5.0,5.0), glm::vec2(10.0,10.0), glm::vec2(0.0,0.0)));
        assert!(!in_rect(glm::vec2(-1.0,5.0), glm::vec2(0.0,0.0), glm::vec2(10.0,10.0)));
    }

    #[test]
    fn dist_to_segment_clamps_at_endpoints() {
        let a = glm::vec2(0.0,0.0);
        let b = glm::vec2(10.0,0.0);
        let (d2,t) = dist_to_line_sqr(glm::vec2(5.0,3.0), a, b);
        assert!((d2 - 9.0).abs() < 1e-4);
        assert!((t - 0.5).abs() < 1e-4);
        let (d2,t) = dist_to_line_sqr(glm::vec2(-4.0,0.0), a, b);
        assert!((d2 - 16.0).abs() < 1e-4);
        assert!(t == 0.0);
    }
}
