use glam::Vec2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleContact {
    /// Unit vector pointing from the first circle's center to the second one.
    pub normal: Vec2,
    pub depth: f32
}

pub trait CircleIntersectionQuery where Self: Copy {
    fn circle_contact(self, radius: f32, other: Self, other_radius: f32) -> Option<CircleContact>;

    fn is_circle_intersect(self, radius: f32, other: Self, other_radius: f32) -> bool {
        self.circle_contact(radius, other, other_radius).is_some()
    }
}

impl CircleIntersectionQuery for Vec2 {
    fn circle_contact(self, radius: f32, other: Self, other_radius: f32) -> Option<CircleContact> {
        let delta = other - self;
        let combined_radius = radius + other_radius;
        let distance_sq = delta.length_squared();
        if distance_sq >= combined_radius * combined_radius {
            return None;
        }
        let distance = distance_sq.sqrt();
        let normal = if distance < 0.000001 {
            // concentric circles, any separating direction will do
            Vec2::X
        } else {
            delta / distance
        };
        Some(CircleContact { normal, depth: combined_radius - distance })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundsHit {
    pub x: bool,
    pub y: bool
}

impl BoundsHit {
    pub fn any(self) -> bool { self.x || self.y }
}

pub trait BoundsContainmentQuery where Self: Copy {
    /// Pushes a circle back inside the `[min, max]` box and reports which axes were hit.
    fn contain_circle(self, radius: f32, min: Self, max: Self) -> (Self, BoundsHit);
}

impl BoundsContainmentQuery for Vec2 {
    fn contain_circle(self, radius: f32, min: Self, max: Self) -> (Self, BoundsHit) {
        let mut hit = BoundsHit::default();
        let mut center = self;

        let (lo_x, hi_x) = (min.x + radius, max.x - radius);
        if lo_x <= hi_x {
            if center.x < lo_x {
                center.x = lo_x;
                hit.x = true;
            } else if center.x > hi_x {
                center.x = hi_x;
                hit.x = true;
            }
        }

        let (lo_y, hi_y) = (min.y + radius, max.y - radius);
        if lo_y <= hi_y {
            if center.y < lo_y {
                center.y = lo_y;
                hit.y = true;
            } else if center.y > hi_y {
                center.y = hi_y;
                hit.y = true;
            }
        }

        (center, hit)
    }
}
