//! Obstacle geometry derived from the body and the projection queries used to keep cloth outside it.

pub mod queries;
pub mod shapes;

pub use queries::{closest_point_on_segment, perpendicular_to, project_outside};
pub use shapes::{check_radius, CapsuleObstacle, GroundPlane, SphereObstacle};
