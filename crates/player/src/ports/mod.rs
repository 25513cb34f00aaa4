//! Ports - seams between the session logic and the outside world.

pub mod outbound;
