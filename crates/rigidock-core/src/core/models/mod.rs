pub mod atom;
pub mod coords;
pub mod rigid_body;
