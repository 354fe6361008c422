// Library exports for the DH kinematics core

pub mod errors;
pub mod dh;
pub mod transforms;
pub mod chain;
pub mod ik;
pub mod impair;
pub mod robot_config;

pub use errors::{KinematicsError, Result};
pub use dh::{DhConvention, DhParameters};
pub use transforms::{pose_error, Pose};
pub use chain::KinematicChain;
pub use ik::{IkConfig, IkResult, IkSolver};
pub use impair::impair;
pub use robot_config::{RobotConfig, RobotModel};
