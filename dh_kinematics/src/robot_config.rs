//! Preset robot models
//!
//! Modified DH tables for a few common 6- and 7-axis arms, in the
//! `[alpha, a, theta, d]` column order used throughout the crate. Angles in
//! radians, lengths in mm. The θ column holds the offset between the
//! controller's joint zero and the DH zero.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::chain::KinematicChain;
use crate::dh::DhConvention;
use crate::errors::Result;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotModel {
    /// Universal Robots UR10: 10kg payload, 1300mm reach
    Ur10,
    /// Mecademic Meca500: 0.5kg payload, 330mm reach
    Meca500,
    /// ABB IRB 120: 3kg payload, 580mm reach
    AbbIrb120,
    /// KUKA LBR iiwa 7 R800: 7kg payload, 800mm reach
    KukaLbrIiwa7,
}

impl RobotModel {
    /// Get all available robot models.
    pub fn all() -> Vec<RobotModel> {
        vec![
            RobotModel::Ur10,
            RobotModel::Meca500,
            RobotModel::AbbIrb120,
            RobotModel::KukaLbrIiwa7,
        ]
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            RobotModel::Ur10 => "UR10",
            RobotModel::Meca500 => "Meca500",
            RobotModel::AbbIrb120 => "IRB 120",
            RobotModel::KukaLbrIiwa7 => "LBR iiwa 7",
        }
    }
}

/// Robot configuration with its DH table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub model: RobotModel,

    /// Maximum payload in kg
    pub max_payload: f64,

    /// Maximum reach in mm
    pub max_reach: f64,

    #[serde(default)]
    pub convention: DhConvention,

    /// One `[alpha, a, theta, d]` row per joint
    pub dh_table: Vec<[f64; 4]>,
}

impl RobotConfig {
    pub fn ur10() -> Self {
        Self {
            model: RobotModel::Ur10,
            max_payload: 10.0,
            max_reach: 1300.0,
            convention: DhConvention::Modified,
            dh_table: vec![
                [0.0, 0.0, 0.0, 118.0],
                [FRAC_PI_2, 0.0, PI, 0.0],
                [0.0, 612.7, 0.0, 0.0],
                [0.0, 571.6, 0.0, 163.9],
                [-FRAC_PI_2, 0.0, 0.0, 115.7],
                [FRAC_PI_2, 0.0, PI, 92.2],
            ],
        }
    }

    pub fn meca500() -> Self {
        Self {
            model: RobotModel::Meca500,
            max_payload: 0.5,
            max_reach: 330.0,
            convention: DhConvention::Modified,
            dh_table: vec![
                [0.0, 0.0, 0.0, 135.0],
                [-FRAC_PI_2, 0.0, -FRAC_PI_2, 0.0],
                [0.0, 135.0, 0.0, 0.0],
                [-FRAC_PI_2, 38.0, 0.0, 120.0],
                [FRAC_PI_2, 0.0, 0.0, 0.0],
                [-FRAC_PI_2, 0.0, PI, 72.0],
            ],
        }
    }

    pub fn abb_irb120() -> Self {
        Self {
            model: RobotModel::AbbIrb120,
            max_payload: 3.0,
            max_reach: 580.0,
            convention: DhConvention::Modified,
            dh_table: vec![
                [0.0, 0.0, 0.0, 290.0],
                [-FRAC_PI_2, 0.0, -FRAC_PI_2, 0.0],
                [0.0, 270.0, 0.0, 0.0],
                [-FRAC_PI_2, 70.0, 0.0, 302.0],
                [FRAC_PI_2, 0.0, 0.0, 0.0],
                [-FRAC_PI_2, 0.0, PI, 72.0],
            ],
        }
    }

    /// 7-axis arm; redundant, so IK picks one of infinitely many solutions
    pub fn kuka_lbr_iiwa7() -> Self {
        Self {
            model: RobotModel::KukaLbrIiwa7,
            max_payload: 7.0,
            max_reach: 800.0,
            convention: DhConvention::Modified,
            dh_table: vec![
                [0.0, 0.0, 0.0, 340.0],
                [-FRAC_PI_2, 0.0, 0.0, 0.0],
                [FRAC_PI_2, 0.0, 0.0, 400.0],
                [FRAC_PI_2, 0.0, 0.0, 0.0],
                [-FRAC_PI_2, 0.0, 0.0, 400.0],
                [-FRAC_PI_2, 0.0, 0.0, 0.0],
                [FRAC_PI_2, 0.0, 0.0, 126.0],
            ],
        }
    }

    /// Create configuration for a specific robot model
    pub fn from_model(model: RobotModel) -> Self {
        match model {
            RobotModel::Ur10 => Self::ur10(),
            RobotModel::Meca500 => Self::meca500(),
            RobotModel::AbbIrb120 => Self::abb_irb120(),
            RobotModel::KukaLbrIiwa7 => Self::kuka_lbr_iiwa7(),
        }
    }

    /// Build the kinematic chain described by this configuration
    pub fn chain(&self) -> Result<KinematicChain> {
        KinematicChain::from_table_with_convention(&self.dh_table, self.convention)
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::ur10()
    }
}
