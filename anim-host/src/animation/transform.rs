//! # Transform 模块
//!
//! 视图的变换状态。

use anim_runtime::Vec2;
use serde::{Deserialize, Serialize};

/// 视图变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// 中心点位置
    pub position: Vec2,
    /// 旋转角度（弧度）
    pub rotation: f32,
    /// 透明度 (0.0 - 1.0)
    alpha: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            alpha: 1.0,
        }
    }
}

impl Transform {
    /// 位于指定中心点的单位变换
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// 透明度
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// 设置透明度，限制在 0.0 - 1.0
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// 旋转角度（度）
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation.to_degrees()
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pos=({:.2}, {:.2}) rot={:.1}° alpha={:.2}",
            self.position.x,
            self.position.y,
            self.rotation_degrees(),
            self.alpha
        )
    }
}
