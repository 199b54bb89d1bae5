//! # Animation 模块
//!
//! 参考宿主的动画系统，负责属性补间与定时器。
//!
//! ## 核心设计理念
//!
//! 动画系统只负责 **时间轴管理**：
//! - 知道某个属性从 A 到 B 需要在 duration 内变化
//! - 按模拟时钟采样，直接写回对象属性
//! - **不假设对象类型**，对象通过 `Animatable` 暴露属性
//!
//! ## 核心概念
//!
//! - `ObjectId` / `Channel`: 补间的键，同一键只保留一个补间
//! - `Tween`: 单个属性补间
//! - `AnimationSystem`: 离散事件调度与时钟
//! - `EasingFunction`: 缓动函数

mod easing;
mod system;
mod traits;
mod transform;
mod tween;

pub use easing::EasingFunction;
pub use system::{AnimationSystem, Fired};
pub use traits::{AnimPropertyKey, Animatable, Channel, ObjectId, property};
pub use transform::Transform;
pub use tween::{Tween, TweenId, TweenState};
