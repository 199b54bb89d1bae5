//! # Host 模块
//!
//! 引擎与宿主动画后端之间的接口。
//!
//! 引擎本身不做插值、不持有时钟，也不渲染：
//! - 属性插值交给 [`Host::animate`]
//! - 计时交给 [`Host::schedule_after`]
//! - 取消交给 [`Host::remove_all_animations`]
//!
//! 所有调用都发生在宿主的动画线程上，回调可以同步触发，也可以在之后的某一帧触发。

use crate::geometry::Vec2;

/// 属性动画结束回调，参数为“是否正常结束”
///
/// 被打断（取消、被同属性的新动画替换）时传入 `false`。
pub type FinishCallback = Box<dyn FnOnce(bool)>;

/// 定时器回调
pub type TimerCallback = Box<dyn FnOnce()>;

/// 对目标单个属性的修改
///
/// 携带属性的最终值，由宿主负责从当前值插值过去。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyChange {
    /// 中心点位置
    Position(Vec2),
    /// 旋转角度（弧度）
    Rotation(f32),
    /// 透明度
    Alpha(f32),
}

/// 目标在某一时刻的状态
///
/// 延迟解析的动作（路径跟随、抖动）在开始执行时基于它生成实际动作。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    /// 中心点位置
    pub position: Vec2,
    /// 旋转角度（弧度）
    pub rotation: f32,
    /// 透明度
    pub alpha: f32,
}

impl Default for TargetSnapshot {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            alpha: 1.0,
        }
    }
}

/// 宿主动画后端
///
/// 实现者提供属性插值、定时器与目标状态查询。`Target` 是目标对象的句柄，
/// 引擎只会克隆并回传它，不会解释其内容。
pub trait Host {
    /// 目标对象句柄
    type Target: Clone + std::fmt::Debug + 'static;

    /// 在 `duration` 秒内把目标属性动画到 `change` 指定的值
    ///
    /// 结束时调用 `on_finish(true)`，被打断时调用 `on_finish(false)`，
    /// 也允许宿主在取消时直接丢弃回调。
    fn animate(
        &self,
        target: &Self::Target,
        change: PropertyChange,
        duration: f32,
        on_finish: FinishCallback,
    );

    /// `duration` 秒后调用 `on_fire`
    fn schedule_after(&self, duration: f32, on_fire: TimerCallback);

    /// 移除目标上所有正在进行的属性动画
    fn remove_all_animations(&self, target: &Self::Target);

    /// 目标当前中心点
    fn position(&self, target: &Self::Target) -> Vec2;

    /// 目标当前旋转角度（弧度）
    fn rotation(&self, target: &Self::Target) -> f32;

    /// 目标当前透明度
    fn alpha(&self, target: &Self::Target) -> f32;

    /// 把目标从父节点上移除
    fn detach_from_parent(&self, target: &Self::Target);

    /// 读取目标当前状态
    fn snapshot(&self, target: &Self::Target) -> TargetSnapshot {
        TargetSnapshot {
            position: self.position(target),
            rotation: self.rotation(target),
            alpha: self.alpha(target),
        }
    }
}
