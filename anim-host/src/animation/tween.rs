//! # Tween 模块
//!
//! 单个属性补间：从起始值插值到目标值。
//!
//! 补间不持有时钟，由 `AnimationSystem` 按当前时间采样。

use anim_runtime::PropertyChange;

use super::easing::EasingFunction;

/// 补间唯一标识符
///
/// 与定时器共用同一个计数器，数值越小创建越早。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

/// 补间状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 正在播放
    #[default]
    Playing,
    /// 已到达目标值
    Completed,
    /// 被取消或被替换
    Cancelled,
}

impl TweenState {
    /// 是否已结束（完成或取消）
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// 属性补间
#[derive(Debug, Clone)]
pub struct Tween {
    /// 唯一标识符
    pub id: TweenId,
    /// 起始值
    pub from: PropertyChange,
    /// 目标值
    pub to: PropertyChange,
    /// 开始时间（秒）
    pub start: f64,
    /// 持续时间（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 当前状态
    pub state: TweenState,
    /// 缓动后的进度 (0.0 - 1.0)
    progress: f32,
}

impl Tween {
    /// 创建补间
    pub fn new(
        id: TweenId,
        from: PropertyChange,
        to: PropertyChange,
        start: f64,
        duration: f32,
    ) -> Self {
        Self {
            id,
            from,
            to,
            start,
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
            state: TweenState::Playing,
            progress: 0.0,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 结束时间
    pub fn end_time(&self) -> f64 {
        self.start + f64::from(self.duration)
    }

    /// 缓动后的进度
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// 按时间采样进度
    pub fn sample(&mut self, now: f64) {
        if self.state.is_finished() {
            return;
        }
        let raw = if self.duration <= 0.0 {
            1.0
        } else {
            ((now - self.start) / f64::from(self.duration)).clamp(0.0, 1.0) as f32
        };
        self.progress = self.easing.apply(raw);
    }

    /// 当前插值
    pub fn current_value(&self) -> PropertyChange {
        interpolate(self.from, self.to, self.progress)
    }

    /// 标记完成，进度置为 1
    pub fn complete(&mut self) {
        self.progress = 1.0;
        self.state = TweenState::Completed;
    }

    /// 标记取消，停在当前值
    pub fn cancel(&mut self) {
        self.state = TweenState::Cancelled;
    }
}

fn interpolate(from: PropertyChange, to: PropertyChange, t: f32) -> PropertyChange {
    // 终点直接取目标值，避免 a + (b - a) 的舍入误差
    if t >= 1.0 {
        return to;
    }
    match (from, to) {
        (PropertyChange::Position(a), PropertyChange::Position(b)) => {
            PropertyChange::Position(a.lerp(b, t))
        }
        (PropertyChange::Rotation(a), PropertyChange::Rotation(b)) => {
            PropertyChange::Rotation(a + (b - a) * t)
        }
        (PropertyChange::Alpha(a), PropertyChange::Alpha(b)) => {
            PropertyChange::Alpha(a + (b - a) * t)
        }
        // 通道不一致时直接跳到目标值
        (_, to) => to,
    }
}
