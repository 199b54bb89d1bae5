//! # Error 模块
//!
//! 定义构建动作时可能出现的错误。执行期不产生错误：被打断的动画只会
//! 截断完成链（见 [`crate::engine`]）。

use thiserror::Error;

/// 动作构建错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// 时长为负数或非有限值
    #[error("无效的时长 {duration}：必须是大于等于 0 的有限值")]
    InvalidDuration { duration: f32 },

    /// 重复次数小于 -1
    #[error("无效的重复次数 {count}：只允许 -1（无限）或大于等于 0 的值")]
    InvalidRepeatCount { count: i64 },

    /// 抖动频率不是正数
    #[error("无效的抖动频率 {frequency}：必须是正的有限值")]
    InvalidFrequency { frequency: f32 },

    /// 抖动总次数（时长 × 频率）超过上限
    #[error("抖动次数 {legs} 过多：最多 {max} 次")]
    TooManyShakeLegs { legs: f64, max: u32 },

    /// 路径移动速度不是正数
    #[error("无效的移动速度 {speed}：必须是正的有限值")]
    InvalidSpeed { speed: f32 },

    /// 参数中出现 NaN 或无穷大
    #[error("参数 '{param}' 的值无效：{value}")]
    NonFinite { param: &'static str, value: f32 },
}

/// Result 类型别名
pub type ActionResult<T> = Result<T, ActionError>;

/// 校验时长参数
pub(crate) fn check_duration(duration: f32) -> ActionResult<f32> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(duration)
    } else {
        Err(ActionError::InvalidDuration { duration })
    }
}

/// 校验普通数值参数
pub(crate) fn check_finite(param: &'static str, value: f32) -> ActionResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ActionError::NonFinite { param, value })
    }
}
