//! # Anim Runtime
//!
//! 声明式动画组合子与执行引擎。
//!
//! ## 架构概述
//!
//! `anim-runtime` 是纯逻辑核心，不做插值、不持有时钟、不渲染。
//! 调用方用构建函数拼出不可变的 [`Action`] 树，再交给 [`Animator`]
//! 在某个目标上运行；引擎把动作树降级为对宿主（[`Host`]）的调用：
//!
//! ```text
//! Caller                  Animator                     Host
//!   │                        │                          │
//!   │── run(action, target) ►│                          │
//!   │                        │── animate / schedule ───►│
//!   │                        │◄── finished(bool) ───────│
//!   │◄── on_complete ────────│                          │
//! ```
//!
//! ## 核心类型
//!
//! - [`Action`]：不可变的动作描述（移动、旋转、透明度、等待、代码块、组合）
//! - [`Animator`]：执行引擎入口
//! - [`Host`]：宿主动画后端接口
//! - [`ActionError`]：构建期错误
//!
//! ## 模块结构
//!
//! - [`action`]：动作模型与构建函数
//! - [`engine`]：执行引擎
//! - [`host`]：宿主接口
//! - [`geometry`]：二维向量
//! - [`error`]：错误类型定义

pub mod action;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;

// 重导出核心类型
pub use action::{
    Action, ActionKind, Block, DeferredAction, FadeAction, MoveAction, RepeatAction,
    RepeatCount, RotateAction,
};
pub use engine::{Animator, RunHandle, RunState};
pub use error::{ActionError, ActionResult};
pub use geometry::Vec2;
pub use host::{FinishCallback, Host, PropertyChange, TargetSnapshot, TimerCallback};
