//! # Anim Host
//!
//! `anim-runtime` 的参考宿主：确定性的离散事件动画系统。
//!
//! ## 架构概述
//!
//! ```text
//! Animator ──► SimHost (impl Host) ──► AnimationSystem ──► View (impl Animatable)
//!                 ▲                         │
//!                 └──── advance(dt) ────────┘  到期事件的回调
//! ```
//!
//! ## 核心类型
//!
//! - [`SimHost`]：实现 `Host`，按需推进模拟时钟
//! - [`AnimationSystem`]：补间与定时器的调度
//! - [`View`]：可动画的矩形视图
//! - [`HostConfig`]：宿主配置
//!
//! ## 模块结构
//!
//! - [`animation`]：缓动、补间、调度
//! - [`view`]：视图
//! - [`sim_host`]：宿主实现
//! - [`config`]：配置

pub mod animation;
pub mod config;
pub mod sim_host;
pub mod view;

pub use animation::{
    AnimPropertyKey, Animatable, AnimationSystem, Channel, EasingFunction, ObjectId, Transform,
    Tween, TweenId, TweenState,
};
pub use config::{ConfigError, HostConfig};
pub use sim_host::SimHost;
pub use view::{View, ViewData};
