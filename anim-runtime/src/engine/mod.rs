//! # Engine 模块
//!
//! 把动作树逐层降级为宿主调用，并驱动完成回调。
//!
//! ## 执行模型
//!
//! - 单线程协作式：所有状态转换与宿主调用都发生在宿主的动画线程上
//! - 不生成中间的“编译结果”，运行时直接遍历动作树
//! - 唯一的挂起点是宿主的 `animate` / `schedule_after` 回调
//!
//! ## 取消
//!
//! [`Animator::remove_all`] 只是转交给宿主。被取消的属性动画回报 `finished = false`，
//! 完成链在此截断：外层序列/并行/重复的完成回调**永远不会**被调用。
//!
//! ```rust,ignore
//! let animator = Animator::new(host.clone());
//! let handle = animator.run_with_completion(&action, &target, || println!("done"));
//! // ... 宿主推进若干帧 ...
//! assert_eq!(handle.state(), RunState::Completed);
//! ```

mod run;

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::action::Action;
use crate::host::Host;
use run::{RunContext, dispatch};

/// 运行状态
///
/// 生命周期为 `Pending → Running → Completed`。分发在 [`Animator::run`]
/// 内部同步开始，所以调用方拿到的句柄最早也处于 `Running`
/// （同步完成的动作则直接是 `Completed`）；`Pending` 只作为默认值出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// 尚未分发
    #[default]
    Pending,
    /// 已分发，等待完成
    Running,
    /// 完成回调已触发
    Completed,
}

/// 运行句柄
///
/// 只用于观察状态，不会延长运行本身的生命周期：宿主丢弃回调后，
/// 运行状态随之释放，句柄会一直停留在 `Running`。
#[derive(Debug, Clone)]
pub struct RunHandle {
    state: Rc<Cell<RunState>>,
}

impl RunHandle {
    /// 当前状态
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// 是否已完成
    pub fn is_completed(&self) -> bool {
        self.state.get() == RunState::Completed
    }
}

/// 动作执行器
pub struct Animator<H: Host> {
    host: Rc<H>,
}

impl<H: Host> Clone for Animator<H> {
    fn clone(&self) -> Self {
        Self {
            host: Rc::clone(&self.host),
        }
    }
}

impl<H: Host> std::fmt::Debug for Animator<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator").finish_non_exhaustive()
    }
}

impl<H: Host + 'static> Animator<H> {
    /// 创建执行器
    pub fn new(host: Rc<H>) -> Self {
        Self { host }
    }

    /// 宿主引用
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// 在目标上运行动作，不关心完成
    pub fn run(&self, action: &Action, target: &H::Target) -> RunHandle {
        self.run_with_completion(action, target, || {})
    }

    /// 在目标上运行动作，完成时调用 `on_complete`
    ///
    /// 立即返回。若动作同步完成（如空序列、代码块），`on_complete`
    /// 会在本函数返回前被调用。
    pub fn run_with_completion(
        &self,
        action: &Action,
        target: &H::Target,
        on_complete: impl FnOnce() + 'static,
    ) -> RunHandle {
        let state = Rc::new(Cell::new(RunState::Pending));
        let ctx = Rc::new(RunContext {
            host: Rc::clone(&self.host),
            target: target.clone(),
        });

        debug!(object = ?target, duration = action.duration(), "开始运行动作");
        state.set(RunState::Running);

        let finished = Rc::clone(&state);
        dispatch(
            &ctx,
            action,
            Box::new(move || {
                finished.set(RunState::Completed);
                on_complete();
            }),
        );

        RunHandle { state }
    }

    /// 取消目标上所有正在进行的动画
    ///
    /// 尽力而为：不会触发任何完成回调。
    pub fn remove_all(&self, target: &H::Target) {
        debug!(object = ?target, "移除目标上的所有动画");
        self.host.remove_all_animations(target);
    }
}
