//! # Action 模块
//!
//! 动作是对“要怎样改变目标”的不可变描述，由构建函数创建、由引擎只读消费。
//!
//! ## 设计说明
//!
//! - `Action` 内部是 `Rc` 共享的节点，克隆开销极低，克隆共享的是描述而不是执行状态
//! - 同一个 `Action` 可以同时在多个目标上运行，每次运行的进度保存在引擎自己的状态机里
//! - 组合动作的声明时长在构建时计算：序列求和、并行取最大、重复相乘
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let step = Action::sequence([
//!     Action::move_to(Vec2::new(100.0, 0.0), 1.0)?,
//!     Action::rotate_by(90.0, 0.6)?,
//! ]);
//! let forever = Action::repeat_forever(step);
//! assert!(forever.duration().is_infinite());
//! ```

mod builders;
mod derived;

use std::fmt;
use std::rc::Rc;

use crate::error::{ActionError, ActionResult};
use crate::geometry::Vec2;
use crate::host::TargetSnapshot;

/// 移动动作参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAction {
    /// 目标点（`relative` 为真时是位移量）
    pub point: Vec2,
    /// 是否相对当前位置
    pub relative: bool,
}

/// 旋转动作参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateAction {
    /// 角度（度）。执行时才换算为弧度
    pub degrees: f32,
    /// 是否相对当前角度
    pub relative: bool,
}

/// 透明度动作参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeAction {
    /// 目标透明度（`relative` 为真时是增量）
    pub alpha: f32,
    /// 是否相对当前透明度
    pub relative: bool,
}

/// 重复次数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    /// 固定次数，0 表示立即完成
    Times(u32),
    /// 无限重复
    Forever,
}

impl RepeatCount {
    /// 从整数约定转换：-1 表示无限，其余负数是错误
    pub fn from_raw(count: i64) -> ActionResult<Self> {
        match count {
            -1 => Ok(Self::Forever),
            c if c >= 0 => u32::try_from(c)
                .map(Self::Times)
                .map_err(|_| ActionError::InvalidRepeatCount { count }),
            _ => Err(ActionError::InvalidRepeatCount { count }),
        }
    }

    /// 重复 `child` 秒的子动作的总时长
    pub fn total_duration(self, child: f32) -> f32 {
        match self {
            Self::Times(0) => 0.0,
            Self::Times(n) => child * n as f32,
            Self::Forever => f32::INFINITY,
        }
    }
}

/// 重复动作参数
#[derive(Debug, Clone)]
pub struct RepeatAction {
    /// 被重复的动作
    pub action: Action,
    /// 重复次数
    pub count: RepeatCount,
}

/// 同步执行的代码块
#[derive(Clone)]
pub struct Block(Rc<dyn Fn()>);

impl Block {
    /// 执行代码块
    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(..)")
    }
}

type Resolver = dyn Fn(&TargetSnapshot) -> Action;

/// 开始执行时才根据目标状态生成的动作
///
/// 只用于依赖目标运行时位置的派生动作（路径跟随的每一段、抖动），
/// 生成的结果始终由基础动作组成。
#[derive(Clone)]
pub struct DeferredAction {
    label: &'static str,
    resolver: Rc<Resolver>,
}

impl DeferredAction {
    /// 用于描述输出的名字
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// 基于目标状态生成实际动作
    pub fn resolve(&self, snapshot: &TargetSnapshot) -> Action {
        (self.resolver)(snapshot)
    }
}

impl fmt::Debug for DeferredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// 动作种类
#[derive(Debug, Clone)]
pub enum ActionKind {
    /// 移动中心点
    Move(MoveAction),
    /// 旋转
    Rotate(RotateAction),
    /// 调整透明度
    Fade(FadeAction),
    /// 依次执行
    Sequence(Vec<Action>),
    /// 同时执行
    Group(Vec<Action>),
    /// 重复执行
    Repeat(RepeatAction),
    /// 执行代码块
    RunBlock(Block),
    /// 等待
    Wait,
    /// 从父节点移除目标
    RemoveFromSuperview,
    /// 开始时解析
    Deferred(DeferredAction),
}

struct ActionNode {
    kind: ActionKind,
    duration: f32,
}

/// 不可变的动作描述
#[derive(Clone)]
pub struct Action {
    node: Rc<ActionNode>,
}

impl Action {
    pub(crate) fn from_kind(kind: ActionKind, duration: f32) -> Self {
        Self {
            node: Rc::new(ActionNode { kind, duration }),
        }
    }

    /// 动作种类
    pub fn kind(&self) -> &ActionKind {
        &self.node.kind
    }

    /// 声明时长（秒）
    ///
    /// 无限重复时为 `f32::INFINITY`。
    pub fn duration(&self) -> f32 {
        self.node.duration
    }

    /// 是否永远不会完成
    pub fn is_infinite(&self) -> bool {
        self.node.duration.is_infinite()
    }

    /// 两个句柄是否指向同一个描述
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.node, &b.node)
    }

    /// 以缩进大纲形式描述整棵动作树
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, 0);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize) {
        use std::fmt::Write;

        let label = match self.kind() {
            ActionKind::Move(m) if m.relative => format!("move_by {}", m.point),
            ActionKind::Move(m) => format!("move_to {}", m.point),
            ActionKind::Rotate(r) if r.relative => format!("rotate_by {}°", r.degrees),
            ActionKind::Rotate(r) => format!("rotate_to {}°", r.degrees),
            ActionKind::Fade(a) if a.relative => format!("fade_by {}", a.alpha),
            ActionKind::Fade(a) => format!("fade_to {}", a.alpha),
            ActionKind::Sequence(_) => "sequence".to_string(),
            ActionKind::Group(_) => "group".to_string(),
            ActionKind::Repeat(r) => match r.count {
                RepeatCount::Times(n) => format!("repeat x{n}"),
                RepeatCount::Forever => "repeat forever".to_string(),
            },
            ActionKind::RunBlock(_) => "run_block".to_string(),
            ActionKind::Wait => "wait".to_string(),
            ActionKind::RemoveFromSuperview => "remove_from_superview".to_string(),
            ActionKind::Deferred(d) => format!("deferred {}", d.label()),
        };
        let duration = if self.is_infinite() {
            "inf".to_string()
        } else {
            format!("{:.2}s", self.duration())
        };
        let indent = depth * 2;
        let _ = writeln!(out, "{:indent$}{label} [{duration}]", "");

        match self.kind() {
            ActionKind::Sequence(children) | ActionKind::Group(children) => {
                for child in children {
                    child.describe_into(out, depth + 1);
                }
            }
            ActionKind::Repeat(r) => r.action.describe_into(out, depth + 1),
            _ => {}
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", self.kind())
            .field("duration", &self.duration())
            .finish()
    }
}
