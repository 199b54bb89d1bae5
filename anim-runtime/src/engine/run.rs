//! # Run 模块
//!
//! 单次运行的执行状态。
//!
//! 每种组合动作都有自己的显式状态机：
//! - 序列：当前子动作下标
//! - 重复：剩余次数
//! - 并行：未完成的子动作数量
//!
//! 序列与重复共用一个蹦床循环（[`Chain::drive`]），子动作同步完成时
//! 在循环内推进游标，而不是在回调里递归，调用栈深度与重复次数无关。

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::action::{Action, ActionKind, RepeatCount};
use crate::host::{Host, PropertyChange};

/// 完成回调
pub(crate) type Completion = Box<dyn FnOnce()>;

/// 一次运行共享的上下文：宿主与目标
pub(crate) struct RunContext<H: Host> {
    pub(crate) host: Rc<H>,
    pub(crate) target: H::Target,
}

/// 按动作种类执行，完成后调用 `done`
pub(crate) fn dispatch<H: Host + 'static>(
    ctx: &Rc<RunContext<H>>,
    action: &Action,
    done: Completion,
) {
    let host = &ctx.host;
    let target = &ctx.target;
    let duration = action.duration();

    match action.kind() {
        ActionKind::Move(m) => {
            let point = if m.relative {
                host.position(target) + m.point
            } else {
                m.point
            };
            animate(ctx, PropertyChange::Position(point), duration, done);
        }
        ActionKind::Rotate(r) => {
            let radians = r.degrees.to_radians();
            let angle = if r.relative {
                host.rotation(target) + radians
            } else {
                radians
            };
            animate(ctx, PropertyChange::Rotation(angle), duration, done);
        }
        ActionKind::Fade(f) => {
            let alpha = if f.relative {
                host.alpha(target) + f.alpha
            } else {
                f.alpha
            };
            animate(ctx, PropertyChange::Alpha(alpha), duration, done);
        }
        ActionKind::Sequence(children) => {
            let cursor = Cursor::Sequence {
                children: children.clone(),
                index: 0,
            };
            Chain::start(ctx, cursor, done);
        }
        ActionKind::Repeat(r) => {
            let cursor = Cursor::Repeat {
                action: r.action.clone(),
                remaining: r.count,
            };
            Chain::start(ctx, cursor, done);
        }
        ActionKind::Group(children) => join(ctx, children, done),
        ActionKind::RunBlock(block) => {
            block.call();
            done();
        }
        ActionKind::Wait => {
            trace!(duration, "wait");
            host.schedule_after(duration, done);
        }
        ActionKind::RemoveFromSuperview => {
            debug!(object = ?target, "从父节点移除目标");
            host.detach_from_parent(target);
            done();
        }
        ActionKind::Deferred(deferred) => {
            let resolved = deferred.resolve(&host.snapshot(target));
            trace!(
                label = deferred.label(),
                duration = resolved.duration(),
                "延迟动作已解析"
            );
            dispatch(ctx, &resolved, done);
        }
    }
}

/// 交给宿主做属性插值，只有正常结束才继续完成链
fn animate<H: Host>(
    ctx: &Rc<RunContext<H>>,
    change: PropertyChange,
    duration: f32,
    done: Completion,
) {
    trace!(?change, duration, "animate");
    ctx.host.animate(
        &ctx.target,
        change,
        duration,
        Box::new(move |finished| {
            if finished {
                done();
            } else {
                // 被打断时完成链到此为止，外层组合动作不会完成
                debug!(?change, "动画被打断，丢弃完成回调");
            }
        }),
    );
}

/// 并行：全部子动作完成后调用一次 `done`
fn join<H: Host + 'static>(ctx: &Rc<RunContext<H>>, children: &[Action], done: Completion) {
    if children.is_empty() {
        done();
        return;
    }

    struct Join {
        outstanding: usize,
        done: Option<Completion>,
    }

    let state = Rc::new(RefCell::new(Join {
        outstanding: children.len(),
        done: Some(done),
    }));

    for child in children {
        let state = Rc::clone(&state);
        dispatch(
            ctx,
            child,
            Box::new(move || {
                let finished = {
                    let mut join = state.borrow_mut();
                    join.outstanding -= 1;
                    if join.outstanding == 0 {
                        join.done.take()
                    } else {
                        None
                    }
                };
                if let Some(done) = finished {
                    done();
                }
            }),
        );
    }
}

/// 序列/重复的游标
enum Cursor {
    Sequence { children: Vec<Action>, index: usize },
    Repeat {
        action: Action,
        remaining: RepeatCount,
    },
}

impl Cursor {
    /// 取出下一个要执行的子动作，没有则表示整体完成
    fn next(&mut self) -> Option<Action> {
        match self {
            Cursor::Sequence { children, index } => {
                let child = children.get(*index).cloned();
                *index += 1;
                child
            }
            Cursor::Repeat { action, remaining } => match remaining {
                RepeatCount::Forever => Some(action.clone()),
                RepeatCount::Times(0) => None,
                RepeatCount::Times(n) => {
                    *n -= 1;
                    Some(action.clone())
                }
            },
        }
    }
}

/// 逐个执行子动作的运行状态
struct Chain<H: Host> {
    ctx: Rc<RunContext<H>>,
    cursor: Cursor,
    done: Option<Completion>,
    /// 正在 `drive` 循环中分发子动作
    driving: bool,
    /// 子动作在分发过程中同步完成了
    ready: bool,
}

impl<H: Host + 'static> Chain<H> {
    fn start(ctx: &Rc<RunContext<H>>, cursor: Cursor, done: Completion) {
        let chain = Rc::new(RefCell::new(Self {
            ctx: Rc::clone(ctx),
            cursor,
            done: Some(done),
            driving: false,
            ready: false,
        }));
        Self::drive(&chain);
    }

    fn drive(chain: &Rc<RefCell<Self>>) {
        loop {
            let (ctx, next) = {
                let mut this = chain.borrow_mut();
                let next = this.cursor.next();
                this.driving = true;
                this.ready = false;
                (Rc::clone(&this.ctx), next)
            };

            let Some(action) = next else {
                let done = {
                    let mut this = chain.borrow_mut();
                    this.driving = false;
                    this.done.take()
                };
                if let Some(done) = done {
                    done();
                }
                return;
            };

            let resume = Rc::clone(chain);
            dispatch(&ctx, &action, Box::new(move || Self::step_finished(resume)));

            let mut this = chain.borrow_mut();
            this.driving = false;
            if !this.ready {
                // 子动作异步完成，由回调重新进入 drive
                return;
            }
        }
    }

    fn step_finished(chain: Rc<RefCell<Self>>) {
        let in_loop = {
            let mut this = chain.borrow_mut();
            if this.driving {
                this.ready = true;
            }
            this.driving
        };
        if !in_loop {
            Self::drive(&chain);
        }
    }
}
