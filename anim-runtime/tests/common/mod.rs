//! 测试用的手动宿主
//!
//! 记录所有宿主调用，由测试决定每个属性动画何时结束、是否被打断。
//! `auto` 模式下属性动画与定时器在调用时立即同步完成。

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anim_runtime::{FinishCallback, Host, PropertyChange, TimerCallback, Vec2};

pub type Target = &'static str;

#[derive(Debug, Clone, Copy)]
pub struct TargetState {
    pub position: Vec2,
    pub rotation: f32,
    pub alpha: f32,
    pub attached: bool,
}

impl Default for TargetState {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            alpha: 1.0,
            attached: true,
        }
    }
}

struct PendingAnimation {
    id: usize,
    target: Target,
    change: PropertyChange,
    duration: f32,
    on_finish: FinishCallback,
}

#[derive(Default)]
struct State {
    auto: bool,
    next_id: usize,
    targets: HashMap<Target, TargetState>,
    animations: Vec<PendingAnimation>,
    timers: Vec<(f32, TimerCallback)>,
    log: Vec<String>,
}

#[derive(Default)]
pub struct ManualHost {
    state: RefCell<State>,
}

impl ManualHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// 属性动画与定时器同步完成
    pub fn auto() -> Rc<Self> {
        let host = Self::default();
        host.state.borrow_mut().auto = true;
        Rc::new(host)
    }

    pub fn set_position(&self, target: Target, position: Vec2) {
        self.state
            .borrow_mut()
            .targets
            .entry(target)
            .or_default()
            .position = position;
    }

    pub fn target(&self, target: Target) -> TargetState {
        self.state
            .borrow()
            .targets
            .get(target)
            .copied()
            .unwrap_or_default()
    }

    pub fn log(&self) -> Vec<String> {
        self.state.borrow().log.clone()
    }

    pub fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().log)
    }

    /// 已发出的 animate 调用数量
    pub fn animate_calls(&self) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|line| line.starts_with("animate"))
            .count()
    }

    /// 尚未结束的属性动画 ID，按发出顺序
    pub fn pending(&self) -> Vec<usize> {
        self.state.borrow().animations.iter().map(|a| a.id).collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// 尚未结束的属性动画（修改，时长）
    pub fn pending_changes(&self) -> Vec<(PropertyChange, f32)> {
        self.state
            .borrow()
            .animations
            .iter()
            .map(|a| (a.change, a.duration))
            .collect()
    }

    /// 正常结束指定动画
    pub fn finish(&self, id: usize) {
        self.complete(id, true);
    }

    /// 打断指定动画
    pub fn interrupt(&self, id: usize) {
        self.complete(id, false);
    }

    /// 正常结束最早发出的动画
    pub fn finish_next(&self) {
        let id = self.pending().first().copied().expect("no pending animation");
        self.finish(id);
    }

    /// 依次结束所有动画（包括结束过程中新发出的），返回结束的数量
    pub fn finish_all(&self) -> usize {
        let mut count = 0;
        while let Some(id) = self.pending().first().copied() {
            self.finish(id);
            count += 1;
        }
        count
    }

    /// 触发所有已挂起的定时器
    pub fn fire_timers(&self) {
        let timers = std::mem::take(&mut self.state.borrow_mut().timers);
        for (_, on_fire) in timers {
            on_fire();
        }
    }

    fn complete(&self, id: usize, finished: bool) {
        let animation = {
            let mut state = self.state.borrow_mut();
            let index = state
                .animations
                .iter()
                .position(|a| a.id == id)
                .expect("unknown animation id");
            let animation = state.animations.remove(index);
            if finished {
                apply(&mut state, animation.target, animation.change);
            }
            animation
        };
        (animation.on_finish)(finished);
    }
}

fn apply(state: &mut State, target: Target, change: PropertyChange) {
    let entry = state.targets.entry(target).or_default();
    match change {
        PropertyChange::Position(p) => entry.position = p,
        PropertyChange::Rotation(r) => entry.rotation = r,
        PropertyChange::Alpha(a) => entry.alpha = a,
    }
}

fn describe(change: PropertyChange) -> String {
    match change {
        PropertyChange::Position(p) => format!("position ({:.1}, {:.1})", p.x, p.y),
        PropertyChange::Rotation(r) => format!("rotation {:.4}", r),
        PropertyChange::Alpha(a) => format!("alpha {:.2}", a),
    }
}

impl Host for ManualHost {
    type Target = Target;

    fn animate(
        &self,
        target: &Target,
        change: PropertyChange,
        duration: f32,
        on_finish: FinishCallback,
    ) {
        let auto = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let line = format!("animate#{id} {target} {} {duration:.2}s", describe(change));
            state.log.push(line);
            if state.auto {
                apply(&mut state, *target, change);
                Some(on_finish)
            } else {
                state.animations.push(PendingAnimation {
                    id,
                    target: *target,
                    change,
                    duration,
                    on_finish,
                });
                None
            }
        };
        if let Some(on_finish) = auto {
            on_finish(true);
        }
    }

    fn schedule_after(&self, duration: f32, on_fire: TimerCallback) {
        let auto = {
            let mut state = self.state.borrow_mut();
            state.log.push(format!("timer {:.2}s", duration));
            if state.auto {
                Some(on_fire)
            } else {
                state.timers.push((duration, on_fire));
                None
            }
        };
        if let Some(on_fire) = auto {
            on_fire();
        }
    }

    fn remove_all_animations(&self, target: &Target) {
        let removed: Vec<PendingAnimation> = {
            let mut state = self.state.borrow_mut();
            state.log.push(format!("remove_all {target}"));
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.animations)
                .into_iter()
                .partition(|a| a.target == *target);
            state.animations = kept;
            removed
        };
        for animation in removed {
            (animation.on_finish)(false);
        }
    }

    fn position(&self, target: &Target) -> Vec2 {
        self.target(*target).position
    }

    fn rotation(&self, target: &Target) -> f32 {
        self.target(*target).rotation
    }

    fn alpha(&self, target: &Target) -> f32 {
        self.target(*target).alpha
    }

    fn detach_from_parent(&self, target: &Target) {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("detach {target}"));
        state.targets.entry(*target).or_default().attached = false;
    }
}
