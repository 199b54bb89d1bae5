//! # SimHost 模块
//!
//! 基于 [`AnimationSystem`] 的确定性宿主。
//!
//! `SimHost` 实现 [`anim_runtime::Host`]，时钟只在 [`SimHost::advance`] 时前进。
//! 每次推进按截止时间逐个处理到期事件，回调在释放系统借用之后执行，
//! 所以回调里继续发出的补间会从事件发生的精确时刻开始计时，
//! 动作树的声明时长与模拟时钟上的实际耗时一致。

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use anim_runtime::{FinishCallback, Host, PropertyChange, TimerCallback, Vec2};
use tracing::{trace, warn};

use crate::animation::{Animatable, AnimationSystem, Channel, Fired, ObjectId};
use crate::config::HostConfig;

/// 确定性模拟宿主
#[derive(Debug)]
pub struct SimHost {
    system: RefCell<AnimationSystem>,
    max_events_per_advance: usize,
    frame_duration: f32,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::from_config(&HostConfig::default())
    }
}

impl SimHost {
    /// 使用默认配置创建
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// 按配置创建
    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            system: RefCell::new(AnimationSystem::new().with_easing(config.easing)),
            max_events_per_advance: config.max_events_per_advance.max(1),
            frame_duration: config.frame_duration(),
        }
    }

    /// 注册可动画对象
    pub fn register<T: Animatable>(&self, object: Rc<T>) -> ObjectId {
        self.system.borrow_mut().register(object)
    }

    /// 注销对象，取消其所有补间
    pub fn unregister(&self, object_id: ObjectId) {
        let fired = self.system.borrow_mut().unregister(object_id);
        fire(fired);
    }

    /// 当前模拟时间（秒）
    pub fn now(&self) -> f64 {
        self.system.borrow().now()
    }

    /// 只读访问动画系统
    pub fn system(&self) -> Ref<'_, AnimationSystem> {
        self.system.borrow()
    }

    /// 对象是否仍挂在父节点上
    pub fn is_attached(&self, object_id: ObjectId) -> bool {
        self.system.borrow().is_attached(object_id)
    }

    /// 是否还有未处理的补间或定时器
    pub fn is_idle(&self) -> bool {
        self.system.borrow().is_idle()
    }

    /// 把时钟推进 `dt` 秒，返回处理的事件数
    ///
    /// 截止时间不晚于目标时刻的事件逐个处理（包括处理过程中新产生的）。
    /// 超过单次事件上限时提前结束并打印警告，剩余事件留到下次推进：
    ///
    /// - 积压的事件晚于当前时刻时，时钟停在最后处理的事件上，
    ///   后续补间仍从各自的截止时刻开始，下次推进从这里接着走；
    /// - 积压的事件都在当前时刻（零时长循环），时钟照常推进到目标时刻。
    pub fn advance(&self, dt: f32) -> usize {
        let target = self.now() + f64::from(dt.max(0.0));
        let processed = self.process_until(target);

        let next = self.system.borrow().next_deadline();
        let deferred = next.is_some_and(|d| d <= target && d > self.now());
        if !deferred {
            self.system.borrow_mut().settle(target);
        }
        processed
    }

    /// 推进一帧
    pub fn step_frame(&self) -> usize {
        self.advance(self.frame_duration)
    }

    /// 一直推进到没有待处理事件或时钟到达 `horizon`，返回停下时的时间
    ///
    /// 无限重复的动作永远不会空闲，必须依赖 `horizon` 结束。
    pub fn run_until_idle(&self, horizon: f64) -> f64 {
        loop {
            let next = self.system.borrow().next_deadline();
            match next {
                Some(deadline) if deadline <= horizon => {
                    let processed = self.process_until(deadline);
                    if processed >= self.max_events_per_advance {
                        break;
                    }
                }
                _ => break,
            }
        }
        self.now()
    }

    fn process_until(&self, target: f64) -> usize {
        let mut processed = 0;
        while processed < self.max_events_per_advance {
            let due = self.system.borrow_mut().pop_due(target);
            let Some(fired) = due else {
                return processed;
            };
            processed += 1;
            trace!(now = self.now(), ?fired, "处理到期事件");
            fired.invoke();
        }

        if self.system.borrow().next_deadline().is_some_and(|d| d <= target) {
            warn!(
                limit = self.max_events_per_advance,
                now = self.now(),
                "单次推进处理的事件数达到上限，剩余事件延后处理"
            );
        }
        processed
    }

    fn read(&self, target: ObjectId, channel: Channel) -> Option<PropertyChange> {
        let value = self.system.borrow().read(target, channel);
        if value.is_none() {
            warn!(object = %target, ?channel, "读取未注册对象的属性");
        }
        value
    }
}

fn fire(events: Vec<Fired>) {
    for event in events {
        event.invoke();
    }
}

impl Host for SimHost {
    type Target = ObjectId;

    fn animate(
        &self,
        target: &ObjectId,
        change: PropertyChange,
        duration: f32,
        on_finish: FinishCallback,
    ) {
        let fired = self
            .system
            .borrow_mut()
            .start_tween(*target, change, duration, on_finish);
        fire(fired);
    }

    fn schedule_after(&self, duration: f32, on_fire: TimerCallback) {
        self.system.borrow_mut().schedule(duration, on_fire);
    }

    fn remove_all_animations(&self, target: &ObjectId) {
        let fired = self.system.borrow_mut().cancel_object(*target);
        fire(fired);
    }

    fn position(&self, target: &ObjectId) -> Vec2 {
        match self.read(*target, Channel::Position) {
            Some(PropertyChange::Position(p)) => p,
            _ => Vec2::zero(),
        }
    }

    fn rotation(&self, target: &ObjectId) -> f32 {
        match self.read(*target, Channel::Rotation) {
            Some(PropertyChange::Rotation(r)) => r,
            _ => 0.0,
        }
    }

    fn alpha(&self, target: &ObjectId) -> f32 {
        match self.read(*target, Channel::Alpha) {
            Some(PropertyChange::Alpha(a)) => a,
            _ => 1.0,
        }
    }

    fn detach_from_parent(&self, target: &ObjectId) {
        self.system.borrow_mut().detach(*target);
    }
}
