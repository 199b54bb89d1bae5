//! # System 模块
//!
//! 离散事件动画系统。
//!
//! 对象实现 `Animatable` trait，系统按时钟采样补间并直接写回属性值：
//! ```rust,ignore
//! let id = system.register(view);
//! let fired = system.start_tween(id, PropertyChange::Alpha(0.0), 0.3, on_finish);
//! // fired 中是被替换的旧补间回调，调用方在释放借用后执行
//! ```
//!
//! 系统本身从不调用回调：所有结束回调都以 [`Fired`] 的形式返回，
//! 由外层（`SimHost`）在不持有任何借用时执行，回调里可以放心地启动新补间。

use std::collections::HashMap;
use std::rc::Rc;

use anim_runtime::{FinishCallback, PropertyChange, TimerCallback, Vec2};
use tracing::{debug, warn};

use super::traits::{AnimPropertyKey, Animatable, Channel, ObjectId, property};
use super::{EasingFunction, Tween, TweenId};

/// 已注册的可动画对象
struct RegisteredObject {
    /// 对象的 trait object
    object: Rc<dyn Animatable>,
    /// 是否仍挂在父节点上
    attached: bool,
}

/// 正在播放的补间及其结束回调
struct ActiveTween {
    tween: Tween,
    on_finish: FinishCallback,
}

/// 挂起的定时器
struct Timer {
    seq: u64,
    fire_at: f64,
    on_fire: TimerCallback,
}

/// 待执行的回调
///
/// 由系统产生、由调用方在释放借用后执行。
pub enum Fired {
    /// 补间结束：`finished` 为 `false` 表示被取消或替换
    Tween {
        callback: FinishCallback,
        finished: bool,
    },
    /// 定时器到期
    Timer(TimerCallback),
}

impl Fired {
    /// 执行回调
    pub fn invoke(self) {
        match self {
            Self::Tween { callback, finished } => callback(finished),
            Self::Timer(callback) => callback(),
        }
    }

    /// 是否是正常结束的补间
    pub fn is_finished_tween(&self) -> bool {
        matches!(self, Self::Tween { finished: true, .. })
    }
}

impl std::fmt::Debug for Fired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tween { finished, .. } => write!(f, "Fired::Tween({finished})"),
            Self::Timer(_) => write!(f, "Fired::Timer"),
        }
    }
}

/// 下一个到期事件
#[derive(Debug, Clone, Copy, PartialEq)]
enum Due {
    Tween(AnimPropertyKey),
    Timer(u64),
}

/// 动画系统
///
/// 管理已注册对象、补间与定时器，持有一个 `f64` 秒的模拟时钟。
///
/// ## 设计理念
///
/// 1. 时钟只在 [`AnimationSystem::pop_due`] 与 [`AnimationSystem::settle`] 中前进
/// 2. 事件按截止时间处理，同一时刻按创建顺序处理
/// 3. 每处理一个事件，所有补间都会在该时刻采样一次
/// 4. 同一对象的同一通道只保留一个补间，新补间替换旧补间
pub struct AnimationSystem {
    /// 已注册的对象（ObjectId -> 对象）
    objects: HashMap<ObjectId, RegisteredObject>,
    /// 补间（AnimPropertyKey -> 补间）
    tweens: HashMap<AnimPropertyKey, ActiveTween>,
    /// 挂起的定时器
    timers: Vec<Timer>,
    /// 当前时间（秒）
    now: f64,
    /// 补间与定时器共用的序号
    next_seq: u64,
    /// 下一个对象 ID
    next_object_id: u64,
    /// 新补间使用的缓动函数
    easing: EasingFunction,
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSystem")
            .field("now", &self.now)
            .field("objects", &self.objects.len())
            .field("tweens", &self.tweens.len())
            .field("timers", &self.timers.len())
            .finish()
    }
}

impl AnimationSystem {
    /// 创建新的动画系统
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            tweens: HashMap::new(),
            timers: Vec::new(),
            now: 0.0,
            next_seq: 1,
            next_object_id: 1,
            easing: EasingFunction::default(),
        }
    }

    /// 设置新补间使用的缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// 当前时间（秒）
    pub fn now(&self) -> f64 {
        self.now
    }

    // ========== 对象管理 ==========

    /// 注册可动画对象
    ///
    /// 系统分配唯一的 `ObjectId` 并返回，同一个对象多次注册也会获得不同的 ID。
    pub fn register<T: Animatable>(&mut self, object: Rc<T>) -> ObjectId {
        let id = ObjectId::new(self.next_object_id);
        self.next_object_id += 1;
        self.objects.insert(
            id,
            RegisteredObject {
                object: object as Rc<dyn Animatable>,
                attached: true,
            },
        );
        id
    }

    /// 注销对象，取消其所有补间
    pub fn unregister(&mut self, object_id: ObjectId) -> Vec<Fired> {
        let fired = self.cancel_object(object_id);
        self.objects.remove(&object_id);
        fired
    }

    /// 检查对象是否已注册
    pub fn is_registered(&self, object_id: ObjectId) -> bool {
        self.objects.contains_key(&object_id)
    }

    /// 已注册对象数量
    pub fn registered_count(&self) -> usize {
        self.objects.len()
    }

    /// 对象是否仍挂在父节点上
    pub fn is_attached(&self, object_id: ObjectId) -> bool {
        self.objects
            .get(&object_id)
            .is_some_and(|registered| registered.attached)
    }

    /// 从父节点移除对象
    ///
    /// 对象保持注册，属性仍可读写。返回对象之前是否挂在父节点上。
    pub fn detach(&mut self, object_id: ObjectId) -> bool {
        let Some(registered) = self.objects.get_mut(&object_id) else {
            warn!(object = %object_id, "移除未注册的对象");
            return false;
        };
        let was_attached = std::mem::replace(&mut registered.attached, false);
        if was_attached {
            registered.object.on_detached();
        }
        was_attached
    }

    // ========== 属性读写 ==========

    /// 读取对象某个通道的当前值
    pub fn read(&self, object_id: ObjectId, channel: Channel) -> Option<PropertyChange> {
        let object = &self.objects.get(&object_id)?.object;
        let value = match channel {
            Channel::Position => PropertyChange::Position(Vec2::new(
                object.get_property(property::POSITION_X)?,
                object.get_property(property::POSITION_Y)?,
            )),
            Channel::Rotation => PropertyChange::Rotation(object.get_property(property::ROTATION)?),
            Channel::Alpha => PropertyChange::Alpha(object.get_property(property::ALPHA)?),
        };
        Some(value)
    }

    /// 把值写回对象
    fn write(&self, object_id: ObjectId, value: PropertyChange) {
        let Some(registered) = self.objects.get(&object_id) else {
            return;
        };
        let object = &registered.object;
        let written = match value {
            PropertyChange::Position(p) => {
                object.set_property(property::POSITION_X, p.x)
                    & object.set_property(property::POSITION_Y, p.y)
            }
            PropertyChange::Rotation(r) => object.set_property(property::ROTATION, r),
            PropertyChange::Alpha(a) => object.set_property(property::ALPHA, a),
        };
        if !written {
            warn!(object = %object_id, ?value, "对象不支持该属性");
        }
    }

    // ========== 补间与定时器 ==========

    /// 启动补间
    ///
    /// 起始值取对象当前值，从当前时间开始播放 `duration` 秒。
    /// 同一通道上已有的补间被取消，其回调以 `finished = false` 返回。
    /// 对象未注册时补间不会启动，回调同样以 `false` 返回。
    pub fn start_tween(
        &mut self,
        object_id: ObjectId,
        change: PropertyChange,
        duration: f32,
        on_finish: FinishCallback,
    ) -> Vec<Fired> {
        let channel = Channel::of(&change);
        let Some(from) = self.read(object_id, channel) else {
            warn!(object = %object_id, ?channel, "对象未注册或缺少属性，补间未启动");
            return vec![Fired::Tween {
                callback: on_finish,
                finished: false,
            }];
        };

        let key = AnimPropertyKey::new(object_id, channel);
        let mut fired = Vec::new();
        if let Some(mut replaced) = self.tweens.remove(&key) {
            replaced.tween.cancel();
            debug!(key = %key, tween = ?replaced.tween.id, "补间被同通道的新补间替换");
            fired.push(Fired::Tween {
                callback: replaced.on_finish,
                finished: false,
            });
        }

        let id = TweenId(self.next_seq());
        let tween = Tween::new(id, from, change, self.now, duration).with_easing(self.easing);
        self.tweens.insert(key, ActiveTween { tween, on_finish });
        fired
    }

    /// 在 `duration` 秒后触发定时器
    pub fn schedule(&mut self, duration: f32, on_fire: TimerCallback) {
        let seq = self.next_seq();
        let fire_at = self.now + f64::from(duration.max(0.0));
        self.timers.push(Timer {
            seq,
            fire_at,
            on_fire,
        });
    }

    /// 取消对象上的所有补间
    ///
    /// 属性停在当前值，回调以 `finished = false` 返回。定时器不属于任何对象，不受影响。
    pub fn cancel_object(&mut self, object_id: ObjectId) -> Vec<Fired> {
        let keys: Vec<AnimPropertyKey> = self
            .tweens
            .keys()
            .filter(|key| key.object_id == object_id)
            .copied()
            .collect();

        let mut cancelled: Vec<ActiveTween> = keys
            .iter()
            .filter_map(|key| self.tweens.remove(key))
            .collect();
        cancelled.sort_by_key(|active| active.tween.id);

        if !cancelled.is_empty() {
            debug!(object = %object_id, count = cancelled.len(), "取消对象的所有补间");
        }

        cancelled
            .into_iter()
            .map(|mut active| {
                active.tween.cancel();
                Fired::Tween {
                    callback: active.on_finish,
                    finished: false,
                }
            })
            .collect()
    }

    // ========== 时钟推进 ==========

    /// 最早的截止时间
    pub fn next_deadline(&self) -> Option<f64> {
        self.next_due().map(|(deadline, _, _)| deadline)
    }

    /// 最早到期的事件：（截止时间，序号，事件）
    fn next_due(&self) -> Option<(f64, u64, Due)> {
        let tweens = self
            .tweens
            .iter()
            .map(|(key, active)| (active.tween.end_time(), active.tween.id.0, Due::Tween(*key)));
        let timers = self
            .timers
            .iter()
            .map(|timer| (timer.fire_at, timer.seq, Due::Timer(timer.seq)));

        tweens
            .chain(timers)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
    }

    /// 处理一个截止时间不晚于 `limit` 的事件
    ///
    /// 时钟前进到事件的截止时间，所有补间在该时刻采样并写回对象，
    /// 然后返回该事件的回调。没有到期事件时返回 `None`，时钟不变。
    pub fn pop_due(&mut self, limit: f64) -> Option<Fired> {
        let (deadline, _, due) = self.next_due()?;
        if deadline > limit {
            return None;
        }

        self.now = self.now.max(deadline);
        self.sample_all();

        match due {
            Due::Tween(key) => {
                let mut active = self.tweens.remove(&key)?;
                active.tween.complete();
                self.write(key.object_id, active.tween.current_value());
                Some(Fired::Tween {
                    callback: active.on_finish,
                    finished: true,
                })
            }
            Due::Timer(seq) => {
                let index = self.timers.iter().position(|timer| timer.seq == seq)?;
                let timer = self.timers.remove(index);
                Some(Fired::Timer(timer.on_fire))
            }
        }
    }

    /// 把时钟推进到 `time`（不会回退）并采样所有补间
    pub fn settle(&mut self, time: f64) {
        self.now = self.now.max(time);
        self.sample_all();
    }

    fn sample_all(&mut self) {
        let now = self.now;
        let values: Vec<(ObjectId, PropertyChange)> = self
            .tweens
            .iter_mut()
            .map(|(key, active)| {
                active.tween.sample(now);
                (key.object_id, active.tween.current_value())
            })
            .collect();
        for (object_id, value) in values {
            self.write(object_id, value);
        }
    }

    // ========== 查询 ==========

    /// 正在播放的补间数量
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// 挂起的定时器数量
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// 是否还有未处理的事件
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.timers.is_empty()
    }

    /// 对象是否有正在播放的补间
    pub fn has_object_animations(&self, object_id: ObjectId) -> bool {
        self.tweens.keys().any(|key| key.object_id == object_id)
    }

    /// 指定通道上的补间
    pub fn tween(&self, object_id: ObjectId, channel: Channel) -> Option<&Tween> {
        self.tweens
            .get(&AnimPropertyKey::new(object_id, channel))
            .map(|active| &active.tween)
    }
}
