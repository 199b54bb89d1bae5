//! 由基础动作组合出的派生动作：淡入淡出、路径跟随、抖动。

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Action, ActionKind, DeferredAction, MoveAction};
use crate::error::{ActionError, ActionResult, check_duration, check_finite};
use crate::geometry::Vec2;
use crate::host::TargetSnapshot;

impl Action {
    /// 透明度变为 1
    pub fn fade_in(duration: f32) -> ActionResult<Self> {
        Self::fade_to(1.0, duration)
    }

    /// 透明度变为 0
    pub fn fade_out(duration: f32) -> ActionResult<Self> {
        Self::fade_to(0.0, duration)
    }

    /// 以 `speed`（每秒距离）依次移动到 `points` 中的每个点
    ///
    /// 每一段的时长在该段开始时由目标当前位置计算，因此声明时长为 0。
    pub fn follow_points(
        points: impl IntoIterator<Item = Vec2>,
        speed: f32,
    ) -> ActionResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ActionError::InvalidSpeed { speed });
        }

        let mut legs = Vec::new();
        for point in points {
            check_finite("point.x", point.x)?;
            check_finite("point.y", point.y)?;
            legs.push(Self::deferred("follow_point", 0.0, move |snapshot| {
                let duration = snapshot.position.distance(point) / speed;
                absolute_move(point, duration)
            }));
        }
        Ok(Self::sequence(legs))
    }

    /// 围绕起始中心随机抖动
    ///
    /// 每秒 `frequency` 次，每次移动到中心 `±force` 范围内的随机点，
    /// 共 `floor(duration * frequency)` 次，最后瞬间回到起始中心。
    /// 总次数超过一百万次时返回 [`ActionError::TooManyShakeLegs`]。
    pub fn shake(force: Vec2, frequency: f32, duration: f32) -> ActionResult<Self> {
        let plan = ShakePlan::new(force, frequency, duration)?;
        Ok(Self::deferred("shake", plan.total_duration(), move |snapshot| {
            plan.build(snapshot.position, &mut rand::thread_rng())
        }))
    }

    /// 与 [`Action::shake`] 相同，但使用固定种子，便于复现
    pub fn shake_seeded(
        force: Vec2,
        frequency: f32,
        duration: f32,
        seed: u64,
    ) -> ActionResult<Self> {
        let plan = ShakePlan::new(force, frequency, duration)?;
        let rng = RefCell::new(StdRng::seed_from_u64(seed));
        Ok(Self::deferred("shake", plan.total_duration(), move |snapshot| {
            plan.build(snapshot.position, &mut *rng.borrow_mut())
        }))
    }

    pub(crate) fn deferred(
        label: &'static str,
        duration: f32,
        resolver: impl Fn(&TargetSnapshot) -> Action + 'static,
    ) -> Self {
        Self::from_kind(
            ActionKind::Deferred(DeferredAction {
                label,
                resolver: Rc::new(resolver),
            }),
            duration,
        )
    }
}

/// 运行时计算出的移动，参数已保证有效
fn absolute_move(point: Vec2, duration: f32) -> Action {
    Action::from_kind(
        ActionKind::Move(MoveAction {
            point,
            relative: false,
        }),
        duration,
    )
}

/// 单个抖动动作最多展开的移动段数
pub(crate) const MAX_SHAKE_LEGS: u32 = 1_000_000;

/// 抖动参数
#[derive(Debug, Clone, Copy)]
struct ShakePlan {
    force: Vec2,
    leg_duration: f32,
    leg_count: u32,
}

impl ShakePlan {
    fn new(force: Vec2, frequency: f32, duration: f32) -> ActionResult<Self> {
        check_finite("force.x", force.x)?;
        check_finite("force.y", force.y)?;
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(ActionError::InvalidFrequency { frequency });
        }
        let duration = check_duration(duration)?;

        // 1s * 40Hz 这类精确乘积必须得到 40，而不是 39.999...
        let legs = (f64::from(duration) * f64::from(frequency) + 1e-6).floor();
        if legs > f64::from(MAX_SHAKE_LEGS) {
            return Err(ActionError::TooManyShakeLegs {
                legs,
                max: MAX_SHAKE_LEGS,
            });
        }

        Ok(Self {
            force,
            leg_duration: 1.0 / frequency,
            leg_count: legs as u32,
        })
    }

    fn total_duration(&self) -> f32 {
        self.leg_duration * self.leg_count as f32
    }

    fn build(&self, center: Vec2, rng: &mut impl Rng) -> Action {
        let mut legs = Vec::with_capacity(self.leg_count as usize + 1);
        for _ in 0..self.leg_count {
            let angle: f32 = rng.gen_range(0.0..TAU);
            let offset = Vec2::new(angle.cos() * self.force.x, angle.sin() * self.force.y);
            legs.push(absolute_move(center + offset, self.leg_duration));
        }
        legs.push(absolute_move(center, 0.0));
        Action::sequence(legs)
    }
}
