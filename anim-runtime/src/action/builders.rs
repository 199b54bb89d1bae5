//! 基础动作与组合动作的构建函数。

use super::{
    Action, ActionKind, Block, FadeAction, MoveAction, RepeatAction, RepeatCount, RotateAction,
};
use crate::error::{ActionError, ActionResult, check_duration, check_finite};
use crate::geometry::Vec2;

fn check_point(param: &'static str, point: Vec2) -> ActionResult<Vec2> {
    if point.is_finite() {
        Ok(point)
    } else {
        let value = if point.x.is_finite() { point.y } else { point.x };
        Err(ActionError::NonFinite { param, value })
    }
}

impl Action {
    // ========== 基础动作 ==========

    /// 把中心点移动到 `point`
    pub fn move_to(point: Vec2, duration: f32) -> ActionResult<Self> {
        Self::movement(point, false, duration)
    }

    /// 把中心点移动 `delta`，相对量在执行时基于当前位置计算
    pub fn move_by(delta: Vec2, duration: f32) -> ActionResult<Self> {
        Self::movement(delta, true, duration)
    }

    fn movement(point: Vec2, relative: bool, duration: f32) -> ActionResult<Self> {
        let point = check_point("point", point)?;
        let duration = check_duration(duration)?;
        Ok(Self::from_kind(
            ActionKind::Move(MoveAction { point, relative }),
            duration,
        ))
    }

    /// 旋转到 `degrees` 度
    pub fn rotate_to(degrees: f32, duration: f32) -> ActionResult<Self> {
        Self::rotation(degrees, false, duration)
    }

    /// 顺时针旋转 `degrees` 度（负值为逆时针）
    pub fn rotate_by(degrees: f32, duration: f32) -> ActionResult<Self> {
        Self::rotation(degrees, true, duration)
    }

    fn rotation(degrees: f32, relative: bool, duration: f32) -> ActionResult<Self> {
        let degrees = check_finite("angle", degrees)?;
        let duration = check_duration(duration)?;
        Ok(Self::from_kind(
            ActionKind::Rotate(RotateAction { degrees, relative }),
            duration,
        ))
    }

    /// 把透明度调整到 `alpha`
    pub fn fade_to(alpha: f32, duration: f32) -> ActionResult<Self> {
        Self::fade(alpha, false, duration)
    }

    /// 在当前透明度上增加 `alpha`
    pub fn fade_by(alpha: f32, duration: f32) -> ActionResult<Self> {
        Self::fade(alpha, true, duration)
    }

    fn fade(alpha: f32, relative: bool, duration: f32) -> ActionResult<Self> {
        let alpha = check_finite("alpha", alpha)?;
        let duration = check_duration(duration)?;
        Ok(Self::from_kind(
            ActionKind::Fade(FadeAction { alpha, relative }),
            duration,
        ))
    }

    /// 等待 `duration` 秒
    pub fn wait(duration: f32) -> ActionResult<Self> {
        let duration = check_duration(duration)?;
        Ok(Self::from_kind(ActionKind::Wait, duration))
    }

    /// 同步执行代码块，时长为 0
    ///
    /// 代码块中的 panic 不会被引擎捕获。
    pub fn run_block(block: impl Fn() + 'static) -> Self {
        Self::from_kind(ActionKind::RunBlock(Block(std::rc::Rc::new(block))), 0.0)
    }

    /// 把目标从父节点移除，时长为 0
    pub fn remove_from_superview() -> Self {
        Self::from_kind(ActionKind::RemoveFromSuperview, 0.0)
    }

    // ========== 组合动作 ==========

    /// 依次执行，时长为各子动作之和
    ///
    /// 空序列立即完成。
    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        let actions: Vec<Action> = actions.into_iter().collect();
        let duration: f32 = actions.iter().map(Action::duration).sum();
        Self::from_kind(ActionKind::Sequence(actions), duration)
    }

    /// 同时执行，时长为各子动作的最大值
    ///
    /// 空组立即完成。
    pub fn group(actions: impl IntoIterator<Item = Action>) -> Self {
        let actions: Vec<Action> = actions.into_iter().collect();
        let duration = actions.iter().map(Action::duration).fold(0.0_f32, f32::max);
        Self::from_kind(ActionKind::Group(actions), duration)
    }

    /// 重复 `count` 次
    ///
    /// - `count >= 1`：恰好执行 `count` 次
    /// - `count == 0`：不执行子动作，立即完成
    /// - `count == -1`：无限重复
    /// - 其余负数：返回 [`ActionError::InvalidRepeatCount`]
    pub fn repeat(action: Action, count: i64) -> ActionResult<Self> {
        Ok(Self::repeat_with(action, RepeatCount::from_raw(count)?))
    }

    /// 按 [`RepeatCount`] 重复
    pub fn repeat_with(action: Action, count: RepeatCount) -> Self {
        let duration = count.total_duration(action.duration());
        Self::from_kind(ActionKind::Repeat(RepeatAction { action, count }), duration)
    }

    /// 无限重复
    pub fn repeat_forever(action: Action) -> Self {
        Self::repeat_with(action, RepeatCount::Forever)
    }
}
