//! # Traits 模块
//!
//! 可动画对象接口与属性键定义。
//!
//! ## 核心概念
//!
//! - `ObjectId`: 由 AnimationSystem 分配的唯一对象标识符
//! - `Channel`: 一组一起插值的属性（位置由 x/y 两个属性组成）
//! - `Animatable`: 可动画对象接口

use anim_runtime::PropertyChange;

/// 对象唯一标识符
///
/// 由 `AnimationSystem` 在对象注册时分配，使用内部计数器生成，不会重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    /// 创建新的对象 ID（仅供 AnimationSystem 内部使用）
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// 属性名称
pub mod property {
    pub const POSITION_X: &str = "position_x";
    pub const POSITION_Y: &str = "position_y";
    pub const ROTATION: &str = "rotation";
    pub const ALPHA: &str = "alpha";
}

/// 动画通道
///
/// 同一对象的同一通道同时只能有一个补间。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// 位置（`position_x` + `position_y`）
    Position,
    /// 旋转（`rotation`，弧度）
    Rotation,
    /// 透明度（`alpha`）
    Alpha,
}

impl Channel {
    /// 属性修改所在的通道
    pub fn of(change: &PropertyChange) -> Self {
        match change {
            PropertyChange::Position(_) => Self::Position,
            PropertyChange::Rotation(_) => Self::Rotation,
            PropertyChange::Alpha(_) => Self::Alpha,
        }
    }

    /// 通道包含的属性名称
    pub fn property_ids(self) -> &'static [&'static str] {
        match self {
            Self::Position => &[property::POSITION_X, property::POSITION_Y],
            Self::Rotation => &[property::ROTATION],
            Self::Alpha => &[property::ALPHA],
        }
    }
}

/// 属性键：对象 + 通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimPropertyKey {
    /// 对象实例 ID
    pub object_id: ObjectId,
    /// 通道
    pub channel: Channel,
}

impl AnimPropertyKey {
    /// 创建属性键
    pub fn new(object_id: ObjectId, channel: Channel) -> Self {
        Self { object_id, channel }
    }
}

impl std::fmt::Display for AnimPropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:?}", self.object_id, self.channel)
    }
}

/// 可动画对象接口
///
/// 对象通过实现此 trait 声明自己有哪些属性可以被动画，
/// 系统直接读写属性值，不假设对象的具体类型。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Sprite {
///     x: Cell<f32>,
///     y: Cell<f32>,
/// }
///
/// impl Animatable for Sprite {
///     fn get_property(&self, property_id: &str) -> Option<f32> {
///         match property_id {
///             "position_x" => Some(self.x.get()),
///             "position_y" => Some(self.y.get()),
///             _ => None,
///         }
///     }
///
///     fn set_property(&self, property_id: &str, value: f32) -> bool {
///         match property_id {
///             "position_x" => { self.x.set(value); true }
///             "position_y" => { self.y.set(value); true }
///             _ => false,
///         }
///     }
///
///     fn property_list(&self) -> &'static [&'static str] {
///         &["position_x", "position_y"]
///     }
/// }
/// ```
pub trait Animatable: 'static {
    /// 获取属性的当前值，属性不存在时返回 `None`
    fn get_property(&self, property_id: &str) -> Option<f32>;

    /// 设置属性的新值，属性不存在时返回 `false`
    fn set_property(&self, property_id: &str, value: f32) -> bool;

    /// 所有可动画属性的列表
    fn property_list(&self) -> &'static [&'static str];

    /// 从父节点移除时调用
    fn on_detached(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use anim_runtime::Vec2;

    #[test]
    fn test_object_id() {
        let id1 = ObjectId::new(1);
        let id2 = ObjectId::new(2);

        assert_eq!(id1, ObjectId::new(1));
        assert_ne!(id1, id2);
        assert_eq!(id1.value(), 1);
        assert_eq!(id1.to_string(), "ObjectId(1)");
    }

    #[test]
    fn test_channel_of_change() {
        assert_eq!(
            Channel::of(&PropertyChange::Position(Vec2::zero())),
            Channel::Position
        );
        assert_eq!(
            Channel::of(&PropertyChange::Rotation(1.0)),
            Channel::Rotation
        );
        assert_eq!(Channel::of(&PropertyChange::Alpha(0.5)), Channel::Alpha);
        assert_eq!(
            Channel::Position.property_ids(),
            &["position_x", "position_y"]
        );
    }

    #[test]
    fn test_property_key() {
        let id = ObjectId::new(3);
        let key = AnimPropertyKey::new(id, Channel::Alpha);
        assert_eq!(key, AnimPropertyKey::new(id, Channel::Alpha));
        assert_ne!(key, AnimPropertyKey::new(id, Channel::Rotation));
        assert_eq!(key.to_string(), "ObjectId(3):Alpha");
    }
}
