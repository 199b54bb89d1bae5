//! # View 模块
//!
//! 实现 `Animatable` trait 的矩形视图。
//!
//! 视图数据放在 `Rc<RefCell<...>>` 中，克隆出的句柄共享同一份数据：
//! 一份注册给动画系统，一份留给调用方读取结果。

use std::cell::RefCell;
use std::rc::Rc;

use anim_runtime::Vec2;

use crate::animation::{Animatable, Transform, property};

/// 视图数据
#[derive(Debug, Clone, PartialEq)]
pub struct ViewData {
    /// 视图名称（用于日志）
    pub name: String,
    /// 变换状态
    pub transform: Transform,
    /// 被移除的次数
    pub detach_count: u32,
}

impl ViewData {
    /// 位于原点的视图
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            detach_count: 0,
        }
    }
}

/// 可动画视图
///
/// 支持的属性：
/// - `position_x`, `position_y`: 中心点
/// - `rotation`: 旋转（弧度）
/// - `alpha`: 透明度，写入时限制在 0.0 - 1.0
#[derive(Debug, Clone)]
pub struct View {
    data: Rc<RefCell<ViewData>>,
}

impl View {
    /// 支持的属性列表
    pub const PROPERTIES: &'static [&'static str] = &[
        property::POSITION_X,
        property::POSITION_Y,
        property::ROTATION,
        property::ALPHA,
    ];

    /// 创建位于原点的视图
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_data(ViewData::new(name))
    }

    /// 创建位于指定中心点的视图
    pub fn at(name: impl Into<String>, position: Vec2) -> Self {
        let mut data = ViewData::new(name);
        data.transform = Transform::at(position);
        Self::from_data(data)
    }

    /// 从数据创建
    pub fn from_data(data: ViewData) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// 视图名称
    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    /// 当前变换
    pub fn transform(&self) -> Transform {
        self.data.borrow().transform
    }

    /// 设置中心点
    pub fn set_position(&self, position: Vec2) {
        self.data.borrow_mut().transform.position = position;
    }

    /// 被移除的次数
    pub fn detach_count(&self) -> u32 {
        self.data.borrow().detach_count
    }

    /// 获取属性值
    pub fn get(&self, property_id: &str) -> Option<f32> {
        let data = self.data.borrow();
        let transform = &data.transform;
        match property_id {
            property::POSITION_X => Some(transform.position.x),
            property::POSITION_Y => Some(transform.position.y),
            property::ROTATION => Some(transform.rotation),
            property::ALPHA => Some(transform.alpha()),
            _ => None,
        }
    }

    /// 设置属性值
    pub fn set(&self, property_id: &str, value: f32) -> bool {
        let mut data = self.data.borrow_mut();
        let transform = &mut data.transform;
        match property_id {
            property::POSITION_X => transform.position.x = value,
            property::POSITION_Y => transform.position.y = value,
            property::ROTATION => transform.rotation = value,
            property::ALPHA => transform.set_alpha(value),
            _ => return false,
        }
        true
    }

    /// 数据快照
    pub fn snapshot(&self) -> ViewData {
        self.data.borrow().clone()
    }
}

impl Animatable for View {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        self.get(property_id)
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        self.set(property_id, value)
    }

    fn property_list(&self) -> &'static [&'static str] {
        Self::PROPERTIES
    }

    fn on_detached(&self) {
        self.data.borrow_mut().detach_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_creation() {
        let view = View::at("box", Vec2::new(10.0, 20.0));
        assert_eq!(view.name(), "box");
        assert_eq!(view.get("position_x"), Some(10.0));
        assert_eq!(view.get("position_y"), Some(20.0));
        assert_eq!(view.get("alpha"), Some(1.0));
        assert_eq!(view.get("scale_x"), None);
    }

    #[test]
    fn test_property_modification() {
        let view = View::new("box");

        assert!(view.set("rotation", 1.5));
        assert_eq!(view.transform().rotation, 1.5);

        // alpha 被限制在 0.0 - 1.0
        assert!(view.set("alpha", 1.5));
        assert_eq!(view.get("alpha"), Some(1.0));
        assert!(view.set("alpha", -0.5));
        assert_eq!(view.get("alpha"), Some(0.0));

        assert!(!view.set("unknown", 1.0));
    }

    #[test]
    fn test_animatable_trait() {
        let view = View::new("box");
        let animatable: &dyn Animatable = &view;

        assert_eq!(animatable.property_list().len(), 4);
        assert!(animatable.set_property("position_y", 7.0));
        assert_eq!(animatable.get_property("position_y"), Some(7.0));

        animatable.on_detached();
        assert_eq!(view.detach_count(), 1);
    }

    #[test]
    fn test_clone_shares_data() {
        let view = View::new("box");
        let other = view.clone();

        other.set_position(Vec2::new(3.0, 4.0));

        assert_eq!(view.transform().position, Vec2::new(3.0, 4.0));
        assert_eq!(view.snapshot(), other.snapshot());
    }
}
