//! 场景：舞台尺寸 + 视图起点 + 动作树

use anim_runtime::{Action, ActionResult, Vec2};

/// 舞台（父视图）尺寸
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub width: f32,
    pub height: f32,
}

impl Stage {
    /// 舞台中心
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// 示例视图的边长：舞台宽度的三分之一
    pub fn view_side(&self) -> f32 {
        self.width / 3.0
    }
}

/// 可运行的场景
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: &'static str,
    pub start: Vec2,
    pub action: Action,
}

/// 示例控制器：移到左侧、顺时针转 90°、移到右侧、逆时针转 90°，无限重复
pub fn demo(stage: Stage) -> ActionResult<Scene> {
    let left = Vec2::new(stage.view_side() * 0.75, stage.height / 2.0);
    let right = Vec2::new(stage.width - left.x, left.y);

    let round = Action::sequence([
        Action::move_to(left, 1.0)?,
        Action::rotate_by(90.0, 0.6)?,
        Action::move_to(right, 1.0)?,
        Action::rotate_by(-90.0, 0.6)?,
    ]);

    Ok(Scene {
        name: "demo",
        start: stage.center(),
        action: Action::repeat_forever(round),
    })
}

/// 在舞台中心抖动
pub fn shake(
    stage: Stage,
    force: Vec2,
    frequency: f32,
    duration: f32,
    seed: Option<u64>,
) -> ActionResult<Scene> {
    let action = match seed {
        Some(seed) => Action::shake_seeded(force, frequency, duration, seed)?,
        None => Action::shake(force, frequency, duration)?,
    };
    Ok(Scene {
        name: "shake",
        start: stage.center(),
        action,
    })
}

/// 从舞台中心出发依次经过 `points`
pub fn follow(stage: Stage, points: &[Vec2], speed: f32) -> ActionResult<Scene> {
    Ok(Scene {
        name: "follow",
        start: stage.center(),
        action: Action::follow_points(points.iter().copied(), speed)?,
    })
}

/// 解析 `x,y` 形式的点
pub fn parse_point(text: &str) -> Result<Vec2, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("点的格式应为 x,y: {text}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .map_err(|e| format!("无效坐标 '{}': {e}", part.trim()))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAGE: Stage = Stage {
        width: 300.0,
        height: 600.0,
    };

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1.5, -2").unwrap(), Vec2::new(1.5, -2.0));
        assert!(parse_point("1.5").is_err());
        assert!(parse_point("a,2").unwrap_err().contains("无效坐标 'a'"));
    }

    #[test]
    fn test_demo_waypoints() {
        let scene = demo(STAGE).unwrap();

        assert_eq!(scene.start, Vec2::new(150.0, 300.0));
        assert!(scene.action.is_infinite());
        insta::assert_snapshot!(scene.action.describe(), @r"
        repeat forever [inf]
          sequence [3.20s]
            move_to (75, 300) [1.00s]
            rotate_by 90° [0.60s]
            move_to (225, 300) [1.00s]
            rotate_by -90° [0.60s]
        ");
    }

    #[test]
    fn test_shake_rejects_bad_frequency() {
        let bad = shake(STAGE, Vec2::new(5.0, 5.0), 0.0, 1.0, Some(1));
        assert!(bad.is_err());
        let scene = shake(STAGE, Vec2::new(5.0, 5.0), 10.0, 1.0, Some(1)).unwrap();
        assert!((scene.action.duration() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_follow_empty_path() {
        let scene = follow(STAGE, &[], 10.0).unwrap();
        assert_eq!(scene.action.duration(), 0.0);
    }
}
