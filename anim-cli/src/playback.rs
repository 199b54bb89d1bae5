//! 在模拟宿主上逐帧播放场景并采样视图状态

use std::cell::Cell;
use std::rc::Rc;

use anim_host::{HostConfig, SimHost, View};
use anim_runtime::Animator;
use anyhow::{Result, ensure};
use tracing::{debug, info};

use crate::scene::Scene;

/// 判断采样时刻时容忍的时钟误差
const SAMPLE_TOLERANCE: f64 = 1e-6;

/// 播放选项
#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    /// 播放总时长（秒）
    pub seconds: f32,
    /// 采样间隔（秒）
    pub every: f32,
}

/// 播放结果
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    /// 每个采样点一行
    pub samples: Vec<String>,
    /// 动作完成的模拟时刻，未完成为 `None`
    pub completed_at: Option<f64>,
}

impl Playback {
    /// 结尾的状态行
    pub fn summary(&self) -> String {
        match self.completed_at {
            Some(t) => format!("完成于 t={t:.2}"),
            None => "运行中（未完成）".to_string(),
        }
    }
}

/// 播放场景
pub fn play(config: &HostConfig, scene: &Scene, options: PlayOptions) -> Result<Playback> {
    ensure!(
        options.seconds.is_finite() && options.seconds >= 0.0,
        "播放时长必须是非负有限数: {}",
        options.seconds
    );
    ensure!(
        options.every.is_finite() && options.every > 0.0,
        "采样间隔必须是正数: {}",
        options.every
    );
    config.validate()?;

    let host = Rc::new(SimHost::from_config(config));
    let view = View::at(scene.name, scene.start);
    let id = host.register(Rc::new(view.clone()));
    let animator = Animator::new(Rc::clone(&host));

    let completed_at = Rc::new(Cell::new(None));
    let record = Rc::clone(&completed_at);
    let clock = Rc::clone(&host);
    animator.run_with_completion(&scene.action, &id, move || record.set(Some(clock.now())));

    info!(
        scene = scene.name,
        declared = scene.action.duration(),
        seconds = options.seconds,
        "开始播放"
    );

    let horizon = f64::from(options.seconds);
    let every = f64::from(options.every);
    let mut next_sample = every;
    let mut samples = vec![sample(&host, &view, id)];

    while host.now() + SAMPLE_TOLERANCE < horizon {
        let events = host.step_frame();
        if events > 0 {
            debug!(now = host.now(), events, "处理帧内事件");
        }
        if host.now() + SAMPLE_TOLERANCE >= next_sample {
            samples.push(sample(&host, &view, id));
            while next_sample <= host.now() + SAMPLE_TOLERANCE {
                next_sample += every;
            }
        }
    }

    Ok(Playback {
        samples,
        completed_at: completed_at.get(),
    })
}

fn sample(host: &SimHost, view: &View, id: anim_host::ObjectId) -> String {
    let detached = if host.is_attached(id) { "" } else { " (detached)" };
    format!("t={:.2} {}{}", host.now(), view.transform(), detached)
}
