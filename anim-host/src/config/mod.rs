//! # Config 模块
//!
//! 参考宿主的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (anim.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::animation::EasingFunction;

/// 宿主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// 逐帧推进时的帧率
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// 补间使用的缓动函数
    #[serde(default)]
    pub easing: EasingFunction,

    /// 单次推进最多处理的事件数
    ///
    /// 无限重复的零时长动作会在同一时刻不断产生新事件，超过上限后本次推进提前结束。
    #[serde(default = "default_max_events_per_advance")]
    pub max_events_per_advance: usize,
}

fn default_frame_rate() -> u32 {
    60
}

fn default_max_events_per_advance() -> usize {
    10_000
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            easing: EasingFunction::default(),
            max_events_per_advance: default_max_events_per_advance(),
        }
    }
}

impl HostConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 从 JSON 文本解析
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::ValidationFailed(
                "帧率必须大于 0".to_string(),
            ));
        }

        if self.max_events_per_advance == 0 {
            return Err(ConfigError::ValidationFailed(
                "单次推进的事件上限必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 每帧时长（秒）
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
