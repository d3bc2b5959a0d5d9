use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// worker 数量（包含 rank 0 的协调者）
    pub worker_count: usize,
    /// 等待所有 worker 上报的屏障超时（毫秒）
    pub barrier_timeout_ms: u64,
    /// 严格解析模式：输入文档有问题时直接失败
    pub strict_decode: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出文档是否格式化
    pub pretty_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_count: 4,
            barrier_timeout_ms: 300_000,
            strict_decode: false,
            verbose_logging: false,
            pretty_output: true,
        }
    }
}

impl Config {
    /// 从环境变量加载（未设置的项使用默认值）
    pub fn from_env() -> AppResult<Self> {
        Self::default().merge_env()
    }

    /// 从 TOML 文件加载，文件中缺失的项使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let path_str = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileLoadFailed {
                path: path_str.clone(),
                source: Box::new(e),
            })?;
        parse_toml(&path_str, &content)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        parse_toml("<inline>", content)
    }

    /// 用环境变量覆盖当前配置
    pub fn merge_env(self) -> AppResult<Self> {
        Ok(Self {
            worker_count: env_override("WORKER_COUNT", self.worker_count)?,
            barrier_timeout_ms: env_override("BARRIER_TIMEOUT_MS", self.barrier_timeout_ms)?,
            strict_decode: env_override("STRICT_DECODE", self.strict_decode)?,
            verbose_logging: env_override("VERBOSE_LOGGING", self.verbose_logging)?,
            pretty_output: env_override("PRETTY_OUTPUT", self.pretty_output)?,
        })
    }

    /// 校验配置，必须在任何工作开始之前调用
    pub fn validate(&self) -> AppResult<()> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidWorkerCount {
                worker_count: self.worker_count,
            }
            .into());
        }
        if self.barrier_timeout_ms == 0 {
            return Err(ConfigError::InvalidBarrierTimeout.into());
        }
        Ok(())
    }

    pub fn barrier_timeout(&self) -> Duration {
        Duration::from_millis(self.barrier_timeout_ms)
    }
}

fn parse_toml(path: &str, content: &str) -> AppResult<Config> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::FileLoadFailed {
        path: path.to_string(),
        source: Box::new(e),
    })?;
    Ok(config)
}

fn env_override<T: std::str::FromStr>(var_name: &str, current: T) -> AppResult<T> {
    match std::env::var(var_name) {
        Ok(value) => parse_value(var_name, &value),
        Err(_) => Ok(current),
    }
}

fn parse_value<T: std::str::FromStr>(var_name: &str, value: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: std::any::type_name::<T>().to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.barrier_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = Config {
            worker_count: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("worker 数量必须大于 0"));
    }

    #[test]
    fn test_toml_partial_keeps_defaults() {
        let config = Config::from_toml_str("worker_count = 8\nstrict_decode = true\n").unwrap();
        assert_eq!(config.worker_count, 8);
        assert!(config.strict_decode);
        assert_eq!(config.barrier_timeout_ms, 300_000);
        assert!(config.pretty_output);
    }

    #[test]
    fn test_toml_invalid_type() {
        assert!(Config::from_toml_str("worker_count = \"many\"").is_err());
    }

    /// 修改环境变量的测试必须串行
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_env_overrides_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = std::env::var("WORKER_COUNT").ok();
        std::env::set_var("WORKER_COUNT", "6");

        let from_toml = Config::from_toml_str("worker_count = 8\nstrict_decode = true\n")
            .unwrap()
            .merge_env();
        let from_default = Config::from_env();
        std::env::set_var("WORKER_COUNT", "zero");
        let invalid = Config::default().merge_env();

        match previous {
            Some(value) => std::env::set_var("WORKER_COUNT", value),
            None => std::env::remove_var("WORKER_COUNT"),
        }

        let from_toml = from_toml.unwrap();
        assert_eq!(from_toml.worker_count, 6);
        assert!(from_toml.strict_decode);
        assert_eq!(from_default.unwrap().worker_count, 6);
        assert!(invalid.unwrap_err().to_string().contains("WORKER_COUNT"));
    }

    #[test]
    fn test_parse_value_error_names_variable() {
        let err = parse_value::<usize>("WORKER_COUNT", "abc").unwrap_err();
        assert!(err.to_string().contains("WORKER_COUNT"));
        assert!(parse_value::<bool>("STRICT_DECODE", " true ").unwrap());
    }
}
