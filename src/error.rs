//! 错误类型
//!
//! 顶层 `AppError` 按关注点拆分为若干子错误：配置、解析、worker、文件、输出。
//! 任务级问题（未知题型、字段缺失）不会走到这里，在本地用安全默认值处理。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（worker 数量非法、配置文件无法解析等）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 输入文档解析错误
    #[error("解析错误: {0}")]
    Decode(#[from] DecodeError),
    /// worker 相关错误（未上报、上报不一致）
    #[error("worker错误: {0}")]
    Worker(#[from] WorkerError),
    /// 文件读取错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 输出文档写入错误
    #[error("输出错误: {0}")]
    Encode(#[from] EncodeError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// worker 数量必须为正数
    #[error("worker 数量必须大于 0 (当前: {worker_count})")]
    InvalidWorkerCount { worker_count: usize },
    /// 屏障超时必须为正数
    #[error("屏障超时必须大于 0 毫秒")]
    InvalidBarrierTimeout,
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取或解析失败
    #[error("配置文件 {path} 加载失败: {source}")]
    FileLoadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 输入文档解析错误
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 文档不是合法 JSON
    #[error("输入文档不是合法的 JSON: {source}")]
    MalformedDocument {
        #[source]
        source: serde_json::Error,
    },
    /// 缺少 evaluation_tasks 数组
    #[error("输入文档缺少 evaluation_tasks 数组")]
    MissingTaskArray,
    /// 单个任务无法解析
    #[error("第 {index} 个任务无法解析: {reason}")]
    InvalidTask { index: usize, reason: String },
}

/// worker 错误
#[derive(Debug, Error)]
pub enum WorkerError {
    /// 分配了非空分片的 worker 未在屏障内上报
    #[error("worker rank {rank} 不可用 (分片大小 {shard_len}): {reason}")]
    Unavailable {
        rank: usize,
        shard_len: usize,
        reason: String,
    },
    /// 上报结果数量与分片大小不符
    #[error("worker rank {rank} 上报了 {reported} 条结果，期望 {expected} 条")]
    IncompleteReport {
        rank: usize,
        reported: usize,
        expected: usize,
    },
    /// 上报的起始位置与分片计划不符
    #[error("worker rank {rank} 的起始位置 {offset} 与期望位置 {expected} 不符")]
    OffsetMismatch {
        rank: usize,
        offset: usize,
        expected: usize,
    },
    /// 同一 rank 重复上报
    #[error("worker rank {rank} 重复上报")]
    DuplicateReport { rank: usize },
    /// rank 超出 worker 集合范围
    #[error("rank {rank} 超出范围 [0, {total_workers})")]
    RankOutOfRange { rank: usize, total_workers: usize },
}

/// 文件错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 输出错误
#[derive(Debug, Error)]
pub enum EncodeError {
    /// 序列化失败
    #[error("序列化输出文档失败: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 worker 不可用错误
    pub fn worker_unavailable(rank: usize, shard_len: usize, reason: impl Into<String>) -> Self {
        AppError::Worker(WorkerError::Unavailable {
            rank,
            shard_len,
            reason: reason.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Encode(EncodeError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为 worker 不可用
    pub fn is_worker_unavailable(&self) -> bool {
        matches!(self, AppError::Worker(WorkerError::Unavailable { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
