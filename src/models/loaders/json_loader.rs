//! JSON 文档适配器
//!
//! 输入文档 → `Vec<EvaluationTask>`，`EvaluationDocument` → 输出文档。
//! 宽松模式下结构问题只记警告：整份文档有问题按 0 个任务处理，单个任务有问题则跳过该任务。

use crate::error::{AppError, AppResult, DecodeError, EncodeError};
use crate::models::task::EvaluationTask;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// 解析后的输入
#[derive(Debug, Clone, Default)]
pub struct DecodedInput {
    /// 输入中的 job_metadata（不透明，原样保留）
    pub job_metadata: Option<JsonValue>,
    pub tasks: Vec<EvaluationTask>,
    /// 因无法解析而被跳过的任务数
    pub skipped: usize,
}

/// 从字符串解析输入文档
pub fn decode_input(content: &str, strict: bool) -> AppResult<DecodedInput> {
    let root: JsonValue = match serde_json::from_str(content) {
        Ok(root) => root,
        Err(source) => {
            return lenient_or_fail(DecodeError::MalformedDocument { source }, strict);
        }
    };

    let JsonValue::Object(mut root) = root else {
        return lenient_or_fail(DecodeError::MissingTaskArray, strict);
    };

    let job_metadata = root.remove("job_metadata");
    let items = match root.remove("evaluation_tasks") {
        Some(JsonValue::Array(items)) => items,
        _ => return lenient_or_fail(DecodeError::MissingTaskArray, strict),
    };

    let mut decoded = DecodedInput {
        job_metadata,
        tasks: Vec::with_capacity(items.len()),
        skipped: 0,
    };

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<EvaluationTask>(item) {
            Ok(task) => decoded.tasks.push(task),
            Err(e) => {
                if strict {
                    return Err(DecodeError::InvalidTask {
                        index,
                        reason: e.to_string(),
                    }
                    .into());
                }
                warn!("⚠️ 跳过第 {} 个任务（无法解析）: {}", index, e);
                decoded.skipped += 1;
            }
        }
    }

    debug!(
        "解析完成: {} 个任务, 跳过 {} 个",
        decoded.tasks.len(),
        decoded.skipped
    );
    Ok(decoded)
}

fn lenient_or_fail(err: DecodeError, strict: bool) -> AppResult<DecodedInput> {
    if strict {
        return Err(err.into());
    }
    warn!("⚠️ 输入文档无法解析，按 0 个任务处理: {}", err);
    Ok(DecodedInput::default())
}

/// 从文件加载输入文档
pub async fn load_input_document(path: &Path, strict: bool) -> AppResult<DecodedInput> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    decode_input(&content, strict)
}

/// 序列化为 JSON 字符串（格式化时两空格缩进，末尾带换行）
pub fn encode_document<T: Serialize>(value: &T, pretty: bool) -> AppResult<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let mut json = encoded.map_err(|source| EncodeError::SerializeFailed { source })?;
    json.push('\n');
    Ok(json)
}

/// 原子写入：先写同目录下的临时文件，再重命名到目标路径
///
/// 失败时目标路径不会出现不完整的文档。
pub async fn write_json_atomic<T: Serialize>(path: &Path, value: &T, pretty: bool) -> AppResult<()> {
    stage_json(path, value, pretty).await?.commit().await
}

/// 已写入临时文件、尚未重命名到目标路径的文档
#[derive(Debug)]
pub struct StagedFile {
    tmp_path: PathBuf,
    path: PathBuf,
}

impl StagedFile {
    /// 重命名到目标路径
    pub async fn commit(self) -> AppResult<()> {
        if let Err(e) = fs::rename(&self.tmp_path, &self.path).await {
            let _ = fs::remove_file(&self.tmp_path).await;
            return Err(AppError::file_write_failed(self.path.display().to_string(), e));
        }
        debug!("已写入: {}", self.path.display());
        Ok(())
    }

    /// 放弃写入，删除临时文件
    pub async fn discard(self) {
        if let Err(e) = fs::remove_file(&self.tmp_path).await {
            warn!("⚠️ 删除临时文件 {} 失败: {}", self.tmp_path.display(), e);
        }
    }
}

/// 序列化并写入目标路径旁的临时文件，调用 `commit` 后才会出现在目标路径
pub async fn stage_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> AppResult<StagedFile> {
    let json = encode_document(value, pretty)?;
    let tmp_path = temp_path_for(path);

    if let Err(e) = fs::write(&tmp_path, json.as_bytes()).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(AppError::file_write_failed(path.display().to_string(), e));
    }

    Ok(StagedFile {
        tmp_path,
        path: path.to_path_buf(),
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
