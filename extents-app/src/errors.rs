use extents_engine::ExtentsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("范围计算失败: {0}")]
    Extents(#[from] ExtentsError),
    #[error("序列化报告失败: {0}")]
    Serialize(#[from] serde_json::Error),
}
