use crate::utils::error::PrepError;
use crate::Result;
use std::fs;
use std::path::Path;

/// ImageNet 类别名称表
///
/// 模型输出比表多一个类别：索引 0 是 "background"，表中没有这一项，
/// 因此输出索引 `i` 对应表中第 `i - 1` 项。
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PrepError::ModelLoad(format!(
                "Label file not found: {}",
                path.display()
            )));
        }

        tracing::info!("Loading labels from: {}", path.display());

        let content = fs::read_to_string(path)
            .map_err(|e| PrepError::ModelLoad(format!("Failed to read label file: {}", e)))?;
        let table = Self::from_lines(content.lines());

        if table.is_empty() {
            return Err(PrepError::ModelLoad(format!(
                "Label file is empty: {}",
                path.display()
            )));
        }

        tracing::info!("Loaded {} labels", table.len());
        tracing::debug!("First 5 labels: {:?}", table.labels.iter().take(5).collect::<Vec<_>>());
        Ok(table)
    }

    /// 每行一个标签，空行跳过
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 模型输出索引 -> 标签（减一偏移）
    pub fn label_for_output(&self, index: usize) -> Result<&str> {
        if index == 0 {
            return Err(PrepError::Inference(
                "Class index 0 (background) has no label".to_string(),
            ));
        }

        self.labels
            .get(index - 1)
            .map(String::as_str)
            .ok_or_else(|| {
                PrepError::Inference(format!(
                    "Class index {} out of range for {} labels",
                    index,
                    self.labels.len()
                ))
            })
    }
}
