use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// 单个类别预测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// 模型输出中的原始索引（含 background 偏移）
    pub class_index: usize,
    pub score: f32,
}

/// 单张图像的 top-5 预测，按分数降序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePrediction {
    pub path: String,
    pub top5: Vec<Prediction>,
}

/// 结果格式化器
pub struct ResultFormatter;

impl ResultFormatter {
    /// 文本格式：路径一行，之后每行 `label score`
    pub fn format_text(results: &[ImagePrediction]) -> String {
        let mut text = String::new();
        for result in results {
            let _ = writeln!(text, "{}", result.path);
            for prediction in &result.top5 {
                let _ = writeln!(text, "{} {}", prediction.label, prediction.score);
            }
        }
        text
    }

    pub fn format_json(results: &[ImagePrediction]) -> Result<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ImagePrediction> {
        vec![ImagePrediction {
            path: "panda_pics/a.png".to_string(),
            top5: vec![
                Prediction {
                    label: "giant panda".to_string(),
                    class_index: 389,
                    score: 0.5,
                },
                Prediction {
                    label: "lesser panda".to_string(),
                    class_index: 388,
                    score: 0.25,
                },
            ],
        }]
    }

    #[test]
    fn text_lists_label_and_score() {
        let text = ResultFormatter::format_text(&sample());
        assert_eq!(text, "panda_pics/a.png\ngiant panda 0.5\nlesser panda 0.25\n");
    }

    #[test]
    fn json_contains_predictions() {
        let json = ResultFormatter::format_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["top5"][0]["label"], "giant panda");
        assert_eq!(value[0]["top5"][1]["class_index"], 388);
    }
}
