//! 离线评估：在带标签的数据集上统计检测器的准确率、精确率和召回率

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// 真实图片标签
pub const LABEL_REAL: u8 = 0;
/// AI生成图片标签
pub const LABEL_FAKE: u8 = 1;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// 二分类混淆矩阵，正类为AI生成
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    pub true_positive: u64,
}

impl Metrics {
    /// 记录一次预测，`label`/`prediction` 取0或1
    pub fn record(&mut self, label: u8, prediction: u8) {
        match (label == LABEL_FAKE, prediction == LABEL_FAKE) {
            (false, false) => self.true_negative += 1,
            (false, true) => self.false_positive += 1,
            (true, false) => self.false_negative += 1,
            (true, true) => self.true_positive += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// `[[TN, FP], [FN, TP]]`
    pub fn confusion_matrix(&self) -> [[u64; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[tn, fp], [fn_, tp]] = self.confusion_matrix();
        writeln!(f, "===== EVALUATION RESULTS =====")?;
        writeln!(f, "Accuracy  : {:.2}%", self.accuracy() * 100.0)?;
        writeln!(f, "Precision : {:.2}%", self.precision() * 100.0)?;
        writeln!(f, "Recall    : {:.2}%", self.recall() * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Confusion Matrix:")?;
        writeln!(f, "[[{} {}]", tn, fp)?;
        write!(f, " [{} {}]]", fn_, tp)
    }
}

/// 列出数据集中的图片：`real/` 标为0，`fake/` 标为1
///
/// 缺失的子目录视为空。
pub fn collect_dataset(base: &Path) -> std::io::Result<Vec<(PathBuf, u8)>> {
    let mut samples = Vec::new();

    for (folder, label) in [("real", LABEL_REAL), ("fake", LABEL_FAKE)] {
        let dir = base.join(folder);
        if !dir.is_dir() {
            tracing::warn!("数据集目录不存在: {}", dir.display());
            continue;
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_image(path))
            .collect();
        files.sort();

        samples.extend(files.into_iter().map(|path| (path, label)));
    }

    Ok(samples)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let mut metrics = Metrics::default();
        // 3个真实图片中1个误判，3个AI图片中2个命中
        for (label, prediction) in [(0, 0), (0, 0), (0, 1), (1, 1), (1, 1), (1, 0)] {
            metrics.record(label, prediction);
        }

        assert_eq!(metrics.total(), 6);
        assert_eq!(metrics.confusion_matrix(), [[2, 1], [1, 2]]);
        assert!((metrics.accuracy() - 4.0 / 6.0).abs() < 1e-9);
        assert!((metrics.precision() - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.recall() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_denominators() {
        let mut metrics = Metrics::default();
        metrics.record(LABEL_REAL, LABEL_REAL);

        assert_eq!(metrics.accuracy(), 1.0);
        assert_eq!(metrics.precision(), 0.0);
        assert_eq!(metrics.recall(), 0.0);
        assert_eq!(Metrics::default().accuracy(), 0.0);
    }

    #[test]
    fn test_report_format() {
        let mut metrics = Metrics::default();
        metrics.record(LABEL_FAKE, LABEL_FAKE);
        metrics.record(LABEL_REAL, LABEL_FAKE);

        let report = metrics.to_string();
        assert!(report.contains("Accuracy  : 50.00%"));
        assert!(report.contains("Precision : 50.00%"));
        assert!(report.contains("Recall    : 100.00%"));
        assert!(report.ends_with("[[0 1]\n [0 1]]"));
    }

    #[test]
    fn test_collect_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::fs::create_dir(dir.path().join("fake")).unwrap();
        std::fs::write(dir.path().join("real/a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("real/notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join("fake/b.PNG"), b"").unwrap();
        std::fs::write(dir.path().join("fake/c.gif"), b"").unwrap();

        let samples = collect_dataset(dir.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].1, LABEL_REAL);
        assert!(samples[0].0.ends_with("a.jpg"));
        assert_eq!(samples[1].1, LABEL_FAKE);
        assert!(samples[1].0.ends_with("b.PNG"));
    }

    #[test]
    fn test_missing_dataset_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_dataset(dir.path()).unwrap().is_empty());
    }
}
