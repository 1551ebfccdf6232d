//! 写真の取り込み
//!
//! 画像ファイルを並列に最適化し、指定順にウィザードへ追加する。
//! デコードできないファイルはスキップし、上限を超えた分は最適化せずに不採用として報告する。

use crate::optimizer::ImageOptimizer;
use crate::scanner::ImageInfo;
use indicatif::ProgressBar;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use shelf_ai_common::{AnalysisClient, CredentialSource, Photo, Step, WizardController};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

static PHOTO_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 取り込み結果
#[derive(Debug, Default, Clone)]
pub struct IntakeReport {
    /// 追加された写真ID（追加順）
    pub added: Vec<String>,
    /// デコード失敗などで飛ばしたファイルと理由
    pub skipped: Vec<(PathBuf, String)>,
    /// 上限到達で追加できなかったファイル
    pub rejected: Vec<PathBuf>,
}

impl IntakeReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.skipped.is_empty() && self.rejected.is_empty()
    }
}

/// 写真IDを生成（内容 + 時刻 + 連番のSHA-256先頭12桁）
pub fn new_photo_id(payload: &[u8]) -> String {
    let counter = PHOTO_COUNTER.fetch_add(1, Ordering::Relaxed);
    let now = chrono::Utc::now();

    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(now.timestamp().to_le_bytes());
    hasher.update(now.timestamp_subsec_nanos().to_le_bytes());
    hasher.update(counter.to_le_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}

/// 画像を最適化してウィザードに追加
pub fn import_photos<C, K>(
    controller: &mut WizardController<C, K>,
    images: &[ImageInfo],
    optimizer: &ImageOptimizer,
    progress: Option<&ProgressBar>,
) -> IntakeReport
where
    C: AnalysisClient,
    K: CredentialSource,
{
    let mut report = IntakeReport::default();
    let mut cursor = 0;

    // 空き枠の数ずつ並列に最適化し、枠が埋まったら残りはデコードしない
    while cursor < images.len() && controller.state().step() == Step::Capture {
        let remaining = controller.state().photos().remaining();
        if remaining == 0 {
            break;
        }
        let chunk = &images[cursor..images.len().min(cursor + remaining)];
        cursor += chunk.len();

        // 結果は入力順のまま
        let optimized: Vec<_> = chunk
            .par_iter()
            .map(|image| {
                let result = optimizer.optimize_file(&image.path);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                (image, result)
            })
            .collect();

        for (image, result) in optimized {
            let optimized = match result {
                Ok(optimized) => optimized,
                Err(e) => {
                    warn!(file = %image.path.display(), error = %e, "画像をスキップ");
                    report.skipped.push((image.path.clone(), e.to_string()));
                    continue;
                }
            };

            let id = new_photo_id(optimized.data_url.as_bytes());
            if controller.add_photo(Photo::new(id.clone(), optimized.data_url)) {
                info!(file = %image.path.display(), photo = %id, width = optimized.width, height = optimized.height, "写真を追加");
                report.added.push(id);
            } else {
                report.rejected.push(image.path.clone());
            }
        }
    }

    let rest = &images[cursor..];
    if let Some(pb) = progress {
        pb.inc(rest.len() as u64);
    }
    report.rejected.extend(rest.iter().map(|i| i.path.clone()));

    report
}
