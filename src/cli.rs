use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shelf-ai")]
#[command(about = "店舗棚写真のAI在庫監査・陳列改善ウィザード", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話形式のウィザード（撮影 → 解析 → 陳列改善 → レポート）
    Run {
        /// 最初に取り込む写真ファイル/フォルダ
        paths: Vec<PathBuf>,

        /// レポート出力先ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 写真を解析して結果JSONを出力（非対話）
    Analyze {
        /// 写真ファイル/フォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "result.json")]
        output: PathBuf,
    },

    /// 画像1枚を最適化（縮小・JPEG再圧縮）
    Optimize {
        /// 入力画像
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JPEGファイル（デフォルト: 入力名_optimized.jpg）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 長辺の最大ピクセル数
        #[arg(long)]
        max_size: Option<u32>,

        /// JPEG品質 (1-100)
        #[arg(long)]
        quality: Option<u8>,
    },

    /// 解析結果JSONからレポートを生成
    Report {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (json/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ファイル名（拡張子なし）
        #[arg(short, long, default_value = "shelf-audit")]
        title: String,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 保存済みAPIキーを削除
        #[arg(long)]
        clear_api_key: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Excel,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
