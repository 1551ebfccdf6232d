use clap::Parser;
use shelf_ai_rust::{analyzer, cli, config, error, export, optimizer, scanner, screens};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, ShelfAiError};
use optimizer::ImageOptimizer;
use shelf_ai_common::{AnalysisResult, WizardController};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Run { paths, output } => {
            println!("🛍  shelf-ai - 在庫監査ウィザード\n");

            let optimizer = ImageOptimizer::from_config(&config);
            let client = analyzer::GeminiClient::from_config(&config);
            let mut controller = WizardController::new(client, config);

            if !paths.is_empty() {
                let images = scanner::scan_paths(&paths)?;
                let report = screens::intake_with_progress(&mut controller, &images, &optimizer);
                screens::print_intake_report(&report);
            }

            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            screens::run_wizard(&mut controller, &optimizer, &output_dir).await?;
        }

        Commands::Analyze { paths, output } => {
            println!("📸 shelf-ai - 在庫解析\n");

            config.get_api_key()?;

            // 1. 画像スキャン
            println!("[1/3] 写真を取り込み中...");
            let images = scanner::scan_paths(&paths)?;
            if images.is_empty() {
                return Err(ShelfAiError::NoImagesFound(
                    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "),
                ));
            }

            let optimizer = ImageOptimizer::from_config(&config);
            let client = analyzer::GeminiClient::from_config(&config);
            let mut controller = WizardController::new(client, config);
            let report = screens::intake_with_progress(&mut controller, &images, &optimizer);
            screens::print_intake_report(&report);
            if report.added.is_empty() {
                return Err(ShelfAiError::NoImagesFound("デコード可能な画像がありません".into()));
            }
            println!();

            // 2. AI解析
            println!("[2/3] AI解析中...");
            let spinner = screens::spinner("Gemini APIに問い合わせ中...");
            let outcome = controller.analyze().await;
            spinner.finish_and_clear();
            outcome?;
            println!("✔ 解析完了\n");

            // 3. 結果保存
            println!("[3/3] 結果を保存中...");
            let result = AnalysisResult {
                items: controller.state().items().to_vec(),
                suggestions: controller.state().suggestions().to_vec(),
            };
            let json = serde_json::to_string_pretty(&result)?;
            std::fs::write(&output, json)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 解析完了: {}行 / 提案{}件", result.items.len(), result.suggestions.len());
        }

        Commands::Optimize { input, output, max_size, quality } => {
            let optimizer = ImageOptimizer::new(
                max_size.unwrap_or(config.max_image_size),
                quality.unwrap_or(config.jpeg_quality),
            );
            if !input.is_file() {
                return Err(ShelfAiError::FileNotFound(input.display().to_string()));
            }

            let optimized = optimizer
                .optimize_file(&input)
                .map_err(|e| ShelfAiError::ImageLoad(format!("{}: {}", input.display(), e)))?;

            let output = output.unwrap_or_else(|| {
                let stem = input.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
                input.with_file_name(format!("{}_optimized.jpg", stem))
            });
            let bytes = optimized.jpeg_bytes()?;
            std::fs::write(&output, bytes)?;

            println!(
                "✔ {} → {} ({}x{}, {} bytes)",
                input.display(),
                output.display(),
                optimized.width,
                optimized.height,
                optimized.byte_len
            );
        }

        Commands::Report { input, format, output, title } => {
            println!("📄 shelf-ai - レポート出力\n");

            if !input.is_file() {
                return Err(ShelfAiError::FileNotFound(input.display().to_string()));
            }
            let content = std::fs::read_to_string(&input)?;
            let result: AnalysisResult = serde_json::from_str(&content)?;

            let output_dir = output.unwrap_or_else(|| {
                input.parent().map(|p| p.to_path_buf()).unwrap_or_else(|| std::path::PathBuf::from("."))
            });
            export::export_report(&result.items, &result.suggestions, format, &output_dir, &title)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Config { set_api_key, clear_api_key, show } => {
            let mut config = config;

            if clear_api_key {
                config.clear_api_key()?;
                println!("✔ 保存済みAPIキーを削除しました");
            }

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  モックアップモデル: {}", config.mockup_model);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  JPEG品質: {}", config.jpeg_quality);
                println!("  APIキー: {}", if config.has_api_key() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
