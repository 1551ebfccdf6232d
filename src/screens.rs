//! 対話式ウィザード画面
//!
//! ステップごとに選択メニューを出し、操作をコントローラに渡すだけの薄い層。
//! 状態の判断（遷移できるか、何が選べるか）はコントローラ側の状態から決める。

use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::intake::{import_photos, IntakeReport};
use crate::optimizer::ImageOptimizer;
use crate::scanner;
use crate::cli::ExportFormat;
use dialoguer::{Input, MultiSelect, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use shelf_ai_common::{
    categories, filter_by_category, AnalysisClient, InventoryItem, InventoryReport,
    MerchandisingSuggestion, Step, WizardController, WizardState, ALL_CATEGORIES, MAX_PHOTOS,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 画面の操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    AddPhotos,
    RemovePhoto,
    Analyze,
    FilterCategory,
    ContinueToReorganize,
    GenerateMockups,
    SkipSuggestion,
    Complete,
    ExportReport,
    SaveMockups,
    NewAudit,
    GoTo(Step),
    Quit,
}

impl ScreenAction {
    pub fn label(&self) -> String {
        match self {
            ScreenAction::AddPhotos => "写真を追加".into(),
            ScreenAction::RemovePhoto => "写真を削除".into(),
            ScreenAction::Analyze => "解析を開始".into(),
            ScreenAction::FilterCategory => "カテゴリで絞り込み".into(),
            ScreenAction::ContinueToReorganize => "陳列改善の提案へ進む".into(),
            ScreenAction::GenerateMockups => "モックアップを生成".into(),
            ScreenAction::SkipSuggestion => "提案をスキップ".into(),
            ScreenAction::Complete => "完了してレポートへ".into(),
            ScreenAction::ExportReport => "レポートを出力".into(),
            ScreenAction::SaveMockups => "モックアップ画像を保存".into(),
            ScreenAction::NewAudit => "新しい監査を開始".into(),
            ScreenAction::GoTo(step) => format!("「{}」に移動", step.label()),
            ScreenAction::Quit => "終了".into(),
        }
    }
}

/// 現在の状態で選べる操作
pub fn available_actions(state: &WizardState) -> Vec<ScreenAction> {
    let mut actions = match state.step() {
        Step::Capture => {
            let mut actions = Vec::new();
            if !state.photos().is_full() {
                actions.push(ScreenAction::AddPhotos);
            }
            if !state.photos().is_empty() {
                actions.push(ScreenAction::RemovePhoto);
                actions.push(ScreenAction::Analyze);
            }
            actions
        }
        Step::Processing => Vec::new(),
        Step::Analysis => vec![ScreenAction::FilterCategory, ScreenAction::ContinueToReorganize],
        Step::Reorganize => {
            let mut actions = Vec::new();
            if state.suggestions().iter().any(|s| s.mockup_image.is_none()) {
                actions.push(ScreenAction::GenerateMockups);
            }
            if !state.suggestions().is_empty() {
                actions.push(ScreenAction::SkipSuggestion);
            }
            actions.push(ScreenAction::Complete);
            actions
        }
        Step::Report => {
            let mut actions = vec![ScreenAction::ExportReport];
            if state.suggestions().iter().any(|s| s.mockup_image.is_some()) {
                actions.push(ScreenAction::SaveMockups);
            }
            actions.push(ScreenAction::NewAudit);
            actions
        }
    };

    // ステップ間の移動（現在地以外で遷移可能なもの）
    actions.extend(
        Step::ALL
            .iter()
            .copied()
            .filter(|s| *s != state.step() && state.can_navigate_to(*s))
            .map(ScreenAction::GoTo),
    );
    actions.push(ScreenAction::Quit);
    actions
}

/// ステップの進捗表示 例: "[3/5] 在庫分析"
pub fn step_header(step: Step) -> String {
    format!("[{}/{}] {}", step.index() + 1, Step::ALL.len(), step.label())
}

pub fn format_item(item: &InventoryItem) -> String {
    let pattern = if item.pattern.trim().is_empty() {
        String::new()
    } else {
        format!(" / {}", item.pattern)
    };
    let tags = if item.style_tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", item.style_tags.join(", "))
    };
    format!(
        "{:<12} {:<10}{} x{}{}",
        item.category, item.color, pattern, item.quantity, tags
    )
}

pub fn format_suggestion(suggestion: &MerchandisingSuggestion) -> String {
    let status = if suggestion.is_applied() { "✔" } else { "・" };
    format!("{} [{}] {}", status, suggestion.impact, suggestion.title)
}

/// ウィザードを実行
pub async fn run_wizard<C>(
    controller: &mut WizardController<C, Config>,
    optimizer: &ImageOptimizer,
    output_dir: &Path,
) -> Result<()>
where
    C: AnalysisClient,
{
    let mut category_filter = ALL_CATEGORIES.to_string();

    loop {
        println!("\n{}", step_header(controller.step()));
        if let Some(error) = controller.state().error() {
            println!("⚠ {}", error);
        }
        if controller.state().credential_required() {
            prompt_api_key(controller)?;
        }

        render_step(controller.state(), &category_filter);

        let actions = available_actions(controller.state());
        let labels: Vec<String> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("操作を選択")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            ScreenAction::AddPhotos => add_photos(controller, optimizer)?,
            ScreenAction::RemovePhoto => remove_photo(controller)?,
            ScreenAction::Analyze => {
                let spinner = spinner("AI解析中...");
                let outcome = controller.analyze().await;
                spinner.finish_and_clear();
                match outcome {
                    Ok(true) => println!("✔ 解析完了: {}行 / 提案{}件",
                        controller.state().items().len(),
                        controller.state().suggestions().len()),
                    Ok(false) => {}
                    Err(e) => println!("✗ 解析失敗: {}", e),
                }
                category_filter = ALL_CATEGORIES.to_string();
            }
            ScreenAction::FilterCategory => {
                let options = categories(controller.state().items());
                let choice = Select::new()
                    .with_prompt("カテゴリ")
                    .items(&options)
                    .default(0)
                    .interact()?;
                category_filter = options[choice].clone();
            }
            ScreenAction::ContinueToReorganize => {
                controller.continue_to_reorganize();
            }
            ScreenAction::GenerateMockups => generate_mockups(controller).await?,
            ScreenAction::SkipSuggestion => skip_suggestion(controller)?,
            ScreenAction::Complete => {
                controller.complete();
            }
            ScreenAction::ExportReport => export_report(controller.state(), output_dir)?,
            ScreenAction::SaveMockups => {
                let written = export::save_mockups(controller.state().suggestions(), output_dir)?;
                for path in written {
                    println!("✔ モックアップ保存: {}", path.display());
                }
            }
            ScreenAction::NewAudit => {
                controller.reset();
                category_filter = ALL_CATEGORIES.to_string();
            }
            ScreenAction::GoTo(step) => {
                controller.navigate_to(step);
            }
            ScreenAction::Quit => break,
        }
    }

    Ok(())
}

fn render_step(state: &WizardState, category_filter: &str) {
    match state.step() {
        Step::Capture => {
            println!("写真: {}/{}枚", state.photos().len(), MAX_PHOTOS);
            for (i, photo) in state.photos().iter().enumerate() {
                println!("  {}) {}", i + 1, photo.id());
            }
        }
        Step::Processing => {}
        Step::Analysis => {
            let report = InventoryReport::build(state.items(), state.suggestions());
            println!("合計: {}点 / {}行 (表示: {})", report.total_units, report.line_count, category_filter);
            for item in filter_by_category(state.items(), category_filter) {
                println!("  {}", format_item(item));
            }
        }
        Step::Reorganize => {
            if state.suggestions().is_empty() {
                println!("提案はありません");
            }
            for suggestion in state.suggestions() {
                println!("  {}", format_suggestion(suggestion));
                println!("      {}", suggestion.description);
                if !suggestion.reasoning.is_empty() {
                    println!("      理由: {}", suggestion.reasoning);
                }
            }
        }
        Step::Report => print_report(&InventoryReport::build(state.items(), state.suggestions())),
    }
}

fn print_report(report: &InventoryReport) {
    println!("合計: {}点 / {}行", report.total_units, report.line_count);
    println!("カテゴリ別:");
    for row in &report.by_category {
        println!("  {:<12} {:>5}点 ({:.1}%)", row.label, row.units, report.unit_share(row));
    }
    println!("色別:");
    for row in &report.by_color {
        println!("  {:<12} {:>5}点", row.label, row.units);
    }
    println!(
        "提案: 適用済み {} / 未適用 {} (High {})",
        report.applied_suggestions, report.pending_suggestions, report.high_impact_suggestions
    );
}

fn add_photos<C: AnalysisClient>(
    controller: &mut WizardController<C, Config>,
    optimizer: &ImageOptimizer,
) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("写真ファイル/フォルダ（スペース区切り）")
        .allow_empty(true)
        .interact_text()?;
    let paths: Vec<PathBuf> = input.split_whitespace().map(PathBuf::from).collect();
    if paths.is_empty() {
        return Ok(());
    }

    let images = match scanner::scan_paths(&paths) {
        Ok(images) => images,
        Err(e) => {
            println!("✗ {}", e);
            return Ok(());
        }
    };
    let report = intake_with_progress(controller, &images, optimizer);
    print_intake_report(&report);
    Ok(())
}

/// 進捗バー付きで取り込み
pub fn intake_with_progress<C: AnalysisClient>(
    controller: &mut WizardController<C, Config>,
    images: &[scanner::ImageInfo],
    optimizer: &ImageOptimizer,
) -> IntakeReport {
    let pb = ProgressBar::new(images.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("  最適化中 [{bar:30}] {pos}/{len}") {
        pb.set_style(style.progress_chars("=> "));
    }
    let report = import_photos(controller, images, optimizer, Some(&pb));
    pb.finish_and_clear();
    report
}

pub fn print_intake_report(report: &IntakeReport) {
    println!("✔ {}枚を追加", report.added.len());
    for (path, reason) in &report.skipped {
        println!("  ⚠ スキップ: {} ({})", path.display(), reason);
    }
    if !report.rejected.is_empty() {
        println!("  ⚠ 上限{}枚のため{}枚を追加できませんでした", MAX_PHOTOS, report.rejected.len());
    }
}

fn remove_photo<C: AnalysisClient>(controller: &mut WizardController<C, Config>) -> Result<()> {
    let ids: Vec<String> = controller.state().photos().iter().map(|p| p.id().to_string()).collect();
    let choice = Select::new()
        .with_prompt("削除する写真")
        .items(&ids)
        .interact_opt()?;
    if let Some(index) = choice {
        controller.remove_photo(&ids[index]);
    }
    Ok(())
}

async fn generate_mockups<C: AnalysisClient>(controller: &mut WizardController<C, Config>) -> Result<()> {
    let pending: Vec<&MerchandisingSuggestion> = controller
        .state()
        .suggestions()
        .iter()
        .filter(|s| s.mockup_image.is_none())
        .collect();
    let labels: Vec<String> = pending.iter().map(|s| format_suggestion(s)).collect();
    let ids: Vec<String> = pending.iter().map(|s| s.id.clone()).collect();

    let chosen = MultiSelect::new()
        .with_prompt("モックアップを生成する提案（スペースで選択）")
        .items(&labels)
        .interact()?;
    let targets: Vec<&str> = chosen.iter().map(|&i| ids[i].as_str()).collect();
    if targets.is_empty() {
        return Ok(());
    }

    let spinner = spinner(&format!("モックアップ生成中... ({}件)", targets.len()));
    let outcomes = controller.generate_mockups(&targets).await;
    spinner.finish_and_clear();

    for (id, outcome) in outcomes {
        match outcome {
            Ok(true) => println!("✔ {}: 生成完了", id),
            Ok(false) => println!("- {}: 反映対象なし", id),
            Err(e) => println!("✗ {}: {}", id, e),
        }
    }
    Ok(())
}

fn skip_suggestion<C: AnalysisClient>(controller: &mut WizardController<C, Config>) -> Result<()> {
    let suggestions = controller.state().suggestions();
    let labels: Vec<String> = suggestions.iter().map(format_suggestion).collect();
    let ids: Vec<String> = suggestions.iter().map(|s| s.id.clone()).collect();
    let choice = Select::new()
        .with_prompt("スキップする提案")
        .items(&labels)
        .interact_opt()?;
    if let Some(index) = choice {
        controller.skip_suggestion(&ids[index]);
    }
    Ok(())
}

fn export_report(state: &WizardState, output_dir: &Path) -> Result<()> {
    let formats = [ExportFormat::Both, ExportFormat::Excel, ExportFormat::Json];
    let labels: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
    let choice = Select::new()
        .with_prompt("出力形式")
        .items(&labels)
        .default(0)
        .interact()?;
    let title = format!("shelf-audit_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    export::export_report(state.items(), state.suggestions(), formats[choice], output_dir, &title)?;
    Ok(())
}

fn prompt_api_key<C: AnalysisClient>(controller: &mut WizardController<C, Config>) -> Result<()> {
    println!("🔑 Gemini APIキーを入力してください（空欄でスキップ）");
    let key = Password::new()
        .with_prompt("APIキー")
        .allow_empty_password(true)
        .interact()?;
    // スキップしても次の失敗で再度フラグが立つ
    if key.trim().is_empty() {
        controller.acknowledge_credential();
        return Ok(());
    }
    match controller.credentials_mut().set_api_key(key) {
        Ok(()) => {
            controller.acknowledge_credential();
            println!("✔ APIキーを設定しました");
        }
        Err(e) => println!("✗ {}", e),
    }
    Ok(())
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
