use anyhow::{bail, Context, Result};
use clap::Parser;
use gift_wizard::{cli, config, controller, ingest, render, screens, service};
use gift_wizard::error::WizardError;
use cli::{Cli, Commands};
use config::Config;
use controller::WizardController;
use gift_wizard_common::{Carousel, Gender, Month, Step};
use indicatif::{ProgressBar, ProgressStyle};
use ingest::CompressOptions;
use rayon::prelude::*;
use service::HttpRecommendationService;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Run { images } => {
            let options = CompressOptions::from(&config);
            let service = HttpRecommendationService::from_config(&config)?;
            let mut controller = WizardController::new();

            if !images.is_empty() {
                let report = controller.ingest(&images, options).await?;
                println!("✔ {}枚の画像を取り込みました", report.added);
                for (name, reason) in &report.failed {
                    println!("⚠ {}: {}", name, reason);
                }
            }

            screens::run_wizard(&mut controller, &service, options).await?;
        }

        Commands::Submit {
            recipient,
            images,
            age,
            gender,
            month,
            occasion,
            budget,
            selected,
            json,
        } => {
            let answers = Answers {
                recipient,
                images,
                age,
                gender: gender.parse()?,
                month: month.parse()?,
                occasion,
                budget,
                selected,
            };
            submit_once(&config, answers, json).await?;
        }

        Commands::Compress { inputs, output } => {
            compress_files(&inputs, &output, &CompressOptions::from(&config))?;
        }

        Commands::Config { set_endpoint, set_timeout, show } => {
            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ 送信先を設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  送信先: {}", config.endpoint());
                println!("  タイムアウト: {}秒", config.timeout().as_secs());
                println!("  最大サイズ: {}x{}px", config.max_width, config.max_height);
                println!("  JPEG品質: {}", config.jpeg_quality);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// ログはstderrへ（RUST_LOG優先、なければ warn / --verbose で debug）
fn init_logging(verbose: bool) {
    let default = if verbose { "gift_wizard=debug,gift_wizard_common=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// submit コマンドの回答
struct Answers {
    recipient: String,
    images: Vec<PathBuf>,
    age: u8,
    gender: Gender,
    month: Month,
    occasion: String,
    budget: String,
    selected: Vec<usize>,
}

/// 画面と同じ順にステップを進めて1回送信
async fn submit_once(config: &Config, answers: Answers, json: bool) -> Result<()> {
    let service = HttpRecommendationService::from_config(config)?;
    let mut controller = WizardController::new();

    let report = controller.ingest(&answers.images, CompressOptions::from(config)).await?;
    for (name, reason) in &report.failed {
        eprintln!("⚠ {}: {}", name, reason);
    }
    if report.added == 0 {
        return Err(WizardError::NoImagesFound(format!("{:?}", answers.images)).into());
    }

    controller.advance();
    controller.set_recipient(answers.recipient.as_str());
    for index in &answers.selected {
        controller.toggle_image_selection(*index);
    }
    controller.set_age(answers.age);
    controller.set_gender(answers.gender);
    controller.set_month(answers.month);
    controller.set_occasion(answers.occasion.as_str());
    controller.set_budget(answers.budget.as_str());

    while controller.step() < Step::Confirm {
        let step = controller.step();
        if !controller.next() {
            bail!("入力が不足しています: {:?} ({})", step, step.title());
        }
    }

    screens::with_walking_loader(&answers.recipient, controller.submit(&service)).await;

    let state = controller.state();
    let Some(response) = state.api_response.as_ref() else {
        bail!("レスポンスがありません");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    if let Some(error) = response.error() {
        bail!("{}", error);
    }

    println!("{}\n", render::results_header(&answers.recipient));
    let bundles = response.bundles();
    if bundles.is_empty() {
        println!("No bundles were found.");
    }
    for (i, bundle) in bundles.iter().enumerate() {
        let mut carousel = Carousel::new(bundles.len());
        carousel.jump(i);
        println!("{}\n", render::bundle_card(bundle, &carousel));
    }
    if let Some(panel) = response
        .recommendations()
        .and_then(|recs| render::context_panel(&answers.recipient, recs))
    {
        println!("{}", panel);
    }

    Ok(())
}

/// 送信時と同じ設定でJPEGに圧縮して保存
fn compress_files(inputs: &[PathBuf], output: &Path, options: &CompressOptions) -> Result<()> {
    let files = ingest::collect_candidates(inputs)?;
    if files.is_empty() {
        return Err(WizardError::NoImagesFound(format!("{:?}", inputs)).into());
    }
    std::fs::create_dir_all(output)
        .with_context(|| format!("出力フォルダを作成できません: {}", output.display()))?;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<(String, CompressOutcome)> = files
        .par_iter()
        .map(|path| {
            let outcome = compress_one(path, output, options);
            progress.inc(1);
            (ingest::file_name_of(path), outcome)
        })
        .collect();
    progress.finish_and_clear();

    let (mut written, mut skipped, mut failed) = (0, 0, 0);
    for (name, outcome) in &results {
        match outcome {
            CompressOutcome::Written(target) => {
                written += 1;
                println!("✔ {}", target.display());
            }
            CompressOutcome::NotImage => skipped += 1,
            CompressOutcome::Failed(reason) => {
                failed += 1;
                println!("⚠ {}: {}", name, reason);
            }
        }
    }
    println!(
        "\n✅ {}枚を圧縮（画像以外 {}件 / 失敗 {}件）",
        written, skipped, failed
    );

    Ok(())
}

enum CompressOutcome {
    Written(PathBuf),
    NotImage,
    Failed(String),
}

fn compress_one(path: &Path, output: &Path, options: &CompressOptions) -> CompressOutcome {
    let bytes = match ingest::read_image_file(path) {
        Ok(Some((bytes, _))) => bytes,
        Ok(None) => return CompressOutcome::NotImage,
        Err(e) => return CompressOutcome::Failed(e.to_string()),
    };

    let compressed = match ingest::compress_image(&bytes, options) {
        Ok(compressed) => compressed,
        Err(e) => return CompressOutcome::Failed(e.to_string()),
    };

    let target = ingest::compressed_output_path(output, path);
    match std::fs::write(&target, &compressed.jpeg) {
        Ok(()) => CompressOutcome::Written(target),
        Err(e) => CompressOutcome::Failed(e.to_string()),
    }
}
