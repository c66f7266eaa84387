//! 対話式ウィザード（dialoguer）

use crate::controller::WizardController;
use crate::error::{Result, WizardError};
use crate::ingest::CompressOptions;
use crate::render;
use crate::service::RecommendationService;
use dialoguer::{Input, Select};
use gift_wizard_common::feedback::{SUGGESTIONS_LABEL, SUGGESTIONS_TEXT};
use gift_wizard_common::form::{AGE_MAX, AGE_MIN};
use gift_wizard_common::reveal::{walk_frame_after, WALK_FRAME_INTERVAL};
use gift_wizard_common::{FeedbackQuestion, Gender, Month, RevealFrame, Step};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::PathBuf;

/// 各画面の下のナビゲーション
#[derive(Clone, Copy, PartialEq)]
enum NavAction {
    Next,
    Edit,
    Back,
    Quit,
}

/// 画像ギャラリーの操作
#[derive(Clone, Copy, PartialEq)]
enum GalleryAction {
    Add,
    Remove,
    ToggleSelection,
    Done,
}

/// 結果画面の操作
#[derive(Clone, Copy, PartialEq)]
enum ResultsAction {
    TryAgain,
    NextBundle,
    PrevBundle,
    Jump,
    Select,
    Feedback,
    StartOver,
    Quit,
}

fn prompt_err(e: dialoguer::Error) -> WizardError {
    WizardError::Prompt(e.to_string())
}

/// (表示名, 値) の一覧から選ばせる
fn choose<T: Copy>(prompt: &str, options: &[(String, T)], default: usize) -> Result<T> {
    let labels: Vec<&str> = options.iter().map(|(label, _)| label.as_str()).collect();
    let mut select = Select::new();
    if !prompt.is_empty() {
        select = select.with_prompt(prompt);
    }
    let index = select
        .items(&labels)
        .default(default.min(options.len().saturating_sub(1)))
        .interact()
        .map_err(prompt_err)?;
    Ok(options[index].1)
}

/// ウィザードを最後まで回す（Quitで終了）
pub async fn run_wizard<S: RecommendationService>(
    controller: &mut WizardController,
    service: &S,
    options: CompressOptions,
) -> Result<()> {
    loop {
        let step = controller.step();
        println!("\n{}", render::step_header(step));

        let keep_going = match step {
            Step::Welcome => welcome_screen(controller)?,
            Step::Confirm => confirm_screen(controller, service).await?,
            Step::Results => results_screen(controller).await?,
            _ => {
                edit_step(controller, step, options).await?;
                navigate(controller)?
            }
        };

        if !keep_going {
            println!("Bye!");
            return Ok(());
        }
    }
}

fn welcome_screen(controller: &mut WizardController) -> Result<bool> {
    println!("{}", render::welcome());
    let start = choose(
        "",
        &[("Let's Start!".to_string(), true), ("Quit".to_string(), false)],
        0,
    )?;
    if start {
        controller.advance();
    }
    Ok(start)
}

/// Next / 入力し直す / Back / Quit
fn navigate(controller: &mut WizardController) -> Result<bool> {
    let mut options = Vec::new();
    if controller.can_go_next() {
        options.push(("Next".to_string(), NavAction::Next));
    }
    options.push(("Change answer".to_string(), NavAction::Edit));
    options.push(("← Back".to_string(), NavAction::Back));
    options.push(("Quit".to_string(), NavAction::Quit));

    match choose("", &options, 0)? {
        NavAction::Next => {
            controller.next();
        }
        NavAction::Back => controller.retreat(),
        NavAction::Quit => return Ok(false),
        // 同じステップを再表示
        NavAction::Edit => {}
    }
    Ok(true)
}

async fn edit_step(
    controller: &mut WizardController,
    step: Step,
    options: CompressOptions,
) -> Result<()> {
    let form = controller.state().form.clone();

    match step {
        Step::Recipient => {
            let name: String = Input::new()
                .with_prompt("Name")
                .with_initial_text(form.recipient)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            controller.set_recipient(name);
        }
        Step::OutfitImages => gallery_screen(controller, options).await?,
        Step::Age => {
            let age: u8 = Input::new()
                .with_prompt(format!("Age ({}-{})", AGE_MIN, AGE_MAX))
                .default(form.age)
                .validate_with(|v: &u8| {
                    if (AGE_MIN..=AGE_MAX).contains(v) {
                        Ok(())
                    } else {
                        Err("out of range")
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;
            controller.set_age(age);
        }
        Step::Gender => {
            let options: Vec<(String, Gender)> =
                Gender::ALL.iter().map(|g| (g.label().to_string(), *g)).collect();
            let default = form
                .gender
                .and_then(|g| Gender::ALL.iter().position(|x| *x == g))
                .unwrap_or(0);
            let gender = choose("Gender", &options, default)?;
            controller.set_gender(gender);
        }
        Step::Month => {
            let options: Vec<(String, Month)> =
                Month::ALL.iter().map(|m| (m.name().to_string(), *m)).collect();
            let default = form
                .month
                .and_then(|m| Month::ALL.iter().position(|x| *x == m))
                .unwrap_or(0);
            let month = choose("What month is it?", &options, default)?;
            controller.set_month(month);
        }
        Step::Occasion => {
            let occasion: String = Input::new()
                .with_prompt("What's the occasion? (Birthday, Anniversary, etc...)")
                .with_initial_text(form.occasion)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            controller.set_occasion(occasion);
        }
        Step::Budget => {
            let budget: String = Input::new()
                .with_prompt("Budget ($50, $100, etc...)")
                .with_initial_text(form.budget)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            controller.set_budget(budget);
        }
        Step::Welcome | Step::Confirm | Step::Results => {}
    }

    Ok(())
}

async fn gallery_screen(controller: &mut WizardController, options: CompressOptions) -> Result<()> {
    loop {
        println!("{}", render::image_gallery(&controller.state().form));
        let has_images = !controller.state().form.outfit_images.is_empty();

        let mut actions = vec![("Add images".to_string(), GalleryAction::Add)];
        if has_images {
            actions.push(("Remove an image".to_string(), GalleryAction::Remove));
            actions.push(("Select / unselect an image".to_string(), GalleryAction::ToggleSelection));
        }
        actions.push(("Done".to_string(), GalleryAction::Done));

        match choose("Outfit images", &actions, 0)? {
            GalleryAction::Add => {
                let input: String = Input::new()
                    .with_prompt("Image file or folder")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_err)?;
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }
                match controller.ingest(&[PathBuf::from(input)], options).await {
                    Ok(report) => {
                        println!("✔ {} image(s) added", report.added);
                        for (name, reason) in &report.failed {
                            println!("⚠ {}: {}", name, reason);
                        }
                    }
                    Err(e) => println!("⚠ {}", e),
                }
            }
            GalleryAction::Remove => {
                let index = pick_image(controller, "Remove which image?")?;
                controller.remove_image(index);
            }
            GalleryAction::ToggleSelection => {
                let index = pick_image(controller, "Select which image?")?;
                controller.toggle_image_selection(index);
            }
            GalleryAction::Done => return Ok(()),
        }
    }
}

fn pick_image(controller: &WizardController, prompt: &str) -> Result<usize> {
    let options: Vec<(String, usize)> = controller
        .state()
        .form
        .outfit_images
        .iter()
        .enumerate()
        .map(|(i, img)| (img.file_name.clone(), i))
        .collect();
    choose(prompt, &options, 0)
}

async fn confirm_screen<S: RecommendationService>(
    controller: &mut WizardController,
    service: &S,
) -> Result<bool> {
    println!("{}", render::ready());
    let options = [
        ("Find Gifts!".to_string(), NavAction::Next),
        ("← Back".to_string(), NavAction::Back),
        ("Quit".to_string(), NavAction::Quit),
    ];

    match choose("", &options, 0)? {
        NavAction::Back => controller.retreat(),
        NavAction::Quit => return Ok(false),
        NavAction::Next | NavAction::Edit => {
            let recipient = controller.state().form.recipient.clone();
            with_walking_loader(&recipient, controller.submit(service)).await;
        }
    }
    Ok(true)
}

/// 処理中は歩きアニメーションを回す（終わったら消す）
pub async fn with_walking_loader<F: Future>(recipient: &str, work: F) -> F::Output {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));

    let mut frame = 1u8;
    let mut ticker = tokio::time::interval(WALK_FRAME_INTERVAL);
    tokio::pin!(work);

    loop {
        tokio::select! {
            output = &mut work => {
                bar.finish_and_clear();
                return output;
            }
            _ = ticker.tick() => {
                bar.set_message(render::walking_loader(frame, recipient));
                frame = walk_frame_after(frame);
            }
        }
    }
}

async fn results_screen(controller: &mut WizardController) -> Result<bool> {
    let state = controller.state().clone();
    let recipient = state.form.recipient.as_str();

    if let Some(error) = state.api_response.as_ref().and_then(|r| r.error()) {
        println!("{}", render::error_view(error));
        let options = [
            ("Try Again".to_string(), ResultsAction::TryAgain),
            ("Start Over".to_string(), ResultsAction::StartOver),
            ("Quit".to_string(), ResultsAction::Quit),
        ];
        match choose("", &options, 0)? {
            ResultsAction::TryAgain => controller.try_again(),
            ResultsAction::Quit => return Ok(false),
            _ => controller.reset(),
        }
        return Ok(true);
    }

    println!("{}", render::results_header(recipient));
    let Some(bundle) = state.current_bundle() else {
        println!("No bundles were found. Try a different budget or occasion.");
        let options = [("Start Over".to_string(), true), ("Quit".to_string(), false)];
        let again = choose("", &options, 0)?;
        if again {
            controller.reset();
        }
        return Ok(again);
    };

    println!("{}\n", render::results_intro(recipient));
    println!("{}", render::bundle_card(bundle, &state.carousel));
    if let Some(panel) = state
        .api_response
        .as_ref()
        .and_then(|r| r.recommendations())
        .and_then(|recs| render::context_panel(recipient, recs))
    {
        println!("\n{}", panel);
    }

    let mut options = Vec::new();
    if state.carousel.navigation_enabled() {
        options.push(("Next bundle ›".to_string(), ResultsAction::NextBundle));
        options.push(("‹ Previous bundle".to_string(), ResultsAction::PrevBundle));
        options.push(("Jump to bundle".to_string(), ResultsAction::Jump));
    }
    options.push(("Select This Bundle 🎁".to_string(), ResultsAction::Select));
    options.push(("📝 Share your feedback".to_string(), ResultsAction::Feedback));
    options.push(("Start Over".to_string(), ResultsAction::StartOver));
    options.push(("Quit".to_string(), ResultsAction::Quit));

    match choose("", &options, 0)? {
        ResultsAction::TryAgain => controller.try_again(),
        ResultsAction::NextBundle => controller.next_bundle(),
        ResultsAction::PrevBundle => controller.prev_bundle(),
        ResultsAction::Jump => {
            let bundles: Vec<(String, usize)> = state
                .api_response
                .as_ref()
                .map(|r| r.bundles())
                .unwrap_or(&[])
                .iter()
                .enumerate()
                .map(|(i, b)| (format!("{}. {}", i + 1, b.display_name()), i))
                .collect();
            let index = choose("Bundle", &bundles, state.carousel.index())?;
            controller.jump_to_bundle(index);
        }
        ResultsAction::Select => reveal_screen(controller, state.carousel.index()).await?,
        ResultsAction::Feedback => feedback_screen(controller)?,
        ResultsAction::StartOver => controller.reset(),
        ResultsAction::Quit => return Ok(false),
    }
    Ok(true)
}

async fn reveal_screen(controller: &mut WizardController, index: usize) -> Result<()> {
    if !controller.select_bundle(index) {
        return Ok(());
    }

    let print_frame = |controller: &WizardController, frame: RevealFrame| {
        let state = controller.state();
        if let Some(bundle) = state.revealed_bundle() {
            println!(
                "\n{}",
                render::reveal_frame(frame, bundle, state.form.outfit_images.first())
            );
        }
    };

    print_frame(controller, RevealFrame::Closed);

    // Close はどのフレームでも押せる
    let close = async {
        match tokio::task::spawn_blocking(|| choose("", &[("Close ×".to_string(), ())], 0)).await {
            Ok(result) => result,
            Err(e) => Err(WizardError::Prompt(e.to_string())),
        }
    };
    play_reveal(controller, close, print_frame).await
}

/// 演出を進めながら close を待つ。close が終わった時点で閉じる
async fn play_reveal<C, F>(controller: &mut WizardController, close: C, mut on_frame: F) -> Result<()>
where
    C: Future<Output = Result<()>>,
    F: FnMut(&WizardController, RevealFrame),
{
    tokio::pin!(close);
    let mut frames_done = false;

    let closed = loop {
        let frame = tokio::select! {
            closed = &mut close => break closed,
            frame = controller.wait_reveal_frame(), if !frames_done => frame,
        };
        match frame {
            Some(frame) => on_frame(controller, frame),
            None => frames_done = true,
        }
    };

    controller.close_modal();
    closed
}

fn feedback_screen(controller: &mut WizardController) -> Result<()> {
    if !controller.open_feedback() {
        return Ok(());
    }
    println!("\nShare Your Feedback");

    for question in FeedbackQuestion::ALL {
        let mut options: Vec<(String, Option<&'static str>)> = question
            .options()
            .iter()
            .map(|o| (o.to_string(), Some(*o)))
            .collect();
        options.push(("(skip)".to_string(), None));

        let prompt = format!("{}: {}", question.label(), question.text());
        if let Some(option) = choose(&prompt, &options, 0)? {
            controller.answer_feedback(question, option);
        }
    }

    let suggestions: String = Input::new()
        .with_prompt(format!("{}: {}", SUGGESTIONS_LABEL, SUGGESTIONS_TEXT))
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    controller.set_feedback_suggestions(suggestions);

    if let Some(form) = controller.state().modal.feedback() {
        println!();
        for question in FeedbackQuestion::ALL {
            let answer = form.answer_for(question).unwrap_or("-");
            println!("  {:<14} {}", question.label(), answer);
        }
    }

    let submit = choose(
        "",
        &[("Submit Feedback".to_string(), true), ("Cancel".to_string(), false)],
        0,
    )?;
    if submit {
        if let Some(receipt) = controller.submit_feedback() {
            println!("✔ {}", receipt.acknowledgement());
        }
    } else {
        controller.cancel_feedback();
    }
    Ok(())
}
