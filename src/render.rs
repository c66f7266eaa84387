//! 画面表示用の文字列生成（入出力なし）

use gift_wizard_common::response::format_amount;
use gift_wizard_common::{
    Bundle, Carousel, FormData, Item, OutfitImage, Recommendations, RevealFrame, Step,
};
use std::fmt::Write as _;

const RULE: &str = "────────────────────────────────────────";

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("${}", format_amount(v))).unwrap_or_else(|| "-".into())
}

/// "[3/9] Tell me about them?"
pub fn step_header(step: Step) -> String {
    match step {
        Step::Welcome | Step::Results => step.title().to_string(),
        _ => format!("[{}/{}] {}", step.index(), Step::Confirm.index(), step.title()),
    }
}

pub fn welcome() -> String {
    format!("{}\nI'm Gifty and let's buy a gift together!", Step::Welcome.title())
}

pub fn ready() -> String {
    format!("{}\nLet's go find a gift!", Step::Confirm.title())
}

/// 取り込み済み画像の一覧（選択順も表示）
pub fn image_gallery(form: &FormData) -> String {
    if form.outfit_images.is_empty() {
        return "  (no images yet)".to_string();
    }

    let mut out = String::new();
    for (i, image) in form.outfit_images.iter().enumerate() {
        let mark = match form.selected_images.iter().position(|&s| s == i) {
            Some(order) => format!("[{}]", order + 1),
            None => "[ ]".to_string(),
        };
        let _ = writeln!(
            out,
            "  {} {:>2}. {} ({} KB)",
            mark,
            i + 1,
            image.file_name,
            image.preview_data_uri.len() / 1024
        );
    }
    out.trim_end().to_string()
}

/// ローディング中の歩きアニメーション
pub fn walking_loader(frame: u8, recipient: &str) -> String {
    let walker = match frame {
        1 => "🚶    ",
        2 => "  🚶  ",
        _ => "    🚶",
    };
    format!("{} Finding the perfect gifts for {}...", walker, recipient)
}

pub fn results_header(recipient: &str) -> String {
    format!("Perfect Gifts for {}!", recipient)
}

pub fn results_intro(recipient: &str) -> String {
    format!(
        "Our AI analyzed your style preferences and created these perfect shoe & handbag \
         combinations for {}. Each bundle is carefully matched for style, occasion, and budget.",
        recipient
    )
}

pub fn error_view(message: &str) -> String {
    format!("⚠ {}", message)
}

/// カルーセル位置のドット表示 "● ○ ○"
pub fn carousel_dots(carousel: &Carousel) -> String {
    (0..carousel.len())
        .map(|i| if i == carousel.index() { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn item_block(out: &mut String, item: &Item) {
    let kind = item.category_kind();
    let _ = writeln!(out, "  {} {}", kind.icon(), kind.label());
    let _ = writeln!(
        out,
        "     {}  {}",
        item.product_name.as_deref().unwrap_or("-"),
        money(item.price)
    );
    if let Some(url) = &item.product_url {
        let _ = writeln!(out, "     View {}: {}", kind.label(), url);
    }
    if let Some(reason) = &item.reason {
        let category = item.category.as_deref().unwrap_or("item");
        let _ = writeln!(out, "     Why this {}: {}", category, reason);
    }
}

/// 結果画面のバンドルカード
pub fn bundle_card(bundle: &Bundle, carousel: &Carousel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}   {}", carousel.header(), carousel_dots(carousel));
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}", bundle.display_name());

    let mut meta = Vec::new();
    if let Some(kind) = &bundle.bundle_type {
        meta.push(kind.clone());
    }
    if let Some(score) = bundle.match_score {
        meta.push(format!("Match: {}/10", format_amount(score)));
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "{}", meta.join(" · "));
    }

    for (i, item) in bundle.items.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "        +");
        }
        item_block(&mut out, item);
    }

    if bundle.total_cost.is_some() {
        let _ = writeln!(out, "Bundle Total: {}", money(bundle.total_cost));
    }
    if let Some(note) = &bundle.styling_note {
        let _ = writeln!(out, "✨ Styling Note: {}", note);
    }
    let _ = write!(out, "{}", RULE);
    out
}

/// 「Your Preferences」パネル（contextがなければ None）
pub fn context_panel(recipient: &str, recommendations: &Recommendations) -> Option<String> {
    let context = recommendations.context.as_ref()?;
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());

    let rows = [
        ("Recipient", recipient.to_string()),
        ("Age", text(&context.age)),
        ("Gender", text(&context.gender)),
        ("Occasion", text(&context.occasion)),
        ("Budget", money(context.budget)),
        (
            "Outfits Found",
            recommendations
                .outfits_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".into()),
        ),
    ];

    let mut out = String::from("📋 Your Preferences\n");
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<14} {}", format!("{}:", label), value);
    }
    Some(out.trim_end().to_string())
}

/// 演出の各フレーム。3枚目で参照画像と商品カードを出す
pub fn reveal_frame(frame: RevealFrame, bundle: &Bundle, reference: Option<&OutfitImage>) -> String {
    match frame {
        RevealFrame::Closed => format!("🎁  {}", frame.caption()),
        RevealFrame::Opening => format!("˚.・ 🎁 ⊹ ࣪ ˖  {}", frame.caption()),
        RevealFrame::Revealed => {
            let mut out = String::new();
            if let Some(image) = reference {
                let _ = writeln!(out, "  [Reference] {}", image.file_name);
            }
            for item in &bundle.items {
                let _ = writeln!(
                    out,
                    "  [{}] {}",
                    item.product_name.as_deref().unwrap_or("-"),
                    money(item.price)
                );
            }
            let _ = writeln!(out, "{}", frame.caption());
            let _ = writeln!(out, "{}", bundle.display_name());
            let _ = writeln!(out, "Total: {}", money(bundle.total_cost));
            if let Some(note) = &bundle.styling_note {
                let _ = writeln!(out, "{}", note);
            }
            out.trim_end().to_string()
        }
    }
}
