//! 対話式スタジオ
//!
//! StyleSession を dialoguer のメニューで操作する。
//! 重複適用の防止（適用済みアイテムの選択拒否）はこの層で行う。

use super::session::StyleSession;
use crate::config::Config;
use crate::error::{FitCreateError, Result};
use crate::gemini::GeminiClient;
use crate::media;
use crate::store::{LookbookStore, StatusStore};
use dialoguer::{Confirm, Input, Select};
use fitcreate_common::{
    wardrobe, EditRequest, Lookbook, ProTool, SortOrder, Wardrobe, WardrobeItem, VIEWPOINTS,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// スタジオ起動オプション
#[derive(Debug, Default, Clone)]
pub struct StudioOptions {
    /// モデル生成に使う写真
    pub photo: Option<PathBuf>,
    /// 生成済みモデル画像（生成をスキップ）
    pub model_image: Option<PathBuf>,
    /// 起動時にワードローブへ追加する衣服フォルダ
    pub garments: Option<PathBuf>,
    /// "Save Look" の保存先
    pub output_dir: PathBuf,
}

#[derive(Clone, Copy)]
enum Action {
    TryOn,
    UploadGarment,
    Reference,
    ProLab,
    Pose,
    Undo,
    Stack,
    SaveLook,
    SaveToLookbook,
    LoadFromLookbook,
    GoPro,
    Reset,
    Quit,
}

const ACTIONS: &[(Action, &str)] = &[
    (Action::TryOn, "👗 ワードローブから着せる"),
    (Action::UploadGarment, "📤 衣服画像をアップロードして着せる"),
    (Action::Reference, "✨ 参照写真のコーデを転写"),
    (Action::ProLab, "💄 Pro Style Lab"),
    (Action::Pose, "🔄 ポーズ変更"),
    (Action::Undo, "↩ 元に戻す"),
    (Action::Stack, "📚 コーデ履歴を表示"),
    (Action::SaveLook, "💾 Save Look（画像を保存）"),
    (Action::SaveToLookbook, "📒 ルックブックに保存"),
    (Action::LoadFromLookbook, "📂 ルックブックから読み込み"),
    (Action::GoPro, "⭐ Go Pro"),
    (Action::Reset, "🗑 モデルを破棄してやり直す"),
    (Action::Quit, "終了"),
];

struct Studio {
    session: StyleSession<GeminiClient>,
    wardrobe: Wardrobe,
    lookbook: Lookbook,
    lookbook_store: LookbookStore,
    max_image_size: u32,
    ad_delay: Duration,
    output_dir: PathBuf,
}

pub async fn run_studio(config: &Config, options: StudioOptions) -> Result<()> {
    let data_dir = Config::data_dir()?;
    let status_store = StatusStore::new(&data_dir);
    let status = status_store.load(chrono::Local::now().date_naive());
    let client = GeminiClient::new(config)?;

    let lookbook_store = LookbookStore::new(&data_dir);
    let mut studio = Studio {
        session: StyleSession::new(client, status).with_store(status_store),
        wardrobe: Wardrobe::default(),
        lookbook: lookbook_store.load(),
        lookbook_store,
        max_image_size: config.max_image_size,
        ad_delay: Duration::from_secs(config.ad_delay_seconds),
        output_dir: options.output_dir.clone(),
    };

    if let Some(folder) = &options.garments {
        studio.add_garment_folder(folder)?;
    }

    println!("👗 fitcreate - スタジオ\n");
    studio.print_usage();
    studio.start_model(&options).await?;

    while let Some(action) = studio.pick_action()? {
        if let Err(e) = studio.run_action(action).await {
            studio.report(action, e);
        }
    }

    println!("\n✅ 終了");
    Ok(())
}

impl Studio {
    async fn start_model(&mut self, options: &StudioOptions) -> Result<()> {
        if let Some(path) = &options.model_image {
            let image = media::load_image_file(path, self.max_image_size)?;
            self.session.finalize_model(image);
            println!("✔ モデル画像を読み込みました: {}\n", path.display());
            return Ok(());
        }

        let mut photo = options.photo.clone();
        while !self.session.has_model() {
            let path = match photo.take() {
                Some(p) => p,
                None => PathBuf::from(
                    Input::<String>::new()
                        .with_prompt("あなたの写真のパス")
                        .interact_text()
                        .map_err(prompt_error)?,
                ),
            };
            if let Err(e) = self.create_model(&path).await {
                println!("⚠ {}", e.friendly_message("Failed to create model"));
                if !confirm("別の写真で試しますか？", true)? {
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn create_model(&mut self, path: &Path) -> Result<()> {
        let photo = media::load_image_file(path, self.max_image_size)?;
        with_spinner(
            EditRequest::ModelFromPhoto.loading_message(),
            self.session.create_model(photo),
        )
        .await?;
        println!("✔ モデル画像を作成しました\n");
        Ok(())
    }

    fn pick_action(&self) -> Result<Option<Action>> {
        let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();
        let timeline = self.session.timeline();
        let index = Select::new()
            .with_prompt(format!(
                "操作を選択（履歴 {}/{}・視点: {}）",
                timeline.position() + 1,
                timeline.len(),
                self.session.viewpoint()
            ))
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        Ok(match index.map(|i| ACTIONS[i].0) {
            None | Some(Action::Quit) => None,
            Some(action) => Some(action),
        })
    }

    async fn run_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::TryOn => self.try_on().await,
            Action::UploadGarment => self.upload_garment().await,
            Action::Reference => self.reference().await,
            Action::ProLab => self.pro_lab().await,
            Action::Pose => self.change_pose().await,
            Action::Undo => {
                if self.session.undo() {
                    println!("✔ 1つ前のコーデに戻しました");
                } else {
                    println!("これ以上戻せません");
                }
                Ok(())
            }
            Action::Stack => {
                self.print_stack();
                Ok(())
            }
            Action::SaveLook => self.save_look().await,
            Action::SaveToLookbook => self.save_to_lookbook(),
            Action::LoadFromLookbook => self.load_from_lookbook(),
            Action::GoPro => self.go_pro(),
            Action::Reset => self.reset().await,
            Action::Quit => Ok(()),
        }
    }

    async fn try_on(&mut self) -> Result<()> {
        let categories = self.wardrobe.categories();
        let category = Select::new()
            .with_prompt("カテゴリ")
            .items(&categories)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        let query: String = Input::new()
            .with_prompt("検索（空欄で全件）")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;

        let active = self.session.active_garment_ids();
        let items = wardrobe::sorted(
            self.wardrobe
                .filter(Some(categories[category].as_str()), Some(query.as_str())),
            SortOrder::Newest,
        );
        if items.is_empty() {
            println!("該当するアイテムがありません");
            return Ok(());
        }

        let labels: Vec<String> = items
            .iter()
            .map(|item| {
                let mark = if active.contains(&item.id) { "✔ " } else { "" };
                format!("{}{} [{}]", mark, item.name, item.category.as_deref().unwrap_or("-"))
            })
            .collect();
        let Some(index) = Select::new()
            .with_prompt("アイテム")
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
        else {
            return Ok(());
        };

        let item = items[index].clone();
        if active.contains(&item.id) {
            println!("「{}」は既に着用中です", item.name);
            return Ok(());
        }
        self.apply_item(item).await
    }

    async fn upload_garment(&mut self) -> Result<()> {
        let path = ask_path("衣服画像のパス")?;
        let image = media::load_image_file(&path, self.max_image_size)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "garment".to_string());
        let item = self.wardrobe.add_custom(&name, image);
        if self.session.active_garment_ids().contains(&item.id) {
            println!("「{}」は既に着用中です", item.name);
            return Ok(());
        }
        self.apply_item(item).await
    }

    async fn apply_item(&mut self, item: WardrobeItem) -> Result<()> {
        let garment = media::resolve_wardrobe_image(
            self.session.transformer().http(),
            &item,
            self.max_image_size,
        )
        .await?;
        let name = item.name.clone();
        with_spinner(
            "Styling your look... Slay energy loading!",
            self.session.apply_garment(garment, item),
        )
        .await?;
        println!("✔ 「{}」を着せました", name);
        Ok(())
    }

    async fn reference(&mut self) -> Result<()> {
        let path = ask_path("参照写真のパス")?;
        let reference = media::load_image_file(&path, self.max_image_size)?;
        with_spinner(
            "Detecting style vibes...",
            self.session.apply_reference(reference),
        )
        .await?;
        println!("✔ 参照写真のコーデを転写しました");
        Ok(())
    }

    async fn pro_lab(&mut self) -> Result<()> {
        if !self.session.usage().is_pro() {
            return Err(FitCreateError::ProRequired);
        }
        let tools: Vec<String> = ProTool::ALL.iter().map(|t| t.to_string()).collect();
        let tool = ProTool::ALL[Select::new()
            .with_prompt("ツール")
            .items(&tools)
            .default(0)
            .interact()
            .map_err(prompt_error)?];
        let options = tool.options();
        let option = options[Select::new()
            .with_prompt("オプション")
            .items(options)
            .default(0)
            .interact()
            .map_err(prompt_error)?];

        with_spinner(
            "Crafting your new look... Pure slay magic in progress.",
            self.session.apply_pro_tool(tool, option),
        )
        .await?;
        println!("✔ {} を適用しました", option);
        Ok(())
    }

    async fn change_pose(&mut self) -> Result<()> {
        let current = VIEWPOINTS
            .iter()
            .position(|v| *v == self.session.viewpoint())
            .unwrap_or(0);
        let index = Select::new()
            .with_prompt("視点")
            .items(VIEWPOINTS)
            .default(current)
            .interact()
            .map_err(prompt_error)?;
        let request = EditRequest::Pose(VIEWPOINTS[index].to_string());
        let generated = with_spinner(
            request.loading_message(),
            self.session.select_viewpoint(VIEWPOINTS[index]),
        )
        .await?;
        if generated {
            println!("✔ 「{}」の画像を生成しました", VIEWPOINTS[index]);
        } else {
            println!("✔ 視点を「{}」に切り替えました", VIEWPOINTS[index]);
        }
        Ok(())
    }

    async fn save_look(&mut self) -> Result<()> {
        let image = self.session.visible_image()?.clone();
        if !self.session.usage().is_pro() && !self.ad_delay.is_zero() {
            with_spinner(
                "Watching Ad to Unlock Download... Slay the wait!",
                tokio::time::sleep(self.ad_delay),
            )
            .await;
        }
        let path = media::write_image(&self.output_dir, &image)?;
        println!("✔ 保存しました: {}", path.display());
        Ok(())
    }

    fn save_to_lookbook(&mut self) -> Result<()> {
        let name: String = Input::new()
            .with_prompt("コーデ名")
            .default("My Look".to_string())
            .interact_text()
            .map_err(prompt_error)?;
        let outfit = self.session.snapshot(&name)?;
        self.lookbook.save(outfit);
        self.lookbook_store.save(&self.lookbook)?;
        println!("✔ Outfit saved to lookbook!");
        Ok(())
    }

    fn load_from_lookbook(&mut self) -> Result<()> {
        if self.lookbook.is_empty() {
            println!("保存済みのコーデはありません");
            return Ok(());
        }
        let labels: Vec<String> = self
            .lookbook
            .iter()
            .map(|o| format!("{} ({}レイヤー)", o.name, o.layers.len()))
            .collect();
        let Some(index) = Select::new()
            .with_prompt("コーデ")
            .items(&labels)
            .interact_opt()
            .map_err(prompt_error)?
        else {
            return Ok(());
        };
        if let Some(outfit) = self.lookbook.iter().nth(index).cloned() {
            self.session.restore(&outfit)?;
            println!("✔ 「{}」を読み込みました", outfit.name);
        }
        Ok(())
    }

    fn go_pro(&mut self) -> Result<()> {
        if self.session.usage().is_pro() {
            println!("既にProです ⭐");
            return Ok(());
        }
        println!("\n⭐ fitCREATE Pro");
        for feature in [
            "Unlimited Try-Ons",
            "Full Body Sculpting Lab",
            "AI Beauty Retouching",
            "All Premium Templates",
            "Ad-Free Experience",
        ] {
            println!("  ✔ {}", feature);
        }
        if confirm("Join for $2.99 / Week?", false)? {
            self.session.subscribe()?;
            println!("✔ Proになりました");
        }
        Ok(())
    }

    async fn reset(&mut self) -> Result<()> {
        if !confirm("現在のモデルと履歴を破棄しますか？", false)? {
            return Ok(());
        }
        self.session.reset();
        self.start_model(&StudioOptions::default()).await
    }

    fn add_garment_folder(&mut self, folder: &Path) -> Result<()> {
        let garments = media::scan_garment_folder(folder, self.max_image_size)?;
        for (name, image) in garments {
            self.wardrobe.add_custom(&name, image);
        }
        println!("✔ ワードローブ: {}件", self.wardrobe.len());
        Ok(())
    }

    fn print_stack(&self) {
        println!("\nコーデ履歴:");
        for (i, layer) in self.session.visible_layers().iter().enumerate() {
            let viewpoints: Vec<&str> = layer.viewpoint_images().viewpoints().collect();
            println!("  {}. {} ({})", i + 1, layer.label(), viewpoints.join(", "));
        }
        println!();
    }

    fn print_usage(&self) {
        match self.session.usage().remaining_today() {
            None => println!("⭐ Pro: 無制限\n"),
            Some(n) => println!("無料枠: 本日あと{}回\n", n),
        }
    }

    fn report(&mut self, action: Action, e: FitCreateError) {
        match e {
            FitCreateError::UpgradeRequired | FitCreateError::ProRequired => {
                println!("⚠ {}", e);
                if let Err(e) = self.go_pro() {
                    println!("⚠ {}", e);
                }
            }
            e if e.is_generation_failure() => {
                println!("⚠ {}", e.friendly_message(action.failure_context()))
            }
            e => println!("⚠ {}", e),
        }
    }
}

impl Action {
    fn failure_context(self) -> &'static str {
        match self {
            Action::ProLab => "Pro generation failed",
            Action::Pose => "Pose change failed",
            Action::Reference => "Style transfer failed",
            _ => "Style session failed",
        }
    }
}

/// 生成待ちの間スピナーを表示
async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    let output = future.await;
    spinner.finish_and_clear();
    output
}

fn ask_path(prompt: &str) -> Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_error)?;
    Ok(PathBuf::from(path.trim()))
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(prompt_error)
}

fn prompt_error(e: dialoguer::Error) -> FitCreateError {
    FitCreateError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}
