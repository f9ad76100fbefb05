use anyhow::Context;
use clap::Parser;
use fitcreate::{cli, config, gemini, media, store, studio};
use cli::{Cli, Commands};
use config::Config;
use fitcreate_common::{wardrobe, EditRequest, ImageTransformer, UsageGate, Wardrobe};
use std::path::PathBuf;
use store::{LookbookStore, StatusStore};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    let config = Config::load().context("設定の読み込みに失敗")?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Studio { photo, model_image, garments, output } => {
            let options = studio::StudioOptions {
                photo,
                model_image,
                garments,
                output_dir: output.unwrap_or_else(|| PathBuf::from(".")),
            };
            studio::run_studio(&config, options).await?;
        }

        Commands::Model { photo, output } => {
            println!("🧍 fitcreate - モデル作成\n");

            println!("[1/3] 写真を読み込み中...");
            let image = media::load_image_file(&photo, config.max_image_size)?;
            println!("✔ {}\n", image);

            println!("[2/3] {}", EditRequest::ModelFromPhoto.loading_message());
            let client = gemini::GeminiClient::new(&config)?;
            let model = client
                .transform(&image, &EditRequest::ModelFromPhoto)
                .await
                .map_err(fitcreate::error::FitCreateError::from)?;
            println!("✔ 生成完了\n");

            println!("[3/3] 保存中...");
            let target = output.unwrap_or_else(|| PathBuf::from("."));
            let path = media::write_image(&target, &model)?;
            println!("✔ 保存: {}", path.display());

            println!("\n✅ 完了");
        }

        Commands::Wardrobe { category, search, sort, garments } => {
            let mut items = Wardrobe::default();
            if let Some(folder) = garments {
                for (name, image) in media::scan_garment_folder(&folder, config.max_image_size)? {
                    items.add_custom(&name, image);
                }
            }

            let found = wardrobe::sorted(
                items.filter(category.as_deref(), search.as_deref()),
                sort,
            );
            println!("ワードローブ ({}/{}件):", found.len(), items.len());
            for item in found {
                println!(
                    "  {:<20} {:<10} {:<24} {}",
                    item.id,
                    item.category.as_deref().unwrap_or("-"),
                    item.name,
                    item.tags.join(", ")
                );
            }
        }

        Commands::Status => {
            let status_store = StatusStore::new(&Config::data_dir()?);
            let gate = UsageGate::new(status_store.load(today));
            println!("利用状況:");
            println!("  プラン: {}", if gate.is_pro() { "Pro ⭐" } else { "Free" });
            println!("  本日の利用回数: {}", gate.status().free_uses_today);
            match gate.remaining_today() {
                Some(n) => println!("  残り: {}回", n),
                None => println!("  残り: 無制限"),
            }
            println!("  基準日: {}", gate.status().last_reset_date);
            println!("  保存先: {}", status_store.path().display());
        }

        Commands::Subscribe => {
            let status_store = StatusStore::new(&Config::data_dir()?);
            let mut gate = UsageGate::new(status_store.load(today));
            if gate.upgrade() {
                status_store.save(gate.status())?;
                println!("✔ Proにアップグレードしました ⭐");
            } else {
                println!("既にProです ⭐");
            }
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base_url);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  広告待ち時間: {}秒", config.ad_delay_seconds);
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Lookbook { delete } => {
            let lookbook_store = LookbookStore::new(&Config::data_dir()?);
            let mut lookbook = lookbook_store.load();

            if let Some(id) = delete {
                match lookbook.remove(&id) {
                    Some(outfit) => {
                        lookbook_store.save(&lookbook)?;
                        println!("✔ 「{}」を削除しました", outfit.name);
                    }
                    None => return Err(fitcreate::error::FitCreateError::UnknownItem(id).into()),
                }
            } else if lookbook.is_empty() {
                println!("保存済みのコーデはありません");
            } else {
                println!("ルックブック ({}件):", lookbook.len());
                for outfit in lookbook.iter() {
                    let garments: Vec<&str> = outfit
                        .layers
                        .iter()
                        .filter_map(|l| l.garment.as_ref().map(|g| g.name.as_str()))
                        .collect();
                    println!("  {}  {}  [{}]", outfit.id, outfit.name, garments.join(" + "));
                }
            }
        }
    }

    Ok(())
}
