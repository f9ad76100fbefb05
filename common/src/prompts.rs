//! 生成リクエストとプロンプト
//!
//! 画像生成サービスへ渡す編集指示:
//! - EditRequest: 編集の種類ごとのペイロード
//! - ProTool: Pro専用ツール（レタッチ・メイク・ボディ・テンプレート）

use crate::image_ref::ImageRef;
use std::fmt;
use std::str::FromStr;

const RETOUCH_OPTIONS: &[&str] = &[
    "Skin Smoothing",
    "Teeth Whitening",
    "Blemish Removal",
    "Anti-Wrinkle",
    "Eye Brighten",
];

const MAKEUP_OPTIONS: &[&str] = &[
    "Glamorous",
    "Bare Faced",
    "Rocker Chick",
    "Tan Girl",
    "Classic Red",
];

const SCULPT_OPTIONS: &[&str] = &[
    "Manual Slimmer",
    "Muscle Definition",
    "Plumper",
    "Sculptor",
];

const TEMPLATE_OPTIONS: &[&str] = &[
    "Cyberpunk",
    "Anime",
    "Medieval",
    "Starbucks Time",
    "Polaroid Kiss",
    "Christmas",
    "Birthday",
];

/// 編集指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    /// 写真からスタジオモデル画像を生成
    ModelFromPhoto,
    /// 衣服画像で着せ替え
    Garment { garment: ImageRef },
    /// 参照写真のコーデを丸ごと転写
    Reference { reference: ImageRef },
    Retouch(String),
    Makeup(String),
    Sculpt(String),
    Template(String),
    /// 視点（ポーズ）変更
    Pose(String),
}

impl EditRequest {
    /// ベース画像の後に添付する2枚目の画像
    pub fn extra_image(&self) -> Option<&ImageRef> {
        match self {
            EditRequest::Garment { garment } => Some(garment),
            EditRequest::Reference { reference } => Some(reference),
            _ => None,
        }
    }

    /// ログ・進捗表示用の短い名前
    pub fn kind(&self) -> &'static str {
        match self {
            EditRequest::ModelFromPhoto => "model",
            EditRequest::Garment { .. } => "garment",
            EditRequest::Reference { .. } => "reference",
            EditRequest::Retouch(_) => "retouch",
            EditRequest::Makeup(_) => "makeup",
            EditRequest::Sculpt(_) => "sculpt",
            EditRequest::Template(_) => "template",
            EditRequest::Pose(_) => "pose",
        }
    }

    /// 進捗スピナーのメッセージ
    pub fn loading_message(&self) -> &'static str {
        match self {
            EditRequest::ModelFromPhoto => "Creating your model...",
            EditRequest::Garment { .. } => "Styling your look... Slay energy loading!",
            EditRequest::Reference { .. } => "Detecting style vibes...",
            EditRequest::Pose(_) => "Changing pose...",
            _ => "Crafting your new look... Pure slay magic in progress.",
        }
    }

    /// 生成サービスに送るプロンプト
    pub fn prompt(&self) -> String {
        match self {
            EditRequest::ModelFromPhoto => {
                "Expert fashion photography. Transform person into a full-body studio model. \
                 Clean gray backdrop. Sassy, confident, smiling expression. Return ONLY the image."
                    .to_string()
            }
            EditRequest::Garment { .. } => {
                "Virtual try-on. Replace model's clothes with provided garments. Force change. \
                 Match lighting. Return ONLY image."
                    .to_string()
            }
            EditRequest::Reference { .. } => REFERENCE_PROMPT.to_string(),
            EditRequest::Retouch(option) => format!(
                "AI Beauty Retouch: {}. High-end professional retouching. Smooth skin while keeping \
                 texture, whiten teeth, remove blemishes, reduce wrinkles, brighten eyes, mattify skin. \
                 Return ONLY image.",
                option
            ),
            EditRequest::Makeup(style) => format!(
                "Virtual Makeup Vanity: Apply the '{}' makeup look. Include detailed contour, highlight, \
                 eyeliner, long lashes, lipstick color matching the vibe, and eyeshadow. Return ONLY image.",
                style
            ),
            EditRequest::Sculpt(instruction) => format!(
                "Body Sculpting & Muscle Definition: {}. Naturally and realistically adjust body \
                 proportions, add muscle definition or modify physique realistically. Preserve facial \
                 features perfectly. Return ONLY image.",
                instruction
            ),
            EditRequest::Template(template) => format!(
                "Creative Template: {}. Transform this image into the requested style:\n{}\n\
                 Return ONLY photorealistic or stylized image as appropriate.",
                template, TEMPLATE_GUIDE
            ),
            EditRequest::Pose(viewpoint) => format!(
                "Photography perspective change: {}. Keep person, clothes, and background identical. \
                 Return ONLY image.",
                viewpoint
            ),
        }
    }
}

const REFERENCE_PROMPT: &str = "EXPERT OUTFIT TRANSFER.
1. Detect ALL items in reference: headwear, accessories, tops, bottoms, and SHOES.
2. Correct lengths: If reference has pants (long), use pants. If shorts (short), use shorts.
3. Mandatory matching shoes on BOTH feet.
4. Maintain model's face, body proportions, and background perfectly. The pose must remain EXACTLY as it is in the model image.
5. Ensure the result is DIFFERENT from the input model image.
Return ONLY final photorealistic image.";

const TEMPLATE_GUIDE: &str = "- Cyberpunk/Cyber/Mechanic: High tech, neon, mechanical parts.
- Anime: Stylized anime or teardrop anime.
- Starbucks: Holding a Starbucks coffee in a lifestyle setting.
- Polaroid Kiss: Lip print polaroid effect.
- Double Exposure: Artistic overlay with nature or sky.
- Good Vibes Sky: Standing in front of a majestic sunset with 'Good Vibes' written in clouds.
- Christmas/Birthday/Couple: Seasonal frames and themes.";

/// Pro専用ツール
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProTool {
    Retouch,
    Makeup,
    Sculpt,
    Template,
}

impl ProTool {
    pub const ALL: [ProTool; 4] = [
        ProTool::Retouch,
        ProTool::Makeup,
        ProTool::Sculpt,
        ProTool::Template,
    ];

    /// 選択肢
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            ProTool::Retouch => RETOUCH_OPTIONS,
            ProTool::Makeup => MAKEUP_OPTIONS,
            ProTool::Sculpt => SCULPT_OPTIONS,
            ProTool::Template => TEMPLATE_OPTIONS,
        }
    }

    /// 選択肢をリクエストに変換。未知の選択肢は None
    pub fn request(&self, option: &str) -> Option<EditRequest> {
        let option = self
            .options()
            .iter()
            .find(|o| o.eq_ignore_ascii_case(option.trim()))?
            .to_string();
        Some(match self {
            ProTool::Retouch => EditRequest::Retouch(option),
            ProTool::Makeup => EditRequest::Makeup(option),
            ProTool::Sculpt => EditRequest::Sculpt(option),
            ProTool::Template => EditRequest::Template(option),
        })
    }
}

impl FromStr for ProTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retouch" => Ok(ProTool::Retouch),
            "makeup" => Ok(ProTool::Makeup),
            "sculpt" => Ok(ProTool::Sculpt),
            "template" => Ok(ProTool::Template),
            _ => Err(format!(
                "Unknown tool: {}. Use retouch, makeup, sculpt, or template",
                s
            )),
        }
    }
}

impl fmt::Display for ProTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProTool::Retouch => write!(f, "retouch"),
            ProTool::Makeup => write!(f, "makeup"),
            ProTool::Sculpt => write!(f, "sculpt"),
            ProTool::Template => write!(f, "template"),
        }
    }
}
