//! ワードローブ（衣服カタログ）
//!
//! 組み込みカタログ＋ユーザーアップロードのカスタム項目。
//! 絞り込み・並び替えは表示側の都合なので、元の並び（追加順）は変更しない。

use crate::image_ref::ImageRef;
use crate::types::WardrobeItem;
use std::str::FromStr;

/// 全カテゴリ
pub const ALL_CATEGORIES: &str = "All";

/// 並び順
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// 追加が新しい順
    #[default]
    Newest,
    Oldest,
    Az,
    Za,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "new" => Ok(SortOrder::Newest),
            "oldest" | "old" => Ok(SortOrder::Oldest),
            "az" | "a-z" => Ok(SortOrder::Az),
            "za" | "z-a" => Ok(SortOrder::Za),
            _ => Err(format!("Unknown sort: {}. Use newest, oldest, az, or za", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wardrobe {
    items: Vec<WardrobeItem>,
}

impl Default for Wardrobe {
    fn default() -> Self {
        Self {
            items: default_catalog(),
        }
    }
}

impl Wardrobe {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[WardrobeItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WardrobeItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// アップロードした衣服を追加。同じ画像なら既存項目を返す
    pub fn add_custom(&mut self, name: &str, image: ImageRef) -> WardrobeItem {
        let item = WardrobeItem::custom(name, image);
        if let Some(existing) = self.get(&item.id) {
            return existing.clone();
        }
        self.items.push(item.clone());
        item
    }

    /// "All" + 先頭大文字化したカテゴリ（出現順、重複なし）
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for category in self.items.iter().filter_map(|item| item.category.as_deref()) {
            let label = capitalize(category);
            if !categories.contains(&label) {
                categories.push(label);
            }
        }
        categories
    }

    /// カテゴリと検索語で絞り込み
    ///
    /// 検索語は名前・カテゴリ・タグの部分一致（大文字小文字無視）
    pub fn filter(&self, category: Option<&str>, query: Option<&str>) -> Vec<&WardrobeItem> {
        let category = category
            .map(str::to_lowercase)
            .filter(|c| c != &ALL_CATEGORIES.to_lowercase());
        let query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        self.items
            .iter()
            .filter(|item| match &category {
                Some(c) => item.category.as_deref().map(str::to_lowercase).as_ref() == Some(c),
                None => true,
            })
            .filter(|item| match &query {
                Some(q) => matches_query(item, q),
                None => true,
            })
            .collect()
    }
}

/// 表示用に並び替え
pub fn sorted(mut items: Vec<&WardrobeItem>, order: SortOrder) -> Vec<&WardrobeItem> {
    match order {
        SortOrder::Newest => items.reverse(),
        SortOrder::Oldest => {}
        SortOrder::Az => items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortOrder::Za => items.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase())),
    }
    items
}

fn matches_query(item: &WardrobeItem, query: &str) -> bool {
    item.name.to_lowercase().contains(query)
        || item
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(query))
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(query))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 組み込みカタログ
pub fn default_catalog() -> Vec<WardrobeItem> {
    vec![
        WardrobeItem::new(
            "beige-knit-leather-skirt",
            "Beige Knit & Leather Skirt",
            "https://images.unsplash.com/photo-1515886657613-9f3515b0c78f?auto=format&fit=crop&w=800&q=80",
            "dress",
            &["chic", "fall", "warm", "knitwear", "leather"],
        ),
        WardrobeItem::new(
            "gemini-sweat",
            "Gemini Sweat",
            "https://raw.githubusercontent.com/ammaarreshi/app-images/refs/heads/main/gemini-sweat-2.png",
            "top",
            &["casual", "sporty", "logo", "loungewear"],
        ),
        WardrobeItem::new(
            "gemini-tee",
            "Gemini Tee",
            "https://raw.githubusercontent.com/ammaarreshi/app-images/refs/heads/main/Gemini-tee.png",
            "top",
            &["casual", "basic", "t-shirt", "everyday"],
        ),
        WardrobeItem::new(
            "denim-jacket",
            "Classic Denim Jacket",
            "https://images.unsplash.com/photo-1576871337632-b9aef4c17ab9?auto=format&fit=crop&w=400&q=80",
            "outerwear",
            &["denim", "layering", "casual", "blue"],
        ),
        WardrobeItem::new(
            "summer-dress",
            "Floral Dress",
            "https://images.unsplash.com/photo-1572804013309-59a88b7e92f1?auto=format&fit=crop&w=400&q=80",
            "dress",
            &["summer", "floral", "light", "vacation"],
        ),
        WardrobeItem::new(
            "leather-jacket",
            "Leather Jacket",
            "https://images.unsplash.com/photo-1551028919-30164a7ed4af?auto=format&fit=crop&w=400&q=80",
            "outerwear",
            &["edgy", "cool", "leather", "night"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&WardrobeItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_default_catalog() {
        let wardrobe = Wardrobe::default();
        assert_eq!(wardrobe.len(), 6);
        assert!(wardrobe.get("denim-jacket").is_some());
        assert!(wardrobe.get("nope").is_none());
    }

    #[test]
    fn test_categories() {
        let wardrobe = Wardrobe::default();
        assert_eq!(wardrobe.categories(), vec!["All", "Dress", "Top", "Outerwear"]);
    }

    #[test]
    fn test_filter_by_category_case_insensitive() {
        let wardrobe = Wardrobe::default();
        let items = wardrobe.filter(Some("Outerwear"), None);
        assert_eq!(ids(&items), vec!["denim-jacket", "leather-jacket"]);
        assert_eq!(wardrobe.filter(Some("All"), None).len(), 6);
    }

    #[test]
    fn test_filter_by_query_matches_tags() {
        let wardrobe = Wardrobe::default();
        let items = wardrobe.filter(None, Some("LEATHER"));
        assert_eq!(ids(&items), vec!["beige-knit-leather-skirt", "leather-jacket"]);

        let items = wardrobe.filter(Some("dress"), Some("vacation"));
        assert_eq!(ids(&items), vec!["summer-dress"]);

        assert_eq!(wardrobe.filter(None, Some("   ")).len(), 6);
        assert!(wardrobe.filter(None, Some("tuxedo")).is_empty());
    }

    #[test]
    fn test_sorted() {
        let wardrobe = Wardrobe::default();
        let newest = sorted(wardrobe.filter(Some("top"), None), SortOrder::Newest);
        assert_eq!(ids(&newest), vec!["gemini-tee", "gemini-sweat"]);

        let az = sorted(wardrobe.filter(None, None), SortOrder::Az);
        assert_eq!(az[0].name, "Beige Knit & Leather Skirt");
        let za = sorted(wardrobe.filter(None, None), SortOrder::Za);
        assert_eq!(za[0].name, "Leather Jacket");
    }

    #[test]
    fn test_add_custom_is_idempotent() {
        let mut wardrobe = Wardrobe::default();
        let image = ImageRef::from_base64("image/png", "AAAA");
        let first = wardrobe.add_custom("shirt", image.clone());
        let second = wardrobe.add_custom("shirt copy", image);
        assert_eq!(first.id, second.id);
        assert_eq!(wardrobe.len(), 7);
        assert!(wardrobe.categories().contains(&"Custom".to_string()));
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("A-Z".parse::<SortOrder>().unwrap(), SortOrder::Az);
        assert_eq!("oldest".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("random".parse::<SortOrder>().is_err());
    }
}
