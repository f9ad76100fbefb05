//! ルックブック（保存済みコーデ）

use crate::error::{Error, Result};
use crate::timeline::Timeline;
use crate::types::SavedOutfit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookbook {
    outfits: Vec<SavedOutfit>,
}

impl Lookbook {
    /// 現在表示中のレイヤーをスナップショット
    pub fn snapshot(timeline: &Timeline, name: &str, viewpoint: &str) -> Result<SavedOutfit> {
        let layers = timeline.visible_layers().to_vec();
        if layers.is_empty() {
            return Err(Error::EmptyTimeline);
        }
        let thumbnail = timeline.visible_image(viewpoint)?.clone();
        let id = format!("outfit-{}", thumbnail.content_hash());
        Ok(SavedOutfit {
            id,
            name: name.to_string(),
            layers,
            thumbnail,
        })
    }

    /// 保存（同じIDは上書き）
    pub fn save(&mut self, outfit: SavedOutfit) {
        match self.outfits.iter_mut().find(|o| o.id == outfit.id) {
            Some(existing) => *existing = outfit,
            None => self.outfits.push(outfit),
        }
    }

    pub fn get(&self, id: &str) -> Option<&SavedOutfit> {
        self.outfits.iter().find(|o| o.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<SavedOutfit> {
        let index = self.outfits.iter().position(|o| o.id == id)?;
        Some(self.outfits.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedOutfit> {
        self.outfits.iter()
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ref::ImageRef;
    use crate::types::{OutfitLayer, WardrobeItem, DEFAULT_VIEWPOINT};

    fn timeline_with_two_garments() -> Timeline {
        let mut t = Timeline::new(ImageRef::new("base"), DEFAULT_VIEWPOINT);
        for id in ["a", "b"] {
            let item = WardrobeItem::new(id, id, "u", "top", &[]);
            t.append_layer(OutfitLayer::new(Some(item), DEFAULT_VIEWPOINT, ImageRef::new(id)))
                .unwrap();
        }
        t
    }

    #[test]
    fn test_snapshot_takes_visible_layers_only() {
        let mut t = timeline_with_two_garments();
        t.undo();
        let outfit = Lookbook::snapshot(&t, "Weekend", "Walking").unwrap();
        assert_eq!(outfit.layers.len(), 2);
        assert_eq!(outfit.thumbnail, ImageRef::new("a"));
        assert_eq!(outfit.name, "Weekend");
    }

    #[test]
    fn test_snapshot_empty_timeline() {
        let t = Timeline::default();
        assert!(matches!(
            Lookbook::snapshot(&t, "x", DEFAULT_VIEWPOINT),
            Err(Error::EmptyTimeline)
        ));
    }

    #[test]
    fn test_save_get_remove() {
        let t = timeline_with_two_garments();
        let outfit = Lookbook::snapshot(&t, "Night out", DEFAULT_VIEWPOINT).unwrap();
        let id = outfit.id.clone();

        let mut lookbook = Lookbook::default();
        lookbook.save(outfit.clone());
        lookbook.save(SavedOutfit { name: "Renamed".into(), ..outfit });
        assert_eq!(lookbook.len(), 1);
        assert_eq!(lookbook.get(&id).unwrap().name, "Renamed");

        assert!(lookbook.remove(&id).is_some());
        assert!(lookbook.remove(&id).is_none());
        assert!(lookbook.is_empty());
    }

    #[test]
    fn test_roundtrip_restores_timeline() {
        let t = timeline_with_two_garments();
        let outfit = Lookbook::snapshot(&t, "Look", DEFAULT_VIEWPOINT).unwrap();
        let mut lookbook = Lookbook::default();
        lookbook.save(outfit);

        let json = serde_json::to_string(&lookbook).unwrap();
        let loaded: Lookbook = serde_json::from_str(&json).unwrap();
        let saved = loaded.iter().next().unwrap();
        let restored = Timeline::from_layers(saved.layers.clone()).unwrap();
        assert_eq!(restored.layers(), t.layers());
        assert_eq!(restored.position(), 2);
    }
}
