//! Promotional stories shown above the route picker.
//!
//! The set is static: nine stories with two pages each. The only state is
//! which stories the user has seen, kept in memory.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

/// Number of stories in the strip.
pub const STORY_COUNT: u32 = 9;

const PLACEHOLDER_TITLE: &str = "Text Text Text Text Text Text Text Text Text Text Text Text \
    Text Text Text Text Text Text Text Text Text Text Text Text Text Text Text Text Text";
const PLACEHOLDER_BODY: &str = "Text Text Text Text Text Text Text Text Text Text Text Text \
    Text Text Text Text Text Text Text Text Text Text Text Text Text Text Text Text Text Text \
    Text Text Text Text Text Text Text Text Text Text Text Text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryPage {
    pub image: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub id: u32,
    pub preview_image: String,
    pub preview_title: String,
    pub pages: Vec<StoryPage>,
}

impl Story {
    fn numbered(id: u32) -> Self {
        let page = |image: String| StoryPage {
            image,
            title: PLACEHOLDER_TITLE.to_string(),
            body: PLACEHOLDER_BODY.to_string(),
        };
        Self {
            id,
            preview_image: format!("stories_preview_{id:02}"),
            preview_title: "Text Text Text\nText Text\nText Text T…".to_string(),
            pages: vec![
                page(format!("stories_big_{id:02}")),
                page(format!("stories_next_{id:02}")),
            ],
        }
    }
}

/// A story as listed in the strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryPreview {
    #[serde(flatten)]
    pub story: Story,
    pub viewed: bool,
}

/// The stories and which of them have been viewed.
#[derive(Debug)]
pub struct StoriesStore {
    stories: Vec<Story>,
    viewed: RwLock<BTreeSet<u32>>,
}

impl StoriesStore {
    pub fn new() -> Self {
        Self {
            stories: (1..=STORY_COUNT).map(Story::numbered).collect(),
            viewed: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn get(&self, id: u32) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn is_viewed(&self, id: u32) -> bool {
        self.viewed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Mark a story viewed. Returns `false` for unknown ids.
    pub fn mark_viewed(&self, id: u32) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.viewed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        true
    }

    pub fn previews(&self) -> Vec<StoryPreview> {
        let viewed = self.viewed.read().unwrap_or_else(PoisonError::into_inner);
        self.stories
            .iter()
            .map(|story| StoryPreview {
                story: story.clone(),
                viewed: viewed.contains(&story.id),
            })
            .collect()
    }
}

impl Default for StoriesStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of moving a [`StoryCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorMove {
    /// Moved within the same story.
    Page,
    /// Moved to another story.
    Story,
    /// Stayed put at the first page of the first story.
    Start,
    /// Walked past the last page of the last story.
    Finished,
}

/// Position in the full-screen story viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryCursor {
    pub story: usize,
    pub page: usize,
}

impl StoryCursor {
    pub fn new(story: usize) -> Self {
        Self { story, page: 0 }
    }

    /// Cursor on `page` of the story with `id`, if both exist.
    pub fn at(store: &StoriesStore, id: u32, page: usize) -> Option<Self> {
        let story = store.stories().iter().position(|s| s.id == id)?;
        if page >= store.stories()[story].pages.len() {
            return None;
        }
        Some(Self { story, page })
    }

    /// Id of the story under the cursor.
    pub fn story_id(&self, store: &StoriesStore) -> Option<u32> {
        store.stories().get(self.story).map(|s| s.id)
    }

    /// The page under the cursor.
    pub fn current<'a>(&self, store: &'a StoriesStore) -> Option<&'a StoryPage> {
        store.stories().get(self.story)?.pages.get(self.page)
    }

    /// Advance one page.
    ///
    /// Leaving a story marks it viewed, including the last one.
    pub fn next(&mut self, store: &StoriesStore) -> CursorMove {
        let Some(story) = store.stories().get(self.story) else {
            return CursorMove::Finished;
        };
        if self.page + 1 < story.pages.len() {
            self.page += 1;
            return CursorMove::Page;
        }

        store.mark_viewed(story.id);
        if self.story + 1 < store.stories().len() {
            self.story += 1;
            self.page = 0;
            CursorMove::Story
        } else {
            CursorMove::Finished
        }
    }

    /// Go back one page, or to the last page of the previous story.
    pub fn prev(&mut self, store: &StoriesStore) -> CursorMove {
        if self.page > 0 {
            self.page -= 1;
            return CursorMove::Page;
        }
        if self.story == 0 {
            return CursorMove::Start;
        }

        self.story -= 1;
        self.page = store
            .stories()
            .get(self.story)
            .map_or(0, |s| s.pages.len().saturating_sub(1));
        CursorMove::Story
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_stories_with_asset_names() {
        let store = StoriesStore::new();
        assert_eq!(store.stories().len(), 9);

        let first = store.get(1).unwrap();
        assert_eq!(first.preview_image, "stories_preview_01");
        assert_eq!(first.pages[0].image, "stories_big_01");
        assert_eq!(first.pages[1].image, "stories_next_01");

        assert_eq!(store.get(9).unwrap().preview_image, "stories_preview_09");
        assert!(store.get(10).is_none());
    }

    #[test]
    fn viewed_tracking() {
        let store = StoriesStore::new();
        assert!(!store.is_viewed(3));

        assert!(store.mark_viewed(3));
        assert!(store.is_viewed(3));
        assert!(!store.mark_viewed(42));

        let previews = store.previews();
        assert!(previews[2].viewed);
        assert!(!previews[0].viewed);
    }

    #[test]
    fn cursor_walks_pages_then_stories() {
        let store = StoriesStore::new();
        let mut cursor = StoryCursor::new(0);

        assert_eq!(cursor.next(&store), CursorMove::Page);
        assert_eq!(cursor, StoryCursor { story: 0, page: 1 });
        assert!(!store.is_viewed(1));

        assert_eq!(cursor.next(&store), CursorMove::Story);
        assert_eq!(cursor, StoryCursor { story: 1, page: 0 });
        assert!(store.is_viewed(1));
    }

    #[test]
    fn cursor_finishes_after_last_page() {
        let store = StoriesStore::new();
        let mut cursor = StoryCursor { story: 8, page: 1 };

        assert_eq!(cursor.next(&store), CursorMove::Finished);
        assert!(store.is_viewed(9));
    }

    #[test]
    fn cursor_prev() {
        let store = StoriesStore::new();
        let mut cursor = StoryCursor { story: 1, page: 1 };

        assert_eq!(cursor.prev(&store), CursorMove::Page);
        assert_eq!(cursor.prev(&store), CursorMove::Story);
        assert_eq!(cursor, StoryCursor { story: 0, page: 1 });
        assert_eq!(cursor.current(&store).unwrap().image, "stories_next_01");

        cursor.prev(&store);
        assert_eq!(cursor.prev(&store), CursorMove::Start);
        assert_eq!(cursor, StoryCursor::new(0));
    }

    #[test]
    fn cursor_at_story_id() {
        let store = StoriesStore::new();
        let cursor = StoryCursor::at(&store, 3, 1).unwrap();
        assert_eq!(cursor, StoryCursor { story: 2, page: 1 });
        assert_eq!(cursor.story_id(&store), Some(3));

        assert!(StoryCursor::at(&store, 3, 2).is_none());
        assert!(StoryCursor::at(&store, 10, 0).is_none());
    }
}
