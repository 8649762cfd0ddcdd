//! Maps the active view and search text onto a fetch request.
//!
//! [`resolve`] is the single source of truth for what the content area
//! shows. It is a pure function: the same view, query and folder list
//! always give the same descriptor.

use serde::Serialize;

use cipherdrive_client::FetchScope;
use cipherdrive_entity::folder::Folder;

use super::content::ContentView;

/// Title used for the unfiltered view and for unknown folders.
pub const DEFAULT_TITLE: &str = "My Images";

/// What to fetch for the active view, and how to label it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchDescriptor {
    /// The collection to request.
    pub scope: FetchScope,
    /// Heading for the content area.
    pub title: String,
    /// Message shown when the collection is empty.
    pub empty_state_message: String,
}

/// Resolves a view and search query into a fetch descriptor.
///
/// A non-blank query turns every view except starred and recent into a
/// search, scoped to the folder when the view is a folder view. Starred
/// and recent are fixed collections that ignore both search and folder.
pub fn resolve(view: &ContentView, query: &str, folders: &[Folder]) -> FetchDescriptor {
    let query = query.trim();

    let scope = if !query.is_empty() && !view.ignores_search() {
        FetchScope::Search {
            query: query.to_string(),
            folder_id: view.folder_id().cloned(),
        }
    } else {
        match view {
            ContentView::Shared => FetchScope::Shared,
            ContentView::Starred => FetchScope::Starred,
            ContentView::Recent => FetchScope::Recent,
            ContentView::Folder(id) => FetchScope::Folder {
                folder_id: id.clone(),
            },
            ContentView::All => FetchScope::All,
        }
    };

    FetchDescriptor {
        scope,
        title: title(view, folders),
        empty_state_message: empty_state_message(view).to_string(),
    }
}

/// Heading for a view. A folder view shows the folder's name when the
/// folder is in the cache.
pub fn title(view: &ContentView, folders: &[Folder]) -> String {
    match view {
        ContentView::Starred => "Starred Images".to_string(),
        ContentView::Recent => "Recent Images".to_string(),
        ContentView::Shared => "Shared with Me".to_string(),
        ContentView::Folder(id) => folders
            .iter()
            .find(|f| &f.id == id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        ContentView::All => DEFAULT_TITLE.to_string(),
    }
}

/// Message for an empty collection.
pub fn empty_state_message(view: &ContentView) -> &'static str {
    match view {
        ContentView::Starred => "Star some images to see them here",
        ContentView::Recent => "Recently viewed images will appear here",
        ContentView::Shared => "Images shared with you will appear here",
        ContentView::All | ContentView::Folder(_) => "Upload your first image to get started",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use cipherdrive_core::types::FolderId;

    use super::*;

    fn holidays() -> Folder {
        Folder {
            id: FolderId::from("f1"),
            name: "Holidays".to_string(),
            parent_id: None,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(9, 0, 0))
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn test_folder_view_without_query() {
        let view = ContentView::Folder(FolderId::from("f1"));

        let known = resolve(&view, "", &[holidays()]);
        assert_eq!(
            known.scope,
            FetchScope::Folder {
                folder_id: FolderId::from("f1")
            }
        );
        assert_eq!(known.title, "Holidays");

        let unknown = resolve(&view, "", &[]);
        assert_eq!(unknown.title, DEFAULT_TITLE);
        assert_eq!(unknown.scope, known.scope);
    }

    #[test]
    fn test_starred_ignores_query() {
        let descriptor = resolve(&ContentView::Starred, "vacation", &[]);
        assert_eq!(descriptor.scope, FetchScope::Starred);
        assert_eq!(descriptor.title, "Starred Images");
        assert_eq!(
            descriptor.empty_state_message,
            "Star some images to see them here"
        );
    }

    #[test]
    fn test_recent_ignores_query() {
        let descriptor = resolve(&ContentView::Recent, "cats", &[]);
        assert_eq!(descriptor.scope, FetchScope::Recent);
    }

    #[test]
    fn test_folder_search_is_scoped() {
        let view = ContentView::Folder(FolderId::from("f1"));
        let descriptor = resolve(&view, "  beach ", &[holidays()]);
        assert_eq!(
            descriptor.scope,
            FetchScope::Search {
                query: "beach".to_string(),
                folder_id: Some(FolderId::from("f1")),
            }
        );
        assert_eq!(descriptor.title, "Holidays");
    }

    #[test]
    fn test_shared_search_is_unscoped() {
        let descriptor = resolve(&ContentView::Shared, "beach", &[]);
        assert_eq!(
            descriptor.scope,
            FetchScope::Search {
                query: "beach".to_string(),
                folder_id: None,
            }
        );
        assert_eq!(descriptor.title, "Shared with Me");
    }

    #[test]
    fn test_blank_query_is_no_query() {
        assert_eq!(resolve(&ContentView::All, "   ", &[]).scope, FetchScope::All);
        assert_eq!(
            resolve(&ContentView::Shared, "", &[]).scope,
            FetchScope::Shared
        );
    }

    #[test]
    fn test_resolve_is_pure() {
        let view = ContentView::Folder(FolderId::from("f1"));
        let folders = [holidays()];
        assert_eq!(
            resolve(&view, "x", &folders),
            resolve(&view, "x", &folders)
        );
    }
}
