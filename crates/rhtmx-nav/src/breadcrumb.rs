// File: src/breadcrumb.rs
// Purpose: Breadcrumb trail derived from a path and the route table

use serde::Serialize;

use crate::path::{normalize_path, PathPrefixes};
use crate::routes::RouteTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// One crumb per path prefix whose route carries a breadcrumb label.
///
/// Recomputed on every call; prefixes without a route or without a label
/// are skipped.
pub fn breadcrumbs(table: &RouteTable, path: &str) -> Vec<Breadcrumb> {
    let path = normalize_path(path);

    PathPrefixes::new(&path)
        .filter_map(|prefix| {
            let label = table.metadata_for(prefix)?.breadcrumb.clone()?;
            Some(Breadcrumb {
                label,
                path: prefix.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn crumb(label: &str, path: &str) -> Breadcrumb {
        Breadcrumb {
            label: label.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_admin_user_posts_trail() {
        let table = RouteTable::standard();
        assert_eq!(
            breadcrumbs(&table, "/admin/users/42/posts"),
            vec![
                crumb("Users", "/admin/users"),
                crumb("User", "/admin/users/42"),
                crumb("Posts", "/admin/users/42/posts"),
            ]
        );
    }

    #[test]
    fn test_prefixes_without_routes_are_skipped() {
        let table = RouteTable::standard();
        assert_eq!(
            breadcrumbs(&table, "/user/posts/9"),
            vec![crumb("My post", "/user/posts/9")]
        );
    }

    #[test]
    fn test_root_has_no_trail() {
        assert!(breadcrumbs(&RouteTable::standard(), "/").is_empty());
    }
}
