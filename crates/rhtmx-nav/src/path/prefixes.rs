/// Forward iterator over the cumulative prefixes of a path
///
/// For `/admin/users/7` it yields `/admin` → `/admin/users` → `/admin/users/7`.
/// The root itself is never yielded. Items borrow from the input.
///
/// ```
/// use rhtmx_nav::path::PathPrefixes;
///
/// let prefixes: Vec<&str> = PathPrefixes::new("/user/posts/9").collect();
/// assert_eq!(prefixes, vec!["/user", "/user/posts", "/user/posts/9"]);
/// ```
#[derive(Debug, Clone)]
pub struct PathPrefixes<'a> {
    path: &'a str,
    // Byte offset where the next segment search starts
    cursor: usize,
}

impl<'a> PathPrefixes<'a> {
    /// Expects a canonical path (see [`normalize_path`](super::normalize_path))
    pub fn new(path: &'a str) -> Self {
        Self { path, cursor: 0 }
    }
}

impl<'a> Iterator for PathPrefixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.path.get(self.cursor..)?;
        // Skip the leading slash of the next segment
        let start = self.cursor + rest.len() - rest.trim_start_matches('/').len();
        if start >= self.path.len() {
            self.cursor = self.path.len() + 1;
            return None;
        }

        let end = self.path[start..]
            .find('/')
            .map(|offset| start + offset)
            .unwrap_or(self.path.len());

        self.cursor = end;
        Some(&self.path[..end])
    }
}
