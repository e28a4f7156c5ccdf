//! Typed keys for the standard application routes
//!
//! Section and route name are checked by the compiler, and every dynamic
//! variant carries exactly the placeholder values its pattern needs.

use std::sync::Arc;

use super::pattern::RoutePattern;
use super::table::{RouteMetadata, RouteRef, RouteTable};
use super::Params;
use crate::guard::{AdminGuard, AuthGuard, Guard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicRoute {
    Home,
    About,
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRoute {
    Profile,
    Settings,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminRoute {
    Users,
    Settings,
    Analytics,
}

/// A parameter-free route of the standard table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticRoute {
    Public(PublicRoute),
    User(UserRoute),
    Admin(AdminRoute),
}

impl StaticRoute {
    pub fn section(&self) -> &'static str {
        match self {
            StaticRoute::Public(_) => "public",
            StaticRoute::User(_) => "user",
            StaticRoute::Admin(_) => "admin",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StaticRoute::Public(PublicRoute::Home) => "home",
            StaticRoute::Public(PublicRoute::About) => "about",
            StaticRoute::Public(PublicRoute::Login) => "login",
            StaticRoute::Public(PublicRoute::Register) => "register",
            StaticRoute::User(UserRoute::Profile) => "profile",
            StaticRoute::User(UserRoute::Settings) => "settings",
            StaticRoute::User(UserRoute::Dashboard) => "dashboard",
            StaticRoute::Admin(AdminRoute::Users) => "users",
            StaticRoute::Admin(AdminRoute::Settings) => "settings",
            StaticRoute::Admin(AdminRoute::Analytics) => "analytics",
        }
    }

    pub fn route_ref(&self) -> RouteRef {
        RouteRef::new(self.section(), self.name())
    }
}

impl From<PublicRoute> for StaticRoute {
    fn from(route: PublicRoute) -> Self {
        StaticRoute::Public(route)
    }
}

impl From<UserRoute> for StaticRoute {
    fn from(route: UserRoute) -> Self {
        StaticRoute::User(route)
    }
}

impl From<AdminRoute> for StaticRoute {
    fn from(route: AdminRoute) -> Self {
        StaticRoute::Admin(route)
    }
}

/// A parameterized route of the standard table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DynamicRoute {
    /// `public.post` → `/posts/:postId`
    Post { post_id: String },
    /// `user.ownPost` → `/user/posts/:postId`
    OwnPost { post_id: String },
    /// `user.comment` → `/user/posts/:postId/comments/:commentId`
    Comment { post_id: String, comment_id: String },
    /// `admin.userManagement` → `/admin/users/:userId`
    UserManagement { user_id: String },
    /// `admin.userPosts` → `/admin/users/:userId/posts`
    UserPosts { user_id: String },
}

impl DynamicRoute {
    pub fn route_ref(&self) -> RouteRef {
        let (section, name) = match self {
            DynamicRoute::Post { .. } => ("public", "post"),
            DynamicRoute::OwnPost { .. } => ("user", "ownPost"),
            DynamicRoute::Comment { .. } => ("user", "comment"),
            DynamicRoute::UserManagement { .. } => ("admin", "userManagement"),
            DynamicRoute::UserPosts { .. } => ("admin", "userPosts"),
        };
        RouteRef::new(section, name)
    }

    /// Pattern this route has in the standard table
    pub fn pattern(&self) -> &'static str {
        match self {
            DynamicRoute::Post { .. } => "/posts/:postId",
            DynamicRoute::OwnPost { .. } => "/user/posts/:postId",
            DynamicRoute::Comment { .. } => "/user/posts/:postId/comments/:commentId",
            DynamicRoute::UserManagement { .. } => "/admin/users/:userId",
            DynamicRoute::UserPosts { .. } => "/admin/users/:userId/posts",
        }
    }

    pub fn params(&self) -> Params {
        let pairs: Vec<(&str, &String)> = match self {
            DynamicRoute::Post { post_id } | DynamicRoute::OwnPost { post_id } => {
                vec![("postId", post_id)]
            }
            DynamicRoute::Comment {
                post_id,
                comment_id,
            } => vec![("postId", post_id), ("commentId", comment_id)],
            DynamicRoute::UserManagement { user_id } | DynamicRoute::UserPosts { user_id } => {
                vec![("userId", user_id)]
            }
        };

        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl RouteTable {
    /// Route table of the standard application
    ///
    /// Public pages are open to everyone, `user` pages need a signed-in
    /// role and `admin` pages need the admin role.
    pub fn standard() -> Self {
        let auth: Arc<dyn Guard> = Arc::new(AuthGuard);
        let admin: Arc<dyn Guard> = Arc::new(AdminGuard);

        let page = |title: &str, crumb: &str| RouteMetadata::new(title).with_breadcrumb(crumb);
        let member = |title: &str, crumb: &str| page(title, crumb).with_guard(auth.clone());
        let staff = |title: &str, crumb: &str| {
            page(title, crumb)
                .with_guard(admin.clone())
                .with_layout("admin")
        };

        let mut table = RouteTable::new()
            .with_static("public", "home", "/", page("Home", "Home"))
            .with_static("public", "about", "/about", page("About", "About"))
            .with_static("public", "login", "/login", page("Log in", "Log in"))
            .with_static("public", "register", "/register", page("Sign up", "Sign up"))
            .with_static("user", "profile", "/user/profile", member("Profile", "Profile"))
            .with_static("user", "settings", "/user/settings", member("Settings", "Settings"))
            .with_static("user", "dashboard", "/user/dashboard", member("Dashboard", "Dashboard"))
            .with_static("admin", "users", "/admin/users", staff("User management", "Users"))
            .with_static("admin", "settings", "/admin/settings", staff("Admin settings", "Admin settings"))
            .with_static("admin", "analytics", "/admin/analytics", staff("Analytics", "Analytics"));

        let dynamic = [
            ("public", "post", "/posts/:postId", page("Post", "Post")),
            ("user", "ownPost", "/user/posts/:postId", member("My post", "My post")),
            (
                "user",
                "comment",
                "/user/posts/:postId/comments/:commentId",
                member("Comment", "Comment"),
            ),
            ("admin", "userManagement", "/admin/users/:userId", staff("User detail", "User")),
            ("admin", "userPosts", "/admin/users/:userId/posts", staff("User posts", "Posts")),
        ];

        for (section, name, raw, metadata) in dynamic {
            // The patterns above are literals known to parse
            if let Ok(pattern) = RoutePattern::parse(raw) {
                table.add_dynamic(section, name, pattern, metadata);
            }
        }

        table
    }
}
