pub mod api;
pub mod auth;
pub mod icon;
pub mod notifications;
pub mod pages;
pub mod theme;

pub use icon::{Icon, icons};
pub use notifications::{NotificationsContainer, provide_notification_context, use_notifications};
pub use theme::{ThemeMode, provide_theme_context, use_theme_context};
