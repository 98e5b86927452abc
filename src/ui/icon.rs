use leptos::prelude::*;

#[component]
pub fn Icon(
    /// Icon name (without the .svg extension)
    name: &'static str,
    /// CSS classes for styling
    #[prop(default = "w-5 h-5")]
    class: &'static str,
) -> impl IntoView {
    let icon_path = format!("/icons/{}.svg", name);

    view! {
        <img
            src=icon_path
            class=class
            alt=name
            draggable=false
        />
    }
}

/// Predefined icon names
#[allow(dead_code)]
pub mod icons {
    pub const HEART: &str = "heart";
    pub const BOX: &str = "box";
    pub const TRUCK: &str = "truck";
    pub const STAR: &str = "star";
    pub const PLUS: &str = "plus";
    pub const CHECK: &str = "check";
    pub const X: &str = "x";
    pub const CLOCK: &str = "clock";
    pub const MAP_PIN: &str = "map-pin";
    pub const USER: &str = "user";
    pub const LOGOUT: &str = "logout";
    pub const EYE: &str = "eye";
    pub const EYE_CLOSED: &str = "eye-closed";
    pub const LOADER: &str = "loader";
    pub const ALERT_CIRCLE: &str = "alert-circle";
    pub const SUN: &str = "sun";
    pub const MOON: &str = "moon";
}
