pub mod components;
pub mod format;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{card, error_page, notice_banner, Notice};
pub use layouts::desktop::desktop_layout;
