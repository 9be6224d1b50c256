// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod storage;
pub mod webdriver;

pub use storage::LocalStorage;
pub use webdriver::WebDriverRenderer;
