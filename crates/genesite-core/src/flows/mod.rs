//! The two prompt-backed pipeline steps.
//!
//! Each step renders a fixed instruction template, submits it with its output
//! schema, and parses the reply. Neither step keeps state between calls.

pub mod page;
pub mod theme;

pub use page::{automate_page_structure, PageInput, PAGE_PROMPT_NAME};
pub use theme::{suggest_theme, ThemeInput, THEME_PROMPT_NAME};
