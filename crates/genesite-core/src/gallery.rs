//! Template gallery.
//!
//! Picking a gallery entry only sets the request's `template` field, which the
//! theme step folds into its free-text description.

use serde::Serialize;

/// Template preselected on the form.
pub const DEFAULT_TEMPLATE_ID: &str = "template-startup";

/// A gallery entry shown on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub image_hint: &'static str,
}

const TEMPLATES: &[TemplateEntry] = &[
    TemplateEntry {
        id: "template-startup",
        name: "Startup",
        description: "Bold landing page for a product launch.",
        image_url: "https://picsum.photos/seed/startup/600/400",
        image_hint: "startup office",
    },
    TemplateEntry {
        id: "template-portfolio",
        name: "Portfolio",
        description: "Showcase of creative work with a project grid.",
        image_url: "https://picsum.photos/seed/portfolio/600/400",
        image_hint: "designer desk",
    },
    TemplateEntry {
        id: "template-agency",
        name: "Agency",
        description: "Services, case studies and a contact call to action.",
        image_url: "https://picsum.photos/seed/agency/600/400",
        image_hint: "team meeting",
    },
    TemplateEntry {
        id: "template-restaurant",
        name: "Restaurant",
        description: "Menu, opening hours and reservations.",
        image_url: "https://picsum.photos/seed/restaurant/600/400",
        image_hint: "restaurant interior",
    },
    TemplateEntry {
        id: "template-blog",
        name: "Blog",
        description: "Article listing with featured posts.",
        image_url: "https://picsum.photos/seed/blog/600/400",
        image_hint: "writing notebook",
    },
];

/// All gallery templates, in display order.
pub fn templates() -> &'static [TemplateEntry] {
    TEMPLATES
}
