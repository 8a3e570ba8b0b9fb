//! Admin-site registration.
//!
//! Declares, per entity, what an external admin UI should show: list columns, list
//! filters, search fields, and child entities edited inline with a number of blank
//! extra forms. Nothing here renders anything; the registry is served as data.

use common::{EnrollmentMode, Occupation};
use sea_orm::IdenStatic;
use serde::Serialize;

use crate::entity::{course, lesson, question};

/// Columns searched by the course list endpoint and the admin search box.
pub const COURSE_SEARCH_FIELDS: [course::Column; 2] =
    [course::Column::Name, course::Column::Description];
pub const COURSE_LIST_DISPLAY: [course::Column; 2] = [course::Column::Name, course::Column::PubDate];
pub const COURSE_LIST_FILTER: [course::Column; 1] = [course::Column::PubDate];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InlineStyle {
    Stacked,
}

/// A child entity edited on its parent's page.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct InlineAdmin {
    #[schema(example = "lesson")]
    pub model: &'static str,
    /// Foreign key on the child pointing at the parent.
    #[schema(example = "course_id")]
    pub fk: &'static str,
    pub style: InlineStyle,
    /// Number of blank forms shown in addition to existing rows.
    #[schema(example = 5)]
    pub extra: u32,
}

pub const LESSON_INLINE: InlineAdmin = InlineAdmin {
    model: "lesson",
    fk: "course_id",
    style: InlineStyle::Stacked,
    extra: 5,
};

/// Question editor keyed on the course. Not attached to the course page, which
/// edits lessons only; questions get their own page with choices inline.
pub const QUESTION_INLINE: InlineAdmin = InlineAdmin {
    model: "question",
    fk: "course_id",
    style: InlineStyle::Stacked,
    extra: 2,
};

pub const CHOICE_INLINE: InlineAdmin = InlineAdmin {
    model: "choice",
    fk: "question_id",
    style: InlineStyle::Stacked,
    extra: 2,
};

#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ChoiceOption {
    #[schema(example = "dba")]
    pub value: &'static str,
    #[schema(example = "Database Admin")]
    pub label: &'static str,
}

/// A field restricted to a closed set of values.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ChoiceField {
    #[schema(example = "occupation")]
    pub field: &'static str,
    pub options: Vec<ChoiceOption>,
}

/// Admin options for one entity. Empty `list_display` means the entity's display string.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ModelAdmin {
    #[schema(example = "course")]
    pub model: &'static str,
    pub list_display: Vec<&'static str>,
    pub list_filter: Vec<&'static str>,
    pub search_fields: Vec<&'static str>,
    pub inlines: Vec<InlineAdmin>,
    pub choice_fields: Vec<ChoiceField>,
}

impl ModelAdmin {
    fn register(model: &'static str) -> Self {
        Self {
            model,
            list_display: Vec::new(),
            list_filter: Vec::new(),
            search_fields: Vec::new(),
            inlines: Vec::new(),
            choice_fields: Vec::new(),
        }
    }

    fn list_display<C: IdenStatic>(mut self, columns: &[C]) -> Self {
        self.list_display = columns.iter().map(|c| c.as_str()).collect();
        self
    }

    fn list_filter<C: IdenStatic>(mut self, columns: &[C]) -> Self {
        self.list_filter = columns.iter().map(|c| c.as_str()).collect();
        self
    }

    fn search_fields<C: IdenStatic>(mut self, columns: &[C]) -> Self {
        self.search_fields = columns.iter().map(|c| c.as_str()).collect();
        self
    }

    fn inline(mut self, inline: InlineAdmin) -> Self {
        self.inlines.push(inline);
        self
    }

    fn choices(
        mut self,
        field: &'static str,
        options: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        self.choice_fields.push(ChoiceField {
            field,
            options: options
                .into_iter()
                .map(|(value, label)| ChoiceOption { value, label })
                .collect(),
        });
        self
    }
}

/// Every registered entity, in registration order.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct AdminSite {
    pub models: Vec<ModelAdmin>,
}

impl AdminSite {
    pub fn get(&self, model: &str) -> Option<&ModelAdmin> {
        self.models.iter().find(|m| m.model == model)
    }
}

pub fn site() -> AdminSite {
    AdminSite {
        models: vec![
            ModelAdmin::register("course")
                .inline(LESSON_INLINE)
                .list_display(&COURSE_LIST_DISPLAY)
                .list_filter(&COURSE_LIST_FILTER)
                .search_fields(&COURSE_SEARCH_FIELDS),
            ModelAdmin::register("lesson").list_display(&[lesson::Column::Title]),
            ModelAdmin::register("instructor"),
            ModelAdmin::register("learner").choices(
                "occupation",
                Occupation::ALL.iter().map(|o| (o.as_str(), o.label())),
            ),
            ModelAdmin::register("question")
                .inline(CHOICE_INLINE)
                .list_display(&[question::Column::Content]),
            ModelAdmin::register("choice"),
            ModelAdmin::register("submission"),
            ModelAdmin::register("enrollment").choices(
                "mode",
                EnrollmentMode::ALL.iter().map(|m| (m.as_str(), m.label())),
            ),
        ],
    }
}
