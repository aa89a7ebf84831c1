//! Category management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use snackshop_core::models::{Category, CategoryInput};
use snackshop_core::{CategoryId, Validate, ValidationErrors};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::AdminLayout;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Category row for templates.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            sort_order: category.sort_order,
        }
    }
}

/// Raw category form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
    pub sort_order: String,
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            sort_order: category.sort_order.to_string(),
        }
    }
}

impl CategoryForm {
    /// Parse and validate into the backend's input shape.
    ///
    /// A blank sort order means 0.
    ///
    /// # Errors
    ///
    /// Returns every field problem found.
    pub fn to_input(&self) -> std::result::Result<CategoryInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let sort_order = match self.sort_order.trim() {
            "" => 0,
            raw => raw.parse::<i32>().unwrap_or_else(|_| {
                errors.add("sort_order", "Sort order must be a whole number");
                0
            }),
        };
        let description = self.description.trim();
        let input = CategoryInput {
            name: self.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            sort_order,
        };
        if let Err(rule_errors) = input.validate() {
            for error in rule_errors.errors() {
                errors.add(error.field, error.message.clone());
            }
        }
        errors.into_result().map(|()| input)
    }
}

/// The create-or-edit form shown beside the table.
#[derive(Debug, Clone)]
pub struct CategoryFormView {
    pub action: String,
    pub editing: bool,
    pub values: CategoryForm,
    pub errors: ValidationErrors,
}

impl CategoryFormView {
    #[must_use]
    pub fn blank() -> Self {
        Self {
            action: "/categories".to_string(),
            editing: false,
            values: CategoryForm::default(),
            errors: ValidationErrors::new(),
        }
    }

    #[must_use]
    pub fn editing(category: &Category) -> Self {
        Self {
            action: format!("/categories/{}", category.id),
            editing: true,
            values: CategoryForm::from(category),
            errors: ValidationErrors::new(),
        }
    }

    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.message_for(field)
    }
}

/// Categories page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub layout: AdminLayout,
    pub categories: Vec<CategoryView>,
    pub form: CategoryFormView,
}

/// `?edit={id}` switches the form to editing that category.
#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    pub edit: Option<CategoryId>,
}

fn sorted_views(categories: &[Category]) -> Vec<CategoryView> {
    let mut views: Vec<CategoryView> = categories.iter().map(CategoryView::from).collect();
    views.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
    views
}

/// Category list with the create or edit form.
///
/// GET /categories
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    layout: AdminLayout,
    Query(query): Query<CategoriesQuery>,
) -> Result<impl IntoResponse> {
    let categories = state.api().categories().await?;
    let form = query
        .edit
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map_or_else(CategoryFormView::blank, CategoryFormView::editing);

    Ok(CategoriesTemplate {
        layout,
        categories: sorted_views(&categories),
        form,
    })
}

/// Create a category.
///
/// POST /categories
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    layout: AdminLayout,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let input = match form.to_input() {
        Ok(input) => input,
        Err(errors) => {
            let view = CategoryFormView {
                values: form,
                errors,
                ..CategoryFormView::blank()
            };
            return render_invalid(&state, layout, view).await;
        }
    };

    let result = state.api().create_category(&admin.token, &input).await;
    flash::outcome(&session, result, "Category created").await?;
    Ok(Redirect::to("/categories").into_response())
}

/// Update a category.
///
/// POST /categories/{id}
#[instrument(skip_all, fields(admin_id = %admin.id, category_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    layout: AdminLayout,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let input = match form.to_input() {
        Ok(input) => input,
        Err(errors) => {
            let view = CategoryFormView {
                action: format!("/categories/{id}"),
                editing: true,
                values: form,
                errors,
            };
            return render_invalid(&state, layout, view).await;
        }
    };

    let result = state.api().update_category(&admin.token, id, &input).await;
    flash::outcome(&session, result, "Category saved").await?;
    Ok(Redirect::to("/categories").into_response())
}

/// Delete a category. The backend refuses while products still use it.
///
/// POST /categories/{id}/delete
#[instrument(skip_all, fields(admin_id = %admin.id, category_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<CategoryId>,
) -> Result<Redirect> {
    let result = state.api().delete_category(&admin.token, id).await;
    flash::outcome(&session, result, "Category deleted").await?;
    Ok(Redirect::to("/categories"))
}

async fn render_invalid(
    state: &AppState,
    layout: AdminLayout,
    form: CategoryFormView,
) -> Result<Response> {
    let categories = state.api().categories().await?;
    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        CategoriesTemplate {
            layout,
            categories: sorted_views(&categories),
            form,
        },
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_sort_order_is_zero() {
        let input = CategoryForm {
            name: "Chips".to_string(),
            description: "  ".to_string(),
            sort_order: String::new(),
        }
        .to_input()
        .unwrap();
        assert_eq!(input.sort_order, 0);
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_invalid_form_reports_fields() {
        let errors = CategoryForm {
            name: " ".to_string(),
            description: String::new(),
            sort_order: "first".to_string(),
        }
        .to_input()
        .unwrap_err();
        assert_eq!(errors.message_for("name"), Some("Name is required"));
        assert_eq!(
            errors.message_for("sort_order"),
            Some("Sort order must be a whole number")
        );
    }

    #[test]
    fn test_views_sorted_by_sort_order_then_name() {
        let categories: Vec<Category> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "Drinks", "sortOrder": 2},
            {"id": 2, "name": "Chips", "sortOrder": 1},
            {"id": 3, "name": "Candy", "sortOrder": 1}
        ]))
        .unwrap();
        let names: Vec<String> = sorted_views(&categories)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Candy", "Chips", "Drinks"]);
    }
}
