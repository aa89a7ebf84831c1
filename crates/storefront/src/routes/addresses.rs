//! Address book.
//!
//! Every form is checked locally first; an invalid form is shown again with
//! the problems marked and nothing is sent to the backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use snackshop_core::models::{Address, AddressInput};
use snackshop_core::{AddressId, Validate, ValidationErrors};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::Layout;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Saved address row.
#[derive(Clone)]
pub struct AddressView {
    pub id: AddressId,
    pub receiver: String,
    pub phone: String,
    pub line: String,
    pub is_default: bool,
}

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            receiver: address.receiver_name.clone(),
            phone: address.phone.clone(),
            line: address.one_line(),
            is_default: address.is_default,
        }
    }
}

/// The create/edit form as rendered.
#[derive(Clone, Default)]
pub struct AddressFormView {
    /// Form target: `/addresses` or `/addresses/{id}`.
    pub action: String,
    pub editing: bool,
    pub values: AddressInput,
    pub errors: ValidationErrors,
}

impl AddressFormView {
    fn blank() -> Self {
        Self {
            action: "/addresses".to_string(),
            ..Self::default()
        }
    }

    fn editing(address: &Address) -> Self {
        Self {
            action: format!("/addresses/{}", address.id),
            editing: true,
            values: AddressInput::from(address),
            errors: ValidationErrors::new(),
        }
    }

    /// Problem with `field`, if any.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.message_for(field)
    }
}

/// Address book template.
#[derive(Template, WebTemplate)]
#[template(path = "addresses/index.html")]
pub struct AddressesTemplate {
    pub layout: Layout,
    pub addresses: Vec<AddressView>,
    pub form: AddressFormView,
}

/// `?edit=<id>` opens an address in the form.
#[derive(Debug, Default, Deserialize)]
pub struct AddressesQuery {
    pub edit: Option<AddressId>,
}

/// Address form data as posted by the browser.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddressForm {
    pub receiver_name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail: String,
    pub postal_code: String,
    /// Checkbox: present when ticked.
    pub is_default: Option<String>,
}

impl From<AddressForm> for AddressInput {
    fn from(form: AddressForm) -> Self {
        Self {
            receiver_name: form.receiver_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            province: form.province.trim().to_string(),
            city: form.city.trim().to_string(),
            district: form.district.trim().to_string(),
            detail: form.detail.trim().to_string(),
            postal_code: form.postal_code.trim().to_string(),
            is_default: form.is_default.is_some(),
        }
    }
}

async fn render(
    state: &AppState,
    user: &CurrentUser,
    layout: Layout,
    form: AddressFormView,
) -> Result<AddressesTemplate> {
    let addresses = state.api().addresses(&user.token).await?;
    Ok(AddressesTemplate {
        layout,
        addresses: addresses.iter().map(AddressView::from).collect(),
        form,
    })
}

async fn render_invalid(
    state: &AppState,
    user: &CurrentUser,
    layout: Layout,
    form: AddressFormView,
) -> Result<Response> {
    let page = render(state, user, layout, form).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

/// List addresses alongside the create (or edit) form.
#[instrument(skip(state, user, layout), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    layout: Layout,
    Query(query): Query<AddressesQuery>,
) -> Result<impl IntoResponse> {
    let addresses = state.api().addresses(&user.token).await?;
    let form = query
        .edit
        .and_then(|id| addresses.iter().find(|a| a.id == id))
        .map_or_else(AddressFormView::blank, AddressFormView::editing);

    Ok(AddressesTemplate {
        layout,
        addresses: addresses.iter().map(AddressView::from).collect(),
        form,
    })
}

/// Add an address.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    layout: Layout,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let input = AddressInput::from(form);
    if let Err(errors) = input.validate() {
        let form = AddressFormView {
            values: input,
            errors,
            ..AddressFormView::blank()
        };
        return render_invalid(&state, &user, layout, form).await;
    }

    let result = state.api().create_address(&user.token, &input).await;
    flash::outcome(&session, result, "Address saved").await?;
    Ok(Redirect::to("/addresses").into_response())
}

/// Edit an address.
#[instrument(skip_all, fields(user_id = %user.id, address_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    layout: Layout,
    Path(id): Path<AddressId>,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let input = AddressInput::from(form);
    if let Err(errors) = input.validate() {
        let form = AddressFormView {
            action: format!("/addresses/{id}"),
            editing: true,
            values: input,
            errors,
        };
        return render_invalid(&state, &user, layout, form).await;
    }

    let result = state.api().update_address(&user.token, id, &input).await;
    flash::outcome(&session, result, "Address updated").await?;
    Ok(Redirect::to("/addresses").into_response())
}

/// Delete an address.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Redirect> {
    let result = state.api().delete_address(&user.token, id).await;
    flash::outcome(&session, result, "Address deleted").await?;
    Ok(Redirect::to("/addresses"))
}

/// Make an address the default.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn make_default(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Redirect> {
    let result = state.api().set_default_address(&user.token, id).await;
    flash::outcome(&session, result, "Default address updated").await?;
    Ok(Redirect::to("/addresses"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_trims_and_reads_checkbox() {
        let form = AddressForm {
            receiver_name: "  Ann ".to_string(),
            postal_code: " 100001".to_string(),
            is_default: Some("on".to_string()),
            ..AddressForm::default()
        };
        let input = AddressInput::from(form);
        assert_eq!(input.receiver_name, "Ann");
        assert_eq!(input.postal_code, "100001");
        assert!(input.is_default);
        assert!(!AddressInput::from(AddressForm::default()).is_default);
    }

    #[test]
    fn test_form_view_exposes_field_errors() {
        let input = AddressInput::from(AddressForm::default());
        let errors = input.validate().err().unwrap_or_default();
        let view = AddressFormView {
            errors,
            ..AddressFormView::blank()
        };
        assert!(view.error("city").is_some());
        assert!(view.error("is_default").is_none());
        assert_eq!(view.action, "/addresses");
    }
}
